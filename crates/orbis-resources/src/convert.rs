//! Raw resource conversion.
//!
//! Turns a raw source artifact into a [`CachedResource`] and writes it to the
//! sibling cache path:
//! - mapping: xz-compressed JSON `{canonical: [alias, ...]}` -> alias URI -> canonical URI
//! - lense:   xz-compressed list of URL-encoded, HTML-escaped entity ids -> URI set
//! - filter:  plain list of surface forms -> surface form set

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xz2::read::XzDecoder;

use crate::error::{ResourceError, Result};
use crate::kind::ResourceKind;
use crate::layout::cache_path_for_source;
use crate::progress::ConversionProgress;
use crate::resource::CachedResource;

/// Namespace every converted entity URI lives in.
pub const RESOURCE_PREFIX: &str = "http://dbpedia.org/resource/";
/// Wikipedia article prefix rewritten to [`RESOURCE_PREFIX`] in lenses.
pub const WIKIPEDIA_PREFIX: &str = "http://en.wikipedia.org/wiki/";

/// Convert `source` and write the cache next to it. Returns the cache path.
pub fn convert(kind: ResourceKind, source: &Path, progress: &dyn ConversionProgress) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(ResourceError::MissingSource {
            kind,
            path: source.to_path_buf(),
        });
    }

    let resource = match kind {
        ResourceKind::Mapping => convert_mapping(source, progress)?,
        ResourceKind::Lense => convert_lense(source, progress)?,
        ResourceKind::Filter => convert_filter(source, progress)?,
    };

    let cache = cache_path_for_source(source);
    resource.write(&cache)?;
    info!(
        kind = %kind,
        entries = resource.len(),
        cache = %cache.display(),
        "Converted resource"
    );
    Ok(cache)
}

// ─────────────────────────────────────────────────────────────────────────
// Mappings

pub fn convert_mapping(source: &Path, progress: &dyn ConversionProgress) -> Result<CachedResource> {
    let bytes = read_xz(ResourceKind::Mapping, source)?;
    let redirects: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&bytes).map_err(|e| parse_error(source, e))?;

    progress.start("Converting mapping", redirects.len() as u64);
    let mut entity_map = BTreeMap::new();

    for (canonical, aliases) in redirects {
        let aliases: Vec<String> = serde_json::from_value(aliases).map_err(|e| parse_error(source, e))?;
        let canonical_uri = to_resource_uri(&canonical);
        for alias in aliases {
            entity_map.insert(to_resource_uri(&alias), canonical_uri.clone());
        }
        progress.advance(1);
    }

    progress.finish();
    Ok(CachedResource::Mapping(entity_map))
}

fn to_resource_uri(title: &str) -> String {
    format!("{RESOURCE_PREFIX}{}", title.replace(' ', "_"))
}

// ─────────────────────────────────────────────────────────────────────────
// Lenses

pub fn convert_lense(source: &Path, progress: &dyn ConversionProgress) -> Result<CachedResource> {
    let bytes = read_xz(ResourceKind::Lense, source)?;
    let text = decode_utf8(source, bytes)?;

    let entities = collect_lines(&text, "Converting lense", progress, normalize_lense_entry);
    Ok(CachedResource::Lense(entities))
}

/// Normalize one raw lense line into an entity URI.
pub fn normalize_lense_entry(line: &str) -> String {
    let terminated = expand_legacy_entities(line);
    let unescaped = html_escape::decode_html_entities(&terminated);
    let unquoted = unquote_plus(&unescaped);
    unquoted
        .replace('\n', "")
        .replace(WIKIPEDIA_PREFIX, RESOURCE_PREFIX)
        .replace(' ', "_")
}

/// Named references HTML allows without a trailing `;`.
const LEGACY_ENTITIES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil", "ETH",
    "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT", "Ntilde",
    "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN", "Uacute", "Ucirc",
    "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave", "amp", "aring", "atilde",
    "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg", "divide", "eacute", "ecirc",
    "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt", "iacute", "icirc", "iexcl", "igrave",
    "iquest", "iuml", "laquo", "lt", "macr", "micro", "middot", "nbsp", "not", "ntilde", "oacute",
    "ocirc", "ograve", "ordf", "ordm", "oslash", "otilde", "ouml", "para", "plusmn", "pound", "quot",
    "raquo", "reg", "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "uacute",
    "ucirc", "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

/// Terminate legacy references written without `;` (`&ampB` -> `&amp;B`),
/// longest name first, unless the whole run is already a known `&name;`.
fn expand_legacy_entities(line: &str) -> Cow<'_, str> {
    if !line.contains('&') {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len() + 4);
    let mut rest = line;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let run_len = after
            .char_indices()
            .take_while(|(i, c)| *i < 32 && !matches!(c, '\t' | '\n' | '\x0C' | ' ' | '<' | '&' | '#' | ';'))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(0);
        let run = &after[..run_len];
        let terminated = after[run_len..].starts_with(';');

        let known = terminated && {
            let reference = format!("&{run};");
            html_escape::decode_html_entities(&reference) != reference
        };
        let legacy = LEGACY_ENTITIES
            .iter()
            .filter(|name| run.starts_with(*name))
            .max_by_key(|name| name.len());

        match legacy {
            Some(name) if !known => {
                out.push('&');
                out.push_str(name);
                out.push(';');
                rest = &after[name.len()..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Percent-decode with `+` as space; invalid UTF-8 becomes U+FFFD.
fn unquote_plus(s: &str) -> String {
    let spaced = s.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

// ─────────────────────────────────────────────────────────────────────────
// Filters

pub fn convert_filter(source: &Path, progress: &dyn ConversionProgress) -> Result<CachedResource> {
    let bytes = read_source(ResourceKind::Filter, source)?;
    let text = decode_utf8(source, bytes)?;

    let surface_forms = collect_lines(&text, "Converting filter", progress, |line: &str| line.to_string());
    Ok(CachedResource::Filter(surface_forms))
}

// ─────────────────────────────────────────────────────────────────────────
// Utilities

fn collect_lines(
    text: &str,
    label: &str,
    progress: &dyn ConversionProgress,
    normalize: impl Fn(&str) -> String,
) -> BTreeSet<String> {
    progress.start(label, text.lines().count() as u64);

    let mut entries = BTreeSet::new();
    for line in text.lines() {
        progress.advance(1);
        if line.trim().is_empty() {
            continue;
        }
        entries.insert(normalize(line));
    }

    progress.finish();
    entries
}

/// Raw bytes of a source. Any failure to read it counts as a missing source.
fn read_source(kind: ResourceKind, path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        debug!(kind = %kind, path = %path.display(), error = %e, "Cannot read source");
        ResourceError::MissingSource {
            kind,
            path: path.to_path_buf(),
        }
    })
}

fn read_xz(kind: ResourceKind, path: &Path) -> Result<Vec<u8>> {
    let compressed = read_source(kind, path)?;
    let mut decoder = XzDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes).map_err(|e| ResourceError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(bytes)
}

fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| ResourceError::Decode {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn parse_error(path: &Path, source: serde_json::Error) -> ResourceError {
    ResourceError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use std::io::Write;
    use xz2::write::XzEncoder;

    fn write_xz(path: &Path, content: &[u8]) {
        let file = File::create(path).unwrap();
        let mut encoder = XzEncoder::new(file, 6);
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_normalize_lense_entry() {
        assert_eq!(
            normalize_lense_entry("http://en.wikipedia.org/wiki/Barack%20Obama"),
            "http://dbpedia.org/resource/Barack_Obama"
        );
        assert_eq!(
            normalize_lense_entry("http://en.wikipedia.org/wiki/AT&amp;T"),
            "http://dbpedia.org/resource/AT&T"
        );
        assert_eq!(
            normalize_lense_entry("http://en.wikipedia.org/wiki/New+York+City"),
            "http://dbpedia.org/resource/New_York_City"
        );
        assert_eq!(
            normalize_lense_entry("http://en.wikipedia.org/wiki/Z%C3%BCrich"),
            "http://dbpedia.org/resource/Zürich"
        );
    }

    #[test]
    fn test_legacy_entities_without_semicolon() {
        assert_eq!(
            normalize_lense_entry("http://en.wikipedia.org/wiki/A&ampB"),
            "http://dbpedia.org/resource/A&B"
        );
        assert_eq!(expand_legacy_entities("&notit"), "&not;it");
        assert_eq!(expand_legacy_entities("&ampfoo;"), "&amp;foo;");
        assert_eq!(expand_legacy_entities("&amp;&eacute;"), "&amp;&eacute;");
        assert_eq!(expand_legacy_entities("Q&A &unknown"), "Q&A &unknown");
        assert_eq!(html_escape::decode_html_entities(&expand_legacy_entities("&eacutex &lt")), "éx <");
    }

    #[test]
    fn test_unquote_plus_invalid_utf8() {
        assert_eq!(unquote_plus("a%FFb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_convert_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("redirects.xz");
        write_xz(
            &source,
            r#"{"New York City": ["NYC", "New York, New York"], "Zurich": ["Zürich"]}"#.as_bytes(),
        );

        let resource = convert_mapping(&source, &NoProgress).unwrap();
        let CachedResource::Mapping(map) = resource else { panic!("expected mapping") };
        assert_eq!(map.len(), 3);
        assert_eq!(map["http://dbpedia.org/resource/NYC"], "http://dbpedia.org/resource/New_York_City");
        assert_eq!(
            map["http://dbpedia.org/resource/New_York,_New_York"],
            "http://dbpedia.org/resource/New_York_City"
        );
        assert_eq!(map["http://dbpedia.org/resource/Zürich"], "http://dbpedia.org/resource/Zurich");
    }

    #[test]
    fn test_convert_mapping_last_alias_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("redirects.xz");
        write_xz(&source, br#"{"Zeta": ["Shared"], "Alpha": ["Shared"]}"#);

        let CachedResource::Mapping(map) = convert_mapping(&source, &NoProgress).unwrap() else {
            panic!("expected mapping")
        };
        // File order, not key order, decides.
        assert_eq!(map["http://dbpedia.org/resource/Shared"], "http://dbpedia.org/resource/Alpha");
    }

    #[test]
    fn test_convert_mapping_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.xz");
        write_xz(&source, b"{\"A\": [\"B\"");
        assert!(matches!(convert_mapping(&source, &NoProgress), Err(ResourceError::Parse { .. })));

        write_xz(&source, br#"{"A": "not a list"}"#);
        assert!(matches!(convert_mapping(&source, &NoProgress), Err(ResourceError::Parse { .. })));
    }

    #[test]
    fn test_convert_mapping_not_xz() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("plain.xz");
        std::fs::write(&source, br#"{"A": ["B"]}"#).unwrap();
        assert!(matches!(convert_mapping(&source, &NoProgress), Err(ResourceError::Decode { .. })));
    }

    #[test]
    fn test_convert_lense_collapses_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("entities.xz");
        write_xz(
            &source,
            b"http://en.wikipedia.org/wiki/Berlin\nhttp://en.wikipedia.org/wiki/Berlin\n\nhttp://dbpedia.org/resource/Bern\n",
        );

        let resource = convert_lense(&source, &NoProgress).unwrap();
        assert_eq!(
            resource,
            CachedResource::Lense(
                [
                    "http://dbpedia.org/resource/Berlin".to_string(),
                    "http://dbpedia.org/resource/Bern".to_string(),
                ]
                .into()
            )
        );
    }

    #[test]
    fn test_convert_lense_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.xz");
        write_xz(&source, b"http://en.wikipedia.org/wiki/\xff\n");
        assert!(matches!(convert_lense(&source, &NoProgress), Err(ResourceError::Decode { .. })));
    }

    #[test]
    fn test_convert_filter_keeps_surface_forms_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("us_states.txt");
        std::fs::write(&source, "New York\r\nTexas\nNew York\n").unwrap();

        let resource = convert_filter(&source, &NoProgress).unwrap();
        assert_eq!(
            resource,
            CachedResource::Filter(["New York".to_string(), "Texas".to_string()].into())
        );
    }

    #[test]
    fn test_convert_writes_sibling_cache() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("us_states.txt");
        std::fs::write(&source, "Texas\n").unwrap();

        let cache = convert(ResourceKind::Filter, &source, &NoProgress).unwrap();
        assert_eq!(cache, dir.path().join("us_states.bin"));
        assert_eq!(
            CachedResource::read(&cache, ResourceKind::Filter).unwrap(),
            CachedResource::Filter(["Texas".to_string()].into())
        );
    }

    #[test]
    fn test_unreadable_source_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        // A directory opens but cannot be read as a file.
        let unreadable = dir.path().join("unreadable.txt");
        std::fs::create_dir(&unreadable).unwrap();

        let err = convert_filter(&unreadable, &NoProgress).unwrap_err();
        assert!(matches!(
            err,
            ResourceError::MissingSource { kind: ResourceKind::Filter, ref path } if path == &unreadable
        ));
        assert!(matches!(
            convert_lense(&unreadable, &NoProgress),
            Err(ResourceError::MissingSource { kind: ResourceKind::Lense, .. })
        ));
        assert!(matches!(
            convert_mapping(&dir.path().join("absent.xz"), &NoProgress),
            Err(ResourceError::MissingSource { kind: ResourceKind::Mapping, .. })
        ));
    }

    #[test]
    fn test_convert_filter_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("bad.txt");
        std::fs::write(&source, b"Texas\n\xff\n").unwrap();
        assert!(matches!(convert_filter(&source, &NoProgress), Err(ResourceError::Decode { .. })));
    }

    #[test]
    fn test_convert_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.xz");

        let err = convert(ResourceKind::Lense, &source, &NoProgress).unwrap_err();
        assert!(matches!(err, ResourceError::MissingSource { kind: ResourceKind::Lense, .. }));
        assert!(err.to_string().contains("absent.xz"));
        assert!(!dir.path().join("absent.bin").exists());
    }
}
