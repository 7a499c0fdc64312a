//! Process settings for Orbis.
//!
//! Settings are read from a YAML file given on the command line or via the
//! `ORBIS_SETTINGS` env var. Every field has a default, so an empty (or
//! missing) settings file is valid. `ORBIS_DATA_DIR` overrides `data_dir`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::run_config::read_yaml;

pub const SETTINGS_ENV: &str = "ORBIS_SETTINGS";
pub const DATA_DIR_ENV: &str = "ORBIS_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the resource tree (`lenses/`, `mappings/`, `filters/`).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub sparql: SparqlSettings,

    #[serde(default)]
    pub type_patterns: TypePatterns,

    /// Evaluator name -> (gold label -> canonical label).
    #[serde(default = "default_entity_maps")]
    pub entity_maps: HashMap<String, HashMap<String, String>>,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sparql: SparqlSettings::default(),
            type_patterns: TypePatterns::default(),
            entity_maps: default_entity_maps(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to `ORBIS_SETTINGS`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(SETTINGS_ENV).ok().map(PathBuf::from);
        let mut settings = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading settings");
                read_yaml(&path)?
            }
            None => Settings::default(),
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            settings.data_dir = PathBuf::from(dir);
        }
        Ok(settings)
    }

    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

// ── SPARQL ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparqlSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String { "http://dbpedia.org/sparql".to_string() }
fn default_timeout_secs() -> u64 { 30 }

impl Default for SparqlSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── Type patterns ────────────────────────────────────────────────────────────

/// Data for the entity type matchers.
///
/// Each category pattern is `base_pattern` followed by an alternation of the
/// category terms and an optional numeric suffix (YAGO class ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypePatterns {
    #[serde(default = "default_base_pattern")]
    pub base_pattern: String,
    #[serde(default = "default_organization_terms")]
    pub organization: Vec<String>,
    #[serde(default = "default_person_terms")]
    pub person: Vec<String>,
    #[serde(default = "default_location_terms")]
    pub location: Vec<String>,
    /// Substring marking a URI that is absent from the knowledge graph.
    #[serde(default = "default_not_in_wiki_marker")]
    pub not_in_wiki_marker: String,
}

fn default_base_pattern() -> String {
    concat!(
        r"https?://(?:",
        r"dbpedia\.org/ontology/",
        r"|dbpedia\.org/class/yago/",
        r"|schema\.org/",
        r"|xmlns\.com/foaf/0\.1/",
        r"|umbel\.org/umbel/rc/",
        r"|www\.ontologydesignpatterns\.org/ont/dul/DUL\.owl#",
        r")"
    )
    .to_string()
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn default_organization_terms() -> Vec<String> {
    terms(&[
        "Organisation", "Organization", "Company", "Corporation", "Band",
        "SportsTeam", "SportsClub", "University", "EducationalInstitution",
        "PoliticalParty", "GovernmentAgency", "Broadcaster", "Non-ProfitOrganisation",
    ])
}

fn default_person_terms() -> Vec<String> {
    terms(&[
        "Person", "Human", "Artist", "Athlete", "Politician", "OfficeHolder",
        "Scientist", "Writer", "Actor", "MusicalArtist", "Royalty", "Philosopher",
    ])
}

fn default_location_terms() -> Vec<String> {
    terms(&[
        "Place", "Location", "PopulatedPlace", "Settlement", "City", "Town",
        "Village", "Country", "Region", "AdministrativeRegion", "Continent",
        "Island", "Mountain", "River",
    ])
}

fn default_not_in_wiki_marker() -> String { "http://aksw.org/notInWiki".to_string() }

impl Default for TypePatterns {
    fn default() -> Self {
        Self {
            base_pattern: default_base_pattern(),
            organization: default_organization_terms(),
            person: default_person_terms(),
            location: default_location_terms(),
            not_in_wiki_marker: default_not_in_wiki_marker(),
        }
    }
}

// ── Entity maps ──────────────────────────────────────────────────────────────

fn default_entity_maps() -> HashMap<String, HashMap<String, String>> {
    let conll: HashMap<String, String> = [
        ("PER", "Person"),
        ("ORG", "Organization"),
        ("LOC", "Place"),
        ("MISC", "Misc"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut maps = HashMap::new();
    maps.insert("conll".to_string(), conll);
    maps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.sparql.endpoint, "http://dbpedia.org/sparql");
        assert_eq!(settings.type_patterns.not_in_wiki_marker, "http://aksw.org/notInWiki");
        assert!(settings.entity_maps.contains_key("conll"));
    }

    #[test]
    fn test_partial_override() {
        let yaml = r#"
data_dir: /srv/orbis/data
sparql:
  timeout_secs: 5
type_patterns:
  person: [Person]
entity_maps:
  aida:
    PER: Person
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/srv/orbis/data"));
        assert_eq!(settings.sparql.timeout_secs, 5);
        assert_eq!(settings.sparql.endpoint, default_endpoint());
        assert_eq!(settings.type_patterns.person, vec!["Person".to_string()]);
        assert_eq!(settings.type_patterns.organization, default_organization_terms());
        assert!(!settings.entity_maps.contains_key("conll"));
        assert_eq!(settings.entity_maps["aida"]["PER"], "Person");
    }

    #[test]
    fn test_with_data_dir() {
        let settings = Settings::default().with_data_dir("/tmp/x");
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/x"));
    }
}
