use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orbis_common::Settings;
use orbis_resources::{check_resources, convert, BarProgress, ResourceCache, ResourceKind, ResourceLayout, SourceNewerPolicy};
use orbis_types::{normalize_entity_type, normalize_tags, EntityTypeResolver, SparqlTypeSource, TypeClassifier};

#[derive(Parser)]
#[command(name = "orbis", version, about = "Evaluation resources and entity types")]
struct Cli {
    /// Settings YAML (defaults apply to every missing field).
    #[arg(long, global = true, env = "ORBIS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert and load every resource the given run configs request.
    Check {
        /// Rebuild every cache from its source.
        #[arg(long)]
        refresh: bool,
        /// Also rebuild caches older than their source.
        #[arg(long)]
        source_newer: bool,
        #[arg(required = true)]
        configs: Vec<PathBuf>,
    },
    /// Convert one source artifact into a cache file next to it.
    Convert {
        /// lense, mapping or filter
        kind: ResourceKind,
        source: PathBuf,
    },
    /// Look up and classify the type of an entity URI.
    EntityType {
        /// SPARQL endpoint (defaults to the settings value).
        #[arg(long)]
        endpoint: Option<String>,
        /// Resolve wiki redirects first.
        #[arg(long)]
        check_redirect: bool,
        /// Use the first recognised type instead of a majority vote.
        #[arg(long)]
        first_best: bool,
        uri: String,
    },
    /// Normalize a raw entity type name or URI.
    Normalize { raw_type: String },
    /// Map a gold label to the label an evaluator uses.
    Tag { evaluator: String, label: String },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.settings.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Command::Check {
            refresh,
            source_newer,
            configs,
        } => {
            let mut cache = ResourceCache::new(ResourceLayout::new(&settings.data_dir)).with_progress(BarProgress::default());
            if source_newer {
                cache = cache.with_policy(SourceNewerPolicy);
            }
            info!(data_dir = %cache.layout().data_dir().display(), "Using data dir");

            let resources = check_resources(&cache, &configs, refresh)?;
            println!("lenses:   {} entities", resources.lenses.len());
            println!("mappings: {} redirects", resources.mappings.len());
            println!("filters:  {} surface forms", resources.filters.len());
        }

        Command::Convert { kind, source } => {
            let cache = convert(kind, &source, &BarProgress::default())
                .with_context(|| format!("Failed to convert {}", source.display()))?;
            println!("{}", cache.display());
        }

        Command::EntityType {
            endpoint,
            check_redirect,
            first_best,
            uri,
        } => {
            let mut sparql = settings.sparql.clone();
            if let Some(endpoint) = endpoint {
                sparql.endpoint = endpoint;
            }
            let source = SparqlTypeSource::from_settings(&sparql)?;
            info!(endpoint = source.endpoint(), "Querying SPARQL endpoint");
            let classifier = TypeClassifier::from_patterns(&settings.type_patterns)?;
            let resolver = EntityTypeResolver::new(source, classifier).with_first_best(first_best);

            let entity_type = resolver
                .resolve(&uri, check_redirect)
                .with_context(|| format!("Failed to resolve the entity type of {uri}"))?;
            println!("{entity_type}");
        }

        Command::Normalize { raw_type } => {
            println!("{}", normalize_entity_type(&raw_type));
        }

        Command::Tag { evaluator, label } => {
            println!("{}", normalize_tags(&label, &evaluator, &settings.entity_maps));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from(["orbis", "convert", "mappings", "data/mappings/redirects.xz"]);
        match cli.command {
            Command::Convert { kind, source } => {
                assert_eq!(kind, ResourceKind::Mapping);
                assert_eq!(source, PathBuf::from("data/mappings/redirects.xz"));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_entity_type_flags() {
        let cli = Cli::parse_from(["orbis", "-v", "entity-type", "--first-best", "http://dbpedia.org/resource/Berlin"]);
        assert!(cli.verbose);
        match cli.command {
            Command::EntityType {
                endpoint,
                check_redirect,
                first_best,
                uri,
            } => {
                assert!(endpoint.is_none());
                assert!(!check_redirect);
                assert!(first_best);
                assert_eq!(uri, "http://dbpedia.org/resource/Berlin");
            }
            _ => panic!("expected entity-type"),
        }
    }

    #[test]
    fn test_check_requires_config() {
        assert!(Cli::try_parse_from(["orbis", "check"]).is_err());
    }
}
