//! Type URIs and redirects from a SPARQL endpoint.

use std::collections::HashMap;
use std::time::Duration;

use orbis_common::settings::SparqlSettings;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TypeError};

const SPARQL_JSON: &str = "application/sparql-results+json";

/// Where the candidate type URIs of an entity come from.
pub trait TypeSource {
    /// Every type URI of `uri`, following `rdf:type` transitively.
    fn types_of(&self, uri: &str) -> Result<Vec<String>>;

    /// Redirect target of `uri`, if it is a redirect page.
    fn redirect_of(&self, uri: &str) -> Result<Option<String>>;
}

pub struct SparqlTypeSource {
    endpoint: String,
    client: Client,
}

impl SparqlTypeSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TypeError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;
        Ok(Self { endpoint, client })
    }

    pub fn from_settings(settings: &SparqlSettings) -> Result<Self> {
        Self::new(settings.endpoint.clone(), Duration::from_secs(settings.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn select(&self, query: &str, var: &str) -> Result<Vec<String>> {
        debug!(endpoint = %self.endpoint, "SPARQL query:\n{query}");
        let http_error = |source| TypeError::Http {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", SPARQL_JSON)])
            .header(ACCEPT, SPARQL_JSON)
            .send()
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TypeError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(http_error)?;
        parse_bindings(&body, var)
    }
}

impl TypeSource for SparqlTypeSource {
    fn types_of(&self, uri: &str) -> Result<Vec<String>> {
        self.select(&types_query(uri), "obj")
    }

    fn redirect_of(&self, uri: &str) -> Result<Option<String>> {
        let targets = self.select(&redirect_query(uri), "redirected")?;
        Ok(targets.into_iter().next().filter(|target| target != uri))
    }
}

fn types_query(uri: &str) -> String {
    format!(
        "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
         SELECT DISTINCT ?obj\n\
         WHERE {{\n  <{uri}> (rdf:type)* ?obj .\n}}"
    )
}

fn redirect_query(uri: &str) -> String {
    format!(
        "SELECT DISTINCT ?redirected\n\
         WHERE {{\n  <{uri}> <http://dbpedia.org/ontology/wikiPageRedirects> ?redirected .\n}}"
    )
}

// ─────────────────────────────────────────────────────────────────────────
// SPARQL JSON results

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Values bound to `var`, in result order. Rows without it are skipped.
fn parse_bindings(body: &str, var: &str) -> Result<Vec<String>> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    Ok(response
        .results
        .bindings
        .into_iter()
        .filter_map(|mut row| row.remove(var))
        .map(|binding| binding.value)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bindings() {
        let body = r#"{
            "head": {"vars": ["obj"]},
            "results": {"bindings": [
                {"obj": {"type": "uri", "value": "http://dbpedia.org/ontology/Person"}},
                {"other": {"type": "uri", "value": "ignored"}},
                {"obj": {"type": "uri", "value": "http://xmlns.com/foaf/0.1/Person"}}
            ]}
        }"#;
        assert_eq!(
            parse_bindings(body, "obj").unwrap(),
            vec![
                "http://dbpedia.org/ontology/Person".to_string(),
                "http://xmlns.com/foaf/0.1/Person".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        let empty = r#"{"head": {"vars": []}, "results": {"bindings": []}}"#;
        assert!(parse_bindings(empty, "obj").unwrap().is_empty());
        assert!(matches!(parse_bindings("<html>", "obj"), Err(TypeError::Parse(_))));
    }

    #[test]
    fn test_queries_embed_uri() {
        let uri = "http://dbpedia.org/resource/Berlin";
        assert!(types_query(uri).contains("<http://dbpedia.org/resource/Berlin> (rdf:type)* ?obj ."));
        assert!(redirect_query(uri).contains("<http://dbpedia.org/ontology/wikiPageRedirects> ?redirected"));
    }

    #[test]
    fn test_from_settings() {
        let settings = SparqlSettings {
            endpoint: "http://localhost:8890/sparql".to_string(),
            timeout_secs: 5,
        };
        let source = SparqlTypeSource::from_settings(&settings).unwrap();
        assert_eq!(source.endpoint(), "http://localhost:8890/sparql");
    }

    #[test]
    #[ignore = "queries the public DBpedia endpoint"]
    fn test_dbpedia_types() {
        let source = SparqlTypeSource::from_settings(&SparqlSettings::default()).unwrap();
        let types = source.types_of("http://dbpedia.org/resource/Berlin").unwrap();
        assert!(types.iter().any(|t| t == "http://dbpedia.org/ontology/City"));
    }
}
