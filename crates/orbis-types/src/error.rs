use thiserror::Error;

use crate::category::TypeCategory;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("SPARQL request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("SPARQL endpoint {endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed SPARQL result: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid {category} type pattern: {source}")]
    Pattern {
        category: TypeCategory,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, TypeError>;
