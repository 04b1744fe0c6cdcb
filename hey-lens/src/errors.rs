use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Lens API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{}", first_message(.0))]
    GraphQl(Vec<GraphQlError>),
    #[error("Lens API response for `{0}` contained no data")]
    MissingData(&'static str),
    #[error("Invalid Lens API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("Access token contains characters not allowed in a header")]
    InvalidAccessToken,
    #[error("Poorly formatted address: `{0}`")]
    InvalidAddress(String),
}

impl LensError {
    /// Message the API wrote for the user, if any. Only GraphQL errors carry
    /// one; HTTP error bodies may come from a proxy and are never shown.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            LensError::GraphQl(errors) => errors
                .first()
                .map(|e| e.message.as_str())
                .filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
    #[serde(default)]
    pub extensions: Option<Value>,
}

fn first_message(errors: &[GraphQlError]) -> String {
    match errors.first() {
        Some(error) => error.message.clone(),
        None => "Lens API returned an empty error list".to_string(),
    }
}
