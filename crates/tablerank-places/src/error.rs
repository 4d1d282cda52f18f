use thiserror::Error;

/// Errors returned by the Places and PageSpeed clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status other than 404.
    #[error("Places API returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("place not found: {0}")]
    NotFound(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Google Places API key is required")]
    MissingApiKey,
}
