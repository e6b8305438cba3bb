/// Faults a SimpleDB call can surface.
///
/// A missing path on read is not a fault: `Client::read` reports it as
/// `Ok(None)`. Write and delete never absorb a 404; a missing path there
/// comes back as [`Error::Api`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The store endpoint could not be reached at all.
    #[error("could not connect to the SimpleDB server at {url}: is it running?")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-success status.
    #[error("server returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Any other request-level failure (timeout, protocol error, ...).
    #[error("request failed: {0}")]
    Transport(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("invalid base URL: {message}")]
    InvalidUrl { message: String },
}
