use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use simpledb_core::{strip, Path};

use crate::error::Error;

/// Base URL of a locally running SimpleDB server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:6924";

/// Endpoint prefix for each store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Read,
    Write,
    DeleteValue,
    DeleteFolder,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::DeleteValue => "delete_value",
            Operation::DeleteFolder => "delete_folder",
        }
    }

    fn method(self) -> Method {
        match self {
            Operation::Read => Method::GET,
            Operation::Write => Method::PUT,
            Operation::DeleteValue | Operation::DeleteFolder => Method::DELETE,
        }
    }
}

/// Status and parsed body of one store response.
struct RawResponse {
    status: StatusCode,
    body: Value,
    text: String,
}

impl RawResponse {
    /// The body on success, [`Error::Api`] otherwise.
    fn into_success(self) -> Result<Value, Error> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(Error::Api {
                status: self.status.as_u16(),
                body: self.text,
            })
        }
    }
}

/// Builder for a [`Client`] with non-default settings.
///
/// The underlying HTTP client applies no timeout unless one is set here.
pub struct ClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    /// Apply a timeout covering the whole request, connect through body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let base_url = Url::parse(&self.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("'{}' cannot serve as a base URL", base_url),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Transport)?;

        Ok(Client { http, base_url })
    }
}

/// Blocking client for a SimpleDB server.
///
/// Each public operation performs exactly one HTTP round trip against
/// `{base_url}/{operation}/{path}` and either returns the interpreted body
/// or surfaces a fault. The configuration is fixed at construction; to talk
/// to a different server, build a new client.
///
/// # Example
///
/// ```ignore
/// use simpledb_client::{Client, path};
///
/// let client = Client::new("http://127.0.0.1:6924")?;
///
/// client.write(&path!("greetings/hello"), &serde_json::json!({"message": "hi"}))?;
///
/// // Metadata stripped: Some({"message": "hi"})
/// let value = client.read(&path!("greetings/hello"))?;
///
/// // Whole folder, one level up: Some({"hello": {"message": "hi"}})
/// let folder = client.read(&path!("greetings"))?;
/// ```
pub struct Client {
    http: HttpClient,
    base_url: Url,
}

impl Client {
    /// Create a client for the given base URL, with default settings.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        ClientBuilder::new(base_url).build()
    }

    /// Start building a client with non-default settings.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// The base URL this client was built with.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Read the value or folder at `path`, with metadata stripped.
    ///
    /// A leaf comes back as its bare value; a folder as a mapping from child
    /// names to recursively stripped children. Returns `Ok(None)` when the
    /// path does not exist.
    pub fn read(&self, path: &Path) -> Result<Option<Value>, Error> {
        Ok(self.read_raw(path)?.map(|raw| strip(&raw)))
    }

    /// Read the raw body at `path`, metadata envelopes intact at every level.
    ///
    /// Returns `Ok(None)` when the path does not exist.
    pub fn read_with_metadata(&self, path: &Path) -> Result<Option<Value>, Error> {
        self.read_raw(path)
    }

    fn read_raw(&self, path: &Path) -> Result<Option<Value>, Error> {
        let raw = self.execute(Operation::Read, path, None)?;
        if raw.status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(raw.into_success()?))
    }

    /// Write `value` at `path` and return the value the store confirmed.
    ///
    /// The confirmation normally echoes the stored value under
    /// `metadata.value`. Should the store omit that field, the submitted
    /// value is returned as-is; callers always get back what was written.
    pub fn write<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<Value, Error> {
        let value = serde_json::to_value(value)?;
        let body = json!({ "value": value });
        let confirmation = self
            .execute(Operation::Write, path, Some(&body))?
            .into_success()?;
        let echoed = confirmation
            .get("metadata")
            .and_then(|metadata| metadata.get("value"))
            .cloned();
        Ok(echoed.unwrap_or(value))
    }

    /// Delete the value at `path`, returning the removed leaf with its
    /// metadata envelope.
    pub fn delete_value(&self, path: &Path) -> Result<Value, Error> {
        self.execute(Operation::DeleteValue, path, None)?
            .into_success()
    }

    /// Delete the folder at `path`, returning the removed subtree with all
    /// envelopes intact.
    pub fn delete_folder(&self, path: &Path) -> Result<Value, Error> {
        self.execute(Operation::DeleteFolder, path, None)?
            .into_success()
    }

    /// Build `{base_url}/{operation}/{path}`, percent-encoding segments.
    fn endpoint_url(&self, operation: Operation, path: &Path) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| Error::InvalidUrl {
                message: format!("'{}' cannot serve as a base URL", self.base_url),
            })?;
            segments
                .pop_if_empty()
                .push(operation.as_str())
                .extend(path.iter());
        }
        Ok(url)
    }

    /// Perform one round trip and normalize transport failures.
    fn execute(
        &self,
        operation: Operation,
        path: &Path,
        body: Option<&Value>,
    ) -> Result<RawResponse, Error> {
        let url = self.endpoint_url(operation, path)?;
        debug!(method = %operation.method(), %url, "issuing request");

        let mut request = self.http.request(operation.method(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                Error::Connection {
                    url: self.base_url.to_string(),
                    source: e,
                }
            } else {
                warn!(%url, error = %e, "request failed");
                Error::Transport(e)
            }
        })?;

        let status = response.status();
        let text = response.text().map_err(|e| {
            warn!(%url, error = %e, "failed to read response body");
            Error::Transport(e)
        })?;

        // A success body must be JSON; a failure body is only ever reported
        // back as text, however garbled.
        let body = if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(%url, error = %e, "response body is not valid JSON");
                Error::Json(e)
            })?
        } else {
            Value::Null
        };

        Ok(RawResponse { status, body, text })
    }
}

impl Default for Client {
    /// A client for [`DEFAULT_BASE_URL`].
    fn default() -> Self {
        Client::new(DEFAULT_BASE_URL).expect("default base URL is valid")
    }
}
