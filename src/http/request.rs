use std::collections::HashMap;

/// HTTP request methods.
///
/// Only GET is served. Every other token is kept as `Other` so the
/// connection can answer 405 instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// Any other method token, kept verbatim
    Other(String),
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Method tokens are case-sensitive, so `get` is not GET.
    ///
    /// # Example
    ///
    /// ```
    /// # use rangeserve::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(s) => s,
        }
    }
}

/// Represents a parsed HTTP request head.
///
/// Header names are stored lower-cased and values trimmed. A request is
/// built once by the parser and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The raw request-target, not percent-decoded
    pub path: String,
    /// HTTP version token, e.g. "HTTP/1.1"
    pub version: String,
    /// Request headers keyed by lower-cased name
    pub headers: HashMap<String, String>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a header. The name is lower-cased the same way the parser does it.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// See [`keep_alive`] for the decision table.
    pub fn keep_alive(&self) -> bool {
        keep_alive(&self.version, self.header("connection"))
    }
}

/// Decides connection persistence from the request version and the optional
/// `Connection` header value.
///
/// HTTP/1.1 persists unless the client says `close`. HTTP/1.0 persists only
/// when the client asks for `keep-alive`. Any other version never persists.
///
/// # Example
///
/// ```
/// # use rangeserve::http::request::keep_alive;
/// assert!(keep_alive("HTTP/1.1", None));
/// assert!(!keep_alive("HTTP/1.1", Some("Close")));
/// assert!(keep_alive("HTTP/1.0", Some("Keep-Alive")));
/// assert!(!keep_alive("HTTP/2.0", Some("keep-alive")));
/// ```
pub fn keep_alive(version: &str, connection: Option<&str>) -> bool {
    match version {
        "HTTP/1.1" => !connection.is_some_and(|v| v.eq_ignore_ascii_case("close")),
        "HTTP/1.0" => connection.is_some_and(|v| v.eq_ignore_ascii_case("keep-alive")),
        _ => false,
    }
}
