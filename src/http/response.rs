use crate::http::range::ByteRange;

/// HTTP status codes produced by the server.
///
/// - `Ok` (200): Full resource body
/// - `PartialContent` (206): Single byte range of the resource
/// - `NotFound` (404): Resource absent
/// - `MethodNotAllowed` (405): Anything other than GET
/// - `RangeNotSatisfiable` (416): Invalid range, or range on a resource without range support
/// - `InternalServerError` (500): Reading a resolved resource failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 206 Partial Content
    PartialContent,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 416 Range Not Satisfiable
    RangeNotSatisfiable,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use rangeserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::PartialContent.as_u16(), 206);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::PartialContent => 206,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::RangeNotSatisfiable => 416,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::PartialContent => "Partial Content",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RangeNotSatisfiable => "Range Not Satisfiable",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be serialized.
///
/// Headers keep insertion order so the wire format is deterministic.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Header name/value pairs, in emission order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hello".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header, replacing an earlier one with the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// `Content-Length` is derived from the body and emitted first unless it
    /// was set explicitly.
    pub fn build(mut self) -> Response {
        if !self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        {
            self.headers
                .insert(0, ("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

fn connection_value(keep_alive: bool) -> &'static str {
    if keep_alive { "keep-alive" } else { "close" }
}

impl Response {
    /// 200 with the full resource body.
    pub fn ok(body: Vec<u8>, content_type: &str, keep_alive: bool) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Length", body.len().to_string())
            .header("Content-Type", content_type)
            .header("Connection", connection_value(keep_alive))
            .body(body)
            .build()
    }

    /// 206 with the bytes of `range`.
    pub fn partial(body: Vec<u8>, content_type: &str, range: &ByteRange, keep_alive: bool) -> Self {
        ResponseBuilder::new(StatusCode::PartialContent)
            .header("Content-Length", body.len().to_string())
            .header("Content-Type", content_type)
            .header("Content-Range", range.content_range())
            .header("Connection", connection_value(keep_alive))
            .body(body)
            .build()
    }

    /// Empty-bodied error response that always closes the connection.
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .header("Connection", "close")
            .build()
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::MethodNotAllowed)
    }

    pub fn range_not_satisfiable() -> Self {
        Self::error(StatusCode::RangeNotSatisfiable)
    }

    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError)
    }

    /// Looks up a header value by name, case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether this response tells the client the connection ends after it.
    pub fn closes_connection(&self) -> bool {
        self.header("Connection")
            .is_none_or(|v| v.eq_ignore_ascii_case("close"))
    }
}
