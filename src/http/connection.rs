use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::fs::resolver::{Resource, ResourceBody, ResourceResolver};
use crate::http::parser::{ParseError, parse_request};
use crate::http::range::{parse_range, read_range};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Per-connection timing.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Window for each request head, restarted before every read.
    pub idle_timeout: Duration,
    /// Bound on draining inbound bytes after the write side is shut down.
    pub drain_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            drain_timeout: Duration::from_secs(1),
        }
    }
}

impl From<&Config> for ConnectionSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            idle_timeout: cfg.idle_timeout(),
            drain_timeout: cfg.drain_timeout(),
        }
    }
}

pub struct Connection<S, R> {
    stream: BufReader<S>,
    resolver: Arc<R>,
    settings: ConnectionSettings,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response),
    HalfClosing,
    Closed,
}

impl<S, R> Connection<S, R>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    R: ResourceResolver,
{
    pub fn new(stream: S, resolver: Arc<R>, settings: ConnectionSettings) -> Self {
        Self {
            stream: BufReader::new(stream),
            resolver,
            settings,
            state: ConnectionState::Reading,
        }
    }

    /// Serves requests until the peer leaves, the idle window expires, or a
    /// response closes the connection.
    ///
    /// Teardown conditions are logged and return `Ok`. Only write failures
    /// surface as errors.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Some(req) => ConnectionState::Processing(req),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = handle_request(self.resolver.as_ref(), &req).await;
                    info!(
                        method = req.method.as_str(),
                        path = %req.path,
                        status = response.status.as_u16(),
                        keep_alive = !response.closes_connection(),
                        "Request served"
                    );
                    self.state = ConnectionState::Writing(response);
                }

                ConnectionState::Writing(response) => {
                    ResponseWriter::new(&response)
                        .write_to_stream(self.stream.get_mut())
                        .await?;

                    self.state = if response.closes_connection() {
                        ConnectionState::HalfClosing
                    } else {
                        ConnectionState::Reading
                    };
                }

                ConnectionState::HalfClosing => {
                    self.half_close().await;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads the next request head within a fresh idle window.
    ///
    /// `None` means the connection is done: the peer closed it, timed out,
    /// or sent something that is not a request.
    pub async fn read_request(&mut self) -> Option<Request> {
        match timeout(self.settings.idle_timeout, parse_request(&mut self.stream)).await {
            Ok(Ok(req)) => Some(req),
            Ok(Err(ParseError::ConnectionClosed)) => {
                debug!("Client closed connection");
                None
            }
            Ok(Err(e)) => {
                info!(error = %e, "Dropping connection");
                None
            }
            Err(_) => {
                info!(timeout = ?self.settings.idle_timeout, "Idle timeout, closing connection");
                None
            }
        }
    }

    /// Shuts down the write side, then discards whatever the peer still
    /// sends until it closes or the drain window ends.
    async fn half_close(&mut self) {
        if let Err(e) = self.stream.get_mut().shutdown().await {
            debug!(error = %e, "Half-close failed");
            return;
        }

        let stream = &mut self.stream;
        let drain = async {
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        };
        if timeout(self.settings.drain_timeout, drain).await.is_err() {
            debug!("Peer still sending after half-close");
        }
    }
}

/// Produces the response for one request.
///
/// Errors come back as error responses carrying `Connection: close`.
pub async fn handle_request<R>(resolver: &R, req: &Request) -> Response
where
    R: ResourceResolver,
{
    if req.method != Method::GET {
        return Response::method_not_allowed();
    }

    let resource = match resolver.resolve(&req.path).await {
        Ok(Some(resource)) => resource,
        Ok(None) => return Response::not_found(),
        Err(e) => {
            warn!(path = %req.path, error = %e, "Failed to resolve resource");
            return Response::internal_error();
        }
    };

    let keep_alive = req.keep_alive();
    match req.header("range") {
        Some(range) => serve_range(resource, range, keep_alive).await,
        None => serve_full(resource, keep_alive).await,
    }
}

async fn serve_full(resource: Resource, keep_alive: bool) -> Response {
    let body = match resource.body {
        ResourceBody::Generated(body) => body,
        ResourceBody::Seekable { mut source, len } => {
            let mut body = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
            if let Err(e) = source.read_to_end(&mut body).await {
                warn!(error = %e, "Failed to read resource");
                return Response::internal_error();
            }
            body
        }
    };

    Response::ok(body, &resource.content_type, keep_alive)
}

async fn serve_range(resource: Resource, header: &str, keep_alive: bool) -> Response {
    let content_type = resource.content_type;
    let selected = resource
        .body
        .into_range_source()
        .and_then(|(source, len)| Ok((source, parse_range(header, len)?)));

    let (mut source, range) = match selected {
        Ok(selected) => selected,
        Err(e) => {
            debug!(range = header, error = %e, "Rejecting range request");
            return Response::range_not_satisfiable();
        }
    };

    match read_range(&mut source, &range).await {
        Ok(body) => Response::partial(body, &content_type, &range, keep_alive),
        Err(e) => {
            warn!(range = %range.content_range(), error = %e, "Failed to read range");
            Response::internal_error()
        }
    }
}
