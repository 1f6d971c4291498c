use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{Instrument, error, info, info_span};

use crate::config::Config;
use crate::fs::resolver::ResourceResolver;
use crate::http::connection::{Connection, ConnectionSettings};

/// Binds the configured address and serves connections until the task is dropped.
pub async fn run<R>(cfg: &Config, resolver: Arc<R>) -> anyhow::Result<()>
where
    R: ResourceResolver,
{
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, resolver, ConnectionSettings::from(cfg)).await
}

/// Accept loop over an already bound listener. One task per connection.
pub async fn serve<R>(
    listener: TcpListener,
    resolver: Arc<R>,
    settings: ConnectionSettings,
) -> anyhow::Result<()>
where
    R: ResourceResolver,
{
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let resolver = Arc::clone(&resolver);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, resolver, settings);
                if let Err(e) = conn.run().await {
                    error!("Connection error: {}", e);
                }
            }
            .instrument(info_span!("conn", %peer)),
        );
    }
}
