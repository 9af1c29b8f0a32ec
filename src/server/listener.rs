use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::Connection;

/// Pause after a failed accept so a persistent error (e.g. EMFILE) does not
/// spin the loop.
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!(
        "Listening on {}, serving {}",
        cfg.listen_addr,
        cfg.doc_root.display()
    );

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Accept failed, retrying: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let doc_root = cfg.doc_root.clone();
        let read_timeout = cfg.read_timeout;
        let span = tracing::info_span!("conn", %peer);

        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, doc_root, read_timeout);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            }
            .instrument(span),
        );
    }
}
