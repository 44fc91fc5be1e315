//! Link lifecycle management
//!
//! Maintains at most one live TCP connection to the DAW, reconnecting
//! forever with a fixed backoff. Each session is replaced wholesale on any
//! I/O failure; nothing of a dead socket is reused. A message in flight when
//! the link drops is lost: there is no retry or acknowledgment, and the
//! mirror resynchronizes from the next full remote push.

mod session;

use crate::config::LinkConfig;
use crate::constants::{KEEPALIVE_INTERVAL_SECS, KEEPALIVE_TIME_SECS};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::outbound::OutboundReceiver;
use session::LinkSession;
use socket2::{SockRef, TcpKeepalive};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tracing::{debug, info};

/// Connection status, observable but never required reading
///
/// The sync core works identically whether anyone watches this; state
/// consumers only ever see link failures as staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Owner of the TCP session lifecycle
///
/// Holds the outbound queue receiver so queued messages survive reconnects:
/// whatever was enqueued during an outage is written, in order, once a new
/// session is up.
pub struct LinkManager {
    config: LinkConfig,
    dispatcher: Dispatcher,
    outbound_rx: OutboundReceiver,
    state_tx: watch::Sender<LinkState>,
}

impl LinkManager {
    pub fn new(config: LinkConfig, dispatcher: Dispatcher, outbound_rx: OutboundReceiver) -> Self {
        Self {
            config,
            dispatcher,
            outbound_rx,
            state_tx: watch::channel(LinkState::Disconnected).0,
        }
    }

    /// Subscribe to connection status changes
    pub fn status(&self) -> watch::Receiver<LinkState> {
        self.state_tx.subscribe()
    }

    /// Run until the shutdown flag is set
    ///
    /// Transient connect/read/write failures never end this loop; they cost
    /// one backoff delay and a fresh connect attempt.
    pub async fn run(mut self, shutdown: Arc<AtomicBool>) -> Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            self.state_tx.send_replace(LinkState::Connecting);

            let stream = match self.connect().await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!(
                        "connect to {}:{} failed: {}",
                        self.config.host, self.config.port, e
                    );
                    self.state_tx.send_replace(LinkState::Disconnected);
                    tokio::time::sleep(self.config.reconnect_delay()).await;
                    continue;
                }
            };

            info!("connected to {}:{}", self.config.host, self.config.port);
            self.state_tx.send_replace(LinkState::Connected);

            let session = LinkSession::new(stream, self.dispatcher.clone());
            session.run(&mut self.outbound_rx, shutdown.clone()).await;

            self.state_tx.send_replace(LinkState::Disconnected);
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            info!(
                "link lost, reconnecting in {:?}",
                self.config.reconnect_delay()
            );
            tokio::time::sleep(self.config.reconnect_delay()).await;
        }

        Ok(())
    }

    /// Open a fresh socket for one session
    async fn connect(&self) -> io::Result<TcpStream> {
        let addr = (self.config.host.as_str(), self.config.port);
        let stream = tokio::time::timeout(self.config.connect_timeout(), TcpStream::connect(addr))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;

        // Keepalive so a half-open link eventually fails the read loop
        // instead of blocking forever; nodelay because every frame is a
        // small latency-sensitive control message.
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(KEEPALIVE_TIME_SECS))
            .with_interval(Duration::from_secs(KEEPALIVE_INTERVAL_SECS));
        SockRef::from(&stream).set_tcp_keepalive(&keepalive)?;
        stream.set_nodelay(true)?;

        Ok(stream)
    }
}
