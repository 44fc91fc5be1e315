//! Single link session
//!
//! One session owns one socket. The writer loop drains the outbound queue
//! and writes length-prefixed frames; the reader loop reads newline-
//! delimited lines and hands them to the dispatcher. The loops run
//! concurrently and each detects a broken session through its own I/O
//! result; whichever fails first ends the session, and the manager discards
//! the socket wholesale.

use crate::codec;
use crate::constants::SHUTDOWN_POLL_INTERVAL_MS;
use crate::dispatch::Dispatcher;
use crate::outbound::OutboundReceiver;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// One connected session over a live socket
pub(crate) struct LinkSession {
    stream: TcpStream,
    dispatcher: Dispatcher,
}

impl LinkSession {
    pub(crate) fn new(stream: TcpStream, dispatcher: Dispatcher) -> Self {
        Self { stream, dispatcher }
    }

    /// Run until either loop hits an I/O error/EOF or shutdown is requested
    ///
    /// The outbound receiver is only borrowed: it outlives the session so
    /// the queue carries over to the next one. A message dequeued but not
    /// yet written when the session dies is lost; that loss is the link's
    /// stated delivery contract.
    pub(crate) async fn run(self, outbound_rx: &mut OutboundReceiver, shutdown: Arc<AtomicBool>) {
        let (read_half, write_half) = self.stream.into_split();

        tokio::select! {
            biased;

            _ = poll_shutdown(&shutdown) => {
                debug!("session closing on shutdown");
            }

            res = write_loop(outbound_rx, write_half) => {
                match res {
                    Ok(()) => debug!("outbound queue closed, session ending"),
                    Err(e) => debug!("write loop ended: {}", e),
                }
            }

            res = read_loop(read_half, &self.dispatcher) => {
                match res {
                    Ok(()) => debug!("remote closed the connection"),
                    Err(e) => debug!("read loop ended: {}", e),
                }
            }
        }
        // Both stream halves drop here; the socket is discarded wholesale
    }
}

async fn poll_shutdown(shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(SHUTDOWN_POLL_INTERVAL_MS)).await;
    }
}

/// Drain the outbound queue into the socket, one frame per message
///
/// Returns `Ok(())` only if the queue itself closes (every sender dropped).
async fn write_loop<W>(rx: &mut OutboundReceiver, mut writer: W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let line = message.to_line();
        trace!("-> {}", line);
        writer.write_all(&codec::encode_frame(&line)).await?;
    }
    Ok(())
}

/// Read newline-delimited lines and dispatch each one
///
/// Returns `Ok(())` on clean EOF.
async fn read_loop<R>(reader: R, dispatcher: &Dispatcher) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        trace!("<- {}", line);
        dispatcher.dispatch_line(&line);
    }
    Ok(())
}
