//! Transport boundary between the event loop and the sockets.
//!
//! The core only ever sees [`Transport`]: a best-effort line sink that can
//! be closed. The TCP implementation splits each accepted stream into a
//! reader task, which forwards raw bytes to the event loop, and a writer
//! task, which drains a bounded queue onto the socket.

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::state::SessionId;

/// Outbound side of a connection as seen by the core.
pub trait Transport: Send {
    /// Queue a fully encoded line. Never blocks.
    fn send(&self, line: &str) -> Result<(), TransportError>;

    /// Stop reading and close the socket once queued lines are flushed.
    fn close(&self);
}

/// Events produced by reader tasks.
#[derive(Debug)]
pub enum ConnectionEvent {
    /// Bytes read from the peer.
    Data { id: SessionId, bytes: Bytes },
    /// The peer closed the stream or the read failed.
    Closed { id: SessionId },
}

enum Outbound {
    Line(Bytes),
    Close,
}

/// [`Transport`] over a split tokio TCP stream.
pub struct TcpTransport {
    outbound: mpsc::Sender<Outbound>,
    reader: AbortHandle,
}

impl TcpTransport {
    /// Spawn the reader and writer tasks for an accepted stream.
    pub fn spawn(
        id: SessionId,
        read_half: OwnedReadHalf,
        write_half: OwnedWriteHalf,
        events: mpsc::Sender<ConnectionEvent>,
        read_chunk: usize,
        send_queue: usize,
    ) -> Self {
        let (outbound, queue) = mpsc::channel(send_queue);
        tokio::spawn(write_loop(id, write_half, queue));
        let reader = tokio::spawn(read_loop(id, read_half, events, read_chunk)).abort_handle();
        Self { outbound, reader }
    }
}

impl Transport for TcpTransport {
    fn send(&self, line: &str) -> Result<(), TransportError> {
        self.outbound
            .try_send(Outbound::Line(Bytes::copy_from_slice(line.as_bytes())))
            .map_err(|e| match e {
                TrySendError::Full(_) => TransportError::QueueFull,
                TrySendError::Closed(_) => TransportError::Closed,
            })
    }

    fn close(&self) {
        self.reader.abort();
        // A full queue still closes: the writer exits once the sender drops.
        let _ = self.outbound.try_send(Outbound::Close);
    }
}

async fn read_loop(
    id: SessionId,
    mut read_half: OwnedReadHalf,
    events: mpsc::Sender<ConnectionEvent>,
    read_chunk: usize,
) {
    let mut buf = vec![0u8; read_chunk];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                debug!(session = %id, "Peer closed connection");
                break;
            }
            Ok(n) => {
                let bytes = Bytes::copy_from_slice(&buf[..n]);
                if events.send(ConnectionEvent::Data { id, bytes }).await.is_err() {
                    return;
                }
            }
            Err(error) => {
                debug!(session = %id, %error, "Read failed");
                break;
            }
        }
    }
    let _ = events.send(ConnectionEvent::Closed { id }).await;
}

async fn write_loop(
    id: SessionId,
    mut write_half: OwnedWriteHalf,
    mut queue: mpsc::Receiver<Outbound>,
) {
    while let Some(message) = queue.recv().await {
        match message {
            Outbound::Line(bytes) => {
                if let Err(error) = write_half.write_all(&bytes).await {
                    warn!(session = %id, %error, "Write failed");
                }
            }
            Outbound::Close => break,
        }
    }
    let _ = write_half.shutdown().await;
}
