//! Gateway - the listener and the event loop that owns the [`Hub`].
//!
//! One task does all protocol work. It waits on four sources at once:
//! new connections, reader events, the idle-sweep tick and the shutdown
//! signal. Reader and writer tasks only move bytes.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use super::transport::{ConnectionEvent, TcpTransport};
use crate::hub::Hub;

/// The Gateway accepts incoming TCP connections and drives the hub.
pub struct Gateway {
    listener: TcpListener,
    hub: Hub,
    events_tx: mpsc::Sender<ConnectionEvent>,
    events_rx: mpsc::Receiver<ConnectionEvent>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, hub: Hub) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Listener bound");
        let (events_tx, events_rx) = mpsc::channel(hub.limits().event_queue);
        Ok(Self {
            listener,
            hub,
            events_tx,
            events_rx,
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run until `shutdown` resolves, then close every session.
    pub async fn run<F>(mut self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut sweep = time::interval(self.hub.limits().sweep_interval());
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => self.accept(stream, addr),
                    Err(e) => error!(error = %e, "Failed to accept connection"),
                },
                Some(event) = self.events_rx.recv() => self.on_event(event),
                _ = sweep.tick() => {
                    let removed = self.hub.sweep_idle(Instant::now());
                    if removed > 0 {
                        debug!(removed, "Idle sweep");
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        self.hub.shutdown();
        Ok(())
    }

    fn accept(&mut self, stream: TcpStream, addr: SocketAddr) {
        if let Err(e) = stream.set_nodelay(true) {
            debug!(%addr, error = %e, "Failed to set TCP_NODELAY");
        }
        let limits = self.hub.limits();
        let (read_chunk, send_queue) = (limits.read_chunk, limits.send_queue);

        let id = self.hub.allocate_id();
        let (read_half, write_half) = stream.into_split();
        let transport = TcpTransport::spawn(
            id,
            read_half,
            write_half,
            self.events_tx.clone(),
            read_chunk,
            send_queue,
        );
        self.hub
            .connect(id, Box::new(transport), addr.ip().to_string(), Instant::now());
    }

    fn on_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Data { id, bytes } => {
                self.hub.receive(id, &bytes, Instant::now());
            }
            ConnectionEvent::Closed { id } => self.hub.disconnect(id),
        }
    }
}
