//! Buffer, queue and timeout limits.

use serde::Deserialize;
use std::time::Duration;

/// Resource limits applied to every connection.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Seconds without activity before a session is dropped (default: 300).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Seconds between idle sweeps (default: 5).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    /// Reassembly cap for a line without terminator, in bytes (default: 4096).
    #[serde(default = "default_max_buffer")]
    pub max_buffer: usize,
    /// Bytes requested per socket read (default: 512).
    #[serde(default = "default_read_chunk")]
    pub read_chunk: usize,
    /// Outbound lines queued per connection before new ones are dropped (default: 512).
    #[serde(default = "default_send_queue")]
    pub send_queue: usize,
    /// Reader events queued for the event loop (default: 1024).
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,
    /// Maximum channel name length without the `#` (default: 50).
    #[serde(default = "default_max_channel_name")]
    pub max_channel_name: usize,
}

impl LimitsConfig {
    /// Idle window as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            max_buffer: default_max_buffer(),
            read_chunk: default_read_chunk(),
            send_queue: default_send_queue(),
            event_queue: default_event_queue(),
            max_channel_name: default_max_channel_name(),
        }
    }
}

fn default_idle_timeout_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    5
}

fn default_max_buffer() -> usize {
    ircrelay_proto::DEFAULT_MAX_BUFFER
}

fn default_read_chunk() -> usize {
    512
}

fn default_send_queue() -> usize {
    512
}

fn default_event_queue() -> usize {
    1024
}

fn default_max_channel_name() -> usize {
    ircrelay_proto::DEFAULT_CHANNEL_MAX_LEN
}
