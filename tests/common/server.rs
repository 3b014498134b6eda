//! Test server management.
//!
//! Spawns and manages ircrelay instances for integration testing.

use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;

/// Password every test server is started with.
pub const PASSWORD: &str = "testpass";

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
}

impl TestServer {
    /// Spawn the relay on a free local port.
    pub async fn spawn() -> anyhow::Result<Self> {
        let port = free_port()?;
        let config = tempfile::NamedTempFile::new()?;
        std::fs::write(
            config.path(),
            "[listen]\naddress = \"127.0.0.1\"\n\n[limits]\nidle_timeout_secs = 60\n",
        )?;

        let child = Command::new(env!("CARGO_BIN_EXE_ircrelay"))
            .arg(port.to_string())
            .arg(PASSWORD)
            .arg("--config")
            .arg(config.path())
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self { child, port };
        server.wait_until_ready().await?;
        // The config is read at startup; the file can go once the port is open.
        drop(config);
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
