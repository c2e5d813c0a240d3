//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a Parlor coordination server. It
//! ties together the layers: transport → protocol → coordinator.

use tokio::sync::mpsc;

use parlor_games::GameConfig;
use parlor_protocol::JsonCodec;
use parlor_transport::{Transport, WebSocketTransport};

use crate::ParlorError;
use crate::coordinator::{Command, Coordinator};
use crate::handler::handle_connection;

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,no_run
/// use parlor::prelude::*;
///
/// # async fn run() -> Result<(), ParlorError> {
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    config: GameConfig,
}

impl ParlorServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: GameConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the game configuration (word list, line and guess limits).
    pub fn game_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the transport and spawns the coordinator task.
    ///
    /// Uses `JsonCodec` over `WebSocketTransport`, the format the web
    /// client speaks.
    pub async fn build(self) -> Result<ParlorServer, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(Coordinator::new(self.config).run(rx));

        Ok(ParlorServer {
            transport,
            commands,
        })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer {
    transport: WebSocketTransport,
    commands: mpsc::UnboundedSender<Command>,
}

impl ParlorServer {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection. Runs
    /// until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let commands = self.commands.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, JsonCodec, commands).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
