//! Unified error type for the Parlor server.

use parlor_protocol::ProtocolError;
use parlor_transport::TransportError;

/// Top-level error that wraps the crate-specific errors that can escape the
/// server loop.
///
/// Invite and session errors never appear here: they are answered inline
/// with a `Rejected` frame and the connection carries on.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
