//! XML-RPC client for the VisTrails server.
//!
//! Encodes method calls, sends them over a pluggable transport, and
//! decodes the two response shapes the workflow relay depends on.

pub mod call;
pub mod decode;
pub mod transport;
pub mod vistrails;

pub use vistrails::{RpcError, VistrailsRpc};
