use std::sync::Arc;

use vtrelay_xmlrpc::VistrailsRpc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including the default database target.
    pub config: Arc<ServerConfig>,
    /// Client for the VisTrails XML-RPC server.
    pub rpc: VistrailsRpc,
}
