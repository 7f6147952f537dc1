//! Typed wrappers for the two VisTrails server procedures the relay uses.

use std::sync::Arc;

use vtrelay_core::types::DbTarget;

use crate::call::{MethodCall, Value};
use crate::decode::{decode_int_response, decode_workflow_response, DecodeError};
use crate::transport::{RpcTransport, TransportError};

/// Resolves a tag to a version number.
pub const GET_TAG_VERSION: &str = "get_tag_version";

/// Returns the workflow XML of one version.
pub const GET_WF_XML: &str = "get_wf_xml";

/// Failure of a typed VisTrails call.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Client for the VisTrails XML-RPC server.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct VistrailsRpc {
    transport: Arc<dyn RpcTransport>,
}

impl VistrailsRpc {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// `get_tag_version(host, port, db, vt, tag)` -> version number.
    pub async fn get_tag_version(
        &self,
        target: &DbTarget,
        vt: &str,
        tag: &str,
    ) -> Result<i64, RpcError> {
        let call = MethodCall::new(GET_TAG_VERSION, lookup_params(target, vt, tag));
        let response = self.transport.call(&call).await?;

        Ok(decode_int_response(&response)?)
    }

    /// `get_wf_xml(host, port, db, vt, version)` -> serialized `<workflow>`.
    ///
    /// The server returns the workflow as an entity-escaped string, so the
    /// whole response is HTML-entity-decoded before the envelope is parsed.
    pub async fn get_wf_xml(
        &self,
        target: &DbTarget,
        vt: &str,
        version: &str,
    ) -> Result<String, RpcError> {
        let call = MethodCall::new(GET_WF_XML, lookup_params(target, vt, version));
        let response = self.transport.call(&call).await?;
        let response = html_escape::decode_html_entities(&response);

        Ok(decode_workflow_response(&response)?)
    }
}

/// Positional arguments shared by both procedures.
fn lookup_params(target: &DbTarget, vt: &str, version_or_tag: &str) -> Vec<Value> {
    vec![
        target.host.as_str().into(),
        target.port.into(),
        target.db.as_str().into(),
        vt.into(),
        version_or_tag.into(),
    ]
}
