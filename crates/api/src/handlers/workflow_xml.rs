//! Handler for the workflow XML relay.
//!
//! Maps query parameters onto the VisTrails `get_tag_version` and
//! `get_wf_xml` remote calls and returns the unwrapped `<workflow>`
//! document.

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use futures::stream;
use vtrelay_core::request::WorkflowQuery;

use crate::error::AppResult;
use crate::state::AppState;

/// Declaration line written ahead of the workflow element.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\"?>\n";

/// GET /get_wf_xml
///
/// Resolves `tag` to a version first when one is given, then fetches the
/// workflow XML for `vt` at that version from the configured RPC server.
/// A repeated query key keeps its last value.
pub async fn get_workflow_xml(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let query: WorkflowQuery = pairs.into_iter().collect();
    let mut lookup = query.into_lookup(&state.config.defaults)?;

    if let Some(tag) = lookup.tag.clone() {
        let version = state
            .rpc
            .get_tag_version(&lookup.target, &lookup.vt, &tag)
            .await?;
        tracing::debug!(vt = %lookup.vt, tag = %tag, version, "Resolved tag to version");
        lookup = lookup.with_resolved_version(version);
    }

    if lookup.build_always {
        tracing::debug!(vt = %lookup.vt, "buildalways requested, not acted upon");
    }

    let fetch = lookup.into_fetch()?;
    let workflow = state
        .rpc
        .get_wf_xml(&fetch.target, &fetch.vt, &fetch.version)
        .await?;

    tracing::info!(
        host = %fetch.target.host,
        db = %fetch.target.db,
        vt = %fetch.vt,
        version = %fetch.version,
        bytes = workflow.len(),
        "Relayed workflow XML",
    );

    Ok(xml_response(workflow))
}

/// Stream the declaration line and the workflow element as two chunks.
fn xml_response(workflow: String) -> Response {
    let chunks = [Bytes::from_static(XML_DECLARATION.as_bytes()), Bytes::from(workflow)];
    let body = Body::from_stream(stream::iter(chunks.map(Ok::<_, Infallible>)));

    ([(CONTENT_TYPE, "text/xml")], body).into_response()
}
