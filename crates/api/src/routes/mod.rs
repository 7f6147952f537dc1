pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the relay route tree.
///
/// ```text
/// /get_wf_xml          workflow XML relay
/// /get_wf_xml.php      same handler, kept for links to the old script path
/// ```
pub fn relay_routes() -> Router<AppState> {
    Router::new()
        .route("/get_wf_xml", get(handlers::workflow_xml::get_workflow_xml))
        .route("/get_wf_xml.php", get(handlers::workflow_xml::get_workflow_xml))
}
