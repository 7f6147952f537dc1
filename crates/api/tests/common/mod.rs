use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vtrelay_api::config::{RpcConfig, ServerConfig};
use vtrelay_api::router::build_app_router;
use vtrelay_api::state::AppState;
use vtrelay_core::types::DbTarget;
use vtrelay_xmlrpc::call::MethodCall;
use vtrelay_xmlrpc::transport::{RpcTransport, TransportError};
use vtrelay_xmlrpc::VistrailsRpc;

/// How the fake server answers one procedure.
#[derive(Clone)]
pub enum Reply {
    Body(String),
    Unavailable,
}

/// Recording stand-in for the VisTrails XML-RPC server.
///
/// Answers each method with a canned [`Reply`] and keeps every call it
/// receives, in order. Calling a method without a reply panics.
#[derive(Default)]
pub struct FakeTransport {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<MethodCall>>,
}

impl FakeTransport {
    pub fn with_body(mut self, method: &str, body: impl Into<String>) -> Self {
        self.replies.insert(method.to_string(), Reply::Body(body.into()));
        self
    }

    pub fn with_unavailable(mut self, method: &str) -> Self {
        self.replies.insert(method.to_string(), Reply::Unavailable);
        self
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RpcTransport for FakeTransport {
    async fn call(&self, call: &MethodCall) -> Result<String, TransportError> {
        self.calls.lock().unwrap().push(call.clone());
        match self.replies.get(&call.method) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Unavailable) => Err(TransportError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            }),
            None => panic!("unexpected remote call: {}", call.method),
        }
    }

    fn endpoint(&self) -> &str {
        "http://rpc.test:8080"
    }
}

/// Default database target used by [`test_config`].
pub fn default_target() -> DbTarget {
    DbTarget::new("vistrails.org", 3306, "vistrails")
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost".to_string()],
        request_timeout_secs: 30,
        rpc: RpcConfig {
            url: "http://rpc.test:8080".to_string(),
            timeout_secs: 30,
        },
        defaults: default_target(),
    }
}

/// Build the full application router around a fake XML-RPC server.
///
/// Uses the same [`build_app_router`] as production so the middleware
/// stack is exercised too.
pub fn build_test_app(transport: Arc<FakeTransport>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        rpc: VistrailsRpc::new(transport),
    };
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Content-Type header of a response, or an empty string.
pub fn content_type(response: &Response<Body>) -> String {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Wrap a payload as the single array element of a method response.
pub fn envelope(payload: &str) -> String {
    format!(
        "<?xml version='1.0'?>\n\
         <methodResponse>\n<params>\n<param>\n\
         <value><array><data>\n<value>{payload}</value>\n</data></array></value>\n\
         </param>\n</params>\n</methodResponse>\n"
    )
}

/// A `get_tag_version` response carrying `version`.
pub fn tag_version_response(version: i64) -> String {
    envelope(&format!("<int>{version}</int>"))
}

/// A `get_wf_xml` response carrying `workflow` as an entity-escaped string,
/// the way the VisTrails server sends it.
pub fn workflow_response(workflow: &str) -> String {
    let escaped = workflow
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;");
    envelope(&format!("<string>{escaped}</string>"))
}
