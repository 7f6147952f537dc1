//! Transport for XML-RPC calls.
//!
//! [`RpcTransport`] sends an encoded [`MethodCall`] and returns the raw
//! response body. [`HttpTransport`] is the production implementation,
//! posting to the VisTrails server with [`reqwest`].

use async_trait::async_trait;

use crate::call::MethodCall;

/// Errors from the transport layer. The response body is never inspected
/// here; envelope problems belong to [`crate::decode::DecodeError`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (connection refused, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The RPC server returned a non-2xx status code.
    #[error("XML-RPC server error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Performs one remote call and hands back the raw response document.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, call: &MethodCall) -> Result<String, TransportError>;

    /// Endpoint description for logs and the health route.
    fn endpoint(&self) -> &str;
}

/// XML-RPC over HTTP `POST` to a single server.
pub struct HttpTransport {
    client: reqwest::Client,
    rpc_url: String,
}

impl HttpTransport {
    /// Create a transport for an XML-RPC server.
    ///
    /// * `rpc_url` - Full endpoint URL, e.g. `http://localhost:8080`.
    pub fn new(rpc_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_url,
        }
    }

    /// Create a transport reusing an existing [`reqwest::Client`]
    /// (e.g. one built with a request timeout).
    pub fn with_client(client: reqwest::Client, rpc_url: String) -> Self {
        Self { client, rpc_url }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`TransportError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn call(&self, call: &MethodCall) -> Result<String, TransportError> {
        tracing::debug!(method = %call.method, url = %self.rpc_url, "Sending XML-RPC call");

        let response = self
            .client
            .post(&self.rpc_url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(call.to_xml())
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    fn endpoint(&self) -> &str {
        &self.rpc_url
    }
}
