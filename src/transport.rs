use std::sync::Arc;
use std::time::Duration;

use reqwest::header;

use crate::wire::{RpcRequest, RpcResponse};
use crate::{KvError, Result};

/// Decoded successful reply from an endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Read result; `None` is the cluster's "key not found" sentinel.
    /// A missing key is a success outcome, never a retryable condition.
    Value(Option<String>),
    /// Acknowledgement for `Write` and `Terminate`.
    Ack,
}

impl Reply {
    /// Value carried by a read reply. `Ack` carries none.
    pub fn into_value(self) -> Option<String> {
        match self {
            Reply::Value(value) => value,
            Reply::Ack => None,
        }
    }
}

/// A reusable channel to one endpoint. Each `invoke` performs exactly
/// one remote call.
///
/// Implementations must map outcomes onto the crate error taxonomy:
/// communication-layer failures become [`KvError::Transport`] (retryable)
/// and errors reported by the server itself become [`KvError::Remote`]
/// (never retried). This split is the most important contract here: a
/// misclassified remote rejection burns the whole retry budget on a
/// request that can never succeed, and a misclassified network blip
/// fails an operation that one more attempt would have saved.
pub trait Connection: Send + Sync {
    /// Issues `request` with a per-attempt `timeout`.
    fn invoke(&self, request: &RpcRequest, timeout: Duration) -> Result<Reply>;
}

/// Opens one [`Connection`] per endpoint address. Called once per
/// configured address at client construction; handles live until their
/// endpoint is evicted.
pub trait Connector: Send + Sync {
    fn connect(&self, addr: &str) -> Arc<dyn Connection>;
}

/// Default transport: JSON RPC over HTTP, POSTed to `http://<addr>/rpc`.
pub struct HttpConnector {
    http: reqwest::blocking::Client,
}

impl HttpConnector {
    /// Creates a connector with a shared blocking HTTP client.
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for HttpConnector {
    fn connect(&self, addr: &str) -> Arc<dyn Connection> {
        Arc::new(HttpConnection {
            http: self.http.clone(),
            url: format!("http://{addr}/rpc"),
            addr: addr.to_owned(),
        })
    }
}

/// HTTP connection handle to a single endpoint.
pub struct HttpConnection {
    http: reqwest::blocking::Client,
    url: String,
    addr: String,
}

impl Connection for HttpConnection {
    fn invoke(&self, request: &RpcRequest, timeout: Duration) -> Result<Reply> {
        let response = self
            .http
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(timeout)
            .json(request)
            .send()
            .map_err(|err| self.transport(err))?;

        let status = response.status();
        let body = response.text().map_err(|err| self.transport(err))?;

        if status.is_server_error() {
            // A bare 5xx comes from a dying endpoint or an intermediary,
            // not from the store's request handling.
            return Err(KvError::Transport {
                endpoint: self.addr.clone(),
                reason: format!("http {status}: {body}"),
            });
        }
        if !status.is_success() {
            return Err(KvError::Remote {
                endpoint: self.addr.clone(),
                message: format!("http {status}: {body}"),
                code: None,
            });
        }

        match serde_json::from_str::<RpcResponse>(&body) {
            Ok(RpcResponse::Ok { value }) => Ok(match request {
                RpcRequest::Read { .. } => Reply::Value(value),
                RpcRequest::Write { .. } | RpcRequest::Terminate { .. } => Reply::Ack,
            }),
            Ok(RpcResponse::Error { error }) => Err(KvError::Remote {
                endpoint: self.addr.clone(),
                message: error.message,
                code: error.code,
            }),
            Err(err) => Err(KvError::Remote {
                endpoint: self.addr.clone(),
                message: format!("undecodable reply: {err}; body: {body}"),
                code: None,
            }),
        }
    }
}

impl HttpConnection {
    fn transport(&self, err: reqwest::Error) -> KvError {
        let reason = if err.is_timeout() {
            format!("timed out: {err}")
        } else if err.is_connect() {
            format!("connect failed: {err}")
        } else {
            err.to_string()
        };
        KvError::Transport {
            endpoint: self.addr.clone(),
            reason,
        }
    }
}
