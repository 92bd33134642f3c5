use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::options::{CallOptions, ClientOptions, RetryBudget};
use crate::registry::EndpointRegistry;
use crate::transport::{Connector, HttpConnector, Reply};
use crate::wire::RpcRequest;
use crate::{KvError, Result};

/// Blocking client for a replicated key-value cluster.
///
/// A client owns its endpoint set exclusively: endpoints that keep
/// failing are evicted and never re-admitted, so the set only shrinks
/// over the client's lifetime. Each `get`/`put` blocks the calling
/// thread through all of its retries; share one client across threads
/// (e.g. behind an `Arc`) to issue operations concurrently.
pub struct KvClient {
    registry: EndpointRegistry,
    options: ClientOptions,
    client_id: Option<String>,
}

impl fmt::Debug for KvClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvClient")
            .field("live_endpoints", &self.registry.len())
            .field("options", &self.options)
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl KvClient {
    /// Creates a client over the default HTTP transport, opening one
    /// connection handle per `host:port` address.
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_connector(endpoints, &HttpConnector::new())
    }

    /// Creates a client over a caller-supplied transport. Intended for
    /// custom transports and for tests that script endpoint behavior.
    pub fn with_connector<I, S>(endpoints: I, connector: &dyn Connector) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let addrs: Vec<String> = endpoints.into_iter().map(Into::into).collect();
        Self {
            registry: EndpointRegistry::new(&addrs, connector),
            options: ClientOptions::default(),
            client_id: None,
        }
    }

    /// Applies client options such as timeouts and retry budgets.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches an identifier used only to attribute log output. Has no
    /// effect on protocol behavior.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    /// Number of endpoints not yet evicted.
    pub fn live_endpoints(&self) -> usize {
        self.registry.len()
    }

    /// Reads `key` from the cluster. `Ok(None)` means the cluster does
    /// not hold the key; that is a success outcome, not a retryable
    /// condition.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, CallOptions::default())
    }

    /// [`KvClient::get`] with per-call overrides.
    pub fn get_with(&self, key: &str, call: CallOptions) -> Result<Option<String>> {
        let request = RpcRequest::Read {
            key: key.to_owned(),
        };
        self.dispatch(&request, call).map(Reply::into_value)
    }

    /// Stores `value` under `key`. An empty value is a caller contract
    /// violation, rejected before any network activity.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.put_with(key, value, CallOptions::default())
    }

    /// [`KvClient::put`] with per-call overrides.
    pub fn put_with(&self, key: &str, value: &str, call: CallOptions) -> Result<()> {
        if value.is_empty() {
            return Err(KvError::InvalidArgument(
                "put value must not be empty".to_owned(),
            ));
        }
        let request = RpcRequest::Write {
            key: key.to_owned(),
            value: value.to_owned(),
        };
        self.dispatch(&request, call).map(|_| ())
    }

    /// Sends `Terminate` straight to the named endpoint, bypassing
    /// selection and retry: the target is deliberate, so failing over
    /// to a different endpoint would shut down the wrong server.
    pub fn terminate(&self, endpoint: &str, graceful: bool, timeout: Duration) -> Result<()> {
        let target = self
            .registry
            .find(endpoint)
            .ok_or_else(|| KvError::UnknownEndpoint(endpoint.to_owned()))?;
        debug!(
            client = self.client_id.as_deref(),
            endpoint, graceful, "sending terminate"
        );
        target
            .conn
            .invoke(&RpcRequest::Terminate { graceful }, timeout)
            .map(|_| ())
    }

    fn dispatch(&self, request: &RpcRequest, call: CallOptions) -> Result<Reply> {
        let budget = RetryBudget::resolve(&self.options, call);
        let dispatcher = Dispatcher {
            registry: &self.registry,
            selection: self.options.selection,
            client_id: self.client_id.as_deref(),
        };
        dispatcher.dispatch(request, budget)
    }
}
