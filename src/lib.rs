//! `kvfleet` is a blocking, fault-tolerant client for a replicated
//! key-value cluster.
//!
//! The crate wraps a set of `host:port` endpoints with ergonomic methods:
//! - [`KvClient::get`]
//! - [`KvClient::put`]
//! - [`KvClient::terminate`]
//!
//! Each operation picks an endpoint, issues one RPC with a timeout, and
//! on transport failure retries the same endpoint a bounded number of
//! times before permanently evicting it and failing over to another.
//! Errors the server itself reports are surfaced immediately instead of
//! being retried. See [`ClientOptions`] for the two retry budgets and
//! [`SelectionStrategy`] for failover order.

mod client;
mod dispatch;
mod error;
mod options;
mod registry;
mod transport;
mod wire;

pub use client::KvClient;
pub use error::KvError;
pub use options::{CallOptions, ClientOptions, SelectionStrategy};
pub use transport::{Connection, Connector, HttpConnection, HttpConnector, Reply};
pub use wire::{RemoteError, RpcRequest, RpcResponse};

pub type Result<T> = std::result::Result<T, KvError>;
