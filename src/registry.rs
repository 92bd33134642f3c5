use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;

use crate::transport::{Connection, Connector};
use crate::{KvError, Result};

/// One live endpoint: its address and the reusable connection handle.
#[derive(Clone)]
pub(crate) struct Endpoint {
    pub addr: String,
    pub conn: Arc<dyn Connection>,
}

/// The mutable set of endpoints a client may still talk to.
///
/// Invocations running concurrently on one client share this registry,
/// so every selection and eviction goes through a single mutex. A
/// selection returns the endpoint's position for the round-robin
/// advance, but eviction is keyed by address, so a position that went
/// stale under a concurrent eviction can never remove the wrong entry.
///
/// Eviction is permanent: the registry only shrinks over the client's
/// lifetime, it is never grown back.
pub(crate) struct EndpointRegistry {
    endpoints: Mutex<Vec<Endpoint>>,
}

impl EndpointRegistry {
    /// Opens one connection handle per address.
    pub fn new(addrs: &[String], connector: &dyn Connector) -> Self {
        let endpoints = addrs
            .iter()
            .map(|addr| Endpoint {
                addr: addr.clone(),
                conn: connector.connect(addr),
            })
            .collect();
        Self {
            endpoints: Mutex::new(endpoints),
        }
    }

    /// Endpoints not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Uniformly random endpoint and its current position.
    pub fn select_random(&self) -> Result<(usize, Endpoint)> {
        let endpoints = self.lock();
        if endpoints.is_empty() {
            return Err(KvError::EmptyRegistry);
        }
        let index = rand::thread_rng().gen_range(0..endpoints.len());
        Ok((index, endpoints[index].clone()))
    }

    /// Deterministic advance for sticky round-robin selection: after the
    /// entry at `evicted_index` was removed, its slot holds what used to
    /// be the next endpoint, wrapping at the end of the registry.
    pub fn select_next(&self, evicted_index: usize) -> Result<(usize, Endpoint)> {
        let endpoints = self.lock();
        if endpoints.is_empty() {
            return Err(KvError::EmptyRegistry);
        }
        let index = evicted_index % endpoints.len();
        Ok((index, endpoints[index].clone()))
    }

    /// Endpoint with the given address, for direct administrative
    /// targeting.
    pub fn find(&self, addr: &str) -> Option<Endpoint> {
        self.lock().iter().find(|e| e.addr == addr).cloned()
    }

    /// Permanently removes an endpoint and drops its connection handle.
    /// Returns `EmptyRegistry` once nothing is left; callers must treat
    /// that as fatal to the in-flight operation.
    pub fn evict(&self, addr: &str) -> Result<()> {
        let mut endpoints = self.lock();
        if let Some(position) = endpoints.iter().position(|e| e.addr == addr) {
            endpoints.remove(position);
        }
        if endpoints.is_empty() {
            Err(KvError::EmptyRegistry)
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Endpoint>> {
        // The guarded data stays consistent even if a holder panicked.
        self.endpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
