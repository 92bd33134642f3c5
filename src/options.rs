use std::time::Duration;

/// How the dispatcher picks the next endpoint after an eviction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectionStrategy {
    /// Uniformly random endpoint on every selection.
    RandomEachTime,
    /// Random first pick, then a deterministic advance through the
    /// registry after each eviction. Guarantees systematic coverage of
    /// all endpoints instead of relying on random draws not colliding.
    StickyThenRoundRobin,
}

/// Configures timeout, retry and failover behavior for a client.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Timeout for a single remote attempt.
    pub attempt_timeout: Duration,
    /// Distinct endpoint selections allowed per operation before it
    /// fails permanently.
    pub key_budget: u32,
    /// Consecutive attempts against one endpoint before it is evicted.
    pub endpoint_budget: u32,
    /// Fixed pause between attempts against the same endpoint.
    pub retry_pause: Duration,
    /// Endpoint selection strategy.
    pub selection: SelectionStrategy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(10),
            key_budget: 5,
            endpoint_budget: 3,
            retry_pause: Duration::from_secs(1),
            selection: SelectionStrategy::RandomEachTime,
        }
    }
}

/// Per-invocation overrides accepted by `get_with` / `put_with`.
/// Absent fields fall back to the client-level [`ClientOptions`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CallOptions {
    /// Overrides [`ClientOptions::key_budget`] for this call.
    pub num_retries: Option<u32>,
    /// Overrides [`ClientOptions::attempt_timeout`] for this call.
    pub retry_timeout: Option<Duration>,
}

/// Fully resolved budget for one operation invocation. Created fresh per
/// `get`/`put` call, never persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RetryBudget {
    pub key_budget: u32,
    pub endpoint_budget: u32,
    pub attempt_timeout: Duration,
    pub retry_pause: Duration,
}

impl RetryBudget {
    /// Merges per-call overrides over client defaults. Budgets are
    /// clamped to at least one so an operation always gets an attempt.
    pub(crate) fn resolve(defaults: &ClientOptions, call: CallOptions) -> Self {
        Self {
            key_budget: call.num_retries.unwrap_or(defaults.key_budget).max(1),
            endpoint_budget: defaults.endpoint_budget.max(1),
            attempt_timeout: call.retry_timeout.unwrap_or(defaults.attempt_timeout),
            retry_pause: defaults.retry_pause,
        }
    }
}
