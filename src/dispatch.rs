use std::thread;

use tracing::{debug, warn};

use crate::options::{RetryBudget, SelectionStrategy};
use crate::registry::EndpointRegistry;
use crate::transport::Reply;
use crate::wire::RpcRequest;
use crate::{KvError, Result};

/// What the dispatcher does after a failed attempt. Decisions are plain
/// data so the policy is testable without a network.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    /// Pause, then re-enter the attempt against the same endpoint.
    RetrySameEndpoint,
    /// Evict the endpoint, consume one unit of per-key budget and
    /// select a fresh endpoint.
    EvictAndReselect,
    /// Surface the error unchanged; retrying cannot help.
    Fail,
}

/// Maps an attempt failure and the remaining per-endpoint budget onto
/// the next dispatch action.
pub(crate) fn classify(err: &KvError, attempts_left: u32) -> Action {
    if !err.is_retryable() {
        Action::Fail
    } else if attempts_left > 0 {
        Action::RetrySameEndpoint
    } else {
        Action::EvictAndReselect
    }
}

/// Retry/failover engine for one client. Borrows the client's registry;
/// all per-operation state lives on the stack of [`Dispatcher::dispatch`].
pub(crate) struct Dispatcher<'a> {
    pub registry: &'a EndpointRegistry,
    pub selection: SelectionStrategy,
    pub client_id: Option<&'a str>,
}

impl Dispatcher<'_> {
    /// Runs one operation to completion.
    ///
    /// The per-key budget bounds distinct endpoint selections; the
    /// per-endpoint budget bounds consecutive attempts against one
    /// endpoint before it is evicted. Total attempts are therefore at
    /// most `key_budget * endpoint_budget`. The first selection is
    /// random; after an eviction the next endpoint comes from the
    /// configured [`SelectionStrategy`].
    pub fn dispatch(&self, request: &RpcRequest, budget: RetryBudget) -> Result<Reply> {
        let mut selections_left = budget.key_budget;
        let (mut index, mut endpoint) = self.registry.select_random()?;
        loop {
            let mut attempts_left = budget.endpoint_budget;
            let last_err = loop {
                attempts_left -= 1;
                debug!(
                    client = self.client_id,
                    endpoint = %endpoint.addr,
                    op = request.kind(),
                    "dispatching attempt"
                );
                let err = match endpoint.conn.invoke(request, budget.attempt_timeout) {
                    Ok(reply) => return Ok(reply),
                    Err(err) => err,
                };
                match classify(&err, attempts_left) {
                    Action::Fail => return Err(err),
                    Action::RetrySameEndpoint => {
                        debug!(
                            client = self.client_id,
                            endpoint = %endpoint.addr,
                            error = %err,
                            attempts_left,
                            "transport failure, retrying same endpoint"
                        );
                        thread::sleep(budget.retry_pause);
                    }
                    Action::EvictAndReselect => break err,
                }
            };

            warn!(
                client = self.client_id,
                endpoint = %endpoint.addr,
                error = %last_err,
                "evicting endpoint after exhausted attempts"
            );
            self.registry.evict(&endpoint.addr)?;

            selections_left -= 1;
            if selections_left == 0 {
                return Err(KvError::RetriesExhausted {
                    selections: budget.key_budget,
                    last: Box::new(last_err),
                });
            }
            (index, endpoint) = match self.selection {
                SelectionStrategy::RandomEachTime => self.registry.select_random()?,
                SelectionStrategy::StickyThenRoundRobin => self.registry.select_next(index)?,
            };
        }
    }
}
