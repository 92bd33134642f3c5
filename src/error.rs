/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// Communication-layer failure: timeout, refused or reset connection,
    /// unreachable endpoint. Retryable per the dispatch policy.
    #[error("transport failure talking to {endpoint}: {reason}")]
    Transport {
        /// Address of the endpoint the attempt was aimed at.
        endpoint: String,
        /// Human-readable description of the underlying failure.
        reason: String,
    },
    /// Error reported by the remote server itself (malformed request,
    /// rejected operation). Never retried: the request cannot succeed.
    #[error("remote error from {endpoint}: {message}")]
    Remote {
        /// Address of the endpoint that rejected the request.
        endpoint: String,
        /// Error message text from the server.
        message: String,
        /// Optional server-specific error code.
        code: Option<String>,
    },
    /// Every endpoint has been evicted; nothing is left to try. Once a
    /// client reports this it stays unusable, since evicted endpoints
    /// are never re-admitted.
    #[error("no endpoints remain in the registry")]
    EmptyRegistry,
    /// The per-key retry budget ran out before any endpoint answered.
    /// Carries the last transport failure observed.
    #[error("retry budget exhausted after {selections} endpoint selections: {last}")]
    RetriesExhausted {
        /// How many distinct endpoint selections the budget allowed.
        selections: u32,
        /// The failure seen on the final attempt.
        #[source]
        last: Box<KvError>,
    },
    /// Caller-side misuse, rejected before any network activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An administrative call named an endpoint this client does not
    /// hold (never configured, or already evicted).
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

impl KvError {
    /// Whether the dispatch loop may try again after this error.
    /// Only communication-layer failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, KvError::Transport { .. })
    }
}
