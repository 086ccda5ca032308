//! CompletionRegistry - one-shot correlation of results with waiting invocations

use crate::config::CompletionConfig;
use crate::error::{CourierError, Result};
use courier_core::task::shard_index;
use courier_core::{ActivityError, CompletionToken, Payload};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, trace};

const SHARD_COUNT: usize = 16;

/// What a waiting invocation receives
pub type Outcome = Result<Payload>;

enum Entry {
    Pending {
        name: String,
        sender: oneshot::Sender<Outcome>,
    },
    /// Cancelled invocation; swallows one late completion
    Cancelled { name: String, at: Instant },
}

type Shard = Mutex<HashMap<CompletionToken, Entry>>;

/// Registry of outstanding completion tokens.
///
/// Every token is resolved at most once: the first `complete`, `fail` or
/// cancellation consumes it and later calls see [`CourierError::InvalidToken`].
/// A cancelled token is kept as a tombstone so a late completion is accepted
/// and discarded instead of reported as an error.
pub struct CompletionRegistry {
    shards: Vec<Shard>,
    config: CompletionConfig,
}

impl CompletionRegistry {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            shards: (0..SHARD_COUNT).map(|_| Mutex::new(HashMap::new())).collect(),
            config,
        }
    }

    fn shard(&self, token: &CompletionToken) -> &Shard {
        &self.shards[shard_index(token, self.shards.len())]
    }

    /// Issue a fresh token for an invocation of `name`.
    ///
    /// The returned [`PendingInvocation`] is the only way to observe the result.
    pub fn issue(self: &Arc<Self>, name: impl Into<String>) -> PendingInvocation {
        let name = name.into();
        let (sender, receiver) = oneshot::channel();
        let token = CompletionToken::generate();

        {
            let mut shard = self.shard(&token).lock();
            self.purge_tombstones(&mut shard);
            shard.insert(
                token,
                Entry::Pending {
                    name: name.clone(),
                    sender,
                },
            );
        }
        trace!(token = %token, name = %name, "Issued completion token");

        PendingInvocation {
            token,
            name,
            receiver,
            registry: Arc::clone(self),
            finished: false,
        }
    }

    fn purge_tombstones(&self, shard: &mut HashMap<CompletionToken, Entry>) {
        let retention = self.config.tombstone_retention;
        shard.retain(|_, entry| match entry {
            Entry::Cancelled { at, .. } => at.elapsed() < retention,
            Entry::Pending { .. } => true,
        });
    }

    /// Deliver a successful result
    pub fn complete(&self, token: &CompletionToken, result: Payload) -> Result<()> {
        self.resolve(token, |_| Ok(result))
    }

    /// Deliver a handler failure
    pub fn fail(&self, token: &CompletionToken, error: ActivityError) -> Result<()> {
        self.resolve(token, |name| {
            Err(CourierError::ActivityFailure {
                activity: name.to_string(),
                error,
            })
        })
    }

    /// Deliver an engine-side error, e.g. a missing handler
    pub(crate) fn reject(&self, token: &CompletionToken, error: CourierError) -> Result<()> {
        self.resolve(token, |_| Err(error))
    }

    fn resolve(&self, token: &CompletionToken, outcome: impl FnOnce(&str) -> Outcome) -> Result<()> {
        let mut shard = self.shard(token).lock();
        match shard.remove(token) {
            Some(Entry::Pending { name, sender }) => {
                // Sent under the shard lock so a concurrent cancel observes it
                if sender.send(outcome(&name)).is_err() {
                    debug!(token = %token, name = %name, "Waiter dropped before resolution");
                }
                Ok(())
            }
            Some(Entry::Cancelled { name, .. }) => {
                debug!(token = %token, name = %name, "Discarding late completion for cancelled invocation");
                Ok(())
            }
            None => Err(CourierError::InvalidToken(token.to_string())),
        }
    }

    /// Cancel a pending token.
    ///
    /// Returns `false` if the token was already resolved or is unknown.
    pub fn cancel(&self, token: &CompletionToken) -> bool {
        let mut shard = self.shard(token).lock();
        match shard.remove(token) {
            Some(Entry::Pending { name, .. }) => {
                trace!(token = %token, name = %name, "Cancelled completion token");
                shard.insert(
                    *token,
                    Entry::Cancelled {
                        name,
                        at: Instant::now(),
                    },
                );
                true
            }
            Some(tombstone @ Entry::Cancelled { .. }) => {
                shard.insert(*token, tombstone);
                false
            }
            None => false,
        }
    }

    /// Check whether a token is still waiting for its result
    pub fn is_pending(&self, token: &CompletionToken) -> bool {
        matches!(
            self.shard(token).lock().get(token),
            Some(Entry::Pending { .. })
        )
    }

    /// Number of invocations waiting for a result
    pub fn pending_count(&self) -> usize {
        self.count(|entry| matches!(entry, Entry::Pending { .. }))
    }

    /// Number of cancelled tokens still retained
    pub fn tombstone_count(&self) -> usize {
        self.count(|entry| matches!(entry, Entry::Cancelled { .. }))
    }

    fn count(&self, predicate: impl Fn(&Entry) -> bool) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().values().filter(|e| predicate(e)).count())
            .sum()
    }
}

impl Default for CompletionRegistry {
    fn default() -> Self {
        Self::new(CompletionConfig::DEFAULT)
    }
}

impl std::fmt::Debug for CompletionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionRegistry")
            .field("shards", &self.shards.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// The waiting side of an issued token.
///
/// Dropping it before a result arrives cancels the token.
pub struct PendingInvocation {
    token: CompletionToken,
    name: String,
    receiver: oneshot::Receiver<Outcome>,
    registry: Arc<CompletionRegistry>,
    finished: bool,
}

impl PendingInvocation {
    pub fn token(&self) -> CompletionToken {
        self.token
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wait for the result.
    ///
    /// Returns `None` if nothing arrived within `timeout`; the token is then
    /// cancelled and a late completion is discarded.
    pub async fn wait(mut self, timeout: Duration) -> Option<Outcome> {
        let outcome = match tokio::time::timeout(timeout, &mut self.receiver).await {
            Ok(Ok(outcome)) => Some(outcome),
            Ok(Err(_)) => Some(Err(CourierError::Cancelled(format!(
                "completion for {} was dropped",
                self.name
            )))),
            Err(_) => {
                if self.registry.cancel(&self.token) {
                    None
                } else {
                    // Resolved between the deadline and the cancel
                    self.receiver.try_recv().ok()
                }
            }
        };
        self.finished = true;
        outcome
    }
}

impl Drop for PendingInvocation {
    fn drop(&mut self) {
        if !self.finished {
            self.registry.cancel(&self.token);
        }
    }
}

impl std::fmt::Debug for PendingInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingInvocation")
            .field("token", &self.token)
            .field("name", &self.name)
            .finish()
    }
}
