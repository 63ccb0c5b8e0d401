/*!
 * Call Context
 * Deadline and cancellation carried alongside each plugin RPC
 *
 * Clones share one cancellation signal: cancelling any clone cancels all of
 * them. Deadlines are per value and can only be tightened.
 */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tonic::Status;

#[derive(Debug, Clone)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel_tx: Arc<watch::Sender<bool>>,
}

impl CallContext {
    /// Context without deadline, cancelled only explicitly
    pub fn background() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            deadline: None,
            cancel_tx: Arc::new(cancel_tx),
        }
    }

    /// Context expiring `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the context
    /// without a deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    /// Context expiring at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::background().deadline_at(deadline)
    }

    /// Tighten the deadline; a later instant than the current one is ignored
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone
    pub async fn cancelled(&self) {
        let mut rx = self.cancel_tx.subscribe();
        // Sender lives in self, so the channel cannot close while we wait
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `call` until it completes, the context is cancelled, or the
    /// deadline passes. Losing branches drop the call future, aborting the RPC.
    pub(crate) async fn run<T, F>(&self, call: F) -> Result<T, Status>
    where
        F: Future<Output = Result<T, Status>>,
    {
        if self.is_cancelled() {
            return Err(Status::cancelled("context cancelled"));
        }
        if matches!(self.remaining(), Some(left) if left.is_zero()) {
            return Err(Status::deadline_exceeded("context deadline exceeded"));
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Status::cancelled("context cancelled")),
            _ = sleep_until(self.deadline) => {
                Err(Status::deadline_exceeded("context deadline exceeded"))
            }
            result = call => result,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => futures::future::pending::<()>().await,
    }
}
