//! A single in-flight image resolution and its cancellation token.

use std::fmt;
use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::ResolveError;
use crate::models::{ImageContent, ImageRef, ResolvedImage};

/// Identifier assigned to each resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one image slot's resolution.
///
/// The handle is the consumer: dropping it (or calling [`cancel`](Self::cancel))
/// tears the slot down, after which the state never leaves `Pending` even if
/// the network response arrives later.
#[derive(Debug)]
pub struct Resolution {
    id: RequestId,
    image_ref: ImageRef,
    token: CancellationToken,
    state: watch::Receiver<ResolvedImage>,
    task: Option<JoinHandle<()>>,
}

impl Resolution {
    /// Start resolving `image_ref` by driving `fetch` on the Tokio runtime.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(image_ref: ImageRef, fetch: F) -> Self
    where
        F: Future<Output = Result<ImageContent, ResolveError>> + Send + 'static,
    {
        let id = RequestId::new();
        let token = CancellationToken::new();
        let (tx, rx) = watch::channel(ResolvedImage::Pending);

        let task_token = token.clone();
        let task_ref = image_ref.clone();
        let task = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = task_token.cancelled() => {
                    tracing::debug!(%id, image = %task_ref, "resolution cancelled before response");
                    return;
                }
                outcome = fetch => outcome,
            };

            let next = match outcome {
                Ok(content) => ResolvedImage::Ready(content),
                Err(err) => {
                    tracing::warn!(%id, image = %task_ref, error = %err, "image resolution failed");
                    ResolvedImage::Failed(err.to_string())
                }
            };

            if !settle(&tx, &task_token, next) {
                tracing::debug!(%id, image = %task_ref, "discarding response for torn-down slot");
            }
        });

        tracing::debug!(%id, image = %image_ref, "resolution started");

        Self {
            id,
            image_ref,
            token,
            state: rx,
            task: Some(task),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn image_ref(&self) -> &ImageRef {
        &self.image_ref
    }

    /// Current state of the slot.
    pub fn state(&self) -> ResolvedImage {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state transition of this slot.
    pub fn subscribe(&self) -> watch::Receiver<ResolvedImage> {
        self.state.clone()
    }

    /// The token that tears this resolution down when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Tear down the slot. Any later response is discarded.
    ///
    /// Takes no lock on the state, so it is safe to call (or drop the handle)
    /// while a subscriber holds a `borrow()`.
    pub fn cancel(&self) {
        // settle() reads the token under the state write lock: a write that
        // has not taken that lock yet never lands.
        self.token.cancel();
    }

    /// Wait until the slot reaches a terminal state, or until the resolution
    /// ends without one (cancelled), and return the state at that point.
    ///
    /// A request that never completes keeps this pending forever.
    pub async fn settled(&mut self) -> ResolvedImage {
        loop {
            {
                let current = self.state.borrow_and_update();
                if !current.is_pending() {
                    return current.clone();
                }
            }
            if self.state.changed().await.is_err() {
                return self.state.borrow().clone();
            }
        }
    }

    /// Wait for the background task to exit.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(id = %self.id, error = %e, "resolution task ended abnormally");
            }
        }
    }
}

impl Drop for Resolution {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Apply a terminal state unless the slot has been torn down. Returns whether
/// the state changed.
fn settle(
    tx: &watch::Sender<ResolvedImage>,
    token: &CancellationToken,
    next: ResolvedImage,
) -> bool {
    tx.send_if_modified(|state| {
        if token.is_cancelled() || !state.is_pending() {
            return false;
        }
        *state = next;
        true
    })
}
