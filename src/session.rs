//! Day selection.
//!
//! A [`PreviewSession`] holds the thread for the currently selected day. Selecting
//! another day replaces it wholesale: the previous thread's image slots are
//! dropped, which cancels their resolutions, before the new entry is fetched.

use futures::future::join_all;

use crate::compose::compose;
use crate::entry::{EntryClient, EntryError};
use crate::models::{DayEntry, PostUnit, ResolvedImage};
use crate::resolver::{ImageResolver, Resolution};

/// The composed thread for one day plus one resolution per image slot.
#[derive(Debug)]
pub struct LoadedThread {
    pub day: u32,
    pub entry: DayEntry,
    pub units: Vec<PostUnit>,
    /// One slot per image, in posting order.
    pub slots: Vec<Resolution>,
}

impl LoadedThread {
    /// Wait for every slot to settle. Slots whose request never completes keep
    /// this waiting; callers that need a bound should wrap it in a timeout.
    pub async fn settle_all(&mut self) -> Vec<ResolvedImage> {
        let states = join_all(self.slots.iter_mut().map(|slot| slot.settled())).await;
        for (slot, state) in self.slots.iter().zip(&states) {
            tracing::debug!(
                id = %slot.id(),
                image = %slot.image_ref(),
                status = state.status_str(),
                "slot settled"
            );
        }
        states
    }
}

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading { day: u32 },
    /// Entry fetch failed; the error is shown in place of the preview.
    Failed { day: u32, error: EntryError },
    Loaded(LoadedThread),
}

impl SessionState {
    pub fn thread(&self) -> Option<&LoadedThread> {
        match self {
            SessionState::Loaded(thread) => Some(thread),
            _ => None,
        }
    }

    pub fn thread_mut(&mut self) -> Option<&mut LoadedThread> {
        match self {
            SessionState::Loaded(thread) => Some(thread),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EntryError> {
        match self {
            SessionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Drives entry fetch, composition and image resolution for a selected day.
#[derive(Debug)]
pub struct PreviewSession {
    entries: EntryClient,
    resolver: ImageResolver,
    state: SessionState,
}

impl PreviewSession {
    pub fn new(entries: EntryClient, resolver: ImageResolver) -> Self {
        Self {
            entries,
            resolver,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Select a day and load its thread.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn select_day(&mut self, day: u32) -> &mut SessionState {
        self.state = SessionState::Loading { day };

        self.state = match self.entries.fetch(day).await {
            Ok(entry) => {
                let units = compose(Some(&entry));
                let slots = self.resolver.resolve_thread(&units);
                tracing::info!(
                    day,
                    posts = units.len(),
                    images = slots.len(),
                    "thread composed"
                );
                SessionState::Loaded(LoadedThread {
                    day,
                    entry,
                    units,
                    slots,
                })
            }
            Err(err) => {
                tracing::warn!(day, error = %err, "entry fetch failed");
                SessionState::Failed { day, error: err }
            }
        };

        &mut self.state
    }

    /// Drop the current thread, cancelling any outstanding image slots.
    pub fn clear(&mut self) {
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::Response;
    use std::sync::Arc;

    const ENTRIES: &str = "https://entries.example.com/exec";
    const PROXY: &str = "https://proxy.example.com/img";

    fn session(mock: &MockHttpClient) -> PreviewSession {
        let client: Arc<dyn crate::traits::HttpClient> = Arc::new(mock.clone());
        PreviewSession::new(
            EntryClient::new(Arc::clone(&client), ENTRIES),
            ImageResolver::new(client, PROXY),
        )
    }

    fn image_ok() -> serde_json::Value {
        serde_json::json!({"mimeType": "image/png", "base64": "aGk="})
    }

    #[tokio::test]
    async fn test_select_day_loads_thread() {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}?4", ENTRIES),
            MockResponse::json(200, serde_json::json!({"images": ["a", "b"], "trailingText": "T"})),
        );
        mock.set_response(&format!("{}?", PROXY), MockResponse::json(200, image_ok()));

        let mut session = session(&mock);
        let state = session.select_day(4).await;
        let thread = state.thread_mut().unwrap();

        assert_eq!(thread.day, 4);
        assert_eq!(thread.units.len(), 2);
        assert_eq!(thread.slots.len(), 2);
        assert_ne!(thread.slots[0].id(), thread.slots[1].id());
        let states = thread.settle_all().await;
        assert!(states.iter().all(ResolvedImage::is_ready));
    }

    #[tokio::test]
    async fn test_failed_fetch_replaces_preview_with_message() {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}?4", ENTRIES),
            MockResponse::json(200, serde_json::json!({"images": [], "trailingText": "T"})),
        );
        mock.set_response(
            &format!("{}?5", ENTRIES),
            MockResponse::Success(Response::new(503, bytes::Bytes::from("maintenance"))),
        );

        let mut session = session(&mock);
        session.select_day(4).await;
        assert!(session.state().thread().is_some());

        session.select_day(5).await;
        assert!(session.state().thread().is_none());
        assert_eq!(
            session.state().error().map(ToString::to_string).as_deref(),
            Some("Entry service returned HTTP 503: maintenance")
        );
    }

    #[tokio::test]
    async fn test_reselect_cancels_previous_slots() {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}?1", ENTRIES),
            MockResponse::json(200, serde_json::json!({"images": ["slow"], "trailingText": ""})),
        );
        mock.set_response(
            &format!("{}?2", ENTRIES),
            MockResponse::json(200, serde_json::json!({"images": [], "trailingText": "next"})),
        );
        let gate = mock.set_gated_response(
            &format!("{}?slow", PROXY),
            Response::json_body(200, &image_ok()),
        );

        let mut session = session(&mock);
        let first = session.select_day(1).await.thread().unwrap();
        let token = first.slots[0].cancellation_token();
        let observer = first.slots[0].subscribe();

        session.select_day(2).await;
        assert!(token.is_cancelled());

        gate.notify_one();
        tokio::task::yield_now().await;
        assert!(observer.borrow().is_pending());
    }

    #[tokio::test]
    async fn test_invalid_day_is_failed_state() {
        let mock = MockHttpClient::new();
        let mut session = session(&mock);
        session.select_day(0).await;
        assert!(matches!(
            session.state().error(),
            Some(EntryError::InvalidDay(0))
        ));
    }

    #[tokio::test]
    async fn test_clear_returns_to_idle() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!({})));
        let mut session = session(&mock);
        session.select_day(9).await;
        session.clear();
        assert!(matches!(session.state(), SessionState::Idle));
    }
}
