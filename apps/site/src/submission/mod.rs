//! Submission state: the lifecycle of one contact form send, as observed by a UI.
//!
//! `SubmissionState` is a plain value with pure transitions. `SubmissionController`
//! owns the current value, publishes it on a `watch` channel and drives the
//! transitions around a `MessageSender` call.
//!
//! Stale results: every `submit` and `reset` bumps a generation counter under the
//! channel's write lock. A completed send only writes state if its generation is
//! still current, so a response landing after `reset()` or after a newer `submit`
//! is returned to its caller but never shown. The request itself is not cancelled.
//! Dropping a `submit` future before the send resolves clears `pending`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api_client::{ApiError, Payload};
use crate::contact::MessageSender;
use crate::models::contact::ContactForm;

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send message. Please try again.";

/// How long a success acknowledgment stays up before the form goes back to idle.
pub const SUCCESS_DISMISS_DELAY: Duration = Duration::from_secs(3);

/// Invariants: never `pending && success`, never `error.is_some() && success`.
/// Fields are private so only the transitions below can build a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionState {
    pending: bool,
    error: Option<String>,
    success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Started,
    Succeeded,
    Failed(String),
    Reset,
}

impl SubmissionState {
    pub fn idle() -> Self {
        Self {
            pending: false,
            error: None,
            success: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }

    pub fn apply(&self, event: SubmissionEvent) -> Self {
        match event {
            SubmissionEvent::Started => Self {
                pending: true,
                error: None,
                success: false,
            },
            SubmissionEvent::Succeeded => Self {
                pending: false,
                error: None,
                success: true,
            },
            SubmissionEvent::Failed(message) => Self {
                pending: false,
                error: Some(message),
                success: false,
            },
            SubmissionEvent::Reset => Self::idle(),
        }
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::idle()
    }
}

/// What `submit` hands back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult<T> {
    Sent(T),
    Failed(String),
}

impl<T> SubmitResult<T> {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitResult::Sent(_))
    }
}

#[derive(Clone)]
pub struct SubmissionController {
    sender: Arc<dyn MessageSender>,
    state: Arc<watch::Sender<SubmissionState>>,
    generation: Arc<AtomicU64>,
}

impl SubmissionController {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        let (state, _) = watch::channel(SubmissionState::idle());
        Self {
            sender,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// A receiver that observes every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Does not guard against overlapping calls; disable the submit affordance
    /// while `is_pending()` if that matters. Only the latest call writes state.
    pub async fn submit(&self, form: ContactForm) -> SubmitResult<Payload> {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = state.apply(SubmissionEvent::Started);
        });
        debug!(generation, "Submission started");
        let guard = PendingGuard {
            controller: self,
            generation,
            armed: true,
        };

        let outcome = self.sender.send_message(form).await;
        guard.disarm();

        let (event, result) = match outcome {
            Ok(data) => (SubmissionEvent::Succeeded, SubmitResult::Sent(data)),
            Err(err) => {
                let message = failure_message(&err);
                warn!(generation, "Submission failed: {message}");
                (
                    SubmissionEvent::Failed(message.clone()),
                    SubmitResult::Failed(message),
                )
            }
        };

        let applied = self.apply_if_current(generation, event);
        if !applied {
            debug!(generation, "Discarding stale submission result");
        }
        result
    }

    /// Back to idle, whatever the current state. Any in-flight submission's
    /// result will not be applied.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            *state = state.apply(SubmissionEvent::Reset);
        });
        debug!("Submission state reset");
    }

    /// Resets to idle after `delay` if the current success is still showing.
    /// A newer `submit` or `reset` in the meantime cancels the dismissal.
    pub fn dismiss_success_after(&self, delay: Duration) -> JoinHandle<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let dismissed = controller.state.send_if_modified(|state| {
                let current = controller.generation.load(Ordering::SeqCst) == generation;
                if current && state.is_success() {
                    controller.generation.fetch_add(1, Ordering::SeqCst);
                    *state = state.apply(SubmissionEvent::Reset);
                    true
                } else {
                    false
                }
            });
            if dismissed {
                debug!("Success acknowledgment dismissed");
            }
        })
    }

    fn apply_if_current(&self, generation: u64, event: SubmissionEvent) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = state.apply(event);
            true
        })
    }
}

/// Puts the form back to idle if a `submit` future is dropped mid-send, unless a
/// newer `submit` or `reset` already owns the state.
struct PendingGuard<'a> {
    controller: &'a SubmissionController,
    generation: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed
            && self
                .controller
                .apply_if_current(self.generation, SubmissionEvent::Reset)
        {
            debug!(generation = self.generation, "Submission dropped while in flight");
        }
    }
}

fn failure_message(err: &ApiError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::transport::MockTransport;
    use crate::api_client::ApiClient;
    use crate::contact::{ContactService, MockMessageSender};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn form() -> ContactForm {
        ContactForm {
            name: "Test User".into(),
            email: "test@example.com".into(),
            subject: "Test Subject".into(),
            message: "Test message".into(),
            website: String::new(),
        }
    }

    fn controller_over(transport: MockTransport) -> SubmissionController {
        let client = ApiClient::new("https://backend.test", Arc::new(transport));
        SubmissionController::new(Arc::new(ContactService::new(client)))
    }

    /// Each call waits until the test releases it with an outcome.
    #[derive(Default)]
    struct GatedSender {
        gates: Mutex<VecDeque<oneshot::Receiver<Result<Payload, ApiError>>>>,
    }

    impl GatedSender {
        fn gate(&self) -> oneshot::Sender<Result<Payload, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl MessageSender for GatedSender {
        async fn send_message(&self, _form: ContactForm) -> Result<Payload, ApiError> {
            let gate = self.gates.lock().unwrap().pop_front().expect("no gate queued");
            gate.await.unwrap_or(Err(ApiError::Network))
        }
    }

    async fn wait_for_pending(rx: &mut watch::Receiver<SubmissionState>) {
        rx.wait_for(|s| s.is_pending()).await.unwrap();
    }

    #[test]
    fn test_transitions_hold_invariants() {
        let idle = SubmissionState::idle();
        let events = [
            SubmissionEvent::Started,
            SubmissionEvent::Succeeded,
            SubmissionEvent::Started,
            SubmissionEvent::Failed("nope".into()),
            SubmissionEvent::Reset,
        ];
        let mut state = idle.clone();
        for event in events {
            state = state.apply(event);
            assert!(!(state.is_pending() && state.is_success()));
            assert!(!(state.error().is_some() && state.is_success()));
        }
        assert_eq!(state, idle);
    }

    #[test]
    fn test_started_clears_previous_outcome() {
        let failed = SubmissionState::idle().apply(SubmissionEvent::Failed("x".into()));
        let started = failed.apply(SubmissionEvent::Started);
        assert!(started.is_pending());
        assert_eq!(started.error(), None);
        assert!(!started.is_success());
    }

    #[test]
    fn test_reset_from_any_state_is_idle() {
        let states = [
            SubmissionState::idle(),
            SubmissionState::idle().apply(SubmissionEvent::Started),
            SubmissionState::idle().apply(SubmissionEvent::Succeeded),
            SubmissionState::idle().apply(SubmissionEvent::Failed("x".into())),
        ];
        for state in states {
            assert!(state.apply(SubmissionEvent::Reset).is_idle());
        }
    }

    #[tokio::test]
    async fn test_controller_starts_idle() {
        assert!(controller_over(MockTransport::new()).state().is_idle());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let transport = MockTransport::new().with_json(200, json!({ "success": true }));
        let controller = controller_over(transport);

        let result = controller.submit(form()).await;

        assert_eq!(result, SubmitResult::Sent(Payload::Json(json!({ "success": true }))));
        let state = controller.state();
        assert!(state.is_success());
        assert!(!state.is_pending());
        assert_eq!(state.error(), None);
    }

    #[tokio::test]
    async fn test_submit_surfaces_backend_message() {
        let transport = MockTransport::new().with_json(404, json!({ "message": "Not found" }));
        let controller = controller_over(transport);

        let result = controller.submit(form()).await;

        assert_eq!(result, SubmitResult::Failed("Not found".into()));
        let state = controller.state();
        assert_eq!(state.error(), Some("Not found"));
        assert!(!state.is_success());
        assert!(!state.is_pending());
    }

    #[tokio::test]
    async fn test_submit_network_failure() {
        let transport = MockTransport::new().with_failure("dns lookup failed");
        let controller = controller_over(transport);

        controller.submit(form()).await;

        assert_eq!(
            controller.state().error(),
            Some("Network error. Please check your connection.")
        );
    }

    #[tokio::test]
    async fn test_empty_failure_message_falls_back() {
        let mut sender = MockMessageSender::new();
        sender.expect_send_message().once().returning(|_| {
            Err(ApiError::Http {
                status: 500,
                message: String::new(),
            })
        });
        let controller = SubmissionController::new(Arc::new(sender));

        let result = controller.submit(form()).await;

        assert_eq!(result, SubmitResult::Failed(GENERIC_FAILURE_MESSAGE.into()));
        assert_eq!(controller.state().error(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_failure_does_not_leak_into_next_submit() {
        let transport = MockTransport::new()
            .with_json(500, json!({ "message": "Server exploded" }))
            .with_json(200, json!({ "success": true }));
        let controller = controller_over(transport);

        controller.submit(form()).await;
        assert_eq!(controller.state().error(), Some("Server exploded"));

        controller.submit(form()).await;
        let state = controller.state();
        assert_eq!(state.error(), None);
        assert!(state.is_success());
    }

    #[tokio::test]
    async fn test_reset_clears_error() {
        let transport = MockTransport::new().with_failure("refused");
        let controller = controller_over(transport);

        controller.submit(form()).await;
        controller.reset();

        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_pending_visible_while_in_flight() {
        let sender = Arc::new(GatedSender::default());
        let gate = sender.gate();
        let controller = SubmissionController::new(sender);
        let mut rx = controller.subscribe();

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        wait_for_pending(&mut rx).await;
        assert!(controller.state().is_pending());

        gate.send(Ok(Payload::Text("ok".into()))).unwrap();
        assert!(task.await.unwrap().is_sent());
        assert!(!controller.state().is_pending());
        assert!(controller.state().is_success());
    }

    #[tokio::test]
    async fn test_stale_result_after_reset_is_discarded() {
        let sender = Arc::new(GatedSender::default());
        let gate = sender.gate();
        let controller = SubmissionController::new(sender);
        let mut rx = controller.subscribe();

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        wait_for_pending(&mut rx).await;
        controller.reset();

        gate.send(Ok(Payload::Text("late".into()))).unwrap();
        let result = task.await.unwrap();

        assert_eq!(result, SubmitResult::Sent(Payload::Text("late".into())));
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_only_latest_submit_writes_state() {
        let sender = Arc::new(GatedSender::default());
        let first_gate = sender.gate();
        let second_gate = sender.gate();
        let controller = SubmissionController::new(sender);
        let mut rx = controller.subscribe();

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        wait_for_pending(&mut rx).await;
        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        // wait for the second submit to start
        while controller.generation.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        second_gate
            .send(Err(ApiError::Http {
                status: 400,
                message: "Bad input".into(),
            }))
            .unwrap();
        second.await.unwrap();
        first_gate.send(Ok(Payload::Text("ok".into()))).unwrap();
        first.await.unwrap();

        assert_eq!(controller.state().error(), Some("Bad input"));
        assert!(!controller.state().is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_dismissed_after_delay() {
        let transport = MockTransport::new().with_json(200, json!({ "success": true }));
        let controller = controller_over(transport);

        controller.submit(form()).await;
        let dismissal = controller.dismiss_success_after(SUCCESS_DISMISS_DELAY);
        assert!(controller.state().is_success());

        dismissal.await.unwrap();
        assert!(controller.state().is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissal_skipped_when_newer_submit_ran() {
        let transport = MockTransport::new()
            .with_json(200, json!({ "success": true }))
            .with_json(500, json!({ "message": "Down" }));
        let controller = controller_over(transport);

        controller.submit(form()).await;
        let dismissal = controller.dismiss_success_after(SUCCESS_DISMISS_DELAY);
        controller.submit(form()).await;

        dismissal.await.unwrap();
        assert_eq!(controller.state().error(), Some("Down"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_clears_pending() {
        let sender = Arc::new(GatedSender::default());
        let _gate = sender.gate();
        let controller = SubmissionController::new(sender);

        let outcome =
            tokio::time::timeout(Duration::from_secs(5), controller.submit(form())).await;

        assert!(outcome.is_err());
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn test_dropped_stale_submit_leaves_newer_state() {
        let sender = Arc::new(GatedSender::default());
        let _first_gate = sender.gate();
        let second_gate = sender.gate();
        let controller = SubmissionController::new(sender);
        let mut rx = controller.subscribe();

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        wait_for_pending(&mut rx).await;
        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(form()).await }
        });
        while controller.generation.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }

        first.abort();
        assert!(first.await.unwrap_err().is_cancelled());
        assert!(controller.state().is_pending());

        second_gate.send(Ok(Payload::Text("ok".into()))).unwrap();
        assert!(second.await.unwrap().is_sent());
        assert!(controller.state().is_success());
    }
}
