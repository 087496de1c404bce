//! Chat session controller.
//!
//! The submission pipeline: optimistic user-message insert, stress-signal
//! detection before any network round-trip, a single in-flight assistant
//! exchange behind the busy gate, and failure recovery that always ends in
//! a visible transcript entry. State lives in one typed record
//! ([`ChatState`]) mutated only through named transitions, so the whole
//! machine is unit-testable without a rendering layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use solace_core::error::{Result, SolaceError};
use solace_core::message::Message;
use solace_core::service::{AssistantService, HistoryService};
use solace_core::state::{ChatState, ConversationPhase};
use solace_core::stress::{ActivityPicker, RandomActivityPicker, StressTrigger, detect_with};
use solace_core::transcript::Transcript;

use crate::identity::SessionIdentityManager;
use crate::suggestions::SUGGESTED_QUESTIONS;

const DEFAULT_EXCHANGE_DEADLINE: Duration = Duration::from_secs(30);

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// A guard failed (empty text, busy, paused, or still loading).
    /// Silent no-op: the transcript is untouched.
    Rejected,
    /// A stress signal paused the pipeline; the assistant was not
    /// contacted for this submission.
    Paused(StressTrigger),
    /// The assistant replied and its message was appended.
    Replied(Message),
    /// The exchange failed; the connectivity apology was appended and the
    /// pipeline is available for a manual retry.
    Failed(Message),
    /// The dispatch was cancelled by a pause; nothing was appended.
    Interrupted,
}

/// Orchestrates one chat session view.
///
/// # Concurrency
///
/// A single logical flow with cooperative suspension at the I/O boundaries
/// (history fetch, session creation, assistant exchange). At most one
/// exchange is in flight at a time, enforced by the busy gate rather than
/// transport-level concurrency control. The transcript is the only shared
/// mutable resource and every mutation is an append behind the gates.
pub struct ChatController {
    state: RwLock<ChatState>,
    transcript: RwLock<Transcript>,
    identity: Arc<SessionIdentityManager>,
    history: Arc<dyn HistoryService>,
    assistant: Arc<dyn AssistantService>,
    picker: Arc<dyn ActivityPicker>,
    exchange_deadline: Duration,
    /// Token for the in-flight exchange, cancelled when a pause engages.
    in_flight: Mutex<Option<CancellationToken>>,
    history_loaded: AtomicBool,
}

impl ChatController {
    pub fn new(
        identity: Arc<SessionIdentityManager>,
        history: Arc<dyn HistoryService>,
        assistant: Arc<dyn AssistantService>,
    ) -> Self {
        Self {
            state: RwLock::new(ChatState::new()),
            transcript: RwLock::new(Transcript::new()),
            identity,
            history,
            assistant,
            picker: Arc::new(RandomActivityPicker),
            exchange_deadline: DEFAULT_EXCHANGE_DEADLINE,
            in_flight: Mutex::new(None),
            history_loaded: AtomicBool::new(false),
        }
    }

    /// Overrides the activity picker (tests pass a deterministic one).
    pub fn with_activity_picker(mut self, picker: Arc<dyn ActivityPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Overrides the assistant exchange deadline.
    pub fn with_exchange_deadline(mut self, deadline: Duration) -> Self {
        self.exchange_deadline = deadline;
        self
    }

    /// Loads the prior transcript on session entry.
    ///
    /// Runs once per session identity; re-entry is a no-op. Until the load
    /// completes (success or failure) the pipeline stays in the `Loading`
    /// phase and submissions are rejected by the same gate as an in-flight
    /// request. A failed load is recovered locally into the single-message
    /// fallback transcript and never surfaced.
    ///
    /// # Errors
    ///
    /// Returns an error only if no session identity is active.
    pub async fn on_entry(&self) -> Result<()> {
        let Some(session_id) = self.identity.active().await else {
            return Err(SolaceError::internal(
                "entered chat without an active session identity",
            ));
        };

        if self.history_loaded.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.history.fetch_history(&session_id).await {
            Ok(history) => {
                tracing::info!(
                    session_id = %session_id,
                    messages = history.len(),
                    "chat history loaded"
                );
                self.transcript.write().await.load(history);
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    "history load failed, falling back to apology transcript"
                );
                self.transcript.write().await.load_fallback();
            }
        }

        self.state.write().await.ready();
        Ok(())
    }

    /// Submits one user message through the full pipeline.
    ///
    /// Accepted iff the trimmed text is non-empty, the pipeline is neither
    /// busy nor paused, and a session identity exists or can be created. A
    /// failed guard is a silent no-op ([`SubmissionOutcome::Rejected`]).
    ///
    /// On acceptance the user message is appended before any network
    /// round-trip. If the text carries a stress signal the pipeline pauses
    /// instead of contacting the assistant; otherwise exactly one exchange
    /// request is issued, and its success or failure both release the busy
    /// gate with a visible transcript entry.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::SessionCreation`] if no identity exists and
    /// the creation service fails; everything else is an outcome, not an
    /// error.
    pub async fn submit(&self, text: &str) -> Result<SubmissionOutcome> {
        let trimmed = text.trim();

        // Cheap pre-check so garbage input never mints a session.
        if !self.state.read().await.can_submit(trimmed) {
            return Ok(SubmissionOutcome::Rejected);
        }

        let session_id = self.identity.ensure_session().await?;

        // Re-check under the write lock; a racing submission loses here.
        if !self.state.write().await.begin_submission() {
            return Ok(SubmissionOutcome::Rejected);
        }

        let user_message = self.transcript.write().await.append_user(trimmed);
        tracing::debug!(
            session_id = %session_id,
            chars = user_message.content.len(),
            "user message appended"
        );

        if let Some(trigger) = detect_with(trimmed, self.picker.as_ref()) {
            tracing::info!(
                session_id = %session_id,
                keyword = trigger.keyword,
                activity = trigger.activity.kind,
                "stress signal detected, pausing before exchange"
            );
            self.state.write().await.pause(trigger);
            return Ok(SubmissionOutcome::Paused(trigger));
        }

        self.dispatch_exchange(&session_id, trimmed).await
    }

    /// Issues the assistant exchange and integrates the result.
    async fn dispatch_exchange(
        &self,
        session_id: &solace_core::session::SessionId,
        text: &str,
    ) -> Result<SubmissionOutcome> {
        let token = CancellationToken::new();
        *self.in_flight.lock().await = Some(token.clone());

        // A pause engaged before the token was registered is visible in the
        // phase; re-check so such a pause still aborts the dispatch.
        if self.state.read().await.is_paused() {
            *self.in_flight.lock().await = None;
            return Ok(SubmissionOutcome::Interrupted);
        }

        let request_id = Uuid::new_v4();
        tracing::debug!(%request_id, session_id = %session_id, "dispatching assistant exchange");

        let exchange = self.assistant.send_message(session_id, text);
        let raced = tokio::select! {
            _ = token.cancelled() => None,
            result = tokio::time::timeout(self.exchange_deadline, exchange) => Some(result),
        };

        *self.in_flight.lock().await = None;

        match raced {
            None => {
                // A pause engaged mid-flight; the reply (if any) is ignored.
                tracing::debug!(%request_id, "exchange cancelled by pause, reply discarded");
                Ok(SubmissionOutcome::Interrupted)
            }
            Some(Ok(Ok(payload))) => {
                let message = self.transcript.write().await.append_assistant(payload);
                self.state.write().await.finish_submission();
                tracing::debug!(%request_id, "assistant reply appended");
                Ok(SubmissionOutcome::Replied(message))
            }
            Some(Ok(Err(err))) => {
                tracing::warn!(%request_id, error = %err, "assistant exchange failed");
                let message = self.transcript.write().await.append_failure();
                self.state.write().await.finish_submission();
                Ok(SubmissionOutcome::Failed(message))
            }
            Some(Err(_elapsed)) => {
                tracing::warn!(
                    %request_id,
                    deadline_secs = self.exchange_deadline.as_secs(),
                    "assistant exchange deadline elapsed"
                );
                let message = self.transcript.write().await.append_failure();
                self.state.write().await.finish_submission();
                Ok(SubmissionOutcome::Failed(message))
            }
        }
    }

    /// Engages the wellbeing pause, cancelling any in-flight exchange.
    /// Its reply is discarded rather than appended after the pause.
    pub async fn pause(&self, trigger: StressTrigger) {
        self.state.write().await.pause(trigger);
        if let Some(token) = self.in_flight.lock().await.take() {
            token.cancel();
        }
    }

    /// Resolves the active pause (activity completed or dismissed) and
    /// returns the trigger that caused it. The triggering message is not
    /// retried; the pipeline simply becomes available again.
    pub async fn resolve_pause(&self) -> Option<StressTrigger> {
        let resolved = self.state.write().await.resolve_pause();
        if let Some(trigger) = &resolved {
            tracing::info!(keyword = trigger.keyword, "wellbeing pause resolved");
        }
        resolved
    }

    /// Selects a suggested question: creates a session first if none exists
    /// (firing the navigation hook), then populates the input draft with
    /// the suggested text. Never auto-submits. No-op while paused or for an
    /// unknown index.
    ///
    /// # Errors
    ///
    /// Returns [`SolaceError::SessionCreation`] if a session had to be
    /// created and the service failed.
    pub async fn select_suggested_question(&self, index: usize) -> Result<Option<&'static str>> {
        let Some(text) = SUGGESTED_QUESTIONS.get(index).copied() else {
            return Ok(None);
        };
        if self.state.read().await.is_paused() {
            return Ok(None);
        }

        self.identity.ensure_session().await?;
        self.state.write().await.set_draft(text);
        Ok(Some(text))
    }

    // ========================================================================
    // Read-side accessors for the front end
    // ========================================================================

    /// A snapshot of the transcript in display order.
    pub async fn messages(&self) -> Vec<Message> {
        self.transcript.read().await.messages().to_vec()
    }

    pub async fn phase(&self) -> ConversationPhase {
        self.state.read().await.phase()
    }

    pub async fn draft(&self) -> String {
        self.state.read().await.draft().to_string()
    }

    pub async fn active_trigger(&self) -> Option<StressTrigger> {
        self.state.read().await.active_trigger().copied()
    }
}
