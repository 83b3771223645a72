//! Check request controller: the submit/result state machine.
//!
//! The controller owns the only mutable state of a check session. Callers
//! drive it with [`CheckRequestController::submit`] and read it back with
//! [`CheckRequestController::state`] and
//! [`CheckRequestController::last_result`].

use crate::backend::AnalysisBackend;
use crate::error::{CheckError, Result};
use crate::score::RiskBand;
use crate::types::{CheckRequest, CheckResult};
use crate::validator::InputValidator;
use icu_core::InputKind;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Default bound on a single analysis request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Observable state of a controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckState {
    /// No check has run yet
    #[default]
    Idle,
    /// A check is in flight
    Submitting,
    /// The latest check succeeded
    Succeeded(CheckResult),
    /// The latest check failed
    Failed(CheckError),
}

impl CheckState {
    /// Whether a check is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Result held by a `Succeeded` state.
    #[must_use]
    pub fn result(&self) -> Option<&CheckResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Error held by a `Failed` state.
    #[must_use]
    pub fn error(&self) -> Option<&CheckError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a call to [`CheckRequestController::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The check ran and succeeded
    Completed(CheckResult),
    /// Another check was in flight; nothing was sent
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct Inner {
    state: CheckState,
    last_result: Option<CheckResult>,
}

/// Coordinates check submission, in-flight tracking and result storage.
///
/// At most one analysis request is in flight per controller. Calls made while
/// one is running are dropped, not queued.
pub struct CheckRequestController {
    backend: Arc<dyn AnalysisBackend>,
    validator: InputValidator,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl CheckRequestController {
    /// Create an idle controller with the minimal validator and default timeout.
    #[must_use]
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            validator: InputValidator::new(),
            timeout: DEFAULT_TIMEOUT,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Set the validator applied before each submission.
    #[must_use]
    pub fn with_validator(mut self, validator: InputValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the bound on each analysis request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CheckState {
        self.lock().state.clone()
    }

    /// Whether a check is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.lock().state.is_submitting()
    }

    /// Most recent successful result.
    ///
    /// Survives later failures; only a new successful check replaces it.
    #[must_use]
    pub fn last_result(&self) -> Option<CheckResult> {
        self.lock().last_result.clone()
    }

    /// Risk band of the current `Succeeded` result.
    #[must_use]
    pub fn risk_band(&self) -> Option<RiskBand> {
        self.lock().state.result().map(CheckResult::risk_band)
    }

    /// Validate the input and run one check against the analysis service.
    ///
    /// - While a check is in flight this is a no-op returning
    ///   [`SubmitOutcome::AlreadyInFlight`].
    /// - Validation errors leave the state untouched and never reach the network.
    /// - Otherwise the state moves to `Submitting`, then to `Succeeded` or
    ///   `Failed` once the service answers or the timeout elapses.
    ///
    /// # Errors
    /// Returns the validation error, or the failure now held in
    /// [`CheckState::Failed`].
    pub async fn submit(&self, kind: InputKind, raw: &str) -> Result<SubmitOutcome> {
        let Some(flight) = self.begin(kind, raw)? else {
            tracing::warn!("Ignoring {} check: another check is already in flight", kind);
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        tracing::debug!(
            "Submitting {} check via {} backend",
            kind,
            self.backend.backend_id()
        );

        let outcome = self.run(flight.request()).await;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Privacy check completed for {}: score {} ({})",
                    kind,
                    result.score(),
                    result.risk_band()
                );
                flight.succeed(result.clone());
                Ok(SubmitOutcome::Completed(result))
            }
            Err(err) => {
                tracing::warn!("Privacy check failed for {}: {}", kind, err);
                flight.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Atomically check the guard, validate and enter `Submitting`.
    fn begin(&self, kind: InputKind, raw: &str) -> Result<Option<InFlight<'_>>> {
        let mut inner = self.lock();
        if inner.state.is_submitting() {
            return Ok(None);
        }

        let request = self.validator.request(kind, raw)?;
        let previous = std::mem::replace(&mut inner.state, CheckState::Submitting);

        Ok(Some(InFlight {
            controller: self,
            request,
            previous: Some(previous),
        }))
    }

    async fn run(&self, request: &CheckRequest) -> Result<CheckResult> {
        let response = tokio::time::timeout(self.timeout, self.backend.check(request))
            .await
            .map_err(|_| CheckError::Timeout {
                after: self.timeout,
            })??;

        Ok(CheckResult::try_from(response)?)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Guard for a check in flight.
///
/// Dropping it without resolving (the `submit` future was dropped) puts back
/// the state that preceded the submit.
struct InFlight<'a> {
    controller: &'a CheckRequestController,
    request: CheckRequest,
    previous: Option<CheckState>,
}

impl InFlight<'_> {
    fn request(&self) -> &CheckRequest {
        &self.request
    }

    fn succeed(mut self, result: CheckResult) {
        self.previous = None;
        let mut inner = self.controller.lock();
        inner.last_result = Some(result.clone());
        inner.state = CheckState::Succeeded(result);
    }

    fn fail(mut self, err: CheckError) {
        self.previous = None;
        self.controller.lock().state = CheckState::Failed(err);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            tracing::warn!(
                "{} check abandoned before completion, restoring previous state",
                self.request.kind()
            );
            self.controller.lock().state = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CheckResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    // Mock backend for testing
    struct MockBackend {
        calls: AtomicUsize,
        seen: Mutex<Vec<CheckRequest>>,
        responses: Mutex<VecDeque<Result<CheckResponse>>>,
        gate: Option<Arc<Notify>>,
    }

    impl MockBackend {
        fn new(responses: Vec<Result<CheckResponse>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
                gate: None,
            }
        }

        fn gated(gate: Arc<Notify>, responses: Vec<Result<CheckResponse>>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(responses)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisBackend for MockBackend {
        async fn check(&self, request: &CheckRequest) -> Result<CheckResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CheckError::Internal("no response queued".to_string())))
        }

        fn backend_id(&self) -> &str {
            "mock"
        }
    }

    fn response(score: i64) -> CheckResponse {
        CheckResponse {
            score,
            holehe: Some(vec!["twitter".to_string()]),
            summary: format!("score {score}"),
            ..CheckResponse::default()
        }
    }

    async fn wait_until_submitting(controller: &CheckRequestController) {
        while !controller.is_submitting() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let controller = CheckRequestController::new(Arc::new(MockBackend::new(vec![])));
        assert_eq!(controller.state(), CheckState::Idle);
        assert!(controller.last_result().is_none());
        assert!(controller.risk_band().is_none());
    }

    #[tokio::test]
    async fn test_successful_submit() {
        let backend = Arc::new(MockBackend::new(vec![Ok(response(45))]));
        let controller = CheckRequestController::new(backend.clone());

        let outcome = controller
            .submit(InputKind::Email, "  test@example.com ")
            .await
            .unwrap();

        let SubmitOutcome::Completed(result) = outcome else {
            panic!("expected a completed check");
        };
        assert_eq!(result.score(), 45);
        assert_eq!(result.holehe(), Some(&["twitter".to_string()][..]));
        assert_eq!(controller.state(), CheckState::Succeeded(result.clone()));
        assert_eq!(controller.risk_band(), Some(RiskBand::Medium));
        assert_eq!(controller.last_result(), Some(result));

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].value(), "test@example.com");
        assert_eq!(seen[0].kind(), InputKind::Email);
    }

    #[tokio::test]
    async fn test_empty_input_never_reaches_backend() {
        let backend = Arc::new(MockBackend::new(vec![Ok(response(10))]));
        let controller = CheckRequestController::new(backend.clone());

        let err = controller.submit(InputKind::Email, "   ").await.unwrap_err();
        assert_eq!(
            err,
            CheckError::EmptyInput {
                kind: InputKind::Email
            }
        );
        assert_eq!(backend.calls(), 0);
        assert_eq!(controller.state(), CheckState::Idle);
    }

    #[tokio::test]
    async fn test_empty_input_keeps_previous_success() {
        let backend = Arc::new(MockBackend::new(vec![Ok(response(80))]));
        let controller = CheckRequestController::new(backend.clone());
        controller.submit(InputKind::Domain, "example.com").await.unwrap();

        assert!(controller.submit(InputKind::Domain, "").await.is_err());
        assert!(matches!(controller.state(), CheckState::Succeeded(_)));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_strict_validator_blocks_bad_syntax() {
        let backend = Arc::new(MockBackend::new(vec![]));
        let controller =
            CheckRequestController::new(backend.clone()).with_validator(InputValidator::strict());

        let err = controller.submit(InputKind::Email, "nope").await.unwrap_err();
        assert!(matches!(err, CheckError::InvalidFormat { .. }));
        assert_eq!(backend.calls(), 0);
        assert_eq!(controller.state(), CheckState::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_dropped() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(MockBackend::gated(gate.clone(), vec![Ok(response(45))]));
        let controller = Arc::new(CheckRequestController::new(backend.clone()));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit(InputKind::Email, "test@example.com").await }
        });
        wait_until_submitting(&controller).await;

        let second = controller
            .submit(InputKind::Username, "someone")
            .await
            .unwrap();
        assert_eq!(second, SubmitOutcome::AlreadyInFlight);
        assert_eq!(backend.calls(), 1);
        assert_eq!(controller.state(), CheckState::Submitting);

        // Blank input is ignored too, not reported, while a check is running
        let blank = controller.submit(InputKind::Email, "").await.unwrap();
        assert_eq!(blank, SubmitOutcome::AlreadyInFlight);

        gate.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, SubmitOutcome::Completed(_)));
        assert_eq!(backend.calls(), 1);
        assert!(matches!(controller.state(), CheckState::Succeeded(_)));
    }

    #[tokio::test]
    async fn test_failure_then_retry_is_accepted() {
        let backend = Arc::new(MockBackend::new(vec![
            Err(CheckError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
            Ok(response(12)),
        ]));
        let controller = CheckRequestController::new(backend.clone());

        let err = controller.submit(InputKind::Email, "a@b.com").await.unwrap_err();
        assert!(matches!(err, CheckError::Api { status: 500, .. }));
        assert_eq!(controller.state(), CheckState::Failed(err));

        let outcome = controller.submit(InputKind::Email, "a@b.com").await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(backend.calls(), 2);
        assert_eq!(controller.risk_band(), Some(RiskBand::Low));
    }

    #[tokio::test]
    async fn test_failure_keeps_last_result_available() {
        let backend = Arc::new(MockBackend::new(vec![
            Ok(response(65)),
            Err(CheckError::Network("connection refused".to_string())),
        ]));
        let controller = CheckRequestController::new(backend);

        controller.submit(InputKind::Username, "octocat").await.unwrap();
        assert!(controller.submit(InputKind::Username, "octocat").await.is_err());

        assert!(matches!(controller.state(), CheckState::Failed(CheckError::Network(_))));
        assert!(controller.risk_band().is_none());
        assert_eq!(controller.last_result().map(|r| r.score()), Some(65));
    }

    #[tokio::test]
    async fn test_new_success_replaces_result() {
        let backend = Arc::new(MockBackend::new(vec![Ok(response(65)), Ok(response(5))]));
        let controller = CheckRequestController::new(backend);

        controller.submit(InputKind::Username, "octocat").await.unwrap();
        controller.submit(InputKind::Username, "hubot").await.unwrap();

        assert_eq!(controller.last_result().map(|r| r.score()), Some(5));
        assert_eq!(controller.state().result().map(CheckResult::score), Some(5));
    }

    #[tokio::test]
    async fn test_out_of_range_score_fails_request() {
        let backend = Arc::new(MockBackend::new(vec![Ok(response(140))]));
        let controller = CheckRequestController::new(backend);

        let err = controller.submit(InputKind::Domain, "example.com").await.unwrap_err();
        assert!(matches!(err, CheckError::ScoreOutOfRange(_)));
        assert!(matches!(controller.state(), CheckState::Failed(_)));
        assert!(controller.last_result().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_request() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(MockBackend::gated(gate, vec![Ok(response(45))]));
        let controller = CheckRequestController::new(backend).with_timeout(DEFAULT_TIMEOUT);

        let err = controller.submit(InputKind::Email, "a@b.com").await.unwrap_err();
        assert_eq!(
            err,
            CheckError::Timeout {
                after: DEFAULT_TIMEOUT
            }
        );
        assert!(err.is_timeout());
        assert!(!controller.is_submitting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_second_timeout_keeps_precision() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(MockBackend::gated(gate, vec![Ok(response(45))]));
        let controller =
            CheckRequestController::new(backend).with_timeout(Duration::from_millis(500));

        let err = controller.submit(InputKind::Domain, "example.com").await.unwrap_err();
        assert_eq!(
            err,
            CheckError::Timeout {
                after: Duration::from_millis(500)
            }
        );
        assert_eq!(err.to_string(), "privacy check timed out after 500ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_restores_previous_state() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(MockBackend::gated(gate, vec![]));
        let controller = CheckRequestController::new(backend);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            controller.submit(InputKind::Email, "a@b.com"),
        )
        .await;

        assert!(abandoned.is_err());
        assert_eq!(controller.state(), CheckState::Idle);
    }
}
