use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::backend::OptimizerBackend;
use crate::catalog;
use crate::error::OptimizeError;
use crate::selection::Selection;
use crate::types::{OptimizationResult, OptimizeRequest};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded(OptimizationResult),
    Failed(String),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            RequestState::Succeeded(r) => Some(r),
            _ => None,
        }
    }

    /// Pure lifecycle step. Triggers while in flight and settlements that
    /// arrive outside a request leave the state untouched.
    pub fn transition(self, event: Event) -> (RequestState, Effect) {
        match (self, event) {
            (RequestState::InFlight, Event::Trigger) => (RequestState::InFlight, Effect::None),
            (_, Event::Trigger) => (RequestState::InFlight, Effect::Dispatch),
            (RequestState::InFlight, Event::Settled(Ok(result))) => {
                (RequestState::Succeeded(result), Effect::None)
            }
            (RequestState::InFlight, Event::Settled(Err(e))) => {
                (RequestState::Failed(e.user_message().to_string()), Effect::None)
            }
            (state, Event::Settled(_)) => (state, Effect::None),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Trigger,
    Settled(Result<OptimizationResult, OptimizeError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Dispatch,
}

// ---------- Controller ----------

pub struct OptimizationController<B> {
    backend: Arc<B>,
    state: Arc<Mutex<RequestState>>,
    settled: Arc<Notify>,
}

impl<B> Clone for OptimizationController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
            settled: self.settled.clone(),
        }
    }
}

impl<B: OptimizerBackend> OptimizationController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            state: Arc::new(Mutex::new(RequestState::Idle)),
            settled: Arc::new(Notify::new()),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state.lock().clone()
    }

    fn apply(&self, event: Event) -> Effect {
        let mut state = self.state.lock();
        let current = std::mem::take(&mut *state);
        let (next, effect) = current.transition(event);
        *state = next;
        effect
    }

    /// Starts a request for `selection` unless one is already outstanding.
    /// Returns whether a request was started. Must be called inside a tokio
    /// runtime; the outcome lands in [`state`](Self::state).
    pub fn optimize(&self, selection: &Selection) -> bool {
        if self.apply(Event::Trigger) != Effect::Dispatch {
            tracing::debug!("optimize ignored: a request is already in flight");
            return false;
        }

        let driver = match catalog::lookup_driver(&selection.driver_id) {
            Ok(d) => d,
            Err(e) => {
                self.settle(Err(e.into()));
                return true;
            }
        };

        let request = OptimizeRequest {
            driver: driver.display_name.to_string(),
            track: selection.circuit.name.to_string(),
        };
        tracing::info!("optimizing driver={} track={}", request.driver, request.track);

        let this = self.clone();
        tokio::spawn(async move {
            let call = this.backend.optimize(request);
            let outcome = match AssertUnwindSafe(call).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => Err(OptimizeError::Transport("optimizer call panicked".to_string())),
            };
            this.settle(outcome);
        });
        true
    }

    fn settle(&self, outcome: Result<OptimizationResult, OptimizeError>) {
        match &outcome {
            Ok(r) => tracing::info!(
                "optimization done: best={:.2}s stints={} alternatives={}",
                r.best.total_time_s,
                r.best.stints.len(),
                r.alternatives.len()
            ),
            Err(e) => tracing::error!("optimization failed ({}): {}", e.kind(), e),
        }
        self.apply(Event::Settled(outcome));
        self.settled.notify_waiters();
    }

    /// Resolves with the current state as soon as nothing is in flight.
    pub async fn wait_settled(&self) -> RequestState {
        loop {
            let notified = self.settled.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let state = self.state();
            if !state.is_in_flight() {
                return state;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NotFoundError, FAILURE_REASON};
    use crate::types::{Compound, Stint, Strategy};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn one_stop() -> OptimizationResult {
        OptimizationResult {
            best: Strategy {
                stints: vec![Stint::new(Compound::Soft, 20), Stint::new(Compound::Hard, 37)],
                total_time_s: 5301.12,
            },
            alternatives: vec![],
            driver_pace_delta: None,
            track_laps: Some(57),
            safety_car_periods: vec![],
        }
    }

    struct FakeBackend {
        calls: AtomicUsize,
        requests: Mutex<Vec<OptimizeRequest>>,
        gate: Notify,
        outcome: Result<OptimizationResult, OptimizeError>,
        explode: bool,
    }

    impl FakeBackend {
        fn new(outcome: Result<OptimizationResult, OptimizeError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                gate: Notify::new(),
                outcome,
                explode: false,
            }
        }
    }

    impl OptimizerBackend for Arc<FakeBackend> {
        async fn optimize(
            &self,
            request: OptimizeRequest,
        ) -> Result<OptimizationResult, OptimizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().push(request);
            if self.explode {
                panic!("optimizer exploded");
            }
            self.gate.notified().await;
            self.outcome.clone()
        }
    }

    #[test]
    fn transition_table() {
        let (s, e) = RequestState::Idle.transition(Event::Trigger);
        assert_eq!((s, e), (RequestState::InFlight, Effect::Dispatch));

        let (s, e) = RequestState::InFlight.transition(Event::Trigger);
        assert_eq!((s, e), (RequestState::InFlight, Effect::None));

        let (s, e) = RequestState::InFlight.transition(Event::Settled(Ok(one_stop())));
        assert_eq!((s, e), (RequestState::Succeeded(one_stop()), Effect::None));

        let (s, _) = RequestState::InFlight
            .transition(Event::Settled(Err(OptimizeError::Transport("reset".into()))));
        assert_eq!(s, RequestState::Failed(FAILURE_REASON.to_string()));

        // A new trigger clears the previous result.
        let (s, e) = RequestState::Succeeded(one_stop()).transition(Event::Trigger);
        assert_eq!((s, e), (RequestState::InFlight, Effect::Dispatch));
        let (s, e) = RequestState::Failed("x".into()).transition(Event::Trigger);
        assert_eq!((s, e), (RequestState::InFlight, Effect::Dispatch));

        let (s, _) = RequestState::Idle.transition(Event::Settled(Ok(one_stop())));
        assert_eq!(s, RequestState::Idle);
    }

    #[tokio::test]
    async fn second_trigger_while_in_flight_is_ignored() {
        let backend = Arc::new(FakeBackend::new(Ok(one_stop())));
        let controller = OptimizationController::new(backend.clone());

        let first = Selection { driver_id: "HAM".into(), ..Selection::default() };
        let second = Selection {
            circuit: catalog::lookup_circuit("Monaco").unwrap(),
            ..Selection::default()
        };

        assert!(controller.optimize(&first));
        assert_eq!(controller.state(), RequestState::InFlight);
        assert!(!controller.optimize(&second));

        backend.gate.notify_one();
        let state = controller.wait_settled().await;

        assert_eq!(state, RequestState::Succeeded(one_stop()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            backend.requests.lock()[0],
            OptimizeRequest { driver: "Lewis Hamilton".into(), track: "Bahrain".into() }
        );
    }

    #[tokio::test]
    async fn unknown_driver_fails_without_calling_backend() {
        let backend = Arc::new(FakeBackend::new(Ok(one_stop())));
        let controller = OptimizationController::new(backend.clone());

        let selection = Selection { driver_id: "XXX".into(), ..Selection::default() };
        assert!(controller.optimize(&selection));

        assert_eq!(controller.state(), RequestState::Failed(FAILURE_REASON.to_string()));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_error_settles_as_generic_failure() {
        let backend = Arc::new(FakeBackend::new(Err(OptimizeError::Backend {
            status: 502,
            body: "upstream model crashed".into(),
        })));
        let controller = OptimizationController::new(backend.clone());

        controller.optimize(&Selection::default());
        backend.gate.notify_one();
        let state = controller.wait_settled().await;

        assert_eq!(state, RequestState::Failed(FAILURE_REASON.to_string()));
        assert!(state.result().is_none());
    }

    #[tokio::test]
    async fn panicking_backend_never_leaves_request_in_flight() {
        let mut fake = FakeBackend::new(Ok(one_stop()));
        fake.explode = true;
        let controller = OptimizationController::new(Arc::new(fake));

        controller.optimize(&Selection::default());
        let state = controller.wait_settled().await;
        assert_eq!(state, RequestState::Failed(FAILURE_REASON.to_string()));

        // Still usable afterwards.
        assert!(controller.optimize(&Selection::default()));
    }

    #[tokio::test]
    async fn wait_settled_returns_immediately_when_idle() {
        let controller = OptimizationController::new(Arc::new(FakeBackend::new(Err(
            NotFoundError { kind: "driver", key: "n/a".into() }.into(),
        ))));
        assert_eq!(controller.wait_settled().await, RequestState::Idle);
    }
}
