use super::notify::{emit_cue, NotificationSink};
use super::result::RehearsalResult;
use super::scoring::ScoringService;
use super::session::{RehearsalSession, ScoringTicket, SessionSnapshot, SessionState};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Drives a `RehearsalSession` in real time
///
/// Owns the periodic tick task (created when recording starts or resumes,
/// aborted on pause, finish and reset) and the analysis task spawned when the
/// recording ceiling forces a finish. Cloning yields another handle to the same
/// session.
#[derive(Clone)]
pub struct RehearsalRunner {
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    /// The state machine itself
    session: Mutex<RehearsalSession>,

    /// Cue emitter for threshold crossings
    sink: Arc<dyn NotificationSink>,

    /// Produces the final metrics
    scorer: Arc<dyn ScoringService>,

    /// Handle for the 1 Hz tick task
    tick_task: Mutex<Option<JoinHandle<()>>>,

    /// Handle for an analysis started by the recording ceiling
    analysis_task: Mutex<Option<JoinHandle<()>>>,

    /// Follow-up pulses of multi-pulse cues still being delivered
    cue_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Last caller interaction or completed analysis
    last_activity: Mutex<Instant>,
}

impl RehearsalRunner {
    pub fn new(
        session: RehearsalSession,
        sink: Arc<dyn NotificationSink>,
        scorer: Arc<dyn ScoringService>,
    ) -> Self {
        Self {
            inner: Arc::new(RunnerInner {
                session: Mutex::new(session),
                sink,
                scorer,
                tick_task: Mutex::new(None),
                analysis_task: Mutex::new(None),
                cue_tasks: Mutex::new(Vec::new()),
                last_activity: Mutex::new(Instant::now()),
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.inner.session.lock().await.state()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let snapshot = self.inner.session.lock().await.snapshot();
        self.inner.touch().await;
        snapshot
    }

    /// True when nothing is running and the session has been left alone for `ttl`
    ///
    /// A ticking recording or an analysis still in flight is never idle. A
    /// paused recording or a failed analysis is.
    pub async fn is_idle(&self, ttl: Duration) -> bool {
        let busy = {
            let session = self.inner.session.lock().await;
            session.is_ticking()
                || (session.state() == SessionState::Analyzing
                    && session.scoring_error().is_none())
        };
        !busy && self.inner.last_activity.lock().await.elapsed() >= ttl
    }

    /// Setup -> Recording, starting the tick task
    pub async fn start(&self) -> SessionState {
        self.inner.touch().await;
        let state = {
            let mut session = self.inner.session.lock().await;
            let before = session.state();
            let after = session.start();
            if before == SessionState::Setup && after == SessionState::Recording {
                Some(after)
            } else {
                None
            }
        };

        match state {
            Some(state) => {
                self.spawn_ticker().await;
                state
            }
            None => self.state().await,
        }
    }

    /// Freeze the clock
    pub async fn pause(&self) -> SessionState {
        self.inner.touch().await;
        let state = self.inner.session.lock().await.pause();
        self.stop_ticker().await;
        state
    }

    /// Continue ticking from the frozen elapsed time
    pub async fn resume(&self) -> SessionState {
        self.inner.touch().await;
        let ticking = {
            let mut session = self.inner.session.lock().await;
            session.resume();
            session.is_ticking()
        };

        if ticking {
            self.spawn_ticker().await;
        }
        self.state().await
    }

    /// Recording -> Analyzing -> Complete
    ///
    /// Awaits the scoring service. Returns `Ok(None)` when the session was not
    /// recording, or when it was reset while the analysis was in flight and the
    /// result was discarded. Scoring errors are returned to the caller and the
    /// session remains in Analyzing.
    pub async fn finish(&self) -> Result<Option<RehearsalResult>> {
        self.inner.touch().await;
        let ticket = self.inner.session.lock().await.finish();
        self.stop_ticker().await;

        match ticket {
            Some(ticket) => self.inner.analyze(ticket).await,
            None => Ok(None),
        }
    }

    /// Any -> Setup; cancels ticking, pending cue pulses and any pending analysis
    pub async fn reset(&self) -> SessionState {
        self.inner.touch().await;
        let state = self.inner.session.lock().await.reset();
        self.abort_background().await;
        state
    }

    /// Abort every background task owned by this runner
    pub async fn shutdown(&self) {
        self.abort_background().await;
    }

    async fn abort_background(&self) {
        self.stop_ticker().await;
        for task in self.inner.cue_tasks.lock().await.drain(..) {
            task.abort();
        }
        if let Some(task) = self.inner.analysis_task.lock().await.take() {
            task.abort();
        }
    }

    async fn spawn_ticker(&self) {
        let inner = Arc::clone(&self.inner);
        let (period, spacing) = {
            let session = self.inner.session.lock().await;
            (session.config().tick_interval, session.config().pulse_spacing)
        };

        let task = tokio::spawn(async move {
            debug!("Tick task started");

            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let outcome = {
                    let mut session = inner.session.lock().await;
                    let outcome = session.tick();

                    // Registered under the session lock so a reset cannot miss them
                    if !outcome.crossed.is_empty() {
                        let mut cues = inner.cue_tasks.lock().await;
                        cues.retain(|task| !task.is_finished());
                        for event in &outcome.crossed {
                            let pending =
                                emit_cue(&inner.sink, *event, outcome.elapsed_secs, spacing);
                            cues.extend(pending);
                        }
                    }
                    outcome
                };

                if let Some(ticket) = outcome.scoring {
                    RunnerInner::spawn_analysis(&inner, ticket).await;
                    break;
                }
            }

            debug!("Tick task stopped");
        });

        let mut handle = self.inner.tick_task.lock().await;
        if let Some(previous) = handle.replace(task) {
            previous.abort();
        }
    }

    async fn stop_ticker(&self) {
        if let Some(task) = self.inner.tick_task.lock().await.take() {
            task.abort();
        }
    }
}

impl RunnerInner {
    async fn touch(&self) {
        *self.last_activity.lock().await = Instant::now();
    }

    async fn analyze(&self, ticket: ScoringTicket) -> Result<Option<RehearsalResult>> {
        let generation = ticket.generation;

        match self.scorer.analyze(&ticket.script, ticket.elapsed_secs).await {
            Ok(result) => {
                let completed = self.session.lock().await.complete(generation, result.clone());
                self.touch().await;
                Ok(completed.then_some(result))
            }
            Err(e) => {
                error!("Rehearsal analysis failed: {:#}", e);
                self.session.lock().await.fail(generation, format!("{:#}", e));
                Err(e.context("Rehearsal analysis failed"))
            }
        }
    }

    async fn spawn_analysis(inner: &Arc<RunnerInner>, ticket: ScoringTicket) {
        let task_inner = Arc::clone(inner);
        let task = tokio::spawn(async move {
            // Failures are recorded on the session for the next snapshot
            if let Ok(Some(result)) = task_inner.analyze(ticket).await {
                info!("Automatic analysis finished with score {}", result.overall_score);
            }
        });

        let mut handle = inner.analysis_task.lock().await;
        if let Some(previous) = handle.replace(task) {
            previous.abort();
        }
    }
}
