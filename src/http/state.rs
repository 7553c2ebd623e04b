use crate::config::RehearsalDefaults;
use crate::rehearsal::{
    MockScoringService, NotificationSink, RehearsalRunner, ScoringService, TracingSink,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Live rehearsals (rehearsal_id → runner)
    pub sessions: Arc<RwLock<HashMap<String, RehearsalRunner>>>,

    /// Settings applied to newly created rehearsals
    pub defaults: RehearsalDefaults,

    /// Analysis backend shared by every rehearsal
    pub scorer: Arc<dyn ScoringService>,

    /// Cue emitter shared by every rehearsal
    pub sink: Arc<dyn NotificationSink>,
}

impl AppState {
    pub fn new(
        defaults: RehearsalDefaults,
        scorer: Arc<dyn ScoringService>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            defaults,
            scorer,
            sink,
        }
    }
}

impl AppState {
    /// Remove rehearsals that have been idle for at least `ttl`
    ///
    /// Removed runners are shut down. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let evicted: Vec<(String, RehearsalRunner)> = {
            let mut sessions = self.sessions.write().await;
            let mut idle = Vec::new();
            for (id, runner) in sessions.iter() {
                if runner.is_idle(ttl).await {
                    idle.push(id.clone());
                }
            }
            idle.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|runner| (id, runner)))
                .collect()
        };

        for (id, runner) in &evicted {
            runner.shutdown().await;
            info!("Evicted idle rehearsal {}", id);
        }

        evicted.len()
    }

    /// Run `evict_idle` every `period` until the returned task is aborted
    pub fn spawn_eviction(&self, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let state = self.clone();

        tokio::spawn(async move {
            debug!("Idle rehearsal sweep every {:?} (ttl {:?})", period, ttl);

            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let evicted = state.evict_idle(ttl).await;
                if evicted > 0 {
                    debug!("Idle sweep removed {} rehearsal(s)", evicted);
                }
            }
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            RehearsalDefaults::default(),
            Arc::new(MockScoringService::default()),
            Arc::new(TracingSink),
        )
    }
}
