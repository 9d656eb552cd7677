use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::services::booking_flow::BookingController;
use crate::services::scheduling::SchedulingBackend;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Arc<dyn SchedulingBackend>,
    pub flows: FlowSessions,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn SchedulingBackend>) -> Self {
        let flows = FlowSessions::new(config.flow_idle_timeout);
        Self {
            config,
            backend,
            flows,
        }
    }
}

struct Session {
    controller: Arc<BookingController>,
    last_activity: Instant,
}

/// Live booking flows keyed by session id. Nothing here outlives the process.
pub struct FlowSessions {
    idle_timeout: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl FlowSessions {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new flow, dropping any that have gone idle.
    pub fn insert(&self, controller: Arc<BookingController>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();

        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_activity) < self.idle_timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::info!(pruned, "dropped idle booking flows");
        }

        sessions.insert(
            id.clone(),
            Session {
                controller,
                last_activity: now,
            },
        );
        id
    }

    /// Looks up a flow and marks it active.
    pub fn get(&self, id: &str) -> Option<Arc<BookingController>> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id)?;
        session.last_activity = Instant::now();
        Some(Arc::clone(&session.controller))
    }

    pub fn remove(&self, id: &str) -> bool {
        self.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
