use campus_leads::catalog::{Catalog, IntakeCalendar};
use campus_leads::config::SessionConfig;
use campus_leads::error::AppError;
use campus_leads::leads::{IntakeGateway, LeadFormSession, MemorySink, SubmissionStatus};
use chrono::Local;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

const SWEEP_CEILING: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Form session plus the sink holding its latest brochure download.
#[derive(Debug, Clone)]
pub(crate) struct SessionEntry {
    pub(crate) session: Arc<LeadFormSession>,
    pub(crate) brochures: Arc<MemorySink>,
}

#[derive(Debug)]
struct TrackedSession {
    entry: SessionEntry,
    last_seen: Instant,
}

impl TrackedSession {
    fn expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.duration_since(self.last_seen) >= idle_timeout
            && self.entry.session.status() != SubmissionStatus::Submitting
    }
}

/// Catalog, intake gateway and the live form sessions served over HTTP.
///
/// Sessions are keyed by random ids, expire after `idle_timeout` without a request,
/// and are capped at `max_open`.
#[derive(Debug, Clone)]
pub(crate) struct LeadDesk {
    pub(crate) catalog: Catalog,
    gateway: Arc<dyn IntakeGateway>,
    status_reset: Duration,
    limits: SessionConfig,
    sessions: Arc<Mutex<HashMap<String, TrackedSession>>>,
}

impl LeadDesk {
    pub(crate) fn new(
        catalog: Catalog,
        gateway: Arc<dyn IntakeGateway>,
        status_reset: Duration,
        limits: SessionConfig,
    ) -> Self {
        Self {
            catalog,
            gateway,
            status_reset,
            limits,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn calendar(&self) -> IntakeCalendar {
        IntakeCalendar::for_date(Local::now().date_naive())
    }

    pub(crate) fn open_session(&self, slug: &str) -> Result<(String, SessionEntry), AppError> {
        let institution = self.catalog.get(slug)?;
        let now = Instant::now();

        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        let evicted = self.evict_idle(&mut sessions, now);
        if sessions.len() >= self.limits.max_open {
            drop(sessions);
            close_all(evicted);
            return Err(AppError::SessionLimit(self.limits.max_open));
        }

        let brochures = Arc::new(MemorySink::default());
        let session = LeadFormSession::new(
            institution,
            self.calendar(),
            self.status_reset,
            Arc::clone(&self.gateway),
            brochures.clone(),
        );
        let entry = SessionEntry {
            session: Arc::new(session),
            brochures,
        };

        let id = Uuid::new_v4().to_string();
        sessions.insert(
            id.clone(),
            TrackedSession {
                entry: entry.clone(),
                last_seen: now,
            },
        );
        drop(sessions);
        close_all(evicted);

        debug!(%id, %slug, "form session opened");
        Ok((id, entry))
    }

    /// Looks up a live session and marks it as used.
    pub(crate) fn session(&self, id: &str) -> Result<SessionEntry, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().expect("session registry poisoned");

        let expired = match sessions.get_mut(id) {
            Some(tracked) if !tracked.expired(now, self.limits.idle_timeout) => {
                tracked.last_seen = now;
                return Ok(tracked.entry.clone());
            }
            Some(_) => true,
            None => false,
        };
        let stale = if expired { sessions.remove(id) } else { None };
        drop(sessions);

        if let Some(tracked) = stale {
            tracked.entry.session.close();
            debug!(%id, "form session expired");
        }
        Err(AppError::UnknownSession(id.to_string()))
    }

    pub(crate) fn close_session(&self, id: &str) -> Result<(), AppError> {
        let tracked = self
            .sessions
            .lock()
            .expect("session registry poisoned")
            .remove(id)
            .ok_or_else(|| AppError::UnknownSession(id.to_string()))?;
        tracked.entry.session.close();
        debug!(%id, remaining = self.open_sessions(), "form session closed");
        Ok(())
    }

    pub(crate) fn open_sessions(&self) -> usize {
        self.sessions.lock().expect("session registry poisoned").len()
    }

    /// Closes and forgets sessions idle for longer than the configured timeout.
    pub(crate) fn sweep_idle(&self) -> usize {
        let evicted = {
            let mut sessions = self.sessions.lock().expect("session registry poisoned");
            self.evict_idle(&mut sessions, Instant::now())
        };
        let count = evicted.len();
        close_all(evicted);

        if count > 0 {
            info!(expired = count, remaining = self.open_sessions(), "idle form sessions swept");
        }
        count
    }

    /// Runs [`LeadDesk::sweep_idle`] periodically until the returned task is aborted.
    pub(crate) fn spawn_sweeper(&self) -> JoinHandle<()> {
        let desk = self.clone();
        let period = (self.limits.idle_timeout / 4).clamp(Duration::from_secs(1), SWEEP_CEILING);

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(period);
            loop {
                ticks.tick().await;
                desk.sweep_idle();
            }
        })
    }

    fn evict_idle(
        &self,
        sessions: &mut HashMap<String, TrackedSession>,
        now: Instant,
    ) -> Vec<SessionEntry> {
        let idle_timeout = self.limits.idle_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, tracked)| tracked.expired(now, idle_timeout))
            .map(|(id, _)| id.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|id| sessions.remove(&id))
            .map(|tracked| tracked.entry)
            .collect()
    }
}

fn close_all(entries: Vec<SessionEntry>) {
    for entry in entries {
        entry.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_leads::config::IntakeEndpoint;
    use campus_leads::leads::HttpIntakeGateway;

    const IDLE: Duration = Duration::from_secs(60);

    fn desk(max_open: usize) -> LeadDesk {
        let gateway = HttpIntakeGateway::new(IntakeEndpoint::Unconfigured, Duration::from_secs(1))
            .expect("client builds");
        LeadDesk::new(
            Catalog::standard(),
            Arc::new(gateway),
            Duration::from_secs(5),
            SessionConfig {
                idle_timeout: IDLE,
                max_open,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn session_ids_are_random_uuids() {
        let desk = desk(10);
        let (first, _) = desk.open_session("apex-university").expect("opens");
        let (second, _) = desk.open_session("apex-university").expect("opens");

        assert_ne!(first, second);
        for id in [&first, &second] {
            let parsed = Uuid::parse_str(id).expect("id is a uuid");
            assert_eq!(parsed.get_version_num(), 4);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_swept_and_closed() {
        let desk = desk(10);
        let (kept, _) = desk.open_session("apex-university").expect("opens");
        let (_, dropped) = desk.open_session("stellar-arts-university").expect("opens");
        desk.open_session("apex-university").expect("opens");

        tokio::time::sleep(Duration::from_secs(30)).await;
        desk.session(&kept).expect("still live");
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(desk.sweep_idle(), 2);
        assert_eq!(desk.open_sessions(), 1);
        assert!(dropped.session.is_closed());
        assert!(desk.session(&kept).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_is_unknown_before_any_sweep() {
        let desk = desk(10);
        let (id, entry) = desk.open_session("apex-university").expect("opens");

        tokio::time::sleep(IDLE).await;

        assert!(matches!(desk.session(&id), Err(AppError::UnknownSession(_))));
        assert!(entry.session.is_closed());
        assert_eq!(desk.open_sessions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn open_sessions_are_capped() {
        let desk = desk(2);
        let (first, _) = desk.open_session("apex-university").expect("opens");
        desk.open_session("apex-university").expect("opens");

        assert!(matches!(
            desk.open_session("apex-university"),
            Err(AppError::SessionLimit(2))
        ));

        desk.close_session(&first).expect("closes");
        desk.open_session("apex-university").expect("room after close");

        tokio::time::sleep(IDLE).await;
        desk.open_session("apex-university").expect("idle sessions make room");
        assert_eq!(desk.open_sessions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_shrinks_the_registry() {
        let desk = desk(2_000);
        for _ in 0..1_000 {
            desk.open_session("apex-university").expect("opens");
        }
        let sweeper = desk.spawn_sweeper();

        tokio::time::sleep(IDLE + Duration::from_secs(30)).await;

        assert_eq!(desk.open_sessions(), 0);
        sweeper.abort();
    }
}
