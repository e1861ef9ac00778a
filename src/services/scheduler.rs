//! Refresh Scheduler
//!
//! Owns the repeating refresh timer and the last-refresh timestamp. Every tick
//! dispatches to the strategy registered for the page type; a strategy error
//! is logged and swallowed so later ticks still run. Panics are caught the
//! same way only in unwinding builds: the release profile sets
//! `panic = "abort"`, where a panicking strategy ends the process.
//!
//! ```text
//!            start()
//!   Idle ───────────────► Scheduled ──┐ tick: run strategy,
//!    ▲                        │  ◄────┘       stamp last refresh
//!    └──────── stop() ────────┘
//! ```

use chrono::{DateTime, Local};
use futures::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::Instrument;

use crate::domain::config::RefreshSettings;
use crate::domain::page_type::PageType;
use crate::error::{Error, Result};
use crate::eventing::{DashboardEvent, EventSender};
use crate::services::runtime::spawn_named;
use crate::services::strategies::StrategyTable;

/// Interval and page type, fixed for the scheduler's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub interval: Duration,
    pub page_type: PageType,
}

impl RefreshConfig {
    pub fn new(interval: Duration, page_type: PageType) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::Invalid {
                message: "refresh interval must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            interval,
            page_type,
        })
    }

    pub fn from_settings(settings: &RefreshSettings, page_type: PageType) -> Result<Self> {
        Self::new(settings.interval(), page_type)
    }
}

/// Timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
}

/// Outcome of one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No strategy for the page type
    Skipped,
    Completed,
    Failed,
}

struct SchedulerInner {
    config: RefreshConfig,
    strategies: StrategyTable,
    last_refresh: Mutex<Option<DateTime<Local>>>,
    cycles: AtomicU64,
    events: Option<EventSender>,
}

impl SchedulerInner {
    async fn run_cycle(&self) -> CycleOutcome {
        let page_type = self.config.page_type;
        let Some(strategy) = self.strategies.get(&page_type).cloned() else {
            tracing::debug!(%page_type, "No refresh strategy for page type");
            return CycleOutcome::Skipped;
        };

        let cycle_id = uuid::Uuid::now_v7();
        let span = tracing::info_span!("refresh_cycle", %page_type, %cycle_id);

        let result = AssertUnwindSafe(strategy.refresh())
            .catch_unwind()
            .instrument(span.clone())
            .await;

        let now = Local::now();
        *self.last_refresh.lock() = Some(now);
        self.cycles.fetch_add(1, Ordering::SeqCst);

        let ok = match result {
            Ok(Ok(())) => {
                span.in_scope(|| tracing::debug!(strategy = strategy.name(), "Refresh cycle completed"));
                true
            }
            Ok(Err(e)) => {
                span.in_scope(|| {
                    tracing::warn!(strategy = strategy.name(), error = %e, "Refresh cycle failed")
                });
                self.emit(DashboardEvent::warn(format!("Auto-refresh failed: {e}")));
                false
            }
            Err(_) => {
                span.in_scope(|| {
                    tracing::error!(strategy = strategy.name(), "Refresh strategy panicked")
                });
                self.emit(DashboardEvent::error("Auto-refresh strategy panicked"));
                false
            }
        };

        self.emit(DashboardEvent::RefreshCompleted {
            page_type,
            at: now,
            ok,
        });

        if ok {
            CycleOutcome::Completed
        } else {
            CycleOutcome::Failed
        }
    }

    fn emit(&self, event: DashboardEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// Periodic refresh orchestrator, one per page
pub struct RefreshScheduler {
    inner: Arc<SchedulerInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Create an idle scheduler
    pub fn create(
        config: RefreshConfig,
        strategies: StrategyTable,
        events: Option<EventSender>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                config,
                strategies,
                last_refresh: Mutex::new(None),
                cycles: AtomicU64::new(0),
                events,
            }),
            task: Mutex::new(None),
        }
    }

    /// Start the repeating timer; the first tick fires one interval from now
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            tracing::warn!("Auto-refresh already running");
            return;
        }

        let inner = self.inner.clone();
        let period = inner.config.interval;
        tracing::info!(
            page_type = %inner.config.page_type,
            interval_ms = period.as_millis() as u64,
            "Starting auto-refresh"
        );

        *task = Some(spawn_named("auto-refresh", async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                inner.run_cycle().await;
            }
        }));
    }

    /// Cancel the timer. In-flight cycles are dropped with it.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            tracing::info!("Stopped auto-refresh");
        }
    }

    pub fn state(&self) -> SchedulerState {
        match self.task.lock().as_ref() {
            Some(t) if !t.is_finished() => SchedulerState::Scheduled,
            _ => SchedulerState::Idle,
        }
    }

    /// Run one cycle now, independent of the timer
    pub async fn refresh_now(&self) -> CycleOutcome {
        self.inner.run_cycle().await
    }

    pub fn last_refresh_time(&self) -> Option<DateTime<Local>> {
        *self.inner.last_refresh.lock()
    }

    pub fn refresh_interval(&self) -> Duration {
        self.inner.config.interval
    }

    pub fn page_type(&self) -> PageType {
        self.inner.config.page_type
    }

    /// Cycles that ran a strategy, timer and manual alike
    pub fn cycle_count(&self) -> u64 {
        self.inner.cycles.load(Ordering::SeqCst)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("config", &self.inner.config)
            .field("state", &self.state())
            .field("cycles", &self.cycle_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eventing::event_channel;
    use crate::services::strategies::RefreshStrategy;
    use ahash::AHashMap;
    use futures::future::BoxFuture;
    use std::sync::atomic::AtomicUsize;

    struct Scripted {
        calls: Arc<AtomicUsize>,
        fail_on: Option<usize>,
        panic_on: Option<usize>,
    }

    impl RefreshStrategy for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn refresh(&self) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if Some(call) == self.panic_on {
                    panic!("strategy blew up");
                }
                if Some(call) == self.fail_on {
                    return Err(Error::Invalid {
                        message: "bad tick".into(),
                    });
                }
                Ok(())
            })
        }
    }

    fn scheduler(
        page_type: PageType,
        strategy_for: PageType,
        fail_on: Option<usize>,
        panic_on: Option<usize>,
        events: Option<EventSender>,
    ) -> (RefreshScheduler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut table: StrategyTable = AHashMap::new();
        table.insert(
            strategy_for,
            Arc::new(Scripted {
                calls: calls.clone(),
                fail_on,
                panic_on,
            }),
        );
        let config = RefreshConfig::new(Duration::from_millis(50), page_type).expect("config");
        (RefreshScheduler::create(config, table, events), calls)
    }

    #[tokio::test]
    async fn test_refresh_now_updates_last_refresh_even_on_failure() {
        let (tx, rx) = event_channel();
        let (scheduler, calls) =
            scheduler(PageType::Chart, PageType::Chart, Some(1), None, Some(tx));

        assert!(scheduler.last_refresh_time().is_none());
        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Failed);
        assert!(scheduler.last_refresh_time().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let completed: Vec<_> = rx
            .try_iter()
            .filter(|e| matches!(e, DashboardEvent::RefreshCompleted { ok: false, .. }))
            .collect();
        assert_eq!(completed.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_strategy_is_noop() {
        let (scheduler, calls) =
            scheduler(PageType::Unknown, PageType::Chart, None, None, None);
        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Skipped);
        assert!(scheduler.last_refresh_time().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_strategy_does_not_kill_scheduler() {
        let (scheduler, calls) =
            scheduler(PageType::Dashboard, PageType::Dashboard, None, Some(1), None);
        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Failed);
        assert_eq!(scheduler.refresh_now().await, CycleOutcome::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_keeps_ticking_after_failed_tick() {
        let (scheduler, calls) =
            scheduler(PageType::Chart, PageType::Chart, Some(1), None, None);

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        scheduler.start();
        assert_eq!(scheduler.state(), SchedulerState::Scheduled);
        assert_eq!(scheduler.refresh_interval(), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(175)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(RefreshConfig::new(Duration::ZERO, PageType::Chart).is_err());
    }
}
