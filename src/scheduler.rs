//! Midnight-aligned refresh of a daily pick.
//!
//! A [`RefreshScheduler`] runs fetch-then-select once when started, again at
//! the next local midnight, and then once per period (24 hours by default).
//! Starting it hands back a [`SchedulerHandle`]; stopping or dropping the
//! handle guarantees no further cycle starts and no in-flight result is
//! published.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::app::{ChapelError, Result};
use crate::config::format_interval;
use crate::domain::{ContentKind, DailyPick};
use crate::fetcher::ContentFetcher;
use crate::selector::pick_daily;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Source of the local calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// Time left until 00:00:00.000 of the following local day.
    fn until_next_midnight(&self) -> Duration;
}

/// The process's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn until_next_midnight(&self) -> Duration {
        until_next_midnight(&Local::now())
    }
}

/// Duration from `now` until the start of the next day in `now`'s zone.
///
/// An ambiguous midnight resolves to its earliest instant. Where a DST jump
/// skips midnight entirely the wall-clock difference is used.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let Some(tomorrow) = now.date_naive().checked_add_days(Days::new(1)) else {
        return DEFAULT_PERIOD;
    };
    let midnight = tomorrow.and_time(NaiveTime::MIN);

    let delta = match now.timezone().from_local_datetime(&midnight).earliest() {
        Some(next) => next.naive_utc() - now.naive_utc(),
        None => midnight - now.naive_local(),
    };
    delta.to_std().unwrap_or_default()
}

/// Why there is nothing new to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The store answered but holds no records of the kind.
    NoContent,
    /// The store could not be reached or answered with garbage.
    FetchFailed(String),
}

/// What a consumer should currently display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    /// Latest successful pick. Survives later failures.
    pub current: Option<DailyPick>,
    /// Set when the latest cycle failed.
    pub unavailable: Option<Unavailable>,
    /// Completed cycles whose outcome was applied.
    pub attempts: u64,
    pub last_refreshed: Option<DateTime<Local>>,
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        self.attempts == 0
    }

    fn apply(&mut self, outcome: Result<DailyPick>) {
        self.attempts += 1;
        self.last_refreshed = Some(Local::now());
        match outcome {
            Ok(pick) => {
                self.current = Some(pick);
                self.unavailable = None;
            }
            Err(ChapelError::EmptyCollection(_)) => {
                self.unavailable = Some(Unavailable::NoContent);
            }
            Err(e) => {
                self.unavailable = Some(Unavailable::FetchFailed(e.to_string()));
            }
        }
    }
}

struct Cancellation {
    running: AtomicBool,
    notify: Notify,
}

impl Cancellation {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
            notify: Notify::new(),
        }
    }

    fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
        // notify_one keeps a permit if the task is not waiting right now
        self.notify.notify_one();
    }

    fn is_cancelled(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }

    /// Wait for `fut` unless cancelled first. Returns whether to go on.
    async fn wait<F: Future>(&self, fut: F) -> bool {
        if self.is_cancelled() {
            return false;
        }
        tokio::select! {
            biased;
            _ = self.notify.notified() => false,
            _ = fut => !self.is_cancelled(),
        }
    }
}

/// Keeps the pick of one content kind current across days.
pub struct RefreshScheduler {
    fetcher: Arc<dyn ContentFetcher + Send + Sync>,
    clock: Arc<dyn Clock>,
    kind: ContentKind,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(fetcher: Arc<dyn ContentFetcher + Send + Sync>, kind: ContentKind) -> Self {
        Self {
            fetcher,
            clock: Arc::new(SystemClock),
            kind,
            period: DEFAULT_PERIOD,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Spawn the refresh task on the current tokio runtime.
    pub fn start(self) -> SchedulerHandle {
        let cancel = Arc::new(Cancellation::new());
        let (tx, rx) = watch::channel(DisplayState::default());
        let task = tokio::spawn(self.run(cancel.clone(), tx));

        SchedulerHandle {
            cancel,
            state: rx,
            task: Some(task),
        }
    }

    async fn run(self, cancel: Arc<Cancellation>, state: watch::Sender<DisplayState>) {
        tracing::info!(
            "Refresh scheduler for {} started (period: {})",
            self.kind,
            format_interval(self.period.as_secs())
        );

        self.cycle(&cancel, &state).await;

        let until_midnight = self.clock.until_next_midnight();
        tracing::info!(
            "Next {} refresh at local midnight, in {} minutes",
            self.kind,
            until_midnight.as_secs().div_ceil(60)
        );

        if cancel.wait(tokio::time::sleep(until_midnight)).await {
            tracing::info!("Midnight reached, refreshing {}", self.kind);
            self.cycle(&cancel, &state).await;

            let mut ticker = interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            while cancel.wait(ticker.tick()).await {
                tracing::info!("Scheduled {} refresh", self.kind);
                self.cycle(&cancel, &state).await;
            }
        }

        tracing::info!("Refresh scheduler for {} stopped", self.kind);
    }

    /// One fetch-then-select. Failures are logged and recorded, never
    /// propagated, so the timer chain always continues.
    async fn cycle(&self, cancel: &Cancellation, state: &watch::Sender<DisplayState>) {
        if cancel.is_cancelled() {
            return;
        }

        let date = self.clock.today();
        let outcome = pick_daily(self.fetcher.as_ref(), self.kind, date).await;

        if cancel.is_cancelled() {
            tracing::debug!("Discarding {} refresh for {}: scheduler stopped", self.kind, date);
            return;
        }

        match &outcome {
            Ok(pick) => tracing::info!(
                "{} for {}: {} (index {})",
                self.kind,
                date,
                pick.record.id(),
                pick.index
            ),
            Err(e @ ChapelError::EmptyCollection(_)) => {
                tracing::warn!("{}; add {} documents in the CMS", e, self.kind)
            }
            Err(e) => tracing::error!("Failed to refresh {}: {}", self.kind, e),
        }

        state.send_modify(|s| s.apply(outcome));
    }
}

/// Owned handle to a running [`RefreshScheduler`].
///
/// Dropping the handle stops the scheduler.
pub struct SchedulerHandle {
    cancel: Arc<Cancellation>,
    state: watch::Receiver<DisplayState>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop the scheduler. Returns immediately; no cycle starts afterwards
    /// and a fetch already in flight has its result discarded.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> DisplayState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.clone()
    }

    /// Stop and wait for the task to exit, including any in-flight fetch.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Refresh task join error: {}", e);
            }
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{FixedOffset, NaiveDateTime, Utc};

    use super::*;
    use crate::domain::{ContentRecord, Verse};
    use crate::fetcher::FetchError;

    /// Wall clock that starts at a fixed local time and advances with
    /// tokio's (paused) clock.
    struct TestClock {
        origin: Instant,
        start: NaiveDateTime,
    }

    impl TestClock {
        fn at(start: &str) -> Arc<Self> {
            Arc::new(Self {
                origin: Instant::now(),
                start: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap(),
            })
        }

        fn now(&self) -> NaiveDateTime {
            self.start + chrono::Duration::from_std(self.origin.elapsed()).unwrap()
        }
    }

    impl Clock for TestClock {
        fn today(&self) -> NaiveDate {
            self.now().date()
        }

        fn until_next_midnight(&self) -> Duration {
            until_next_midnight(&self.now().and_utc())
        }
    }

    #[derive(Clone, Copy)]
    enum Step {
        Verses(usize),
        Empty,
        Fail,
    }

    /// Counts calls and answers from a script, then with three verses.
    struct SpyFetcher {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Step>>,
        delay: Duration,
    }

    impl SpyFetcher {
        fn new(script: &[Step]) -> Arc<Self> {
            Self::with_delay(script, Duration::ZERO)
        }

        fn with_delay(script: &[Step], delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(script.iter().copied().collect()),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentFetcher for SpyFetcher {
        async fn fetch_collection(&self, _kind: ContentKind) -> Result<Vec<ContentRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Step::Verses(3));

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match step {
                Step::Verses(n) => Ok((0..n)
                    .map(|i| {
                        ContentRecord::Verse(Verse {
                            id: format!("verse-{i}"),
                            text: format!("text {i}"),
                            book: "Proverbs".into(),
                            chapter: 3,
                            verse: i as u32 + 5,
                        })
                    })
                    .collect()),
                Step::Empty => Ok(Vec::new()),
                Step::Fail => Err(FetchError::Status {
                    status: 503,
                    message: "unavailable".into(),
                }
                .into()),
            }
        }
    }

    fn start(fetcher: &Arc<SpyFetcher>, clock: Arc<TestClock>) -> SchedulerHandle {
        RefreshScheduler::new(fetcher.clone(), ContentKind::Verse)
            .with_clock(clock)
            .start()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_at_start_and_once_at_midnight() {
        let fetcher = SpyFetcher::new(&[]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 1);
        let first = handle.state().current.unwrap();
        assert_eq!(first.date, date("2025-07-28"));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fetcher.calls(), 2);
        let state = handle.state();
        assert_eq!(state.attempts, 2);
        assert_eq!(state.current.unwrap().date, date("2025-07-29"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeats_every_period_after_midnight() {
        let fetcher = SpyFetcher::new(&[]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        tokio::time::sleep(Duration::from_secs(10 + 3 * 86400 + 1)).await;
        // start, midnight, then three daily ticks
        assert_eq!(fetcher.calls(), 5);
        assert_eq!(handle.state().current.unwrap().date, date("2025-08-01"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_midnight_prevents_further_fetches() {
        let fetcher = SpyFetcher::new(&[]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 1);

        handle.stop();
        assert!(handle.is_stopped());
        tokio::time::sleep(Duration::from_secs(2 * 86400)).await;
        assert_eq!(fetcher.calls(), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_scheduler() {
        let fetcher = SpyFetcher::new(&[]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 12:00:00"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_secs(3 * 86400)).await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_does_not_stop_schedule() {
        let fetcher = SpyFetcher::new(&[Step::Fail, Step::Verses(5)]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = handle.state();
        assert_eq!(fetcher.calls(), 1);
        assert!(state.current.is_none());
        assert!(matches!(state.unavailable, Some(Unavailable::FetchFailed(_))));

        tokio::time::sleep(Duration::from_secs(15)).await;
        let state = handle.state();
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(state.unavailable, None);
        let pick = state.current.unwrap();
        // "2025-07-29" hashes to 274340865, 274340865 % 5 == 0
        assert_eq!(pick.index, 0);
        assert_eq!(pick.record.id(), "verse-0");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_collection_keeps_previous_pick() {
        let fetcher = SpyFetcher::new(&[Step::Verses(3), Step::Empty]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        tokio::time::sleep(Duration::from_secs(20)).await;
        let state = handle.state();
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(state.unavailable, Some(Unavailable::NoContent));
        assert_eq!(state.current.unwrap().date, date("2025-07-28"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_is_discarded_after_stop() {
        let fetcher = SpyFetcher::with_delay(&[], Duration::from_secs(5));
        let handle = start(&fetcher, TestClock::at("2025-07-28 12:00:00"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 1);
        handle.stop();

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = handle.state();
        assert!(state.is_loading());
        assert!(state.current.is_none());

        handle.shutdown().await;
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_midnight_fetch_keeps_previous_pick() {
        let fetcher = SpyFetcher::with_delay(&[], Duration::from_secs(5));
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:50"));

        // first cycle resolves at t=5, the midnight fetch starts at t=10
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(fetcher.calls(), 2);
        handle.stop();

        tokio::time::sleep(Duration::from_secs(3 * 86400)).await;
        let state = handle.state();
        assert_eq!(state.attempts, 1);
        assert_eq!(state.current.unwrap().date, date("2025-07-28"));

        handle.shutdown().await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_observe_each_cycle() {
        let fetcher = SpyFetcher::new(&[]);
        let handle = start(&fetcher, TestClock::at("2025-07-28 23:59:58"));
        let mut rx = handle.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().attempts, 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().attempts, 2);

        handle.shutdown().await;
    }

    #[test]
    fn test_until_next_midnight_just_before() {
        let now = Utc.with_ymd_and_hms(2025, 7, 28, 23, 59, 50).unwrap();
        assert_eq!(until_next_midnight(&now), Duration::from_secs(10));
    }

    #[test]
    fn test_until_next_midnight_at_midnight_is_a_full_day() {
        let now = Utc.with_ymd_and_hms(2025, 7, 29, 0, 0, 0).unwrap();
        assert_eq!(until_next_midnight(&now), Duration::from_secs(86400));
    }

    #[test]
    fn test_until_next_midnight_across_month_end() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();
        assert_eq!(until_next_midnight(&now), Duration::from_secs(12 * 3600));
    }

    #[test]
    fn test_until_next_midnight_uses_local_offset() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        // 22:30 UTC is 23:30 at +01:00
        let now = Utc
            .with_ymd_and_hms(2025, 3, 1, 22, 30, 0)
            .unwrap()
            .with_timezone(&cet);
        assert_eq!(until_next_midnight(&now), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_display_state_apply() {
        let mut state = DisplayState::default();
        assert!(state.is_loading());

        state.apply(Err(ChapelError::EmptyCollection(ContentKind::Verse)));
        assert_eq!(state.unavailable, Some(Unavailable::NoContent));
        assert!(!state.is_loading());
        assert!(state.last_refreshed.is_some());
    }
}
