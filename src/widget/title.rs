//! Unread title indicator
//!
//! While enabled, the window title blinks between the original title and
//! `"(N) <label>"`. N is read from the live unseen count at every toggle.
//! When the count is zero at the moment the title would switch to the
//! unread form, the original title is shown instead, so restoration lags by
//! at most one period.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How often the title flips
pub const TITLE_BLINK_PERIOD: Duration = Duration::from_millis(1000);

/// Where the title is written
///
/// The title is process-wide state; while the indicator runs it is the only
/// writer.
pub trait TitleSink: Send + Sync {
    /// Current title text
    fn get(&self) -> String;

    /// Replace the title text
    fn set(&self, title: &str);
}

/// Which half of the blink cycle is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitlePhase {
    #[default]
    Original,
    Unread,
}

/// Values the controller keeps current for the indicator
#[derive(Debug, Default)]
pub struct IndicatorFeed {
    unseen: AtomicUsize,
    label: Mutex<String>,
}

impl IndicatorFeed {
    pub fn new(unseen: usize, label: impl Into<String>) -> Self {
        Self {
            unseen: AtomicUsize::new(unseen),
            label: Mutex::new(label.into()),
        }
    }

    pub fn set_unseen(&self, count: usize) {
        self.unseen.store(count, Ordering::SeqCst);
    }

    pub fn unseen(&self) -> usize {
        self.unseen.load(Ordering::SeqCst)
    }

    pub fn set_label(&self, label: &str) {
        let mut current = lock(&self.label);
        if *current != label {
            *current = label.to_string();
        }
    }

    pub fn label(&self) -> String {
        lock(&self.label).clone()
    }
}

/// Blink state machine
pub struct TitleIndicator {
    sink: Arc<dyn TitleSink>,
    feed: Arc<IndicatorFeed>,
    original_title: String,
    phase: TitlePhase,
    stopped: bool,
}

impl TitleIndicator {
    pub fn new(sink: Arc<dyn TitleSink>, feed: Arc<IndicatorFeed>, original_title: String) -> Self {
        Self {
            sink,
            feed,
            original_title,
            phase: TitlePhase::Original,
            stopped: false,
        }
    }

    pub fn phase(&self) -> TitlePhase {
        self.phase
    }

    /// Flip to the other half of the cycle
    pub fn toggle(&mut self) {
        if self.stopped {
            return;
        }

        let count = self.feed.unseen();
        if self.phase == TitlePhase::Original && count > 0 {
            let title = format!("({count}) {}", self.feed.label());
            self.sink.set(&title);
            self.phase = TitlePhase::Unread;
        } else {
            self.sink.set(&self.original_title);
            self.phase = TitlePhase::Original;
        }
    }

    /// Refuse all further toggles
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Owned handle to the running blink task
///
/// Dropping the handle stops the indicator.
pub struct IndicatorTimer {
    indicator: Arc<Mutex<TitleIndicator>>,
    task: JoinHandle<()>,
}

impl IndicatorTimer {
    /// Spawn the blink task on the current tokio runtime
    ///
    /// Returns `None` outside a runtime.
    pub fn start(indicator: TitleIndicator, period: Duration) -> Option<Self> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(error = %err, "No async runtime, title indicator disabled");
                return None;
            }
        };

        let indicator = Arc::new(Mutex::new(indicator));
        let shared = Arc::clone(&indicator);
        let task = handle.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                lock(&shared).toggle();
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "Title indicator started");
        Some(Self { indicator, task })
    }

    /// Stop the task; no title write happens after this returns
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for IndicatorTimer {
    fn drop(&mut self) {
        // toggles run under this lock, so none can be mid-write after it
        lock(&self.indicator).stop();
        self.task.abort();
        tracing::debug!("Title indicator stopped");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Title sink that only remembers what it was given
#[derive(Debug, Default)]
pub struct MemoryTitle {
    title: Mutex<String>,
    writes: AtomicUsize,
}

impl MemoryTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Mutex::new(title.into()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TitleSink for MemoryTitle {
    fn get(&self) -> String {
        lock(&self.title).clone()
    }

    fn set(&self, title: &str) {
        *lock(&self.title) = title.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(unseen: usize) -> (TitleIndicator, Arc<MemoryTitle>, Arc<IndicatorFeed>) {
        let sink = Arc::new(MemoryTitle::new("Shop"));
        let feed = Arc::new(IndicatorFeed::new(unseen, "New messages"));
        let indicator = TitleIndicator::new(sink.clone(), feed.clone(), sink.get());
        (indicator, sink, feed)
    }

    #[test]
    fn test_toggle_alternates_with_live_count() {
        let (mut indicator, sink, feed) = setup(2);

        indicator.toggle();
        assert_eq!(sink.get(), "(2) New messages");
        assert_eq!(indicator.phase(), TitlePhase::Unread);

        indicator.toggle();
        assert_eq!(sink.get(), "Shop");

        feed.set_unseen(5);
        indicator.toggle();
        assert_eq!(sink.get(), "(5) New messages");
    }

    #[test]
    fn test_zero_count_restores_original_instead_of_unread() {
        let (mut indicator, sink, feed) = setup(3);
        indicator.toggle();
        indicator.toggle();
        assert_eq!(sink.get(), "Shop");

        feed.set_unseen(0);
        indicator.toggle();
        assert_eq!(sink.get(), "Shop");
        assert_eq!(indicator.phase(), TitlePhase::Original);
    }

    #[test]
    fn test_count_dropping_mid_cycle_shows_original() {
        let (mut indicator, sink, feed) = setup(3);
        indicator.toggle();
        assert_eq!(sink.get(), "(3) New messages");

        feed.set_unseen(0);
        // unread -> original
        indicator.toggle();
        // would-be unread half shows the original title
        indicator.toggle();
        assert_eq!(sink.get(), "Shop");
        assert!(!sink.get().starts_with("(0)"));
    }

    #[test]
    fn test_label_is_read_at_toggle_time() {
        let (mut indicator, sink, feed) = setup(1);
        feed.set_label("Unread");
        indicator.toggle();
        assert_eq!(sink.get(), "(1) Unread");
    }

    #[test]
    fn test_stopped_indicator_never_writes() {
        let (mut indicator, sink, _feed) = setup(4);
        indicator.stop();
        indicator.toggle();
        assert_eq!(sink.writes(), 0);
    }

    #[test]
    fn test_start_without_runtime_is_skipped() {
        let (indicator, _sink, _feed) = setup(1);
        assert!(IndicatorTimer::start(indicator, TITLE_BLINK_PERIOD).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_blinks_and_stops() {
        let (indicator, sink, _feed) = setup(1);
        let timer = IndicatorTimer::start(indicator, TITLE_BLINK_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(sink.get(), "(1) New messages");

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(sink.get(), "Shop");

        timer.stop();
        let writes = sink.writes();
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(sink.writes(), writes);
    }
}
