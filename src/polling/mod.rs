//! Scheduled status refresh.
//!
//! A [`PollingMonitor`] re-runs a [`PollTarget`] according to a policy:
//!
//! - [`PollPolicy::FixedInterval`]: poll immediately, then every period,
//!   whatever the outcome, until stopped.
//! - [`PollPolicy::ConditionalReschedule`]: one-shot timers; after each poll
//!   the target's [`PollDecision`] decides whether another timer is armed.
//!
//! The monitor owns exactly one cancellation handle, so at most one timer is
//! pending per monitor. Arming a new timer cancels the previous one first.
//! Polls already in flight are never aborted; a generation counter keeps a
//! superseded poll from scheduling anything once it completes.

mod latch;

pub use latch::LoadLatch;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Whether polling should go on after a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDecision {
    Continue,
    Stop,
}

/// Scheduling policy of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPolicy {
    /// Poll now and then every period, regardless of the outcome
    FixedInterval(Duration),
    /// Poll once after the delay; re-arm only on [`PollDecision::Continue`]
    ConditionalReschedule(Duration),
}

/// Monitor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Scheduled,
    Fetching,
}

/// Something a monitor can refresh.
#[async_trait]
pub trait PollTarget: Send + Sync {
    /// Fetch and apply the latest status.
    async fn poll(&self) -> PollDecision;
}

#[derive(Debug)]
struct MonitorInner {
    state: MonitorState,
    generation: u64,
    pending: Option<CancellationToken>,
}

impl MonitorInner {
    /// Cancel whatever is pending and open a new generation.
    fn supersede(&mut self) -> u64 {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }
}

type Shared = Arc<Mutex<MonitorInner>>;

fn lock(inner: &Shared) -> MutexGuard<'_, MonitorInner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Reusable scheduled-refresh primitive.
#[derive(Debug)]
pub struct PollingMonitor {
    name: &'static str,
    policy: PollPolicy,
    inner: Shared,
}

impl PollingMonitor {
    pub fn new(name: &'static str, policy: PollPolicy) -> Self {
        Self {
            name,
            policy,
            inner: Arc::new(Mutex::new(MonitorInner {
                state: MonitorState::Idle,
                generation: 0,
                pending: None,
            })),
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    pub fn state(&self) -> MonitorState {
        lock(&self.inner).state
    }

    /// Whether a timer (or interval loop) is currently armed.
    pub fn is_pending(&self) -> bool {
        lock(&self.inner).pending.is_some()
    }

    /// Start polling `target`, replacing any previous schedule.
    ///
    /// Fixed-interval monitors poll immediately; conditional monitors arm a
    /// single delayed poll.
    pub fn start(&self, target: Arc<dyn PollTarget>) {
        match self.policy {
            PollPolicy::FixedInterval(period) => {
                run_fixed(self.name, self.inner.clone(), period, target)
            }
            PollPolicy::ConditionalReschedule(delay) => {
                arm_once(self.name, self.inner.clone(), delay, target)
            }
        }
    }

    /// Apply the decision of a fetch made outside the monitor (a manual
    /// refresh): continue re-arms, stop cancels.
    pub fn apply(&self, decision: PollDecision, target: Arc<dyn PollTarget>) {
        match decision {
            PollDecision::Continue => self.start(target),
            PollDecision::Stop => self.stop(),
        }
    }

    /// Cancel the pending timer. A poll in flight completes but schedules
    /// nothing.
    pub fn stop(&self) {
        let mut inner = lock(&self.inner);
        if inner.pending.is_some() {
            tracing::debug!(monitor = self.name, "Polling stopped");
        }
        inner.supersede();
        inner.state = MonitorState::Idle;
    }
}

impl Drop for PollingMonitor {
    fn drop(&mut self) {
        lock(&self.inner).supersede();
    }
}

fn run_fixed(name: &'static str, inner: Shared, period: Duration, target: Arc<dyn PollTarget>) {
    let token = CancellationToken::new();
    let generation = {
        let mut guard = lock(&inner);
        let generation = guard.supersede();
        guard.pending = Some(token.clone());
        guard.state = MonitorState::Scheduled;
        generation
    };

    tracing::debug!(monitor = name, period_ms = period.as_millis() as u64, "Fixed-interval polling started");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    set_state_if_current(&inner, generation, MonitorState::Fetching);
                    let _ = target.poll().await;
                    set_state_if_current(&inner, generation, MonitorState::Scheduled);
                }
            }
        }
    });
}

fn arm_once(name: &'static str, inner: Shared, delay: Duration, target: Arc<dyn PollTarget>) {
    let token = CancellationToken::new();
    let generation = {
        let mut guard = lock(&inner);
        let generation = guard.supersede();
        guard.pending = Some(token.clone());
        guard.state = MonitorState::Scheduled;
        generation
    };

    tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        {
            let mut guard = lock(&inner);
            if guard.generation != generation {
                return;
            }
            // The timer fired: nothing is pending while the fetch runs.
            guard.pending = None;
            guard.state = MonitorState::Fetching;
        }

        let decision = target.poll().await;

        let current = lock(&inner).generation == generation;
        if !current {
            tracing::debug!(monitor = name, "Superseded poll completed, not rescheduling");
            return;
        }
        match decision {
            PollDecision::Continue => arm_once(name, inner, delay, target),
            PollDecision::Stop => lock(&inner).state = MonitorState::Idle,
        }
    });
}

fn set_state_if_current(inner: &Shared, generation: u64, state: MonitorState) {
    let mut guard = lock(inner);
    if guard.generation == generation {
        guard.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    struct CountingTarget {
        polls: AtomicUsize,
        decisions: Mutex<VecDeque<PollDecision>>,
    }

    impl CountingTarget {
        fn new(decisions: Vec<PollDecision>) -> Arc<Self> {
            Arc::new(Self {
                polls: AtomicUsize::new(0),
                decisions: Mutex::new(decisions.into()),
            })
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PollTarget for CountingTarget {
        async fn poll(&self) -> PollDecision {
            self.polls.fetch_add(1, Ordering::SeqCst);
            self.decisions
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(PollDecision::Stop)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Always asks to continue; each fetch takes `fetch` and records when it
    /// started, in ms since creation.
    struct SlowTarget {
        origin: tokio::time::Instant,
        fetch: Duration,
        started: Mutex<Vec<u128>>,
    }

    impl SlowTarget {
        fn new(fetch: Duration) -> Arc<Self> {
            Arc::new(Self {
                origin: tokio::time::Instant::now(),
                fetch,
                started: Mutex::new(Vec::new()),
            })
        }

        fn started(&self) -> Vec<u128> {
            self.started.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PollTarget for SlowTarget {
        async fn poll(&self) -> PollDecision {
            self.started
                .lock()
                .unwrap()
                .push(self.origin.elapsed().as_millis());
            sleep(self.fetch).await;
            PollDecision::Continue
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_polls_immediately_then_every_period() {
        let monitor = PollingMonitor::new("test", PollPolicy::FixedInterval(ms(2000)));
        let target = CountingTarget::new(vec![]);

        monitor.start(target.clone());
        sleep(ms(4100)).await;

        assert_eq!(target.polls(), 3);
        assert!(monitor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_ignores_stop_decisions() {
        let monitor = PollingMonitor::new("test", PollPolicy::FixedInterval(ms(1000)));
        let target = CountingTarget::new(vec![PollDecision::Stop, PollDecision::Stop]);

        monitor.start(target.clone());
        sleep(ms(3500)).await;

        assert_eq!(target.polls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_stop_ends_schedule() {
        let monitor = PollingMonitor::new("test", PollPolicy::FixedInterval(ms(2000)));
        let target = CountingTarget::new(vec![]);

        monitor.start(target.clone());
        sleep(ms(100)).await;
        monitor.stop();
        sleep(ms(10_000)).await;

        assert_eq!(target.polls(), 1);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(!monitor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_conditional_reschedules_while_continue() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = CountingTarget::new(vec![PollDecision::Continue, PollDecision::Continue]);

        monitor.start(target.clone());
        sleep(ms(10_000)).await;

        // Continue, Continue, then Stop from the exhausted script.
        assert_eq!(target.polls(), 3);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(!monitor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_conditional_first_poll_waits_for_delay() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = CountingTarget::new(vec![]);

        monitor.start(target.clone());
        sleep(ms(1100)).await;
        assert_eq!(target.polls(), 0);
        assert_eq!(monitor.state(), MonitorState::Scheduled);

        sleep(ms(200)).await;
        assert_eq!(target.polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_pending_timer() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = CountingTarget::new(vec![]);

        monitor.start(target.clone());
        sleep(ms(600)).await;
        monitor.start(target.clone());

        sleep(ms(900)).await; // t = 1500: first timer would have fired at 1200
        assert_eq!(target.polls(), 0);

        sleep(ms(500)).await; // t = 2000: second timer fired at 1800
        assert_eq!(target.polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_stop_cancels() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = CountingTarget::new(vec![]);

        monitor.apply(PollDecision::Continue, target.clone());
        assert!(monitor.is_pending());
        monitor.apply(PollDecision::Stop, target.clone());
        sleep(ms(5000)).await;

        assert_eq!(target.polls(), 0);
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_fetch_does_not_rearm() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = SlowTarget::new(ms(1000));

        monitor.start(target.clone());
        sleep(ms(1300)).await; // fetch runs from 1200 to 2200
        assert_eq!(monitor.state(), MonitorState::Fetching);
        monitor.stop();
        sleep(ms(10_000)).await;

        assert_eq!(target.started(), vec![1200]);
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(!monitor.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_fetch_keeps_single_timer_chain() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        let target = SlowTarget::new(ms(1000));

        monitor.start(target.clone());
        sleep(ms(1300)).await; // first fetch in flight until 2200
        monitor.start(target.clone());
        sleep(ms(5700)).await; // t = 7000
        monitor.stop();
        sleep(ms(10_000)).await;

        // The superseded fetch finishing at 2200 arms nothing; only the
        // restarted chain (2500, then fetch + delay) keeps polling.
        assert_eq!(target.started(), vec![1200, 2500, 4700, 6900]);
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[tokio::test]
    async fn test_new_monitor_is_idle() {
        let monitor = PollingMonitor::new("test", PollPolicy::ConditionalReschedule(ms(1200)));
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(!monitor.is_pending());
    }
}
