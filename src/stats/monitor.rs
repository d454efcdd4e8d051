// src/stats/monitor.rs
//! Status monitor
//!
//! Samples the work counter once per second, derives the hashrate and the
//! mining/idle liveness signal, and rewrites the console prompt to match.
//! The loop never fails; it only stops when the shared cancellation token
//! fires.

use crate::console::editor::Prompt;
use crate::stats::state::{HashrateGauge, MiningState};
use crate::types::Liveness;
use crate::utils::format::format_hashes;
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Sampling period of the monitor loop
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Liveness turns idle once the display has not been refreshed for longer than this
pub const IDLE_AFTER: Duration = Duration::from_secs(5);

const PROMPT_LABEL: &str = "DERO Miner";

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Baseline for the rate derivative; private to the monitor
#[derive(Debug, Clone, Copy)]
struct RateSample {
    last_counter: u64,
    last_sample: Instant,
    last_display_update: Instant,
}

/// Converts the raw work counter into a rate and liveness indicator
pub struct StatusMonitor {
    state: Arc<MiningState>,
    hashrate: Arc<HashrateGauge>,
    prompt: Arc<dyn Prompt>,
    sample: RateSample,
    liveness: Liveness,
    rate_text: String,
}

impl StatusMonitor {
    /// Creates a monitor whose sampling baseline starts now
    ///
    /// # Arguments
    /// * `state` - Counters to sample (read only)
    /// * `hashrate` - Gauge receiving each computed rate
    /// * `prompt` - Console prompt to rewrite
    pub fn new(
        state: Arc<MiningState>,
        hashrate: Arc<HashrateGauge>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self::starting_at(state, hashrate, prompt, time::Instant::now().into_std())
    }

    /// Creates a monitor whose sampling baseline starts at `now`
    ///
    /// The baseline counter is whatever the engine has already counted, so
    /// work done before the monitor starts is not reported as a burst.
    pub fn starting_at(
        state: Arc<MiningState>,
        hashrate: Arc<HashrateGauge>,
        prompt: Arc<dyn Prompt>,
        now: Instant,
    ) -> Self {
        let last_counter = state.work_counter();
        StatusMonitor {
            state,
            hashrate,
            prompt,
            sample: RateSample {
                last_counter,
                last_sample: now,
                last_display_update: now,
            },
            liveness: Liveness::Idle,
            rate_text: String::new(),
        }
    }

    /// Current liveness state
    pub fn liveness(&self) -> Liveness {
        self.liveness
    }

    /// Performs one sampling step as of `now`
    ///
    /// Returns the prompt pushed to the console, or `None` when nothing
    /// changed this tick.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let counter = self.state.work_counter();

        if counter != self.sample.last_counter {
            let elapsed = now.saturating_duration_since(self.sample.last_sample);
            if elapsed.is_zero() {
                // Retry next tick rather than divide by zero.
                return None;
            }

            let delta = counter.wrapping_sub(self.sample.last_counter);
            let rate = (delta as f64 / elapsed.as_secs_f64()).round() as u64;
            debug!(
                "Counter advanced by {} over {:.3}s: {} H/s",
                delta,
                elapsed.as_secs_f64(),
                rate
            );

            self.hashrate.set(rate);
            self.sample.last_counter = counter;
            self.sample.last_sample = now;
            self.rate_text = format!("{}/s", format_hashes(rate));

            if self.liveness == Liveness::Idle {
                info!("Mining at {}", self.rate_text);
            }
            self.liveness = Liveness::Mining;
            self.sample.last_display_update = now;

            return Some(self.publish());
        }

        if self.liveness == Liveness::Idle {
            // The next advance is measured from the last quiet tick, not
            // from before the idle gap.
            self.sample.last_sample = now;
            return None;
        }

        let stale_for = now.saturating_duration_since(self.sample.last_display_update);
        if stale_for > IDLE_AFTER {
            info!("No mining progress for {}s, marking idle", stale_for.as_secs());
            self.liveness = Liveness::Idle;
            self.hashrate.set(0);
            self.sample.last_sample = now;
            return Some(self.publish());
        }

        None
    }

    /// Builds the prompt string for the current state
    pub fn render(&self) -> String {
        let status = match self.liveness {
            Liveness::Mining => format!("{}{} @ {}", GREEN, self.liveness, self.rate_text),
            Liveness::Idle => format!("{}{}", RED, self.liveness),
        };
        let testnet = if self.state.testnet() {
            format!("{} TESTNET", RED)
        } else {
            String::new()
        };

        format!(
            "{BOLD}{GREEN}{}: {RESET}{YELLOW}Shares {} Rejected {} {}{GREEN}>{}{GREEN}>>{RESET} ",
            PROMPT_LABEL,
            self.state.total_shares(),
            self.state.rejected_shares(),
            status,
            testnet,
        )
    }

    fn publish(&self) -> String {
        let prompt = self.render();
        self.prompt.set_prompt(&prompt);
        prompt
    }

    /// Runs the monitor until `cancel` fires
    ///
    /// Publishes the initial (idle) prompt, then samples every
    /// [`TICK_PERIOD`]. Cancellation is observed within one tick.
    pub async fn run(mut self, cancel: CancellationToken) {
        self.publish();

        let mut ticker = time::interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("Status monitor stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick(time::Instant::now().into_std());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPrompt {
        prompts: Mutex<Vec<String>>,
    }

    impl Prompt for RecordingPrompt {
        fn set_prompt(&self, prompt: &str) {
            self.prompts.lock().unwrap().push(prompt.to_string());
        }
    }

    impl RecordingPrompt {
        fn last(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }

        fn count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    struct Fixture {
        state: Arc<MiningState>,
        gauge: Arc<HashrateGauge>,
        prompt: Arc<RecordingPrompt>,
        monitor: StatusMonitor,
        t0: Instant,
    }

    fn fixture(testnet: bool, initial_counter: u64) -> Fixture {
        let state = Arc::new(MiningState::new("stratum+tcp://pool:10300", testnet));
        state.add_hashes(initial_counter);
        let gauge = Arc::new(HashrateGauge::new());
        let prompt = Arc::new(RecordingPrompt::default());
        let t0 = Instant::now();
        let monitor = StatusMonitor::starting_at(
            Arc::clone(&state),
            Arc::clone(&gauge),
            prompt.clone(),
            t0,
        );
        Fixture {
            state,
            gauge,
            prompt,
            monitor,
            t0,
        }
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_starts_idle_without_publishing() {
        let mut f = fixture(false, 0);
        assert_eq!(f.monitor.liveness(), Liveness::Idle);
        assert!(f.monitor.tick(f.t0 + secs(1.0)).is_none());
        assert_eq!(f.prompt.count(), 0);
        assert!(f.monitor.render().contains("NOT MINING"));
    }

    #[test]
    fn test_rate_over_one_second_equals_delta() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(1000);
        let prompt = f.monitor.tick(f.t0 + secs(1.0)).expect("counter advanced");

        assert_eq!(f.gauge.get(), 1000);
        assert_eq!(f.monitor.liveness(), Liveness::Mining);
        assert!(prompt.contains("MINING @ 1.00 KH/s"));
        assert_eq!(f.prompt.last(), Some(prompt));
    }

    #[test]
    fn test_rate_uses_actual_elapsed_time() {
        let mut f = fixture(false, 1000);
        f.state.add_hashes(500);
        f.monitor.tick(f.t0 + secs(2.0));
        assert_eq!(f.gauge.get(), 250);
    }

    #[test]
    fn test_zero_elapsed_defers_update() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(300);
        assert!(f.monitor.tick(f.t0).is_none());
        assert_eq!(f.gauge.get(), 0);
        assert_eq!(f.monitor.liveness(), Liveness::Idle);

        f.monitor.tick(f.t0 + secs(1.5));
        assert_eq!(f.gauge.get(), 200);
    }

    #[test]
    fn test_goes_idle_after_five_seconds_without_progress() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(100);
        f.monitor.tick(f.t0 + secs(1.0));
        assert_eq!(f.monitor.liveness(), Liveness::Mining);

        // Exactly five seconds is still mining.
        assert!(f.monitor.tick(f.t0 + secs(6.0)).is_none());
        assert_eq!(f.monitor.liveness(), Liveness::Mining);

        let prompt = f.monitor.tick(f.t0 + secs(6.5)).expect("idle transition");
        assert_eq!(f.monitor.liveness(), Liveness::Idle);
        assert!(prompt.contains("NOT MINING"));
        assert_eq!(f.gauge.get(), 0);

        // Staying idle does not republish.
        assert!(f.monitor.tick(f.t0 + secs(20.0)).is_none());
    }

    #[test]
    fn test_resumes_mining_on_next_advance() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(100);
        f.monitor.tick(f.t0 + secs(1.0));
        f.monitor.tick(f.t0 + secs(7.0));
        assert_eq!(f.monitor.liveness(), Liveness::Idle);

        f.state.add_hashes(100);
        f.monitor.tick(f.t0 + secs(8.0));
        assert_eq!(f.monitor.liveness(), Liveness::Mining);
        assert!(f.gauge.get() > 0);
    }

    #[test]
    fn test_rate_after_idle_gap_uses_last_tick() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(1000);
        f.monitor.tick(f.t0 + secs(1.0));
        assert_eq!(f.gauge.get(), 1000);

        for s in 2..=61 {
            f.monitor.tick(f.t0 + secs(s as f64));
        }
        assert_eq!(f.monitor.liveness(), Liveness::Idle);

        f.state.add_hashes(1000);
        f.monitor.tick(f.t0 + secs(62.0));
        assert_eq!(f.monitor.liveness(), Liveness::Mining);
        assert_eq!(f.gauge.get(), 1000);
    }

    #[test]
    fn test_quiet_ticks_while_mining_keep_the_window() {
        let mut f = fixture(false, 0);
        f.state.add_hashes(1000);
        f.monitor.tick(f.t0 + secs(1.0));

        assert!(f.monitor.tick(f.t0 + secs(2.0)).is_none());
        f.state.add_hashes(1000);
        f.monitor.tick(f.t0 + secs(3.0));
        assert_eq!(f.gauge.get(), 500);
    }

    #[test]
    fn test_prompt_shows_shares_and_testnet() {
        let mut f = fixture(true, 0);
        f.state.record_share(crate::stats::state::ShareResult::Accepted);
        f.state.record_share(crate::stats::state::ShareResult::Rejected);
        f.state.add_hashes(10);
        let prompt = f.monitor.tick(f.t0 + secs(1.0)).unwrap();

        assert!(prompt.contains("Shares 2 Rejected 1"));
        assert!(prompt.contains("TESTNET"));
        assert!(prompt.contains("DERO Miner"));
    }

    #[test]
    fn test_mining_and_idle_use_distinct_colors() {
        let mut f = fixture(false, 0);
        let idle = f.monitor.render();
        f.state.add_hashes(10);
        let mining = f.monitor.tick(f.t0 + secs(1.0)).unwrap();

        assert!(idle.contains(&format!("{}NOT MINING", RED)));
        assert!(mining.contains(&format!("{}MINING @", GREEN)));
        assert!(!mining.contains("TESTNET"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_samples_and_stops_on_cancel() {
        let state = Arc::new(MiningState::new("", false));
        let gauge = Arc::new(HashrateGauge::new());
        let prompt = Arc::new(RecordingPrompt::default());
        let monitor = StatusMonitor::new(Arc::clone(&state), Arc::clone(&gauge), prompt.clone());
        let cancel = CancellationToken::new();

        state.add_hashes(2000);
        let handle = tokio::spawn(monitor.run(cancel.clone()));

        time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(gauge.get(), 2000);
        assert!(prompt.prompts.lock().unwrap()[0].contains("NOT MINING"));
        assert!(prompt.last().unwrap().contains("MINING @ 2.00 KH/s"));

        cancel.cancel();
        time::timeout(TICK_PERIOD, handle)
            .await
            .expect("monitor must stop within one tick")
            .unwrap();
    }
}
