// Polling controller - drives derivation on a poll clock and uptime on a second clock
use crate::application::control_surface::{ControlAction, ControlEffect, ControlError};
use crate::application::dashboard_state::{DashboardSnapshot, DashboardState};
use crate::application::random_source::RandomSource;
use crate::application::reading_source::ReadingSource;
use crate::application::ticker::{CancelToken, TickerFactory};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_UPTIME_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct PollTiming {
    pub poll_interval: Duration,
    pub uptime_interval: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            uptime_interval: DEFAULT_UPTIME_INTERVAL,
        }
    }
}

struct ClockTask {
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

impl ClockTask {
    fn stop(self) {
        // The task observes the token and exits on its own; an in-flight
        // fetch is allowed to finish and its result is dropped.
        self.cancel.cancel();
        drop(self.handle);
    }
}

pub struct DashboardController {
    state: Arc<Mutex<DashboardState>>,
    source: Arc<dyn ReadingSource>,
    tickers: Arc<dyn TickerFactory>,
    timing: PollTiming,
    poll: Option<ClockTask>,
    uptime: Option<ClockTask>,
}

impl DashboardController {
    pub fn new(
        source: Arc<dyn ReadingSource>,
        tickers: Arc<dyn TickerFactory>,
        random: Box<dyn RandomSource>,
        timing: PollTiming,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::new(random))),
            source,
            tickers,
            timing,
            poll: None,
            uptime: None,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    /// Start both clocks. The poll clock fires immediately.
    pub async fn start(&mut self) {
        if self.uptime.is_none() {
            self.uptime = Some(self.spawn_uptime_clock());
        }
        if self.poll.is_none() && !self.state.lock().await.settings().is_shutdown() {
            self.poll = Some(self.spawn_poll_clock());
        }
        tracing::info!(
            poll_interval_ms = self.timing.poll_interval.as_millis() as u64,
            polling = self.is_polling(),
            "Dashboard controller started"
        );
    }

    /// Cancel both clocks.
    pub fn stop(&mut self) {
        self.stop_polling();
        if let Some(task) = self.uptime.take() {
            task.stop();
        }
        tracing::info!("Dashboard controller stopped");
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Apply an operator action and adjust the poll clock accordingly.
    pub async fn dispatch(
        &mut self,
        action: ControlAction,
    ) -> Result<DashboardSnapshot, ControlError> {
        // Stop polling before the state changes so no cycle can land after shutdown.
        if action == ControlAction::EmergencyShutdown {
            self.stop_polling();
        }

        let (effect, snapshot) = {
            let mut state = self.state.lock().await;
            let effect = state.apply_action(action)?;
            (effect, state.snapshot())
        };

        match effect {
            ControlEffect::Reschedule => self.reschedule(),
            ControlEffect::Shutdown => {
                tracing::warn!("Emergency shutdown, polling stopped");
            }
            ControlEffect::Applied | ControlEffect::Ignored => {}
        }

        Ok(snapshot)
    }

    /// Restart the poll clock so the next cycle uses the new settings.
    fn reschedule(&mut self) {
        if self.poll.is_none() {
            return;
        }
        self.stop_polling();
        self.poll = Some(self.spawn_poll_clock());
        tracing::debug!("Poll clock rescheduled");
    }

    fn stop_polling(&mut self) {
        if let Some(task) = self.poll.take() {
            task.stop();
        }
    }

    fn spawn_poll_clock(&self) -> ClockTask {
        let cancel = CancelToken::new();
        let mut ticker = self.tickers.every(self.timing.poll_interval);
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let outcome = source.fetch().await;

                let mut guard = state.lock().await;
                if token.is_cancelled() {
                    tracing::debug!("Discarding poll result after cancellation");
                    break;
                }
                match outcome {
                    Ok(reading) => guard.apply_reading(&reading),
                    Err(e) => {
                        tracing::warn!("Failed to fetch reading: {:#}", e);
                        guard.apply_fetch_failure();
                    }
                }
            }
        });

        ClockTask { cancel, handle }
    }

    fn spawn_uptime_clock(&self) -> ClockTask {
        let cancel = CancelToken::new();
        let mut ticker = self.tickers.every(self.timing.uptime_interval);
        let state = Arc::clone(&self.state);
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => state.lock().await.refresh_uptime(),
                }
            }
        });

        ClockTask { cancel, handle }
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        if let Some(task) = self.poll.take() {
            task.stop();
        }
        if let Some(task) = self.uptime.take() {
            task.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::derivation::tests::FixedRandom;
    use crate::domain::channel::{ChannelStatus, ChannelView, NOT_AVAILABLE};
    use crate::domain::event_log::Severity;
    use crate::domain::reading::Reading;
    use crate::domain::settings::SystemMode;
    use crate::infrastructure::tokio_ticker::TokioTickerFactory;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::sleep;

    /// Reading source returning a fixed reading, or failing when told to.
    struct FakeSource {
        reading: Reading,
        failing: AtomicBool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(reading: Reading) -> Arc<Self> {
            Self::with_delay(reading, Duration::ZERO)
        }

        fn with_delay(reading: Reading, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reading,
                failing: AtomicBool::new(false),
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReadingSource for FakeSource {
        async fn fetch(&self) -> anyhow::Result<Reading> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("connection refused");
            }
            Ok(self.reading)
        }
    }

    fn controller(source: Arc<FakeSource>, random: f64) -> DashboardController {
        DashboardController::new(
            source,
            Arc::new(TokioTickerFactory),
            Box::new(FixedRandom(random)),
            PollTiming::default(),
        )
    }

    fn scenario() -> Reading {
        Reading::new(220.0, 2.0, 225.0, 1.8)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_is_immediate_then_every_two_seconds() {
        let source = FakeSource::new(scenario());
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.channel1.status, ChannelStatus::Nominal);
        assert_eq!(snapshot.channel2.status, ChannelStatus::Nominal);
        assert_eq!(snapshot.system_info.total_power, "845");

        sleep(Duration::from_secs(2)).await;
        assert_eq!(source.calls(), 2);
        sleep(Duration::from_secs(4)).await;
        assert_eq!(source.calls(), 4);
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_uptime_clock_runs_independently_of_polling() {
        let source = FakeSource::new(scenario());
        source.failing.store(true, Ordering::SeqCst);
        let mut controller = controller(source, 0.0);

        controller.start().await;
        sleep(Duration::from_millis(61_500)).await;
        assert_eq!(controller.snapshot().await.system_info.uptime, "00:01:01");
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_marks_enabled_channels_as_error() {
        let source = FakeSource::new(scenario());
        source.failing.store(true, Ordering::SeqCst);
        let mut controller = controller(source, 0.0);

        controller
            .dispatch(ControlAction::ToggleChannel { channel: 2 })
            .await
            .unwrap();
        controller.start().await;
        sleep(Duration::from_millis(10)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.channel1, ChannelView::unavailable());
        assert_eq!(snapshot.channel1.voltage, NOT_AVAILABLE);
        assert_eq!(snapshot.channel2.status, ChannelStatus::Offline);
        assert_eq!(snapshot.event_log[0].message, "Data source connection lost");
        assert_eq!(snapshot.event_log[0].severity, Severity::Error);
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_a_channel_during_outage_shows_offline() {
        let source = FakeSource::new(scenario());
        source.failing.store(true, Ordering::SeqCst);
        let mut controller = controller(source, 0.0);

        controller.start().await;
        sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.snapshot().await.channel1.status, ChannelStatus::Error);

        controller
            .dispatch(ControlAction::ToggleChannel { channel: 1 })
            .await
            .unwrap();
        sleep(Duration::from_secs(5)).await;

        let snapshot = controller.snapshot().await;
        assert!(!snapshot.settings.channel1_enabled);
        assert_eq!(snapshot.channel1, ChannelView::offline());
        assert_eq!(snapshot.channel2.status, ChannelStatus::Error);
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_next_tick_after_failure() {
        let source = FakeSource::new(scenario());
        source.failing.store(true, Ordering::SeqCst);
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.snapshot().await.channel1.status, ChannelStatus::Error);

        source.failing.store(false, Ordering::SeqCst);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(controller.snapshot().await.channel1.status, ChannelStatus::Nominal);
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_change_reschedules_poll_immediately() {
        let source = FakeSource::new(scenario());
        let mut controller = controller(source.clone(), 0.9);

        controller.start().await;
        sleep(Duration::from_millis(500)).await;
        assert_eq!(source.calls(), 1);

        controller
            .dispatch(ControlAction::SetMaxPowerInput { text: "100".to_string() })
            .await
            .unwrap();
        controller
            .dispatch(ControlAction::CommitMaxPowerLimit)
            .await
            .unwrap();
        sleep(Duration::from_millis(10)).await;

        // Rescheduled clock fires right away instead of waiting out the old period.
        assert_eq!(source.calls(), 2);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.channel1.status, ChannelStatus::Overload);
        assert_eq!(snapshot.channel2.status, ChannelStatus::Overload);
        assert_eq!(snapshot.event_log[0].message, "MAX POWER EXCEEDED");
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_change_does_not_reschedule() {
        let source = FakeSource::new(scenario());
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(500)).await;
        controller
            .dispatch(ControlAction::SetMode { mode: SystemMode::Standby })
            .await
            .unwrap();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls(), 1);
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_emergency_shutdown_stops_polling() {
        let source = FakeSource::new(scenario());
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(10)).await;

        let snapshot = controller
            .dispatch(ControlAction::EmergencyShutdown)
            .await
            .unwrap();
        assert!(!controller.is_polling());
        assert_eq!(snapshot.system_info.mode, SystemMode::Shutdown);
        assert_eq!(snapshot.channel1.status, ChannelStatus::Offline);
        assert_eq!(snapshot.channel2.status, ChannelStatus::Offline);
        assert!(!snapshot.settings.channel1_enabled);
        assert!(!snapshot.settings.channel2_enabled);

        let calls = source.calls();
        let log_len = snapshot.event_log.len();

        // Slider changes after shutdown must not bring the poll clock back.
        controller
            .dispatch(ControlAction::SetCurrentLimit { value: 5.0 })
            .await
            .unwrap();
        sleep(Duration::from_secs(10)).await;

        assert!(!controller.is_polling());
        assert_eq!(source.calls(), calls);
        let after = controller.snapshot().await;
        assert_eq!(after.event_log.len(), log_len + 1);
        assert_eq!(after.channel1.status, ChannelStatus::Offline);
        assert_eq!(after.system_info.total_power, "0");
        controller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_is_discarded_after_stop() {
        let source = FakeSource::with_delay(scenario(), Duration::from_secs(1));
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 1);

        controller.stop();
        sleep(Duration::from_secs(5)).await;

        let snapshot = controller.snapshot().await;
        assert_eq!(source.calls(), 1);
        assert_eq!(snapshot.channel1.status, ChannelStatus::Offline);
        assert_eq!(snapshot.system_info.total_power, "-");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_both_clocks() {
        let source = FakeSource::new(scenario());
        let mut controller = controller(source.clone(), 0.0);

        controller.start().await;
        sleep(Duration::from_millis(1500)).await;
        controller.stop();
        let uptime = controller.snapshot().await.system_info.uptime;

        sleep(Duration::from_secs(10)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(controller.snapshot().await.system_info.uptime, uptime);
    }
}
