// Dashboard state - everything the operator sees, updated by poll cycles and controls
use crate::application::derivation::derive_cycle;
use crate::application::random_source::RandomSource;
use crate::domain::channel::ChannelView;
use crate::domain::event_log::{EventLog, EventLogEntry, Severity};
use crate::domain::reading::{ChannelId, Reading};
use crate::domain::settings::SystemSettings;
use crate::domain::system_info::{SystemInfo, format_uptime};
use serde::Serialize;
use tokio::time::Instant;

pub const OVERLOAD_EVENT: &str = "MAX POWER EXCEEDED";
pub const CONNECTION_LOST_EVENT: &str = "Data source connection lost";

/// Read-only copy of the dashboard for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub channel1: ChannelView,
    pub channel2: ChannelView,
    pub system_info: SystemInfo,
    pub settings: SystemSettings,
    pub max_power_input: String,
    pub event_log: Vec<EventLogEntry>,
}

pub struct DashboardState {
    pub(crate) settings: SystemSettings,
    pub(crate) channels: [ChannelView; 2],
    pub(crate) info: SystemInfo,
    pub(crate) log: EventLog,
    pub(crate) max_power_input: String,
    random: Box<dyn RandomSource>,
    started_at: Instant,
}

impl DashboardState {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        let settings = SystemSettings::default();
        Self {
            info: SystemInfo::new(&settings),
            max_power_input: settings.max_power_limit.to_string(),
            settings,
            channels: [ChannelView::offline(), ChannelView::offline()],
            log: EventLog::new(),
            random,
            started_at: Instant::now(),
        }
    }

    pub fn settings(&self) -> &SystemSettings {
        &self.settings
    }

    pub fn log_event(&mut self, message: impl Into<String>, severity: Severity) {
        self.log.push(message, severity);
        if let Some(entry) = self.log.latest() {
            match entry.severity.level() {
                tracing::Level::ERROR => tracing::error!("Dashboard event: {}", entry.message),
                tracing::Level::WARN => tracing::warn!("Dashboard event: {}", entry.message),
                _ => tracing::info!("Dashboard event: {}", entry.message),
            }
        }
    }

    /// Apply a successfully fetched reading.
    pub fn apply_reading(&mut self, reading: &Reading) {
        let cycle = derive_cycle(reading, &self.settings, self.random.as_mut());

        if cycle.report_overload {
            self.log_event(OVERLOAD_EVENT, Severity::Error);
        }

        tracing::debug!(
            total_power = cycle.total_power,
            channel1 = %cycle.channel(ChannelId::One).status,
            channel2 = %cycle.channel(ChannelId::Two).status,
            "Poll cycle derived"
        );

        self.info.set_total_power(cycle.total_power_display());
        self.channels = cycle.channels;
    }

    /// Apply a failed fetch. Enabled channels switch to the error view,
    /// disabled ones are forced back to offline.
    pub fn apply_fetch_failure(&mut self) {
        self.log_event(CONNECTION_LOST_EVENT, Severity::Error);
        for channel in ChannelId::ALL {
            self.channels[channel.index()] = if self.settings.is_enabled(channel) {
                ChannelView::unavailable()
            } else {
                ChannelView::offline()
            };
        }
    }

    pub fn refresh_uptime(&mut self) {
        self.info.uptime = format_uptime(self.started_at.elapsed());
    }

    /// Push any settings change into the derived system summary.
    pub(crate) fn sync_settings(&mut self) {
        self.info.sync_settings(&self.settings);
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            channel1: self.channels[0].clone(),
            channel2: self.channels[1].clone(),
            system_info: self.info.clone(),
            settings: self.settings.clone(),
            max_power_input: self.max_power_input.clone(),
            event_log: self.log.iter().cloned().collect(),
        }
    }
}
