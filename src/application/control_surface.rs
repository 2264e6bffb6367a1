// Control surface - operator actions that mutate the dashboard settings
use crate::application::dashboard_state::DashboardState;
use crate::domain::channel::ChannelView;
use crate::domain::event_log::Severity;
use crate::domain::reading::ChannelId;
use crate::domain::settings::{
    CURRENT_LIMIT_RANGE, SystemMode, VOLTAGE_CALIBRATION_RANGE, clamp_to_range, parse_power_limit,
};
use serde::Deserialize;

pub const SHUTDOWN_EVENT: &str = "EMERGENCY SHUTDOWN INITIATED";
pub const INVALID_POWER_LIMIT_EVENT: &str = "Invalid max power limit";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ControlAction {
    SetMode { mode: SystemMode },
    ToggleChannel { channel: u8 },
    SetVoltageCalibration { value: f64 },
    SetCurrentLimit { value: f64 },
    SetMaxPowerInput { text: String },
    CommitMaxPowerLimit,
    EmergencyShutdown,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("SHUTDOWN can only be entered through the emergency shutdown")]
    ReservedMode,
    #[error("unknown channel {0}")]
    UnknownChannel(u8),
    #[error("slider value must be a finite number")]
    NonFiniteValue,
    #[error("invalid max power limit: {0:?}")]
    InvalidPowerLimit(String),
}

/// What the polling controller has to do after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    /// The action was ignored, nothing changed.
    Ignored,
    /// Settings changed but polling is unaffected.
    Applied,
    /// Settings feeding the derivation changed; restart the poll clock.
    Reschedule,
    /// The system entered SHUTDOWN; polling must stay stopped.
    Shutdown,
}

impl DashboardState {
    pub fn apply_action(&mut self, action: ControlAction) -> Result<ControlEffect, ControlError> {
        match action {
            ControlAction::SetMode { mode } => self.change_mode(mode),
            ControlAction::ToggleChannel { channel } => {
                let channel = ChannelId::from_number(channel)
                    .ok_or(ControlError::UnknownChannel(channel))?;
                Ok(self.toggle_channel(channel))
            }
            ControlAction::SetVoltageCalibration { value } => self.set_voltage_calibration(value),
            ControlAction::SetCurrentLimit { value } => self.set_current_limit(value),
            ControlAction::SetMaxPowerInput { text } => {
                self.max_power_input = text;
                Ok(ControlEffect::Applied)
            }
            ControlAction::CommitMaxPowerLimit => self.commit_max_power_limit(),
            ControlAction::EmergencyShutdown => Ok(self.emergency_shutdown()),
        }
    }

    pub fn change_mode(&mut self, mode: SystemMode) -> Result<ControlEffect, ControlError> {
        if self.settings.is_shutdown() {
            return Ok(ControlEffect::Ignored);
        }
        if mode == SystemMode::Shutdown {
            return Err(ControlError::ReservedMode);
        }

        self.settings.mode = mode;
        self.sync_settings();
        self.log_event(format!("System mode changed to {mode}"), Severity::Info);
        Ok(ControlEffect::Applied)
    }

    pub fn toggle_channel(&mut self, channel: ChannelId) -> ControlEffect {
        if self.settings.is_shutdown() {
            return ControlEffect::Ignored;
        }

        let enabled = !self.settings.is_enabled(channel);
        self.settings.set_enabled(channel, enabled);
        let state = if enabled { "ONLINE" } else { "OFFLINE" };
        self.log_event(
            format!("Channel {} set to {state}", channel.number()),
            Severity::Warning,
        );
        ControlEffect::Reschedule
    }

    pub fn set_voltage_calibration(&mut self, value: f64) -> Result<ControlEffect, ControlError> {
        let value = clamp_to_range(value, &VOLTAGE_CALIBRATION_RANGE)
            .ok_or(ControlError::NonFiniteValue)?;

        self.settings.voltage_calibration = value;
        self.sync_settings();
        self.log_event(format!("Voltage calibration set to {value:+.1}V"), Severity::Info);
        Ok(ControlEffect::Reschedule)
    }

    pub fn set_current_limit(&mut self, value: f64) -> Result<ControlEffect, ControlError> {
        let value =
            clamp_to_range(value, &CURRENT_LIMIT_RANGE).ok_or(ControlError::NonFiniteValue)?;

        self.settings.current_limit = value;
        self.sync_settings();
        self.log_event(format!("Current limit set to {value:.1}A"), Severity::Info);
        Ok(ControlEffect::Reschedule)
    }

    /// Commit the pending max power input. A rejected input keeps the prior limit.
    pub fn commit_max_power_limit(&mut self) -> Result<ControlEffect, ControlError> {
        let Some(limit) = parse_power_limit(&self.max_power_input) else {
            self.log_event(INVALID_POWER_LIMIT_EVENT, Severity::Error);
            return Err(ControlError::InvalidPowerLimit(self.max_power_input.clone()));
        };

        self.settings.max_power_limit = limit;
        self.sync_settings();
        self.log_event(format!("Max power limit set to {limit}W"), Severity::Info);
        Ok(ControlEffect::Reschedule)
    }

    /// Enter SHUTDOWN. The caller stops the poll clock before applying this.
    pub fn emergency_shutdown(&mut self) -> ControlEffect {
        if self.settings.is_shutdown() {
            return ControlEffect::Ignored;
        }

        self.log_event(SHUTDOWN_EVENT, Severity::Error);
        self.settings.mode = SystemMode::Shutdown;
        for channel in ChannelId::ALL {
            self.settings.set_enabled(channel, false);
        }
        self.channels = [ChannelView::offline(), ChannelView::offline()];
        self.sync_settings();
        self.info.set_total_power("0".to_string());
        ControlEffect::Shutdown
    }
}
