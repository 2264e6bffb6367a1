// Status derivation - turns a raw reading plus settings into channel views
use crate::application::random_source::RandomSource;
use crate::domain::channel::{ChannelStatus, ChannelView, NOMINAL_FREQUENCY, PLACEHOLDER};
use crate::domain::reading::{ChannelId, ChannelSample, Reading};
use crate::domain::settings::SystemSettings;

/// Reference voltage that the calibration offset shifts.
pub const NOMINAL_REFERENCE_VOLTAGE: f64 = 220.0;
/// Allowed deviation from the calibrated reference before a channel warns.
pub const VOLTAGE_TOLERANCE: f64 = 15.0;
/// Overload events are logged only when a random draw exceeds this.
const OVERLOAD_REPORT_THRESHOLD: f64 = 0.5;

const EFFICIENCY_FLOOR: f64 = 94.0;
const EFFICIENCY_SPAN: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedCycle {
    pub channels: [ChannelView; 2],
    pub total_power: f64,
    pub overloaded: bool,
    /// Whether this cycle should log an overload event.
    pub report_overload: bool,
}

impl DerivedCycle {
    pub fn channel(&self, channel: ChannelId) -> &ChannelView {
        &self.channels[channel.index()]
    }

    pub fn total_power_display(&self) -> String {
        format!("{:.0}", self.total_power)
    }
}

#[derive(Debug, Clone, Copy)]
struct ChannelState {
    sample: ChannelSample,
    status: ChannelStatus,
}

/// Run one derivation pass. Random draws happen in a fixed order: the
/// overload report roll (only when overloaded), then channel 1 efficiency,
/// then channel 2 efficiency (each only when that channel carries power).
pub fn derive_cycle(
    reading: &Reading,
    settings: &SystemSettings,
    random: &mut dyn RandomSource,
) -> DerivedCycle {
    let mut states = ChannelId::ALL.map(|channel| classify(reading, settings, channel));

    let total_power: f64 = states.iter().map(|s| s.sample.power()).sum();
    let limit = f64::from(settings.max_power_limit);
    let overloaded = settings.max_power_limit > 0 && total_power > limit;

    let mut report_overload = false;
    if overloaded {
        for state in states.iter_mut() {
            if state.status != ChannelStatus::Offline {
                state.status = ChannelStatus::Overload;
            }
        }
        report_overload = random.next_unit() > OVERLOAD_REPORT_THRESHOLD;
    }

    let channels = states.map(|state| format_channel(state, random));

    DerivedCycle {
        channels,
        total_power,
        overloaded,
        report_overload,
    }
}

fn classify(reading: &Reading, settings: &SystemSettings, channel: ChannelId) -> ChannelState {
    if !settings.is_enabled(channel) {
        return ChannelState {
            sample: ChannelSample::default(),
            status: ChannelStatus::Offline,
        };
    }

    let sample = reading.channel(channel);
    let reference = NOMINAL_REFERENCE_VOLTAGE + settings.voltage_calibration;
    let off_reference = (sample.voltage - reference).abs() > VOLTAGE_TOLERANCE;
    let over_current = sample.current > settings.current_limit;

    let status = if off_reference || over_current {
        ChannelStatus::Warning
    } else {
        ChannelStatus::Nominal
    };

    ChannelState { sample, status }
}

fn format_channel(state: ChannelState, random: &mut dyn RandomSource) -> ChannelView {
    if state.status == ChannelStatus::Offline {
        return ChannelView::offline();
    }

    let ChannelSample { voltage, current } = state.sample;
    let carries_power = voltage > 0.0 && current > 0.0;

    let power = if carries_power {
        format!("{:.0}", voltage * current)
    } else {
        PLACEHOLDER.to_string()
    };
    let efficiency = if carries_power {
        format!("{:.1}", EFFICIENCY_FLOOR + random.next_unit() * EFFICIENCY_SPAN)
    } else {
        PLACEHOLDER.to_string()
    };

    ChannelView {
        voltage: format!("{voltage:.1}"),
        current: format!("{current:.2}"),
        frequency: NOMINAL_FREQUENCY.to_string(),
        power,
        efficiency,
        status: state.status,
    }
}
