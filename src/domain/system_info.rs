// System-wide summary shown alongside the channel views
use super::channel::PLACEHOLDER;
use super::settings::{SystemMode, SystemSettings};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInfo {
    pub mode: SystemMode,
    /// Measured aggregate power of both channels.
    pub total_power: String,
    pub uptime: String,
    pub max_power_limit: u32,
    /// Regulation gauge, calibration offset times current limit.
    /// Not derived from readings; kept apart from `total_power` on purpose.
    pub regulation_gauge: String,
    pub overloaded: bool,
}

impl SystemInfo {
    pub fn new(settings: &SystemSettings) -> Self {
        let mut info = Self {
            mode: settings.mode,
            total_power: PLACEHOLDER.to_string(),
            uptime: format_uptime(Duration::ZERO),
            max_power_limit: settings.max_power_limit,
            regulation_gauge: String::new(),
            overloaded: false,
        };
        info.sync_settings(settings);
        info
    }

    /// Refresh every field that mirrors the operator settings.
    pub fn sync_settings(&mut self, settings: &SystemSettings) {
        self.mode = settings.mode;
        self.max_power_limit = settings.max_power_limit;
        self.regulation_gauge = format!(
            "{:.1}",
            settings.voltage_calibration * settings.current_limit
        );
        self.refresh_overloaded();
    }

    pub fn set_total_power(&mut self, total_power: String) {
        self.total_power = total_power;
        self.refresh_overloaded();
    }

    fn refresh_overloaded(&mut self) {
        self.overloaded = leading_integer(&self.total_power)
            .is_some_and(|watts| watts > i64::from(self.max_power_limit));
    }
}

/// Format elapsed time as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

fn leading_integer(text: &str) -> Option<i64> {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    digits[..len].parse::<i64>().ok().map(|v| sign * v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::ZERO), "00:00:00");
        assert_eq!(format_uptime(Duration::from_millis(61_999)), "00:01:01");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 25 * 60 + 7)), "03:25:07");
        assert_eq!(format_uptime(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn test_gauge_is_calibration_times_current_limit() {
        let mut settings = SystemSettings::default();
        settings.voltage_calibration = 2.5;
        settings.current_limit = 4.0;

        let info = SystemInfo::new(&settings);
        assert_eq!(info.regulation_gauge, "10.0");
        assert_eq!(info.total_power, PLACEHOLDER);
        assert!(!info.overloaded);
    }

    #[test]
    fn test_overloaded_flag_follows_total_power() {
        let mut info = SystemInfo::new(&SystemSettings::default());
        info.set_total_power("845".to_string());
        assert!(!info.overloaded);

        info.set_total_power("2501".to_string());
        assert!(info.overloaded);

        let mut settings = SystemSettings::default();
        settings.max_power_limit = 3000;
        info.sync_settings(&settings);
        assert!(!info.overloaded);
    }
}
