// Domain layer - Plain data types and pure rules
pub mod channel;
pub mod event_log;
pub mod reading;
pub mod settings;
pub mod system_info;
