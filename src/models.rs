use chrono::{DateTime, Utc};

/// Classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmState {
    #[default]
    Normal,
    InAlarm,
}

/// Emitted only when the alarm state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    EnteredAlarm,
    ExitedAlarm,
}

impl NotificationEvent {
    pub fn subject(self) -> &'static str {
        match self {
            NotificationEvent::EnteredAlarm => "Endpoint is down",
            NotificationEvent::ExitedAlarm => "Endpoint is back online",
        }
    }

    pub fn body(self, endpoint: &str) -> String {
        match self {
            NotificationEvent::EnteredAlarm => format!("Target in alarm: {}", endpoint),
            NotificationEvent::ExitedAlarm => format!("Target: {}", endpoint),
        }
    }
}

/// What happened during one tick of the monitor.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub timestamp: DateTime<Utc>,
    pub probe: ProbeResult,
    pub state: AlarmState,
    pub event: Option<NotificationEvent>,
    /// `None` when no event fired, otherwise whether the provider accepted the mail.
    pub delivered: Option<bool>,
}
