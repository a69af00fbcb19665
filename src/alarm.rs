//! Two-state edge detector.
//!
//! ```text
//!            Offline / EnteredAlarm
//!   Normal ─────────────────────────► InAlarm
//!     ▲  │                              │  ▲
//!     │  └─ Online                      │  └─ Offline
//!     └─────────────────────────────────┘
//!            Online / ExitedAlarm
//! ```
//!
//! Only edges produce an event, so a target that stays down for many ticks
//! yields a single "entered alarm" notification.

use crate::models::{AlarmState, NotificationEvent, ProbeResult};

pub fn transition(
    state: AlarmState,
    probe: ProbeResult,
) -> (AlarmState, Option<NotificationEvent>) {
    match (state, probe) {
        (AlarmState::Normal, ProbeResult::Offline) => {
            (AlarmState::InAlarm, Some(NotificationEvent::EnteredAlarm))
        }
        (AlarmState::InAlarm, ProbeResult::Online) => {
            (AlarmState::Normal, Some(NotificationEvent::ExitedAlarm))
        }
        (state, _) => (state, None),
    }
}
