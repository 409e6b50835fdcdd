use pushbell_core::settings::{ENABLE_SOUND, SHOW_RECENT_PUSHES_ON_STARTUP, SNOOZE_NOTIFICATIONS};

/// Check-mark menu items, each backed by a boolean preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayToggle {
    /// Suppress every notification.
    Snooze,
    /// Replay recent pushes when the app starts.
    ShowRecentOnLaunch,
    /// Play the notification sound.
    EnableSound,
}

impl TrayToggle {
    /// Every toggle, in menu order.
    pub const ALL: [TrayToggle; 3] = [
        TrayToggle::Snooze,
        TrayToggle::ShowRecentOnLaunch,
        TrayToggle::EnableSound,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            TrayToggle::Snooze => "Snooze Notifications",
            TrayToggle::ShowRecentOnLaunch => "Show Recent Pushes On Launch",
            TrayToggle::EnableSound => "Enable Sound",
        }
    }

    /// Settings key holding the toggle's value.
    pub fn settings_key(self) -> &'static str {
        match self {
            TrayToggle::Snooze => SNOOZE_NOTIFICATIONS,
            TrayToggle::ShowRecentOnLaunch => SHOW_RECENT_PUSHES_ON_STARTUP,
            TrayToggle::EnableSound => ENABLE_SOUND,
        }
    }
}
