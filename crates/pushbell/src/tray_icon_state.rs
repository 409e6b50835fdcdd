/// Tray icon states reflecting stream connectivity and snooze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Connected to the push stream.
    Online,
    /// Not connected, or no access token configured.
    Offline,
    /// Notifications are snoozed.
    Snoozed,
}

impl TrayIconState {
    /// State to show given connectivity and the snooze preference.
    ///
    /// Snooze wins so the user can always see that nothing will pop up.
    pub fn resolve(connected: bool, snoozed: bool) -> Self {
        match (connected, snoozed) {
            (_, true) => TrayIconState::Snoozed,
            (true, false) => TrayIconState::Online,
            (false, false) => TrayIconState::Offline,
        }
    }

    /// Tooltip shown on hover.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Online => "Pushbell - Connected",
            TrayIconState::Offline => "Pushbell - Offline",
            TrayIconState::Snoozed => "Pushbell - Snoozed",
        }
    }
}
