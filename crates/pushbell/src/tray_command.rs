use crate::{TrayIconState, TrayToggle};

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Update the tray icon to a new state.
    SetState(TrayIconState),
    /// Sync a check-mark item with its stored preference.
    SetChecked {
        /// The menu item.
        toggle: TrayToggle,
        /// Whether it is checked.
        checked: bool,
    },
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
