//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with three states (Online, Offline, Snoozed)
//! and a context menu for replaying pushes, the preference toggles and Quit.

use crate::{AppError, AppResult, TrayIconState, TrayToggle};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Menu item ids the async side needs to interpret [`tray_icon::menu::MenuEvent`]s.
///
/// Unlike the menu itself these are `Send`.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// "Show Recent Pushes".
    pub show_recent: MenuId,
    /// "Quit".
    pub quit: MenuId,
    /// Check-mark items.
    pub toggles: Vec<(MenuId, TrayToggle)>,
}

impl TrayMenuIds {
    /// Toggle bound to `id`, if any.
    pub fn toggle_for(&self, id: &MenuId) -> Option<TrayToggle> {
        self.toggles
            .iter()
            .find(|(toggle_id, _)| toggle_id == id)
            .map(|(_, toggle)| *toggle)
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    toggle_items: Vec<(TrayToggle, CheckMenuItem)>,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager in the Offline state, all toggles unchecked.
    ///
    /// The application syncs check marks from the settings once loaded.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let header = MenuItem::new(
            format!("Pushbell {}", env!("CARGO_PKG_VERSION")),
            false,
            None,
        );
        let show_recent_item = MenuItem::new("Show Recent Pushes", true, None);
        let quit_item = MenuItem::new("Quit", true, None);

        let toggle_items: Vec<(TrayToggle, CheckMenuItem)> = TrayToggle::ALL
            .iter()
            .map(|toggle| (*toggle, CheckMenuItem::new(toggle.label(), true, false, None)))
            .collect();

        let menu_error = |e: tray_icon::menu::Error| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        };

        menu.append(&header).map_err(menu_error)?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(menu_error)?;
        menu.append(&show_recent_item).map_err(menu_error)?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(menu_error)?;
        for (_, item) in &toggle_items {
            menu.append(item).map_err(menu_error)?;
        }
        menu.append(&PredefinedMenuItem::separator())
            .map_err(menu_error)?;
        menu.append(&quit_item).map_err(menu_error)?;

        let initial = TrayIconState::Offline;
        let icon = Self::load_icon(initial)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(initial.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let menu_ids = TrayMenuIds {
            show_recent: show_recent_item.id().clone(),
            quit: quit_item.id().clone(),
            toggles: toggle_items
                .iter()
                .map(|(toggle, item)| (item.id().clone(), *toggle))
                .collect(),
        };

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            toggle_items,
            menu_ids,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let icon = Self::load_icon(state)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Set the check mark of `toggle`.
    pub fn set_checked(&self, toggle: TrayToggle, checked: bool) {
        if let Some((_, item)) = self.toggle_items.iter().find(|(t, _)| *t == toggle) {
            item.set_checked(checked);
        }
    }

    /// Ids of the actionable menu items.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    /// Load icon from compile-time embedded PNG bytes.
    ///
    /// Icons are embedded via include_bytes! so they work regardless of
    /// install location.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Online => include_bytes!("../resources/icons/online.png"),
            TrayIconState::Offline => include_bytes!("../resources/icons/offline.png"),
            TrayIconState::Snoozed => include_bytes!("../resources/icons/snoozed.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
