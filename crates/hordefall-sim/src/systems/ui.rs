//! Screen visibility and UI controller registry.
//!
//! Gameplay code never talks to a concrete widget; it shows or hides a
//! [`ScreenId`] and optionally registers a controller object the presentation
//! layer can fetch by type. Controllers are plain structs behind
//! [`UiController`], looked up with a downcast.

use std::any::Any;
use std::collections::{HashMap, HashSet};

use hordefall_core::enums::ScreenId;
use hordefall_core::error::Result;
use hordefall_core::state::UpgradeOfferView;
use hordefall_runtime::{GameContext, GameSystem};
use tracing::debug;

/// Behavior attached to a screen while it is registered.
pub trait UiController: Any {
    /// Called when the owning screen becomes visible.
    fn on_show(&mut self) {}
    /// Called when the owning screen is hidden.
    fn on_hide(&mut self) {}
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Controller backing the upgrade selection screen. Holds the offers the
/// pause coordinator produced so the presentation layer can render them.
pub struct UpgradeSelectionController {
    offers: Vec<UpgradeOfferView>,
}

impl UpgradeSelectionController {
    pub fn new(offers: Vec<UpgradeOfferView>) -> Self {
        Self { offers }
    }

    pub fn offers(&self) -> &[UpgradeOfferView] {
        &self.offers
    }
}

impl UiController for UpgradeSelectionController {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
pub struct UiSystem {
    active: HashSet<ScreenId>,
    controllers: HashMap<ScreenId, Box<dyn UiController>>,
}

impl UiSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_screen(&mut self, screen: ScreenId) {
        if self.active.insert(screen) {
            debug!(?screen, "screen shown");
        }
        if let Some(controller) = self.controllers.get_mut(&screen) {
            controller.on_show();
        }
    }

    pub fn hide_screen(&mut self, screen: ScreenId) {
        if self.active.remove(&screen) {
            debug!(?screen, "screen hidden");
            if let Some(controller) = self.controllers.get_mut(&screen) {
                controller.on_hide();
            }
        }
    }

    pub fn is_screen_active(&self, screen: ScreenId) -> bool {
        self.active.contains(&screen)
    }

    /// Attaches a controller to a screen, replacing any previous one.
    pub fn register_controller(&mut self, screen: ScreenId, controller: Box<dyn UiController>) {
        if self.controllers.insert(screen, controller).is_some() {
            debug!(?screen, "replaced existing screen controller");
        }
    }

    /// Detaches the controller for a screen. Returns false if none was set.
    pub fn unregister_controller(&mut self, screen: ScreenId) -> bool {
        self.controllers.remove(&screen).is_some()
    }

    /// Typed access to a registered controller.
    pub fn controller_mut<T: UiController>(&mut self, screen: ScreenId) -> Option<&mut T> {
        self.controllers
            .get_mut(&screen)
            .and_then(|controller| controller.as_any_mut().downcast_mut::<T>())
    }
}

impl GameSystem for UiSystem {
    fn name(&self) -> &'static str {
        "ui_system"
    }

    fn initialize(&mut self, _ctx: &mut GameContext) -> Result<()> {
        self.active.clear();
        self.controllers.clear();
        Ok(())
    }

    fn cleanup(&mut self, _ctx: &mut GameContext) -> Result<()> {
        for screen in self.active.drain() {
            if let Some(controller) = self.controllers.get_mut(&screen) {
                controller.on_hide();
            }
        }
        self.controllers.clear();
        Ok(())
    }
}
