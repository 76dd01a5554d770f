//! HUD components drawn by the demo overlay.

use overlay_core::Component;

/// Player health readout.
pub struct Health {
    pub health: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            health: 20,
            max: 20,
        }
    }
}

impl Component for Health {}

/// Currently held item.
pub struct Item {
    pub name: String,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            name: "Diamond Sword".to_string(),
        }
    }
}

impl Component for Item {}
