//! Text renderers for the demo components.
//!
//! Both draw to stdout; a real overlay would paint onto its surface here.

use overlay_core::Renderer;

use crate::components::{Health, Item};

/// Draws a health bar, redrawing only when the value changes.
#[derive(Default)]
pub struct HealthRenderer {
    last_drawn: Option<u32>,
}

impl HealthRenderer {
    const BAR_WIDTH: u64 = 10;

    fn bar(health: &Health) -> String {
        let filled = if health.max == 0 {
            0
        } else {
            // Widened so `health * BAR_WIDTH` cannot overflow
            let current = u64::from(health.health.min(health.max));
            current * Self::BAR_WIDTH / u64::from(health.max)
        };
        let mut bar = "#".repeat(filled as usize);
        bar.push_str(&"-".repeat((Self::BAR_WIDTH - filled) as usize));
        bar
    }
}

impl Renderer<Health> for HealthRenderer {
    fn render(&mut self, health: &Health) {
        if self.last_drawn == Some(health.health) {
            return;
        }
        println!("[{}] I have {} HP!", Self::bar(health), health.health);
        self.last_drawn = Some(health.health);
    }

    fn update(&mut self, health: &Health) {
        if health.health == 0 {
            self.last_drawn = None;
        }
    }
}

/// Draws the held item's name.
#[derive(Default)]
pub struct ItemRenderer;

impl Renderer<Item> for ItemRenderer {
    fn render(&mut self, item: &Item) {
        println!("I have {} in hand!", item.name);
    }
}
