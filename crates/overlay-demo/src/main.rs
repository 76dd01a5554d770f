use std::sync::Arc;

use anyhow::{Context, Result};
use overlay_config::{OverlayConfig, PrepareMode};
use overlay_core::{Component, Theme, Transition};

mod components;
mod renderers;

use components::{Health, Item};
use renderers::{HealthRenderer, ItemRenderer};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = OverlayConfig::load();
    log::info!(
        "prepare mode: {:?}, cache sweep interval: {}",
        config.prepare.mode,
        config.cache.sweep_interval
    );

    let components: Vec<Arc<dyn Component>> =
        vec![Arc::new(Health::default()), Arc::new(Item::default())];

    let builder = Theme::builder()
        .with_cache_config(config.cache.clone())
        .associate::<Health, HealthRenderer>()
        .associate::<Item, ItemRenderer>();

    let (theme, pending) = match config.prepare.mode {
        PrepareMode::Lazy => (builder.build(), None),
        PrepareMode::Eager => (builder.build_and_prepare(&components)?, None),
        PrepareMode::Background => {
            let (theme, handle) = builder.async_build_and_prepare(&components)?;
            (theme, Some(handle))
        }
    };

    // Draw the HUD once
    for component in &components {
        theme.renderer_for_dyn(component)?.render(component.as_ref());
    }

    if let Some(handle) = pending {
        let prepared = handle.join()?;
        log::info!("background prepare finished with {} renderers", prepared);
    }
    log::info!("{:?}", theme);

    let transition = match config.demo.transition.as_deref() {
        Some(name) => name
            .parse::<Transition>()
            .with_context(|| format!("invalid demo transition `{}`", name))?,
        None => Transition::HighEase,
    };
    sample_transition(transition, config.demo.frames);

    Ok(())
}

/// Print `frames + 1` evenly spaced samples of `transition`.
fn sample_transition(transition: Transition, frames: u32) {
    let frames = frames.max(1);
    println!("=== {} ===", transition);
    for frame in 0..=frames {
        let progress = f64::from(frame) / f64::from(frames);
        println!("{:>5.1}% -> {:.6}", progress * 100.0, transition.apply(progress));
    }
}
