use anyhow::Result;
use overlay_core::{Component, Renderer, Theme, ThemeError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Condvar, Weak};
use std::thread;
use std::time::Duration;

struct Health {
    hp: u32,
}
impl Component for Health {}

struct Item {
    name: &'static str,
}
impl Component for Item {}

/// Newtype around a bound component; deliberately left unbound.
struct BossHealth(#[allow(dead_code)] Health);
impl Component for BossHealth {}

type DrawLog = Arc<Mutex<Vec<String>>>;

struct HealthRenderer {
    log: DrawLog,
}

impl Renderer<Health> for HealthRenderer {
    fn render(&mut self, health: &Health) {
        self.log.lock().push(format!("health:{}", health.hp));
    }

    fn update(&mut self, _health: &Health) {
        self.log.lock().push("health:update".to_string());
    }
}

struct ItemRenderer {
    log: DrawLog,
}

impl Renderer<Item> for ItemRenderer {
    fn render(&mut self, item: &Item) {
        self.log.lock().push(format!("item:{}", item.name));
    }
}

/// Theme with Health → HealthRenderer and Item → ItemRenderer whose
/// constructions are counted.
fn counted_theme(log: &DrawLog, constructed: &Arc<AtomicUsize>) -> overlay_core::ThemeBuilder {
    let health_log = log.clone();
    let health_count = constructed.clone();
    let item_log = log.clone();
    let item_count = constructed.clone();

    Theme::builder()
        .associate_with::<Health, _, _, ThemeError>(move || {
            health_count.fetch_add(1, Ordering::SeqCst);
            Ok(HealthRenderer {
                log: health_log.clone(),
            })
        })
        .associate_with::<Item, _, _, ThemeError>(move || {
            item_count.fetch_add(1, Ordering::SeqCst);
            Ok(ItemRenderer {
                log: item_log.clone(),
            })
        })
}

#[test]
fn dispatches_by_exact_component_type() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let theme = counted_theme(&log, &constructed).build();

    let health = Arc::new(Health { hp: 20 });
    let item = Arc::new(Item { name: "sword" });

    theme.renderer_for(&health)?.lock().render(&health);
    theme.renderer_for(&item)?.lock().render(&item);
    theme.renderer_for(&health)?.lock().update(&health);
    // Item renderer keeps the default no-op update
    theme.renderer_for(&item)?.lock().update(&item);

    assert_eq!(*log.lock(), ["health:20", "item:sword", "health:update"]);

    let boss = Arc::new(BossHealth(Health { hp: 900 }));
    let Err(err) = theme.renderer_for(&boss) else {
        panic!("newtype resolved through the inner type's binding");
    };
    assert!(matches!(err, ThemeError::UnboundComponentType { .. }));
    Ok(())
}

#[test]
fn dyn_lookup_picks_the_bound_renderer() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let theme = counted_theme(&log, &constructed).build();

    let components: Vec<Arc<dyn Component>> =
        vec![Arc::new(Health { hp: 7 }), Arc::new(Item { name: "apple" })];

    for component in &components {
        theme.renderer_for_dyn(component)?.render(component.as_ref());
    }

    let health_renderer = theme.renderer_for_dyn(&components[0])?;
    let item_renderer = theme.renderer_for_dyn(&components[1])?;
    assert!(health_renderer.renderer_type().ends_with("HealthRenderer"));
    assert!(item_renderer.renderer_type().ends_with("ItemRenderer"));

    // A renderer handed the wrong component type does nothing
    health_renderer.render(components[1].as_ref());

    assert_eq!(*log.lock(), ["health:7", "item:apple"]);
    Ok(())
}

#[test]
fn same_instance_gets_same_renderer() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let theme = counted_theme(&log, &constructed).build();

    let health = Arc::new(Health { hp: 10 });
    let first = theme.renderer_for(&health)?;
    let second = theme.renderer_for(&health.clone())?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn distinct_instances_get_distinct_renderers() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let theme = counted_theme(&log, &constructed).build();

    let left = Arc::new(Health { hp: 10 });
    let right = Arc::new(Health { hp: 10 });

    let a = theme.renderer_for(&left)?;
    let b = theme.renderer_for(&right)?;
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn cache_does_not_keep_components_alive() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let theme = counted_theme(&log, &constructed).build();

    let health = Arc::new(Health { hp: 1 });
    let probe: Weak<Health> = Arc::downgrade(&health);
    let renderer = theme.renderer_for(&health)?;
    renderer.lock().render(&health);
    assert_eq!(theme.cached_len(), 1);

    drop(health);
    assert!(probe.upgrade().is_none(), "cache kept the component alive");

    assert_eq!(theme.sweep(), 1);
    assert_eq!(theme.cached_len(), 0);
    // The caller's handle outlives the cache entry
    assert_eq!(Arc::strong_count(&renderer), 1);
    Ok(())
}

#[test]
fn unbound_component_type_fails() {
    let theme = Theme::builder().build();
    let item: Arc<dyn Component> = Arc::new(Item { name: "torch" });

    match theme.renderer_for_dyn(&item) {
        Err(ThemeError::UnboundComponentType { component }) => {
            assert!(component.ends_with("Item"), "unexpected type name {component}");
        }
        other => panic!("expected UnboundComponentType, got {:?}", other),
    }
}

#[test]
fn prepared_renderers_are_reused() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));

    let health: Arc<dyn Component> = Arc::new(Health { hp: 20 });
    let item: Arc<dyn Component> = Arc::new(Item { name: "bow" });
    let theme = counted_theme(&log, &constructed).build_and_prepare([&health, &item])?;

    assert_eq!(constructed.load(Ordering::SeqCst), 2);
    assert_eq!(theme.cached_len(), 2);

    theme.renderer_for_dyn(&health)?.render(health.as_ref());
    theme.renderer_for_dyn(&item)?.render(item.as_ref());
    assert_eq!(constructed.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn prepare_stops_at_first_unbound_component() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));

    let components: Vec<Arc<dyn Component>> = vec![
        Arc::new(Health { hp: 1 }),
        Arc::new(BossHealth(Health { hp: 2 })),
        Arc::new(Item { name: "never" }),
    ];

    let result = counted_theme(&log, &constructed).build_and_prepare(&components);
    assert!(matches!(result, Err(ThemeError::UnboundComponentType { .. })));
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn background_prepare_can_be_awaited() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));

    let components: Vec<Arc<dyn Component>> = vec![
        Arc::new(Health { hp: 3 }),
        Arc::new(Item { name: "shield" }),
        Arc::new(Health { hp: 4 }),
    ];

    let (theme, handle) = counted_theme(&log, &constructed).async_build_and_prepare(&components)?;
    assert_eq!(handle.join()?, 3);
    assert!(theme.cached_len() >= 3);

    for component in &components {
        theme.renderer_for_dyn(component)?;
    }
    assert_eq!(constructed.load(Ordering::SeqCst), 3);
    Ok(())
}

#[test]
fn background_prepare_reports_failures() -> Result<()> {
    let theme_builder = Theme::builder().associate_with::<Health, HealthRenderer, _, _>(|| {
        Err("renderer assets missing")
    });
    let components: Vec<Arc<dyn Component>> = vec![Arc::new(Health { hp: 1 })];

    let (_theme, handle) = theme_builder.async_build_and_prepare(components)?;
    match handle.join() {
        Err(ThemeError::RendererConstructionFailure { renderer, .. }) => {
            assert!(renderer.ends_with("HealthRenderer"));
        }
        other => panic!("expected construction failure, got {:?}", other),
    }
    Ok(())
}

#[test]
fn concurrent_lookups_construct_once() -> Result<()> {
    const THREADS: usize = 8;

    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();
    let log = DrawLog::default();
    let theme = Theme::builder()
        .associate_with::<Health, _, _, ThemeError>(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // Widen the race window
            thread::sleep(Duration::from_millis(20));
            Ok(HealthRenderer { log: log.clone() })
        })
        .build();

    let health = Arc::new(Health { hp: 50 });
    let barrier = Barrier::new(THREADS);

    let handles = thread::scope(|scope| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    theme.renderer_for(&health)
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().expect("lookup thread panicked"))
            .collect::<Vec<_>>()
    });

    let mut renderers = Vec::with_capacity(THREADS);
    for handle in handles {
        renderers.push(handle?);
    }
    for renderer in &renderers[1..] {
        assert!(Arc::ptr_eq(&renderers[0], renderer));
    }
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn slow_construction_does_not_block_other_components() -> Result<()> {
    let gate = Arc::new((std::sync::Mutex::new(false), Condvar::new()));
    let entered = Arc::new(AtomicBool::new(false));
    let log = DrawLog::default();

    let factory_gate = gate.clone();
    let factory_entered = entered.clone();
    let health_log = log.clone();
    let item_log = log.clone();
    let theme = Theme::builder()
        .associate_with::<Health, _, _, ThemeError>(move || {
            factory_entered.store(true, Ordering::SeqCst);
            let (open, signal) = &*factory_gate;
            let mut open = open.lock().expect("gate poisoned");
            while !*open {
                open = signal.wait(open).expect("gate poisoned");
            }
            Ok(HealthRenderer {
                log: health_log.clone(),
            })
        })
        .associate_with::<Item, _, _, ThemeError>(move || {
            Ok(ItemRenderer {
                log: item_log.clone(),
            })
        })
        .build();

    let health = Arc::new(Health { hp: 8 });
    let item = Arc::new(Item { name: "map" });

    thread::scope(|scope| -> Result<()> {
        let slow = scope.spawn(|| theme.renderer_for(&health).map(|_| ()));

        while !entered.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        // Health construction is parked on the gate; Item must still resolve
        theme.renderer_for(&item)?.lock().render(&item);

        let (open, signal) = &*gate;
        *open.lock().expect("gate poisoned") = true;
        signal.notify_all();

        slow.join().expect("slow lookup panicked")?;
        Ok(())
    })?;

    assert_eq!(*log.lock(), ["item:map"]);
    assert_eq!(theme.cached_len(), 2);
    Ok(())
}

#[test]
fn retry_after_failed_construction_is_shared() -> Result<()> {
    let attempts = Arc::new(AtomicUsize::new(0));
    let entered = Arc::new(AtomicBool::new(false));
    let log = DrawLog::default();

    let factory_attempts = attempts.clone();
    let factory_entered = entered.clone();
    let theme = Theme::builder()
        .associate_with::<Health, _, _, &'static str>(move || {
            let attempt = factory_attempts.fetch_add(1, Ordering::SeqCst);
            factory_entered.store(true, Ordering::SeqCst);
            // Keep the first attempt running while a second lookup queues up
            thread::sleep(Duration::from_millis(100));
            if attempt == 0 {
                Err("surface not ready")
            } else {
                Ok(HealthRenderer { log: log.clone() })
            }
        })
        .build();

    let health = Arc::new(Health { hp: 9 });

    let retried = thread::scope(|scope| {
        let failing = scope.spawn(|| theme.renderer_for(&health));
        while !entered.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        let waiting = scope.spawn(|| theme.renderer_for(&health));

        let failed = failing.join().expect("first lookup panicked");
        assert!(matches!(
            failed,
            Err(ThemeError::RendererConstructionFailure { .. })
        ));
        waiting.join().expect("second lookup panicked")
    })?;

    let cached = theme.renderer_for(&health)?;
    assert!(Arc::ptr_eq(&retried, &cached));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(theme.cached_len(), 1);
    Ok(())
}

#[test]
fn rebinding_does_not_affect_built_themes() -> Result<()> {
    let log = DrawLog::default();
    let constructed = Arc::new(AtomicUsize::new(0));
    let builder = counted_theme(&log, &constructed);
    let before = builder.build();

    let builder = builder.associate_with::<Health, HealthRenderer, _, _>(|| Err("replaced"));
    let after = builder.build();

    let health = Arc::new(Health { hp: 2 });
    assert!(before.renderer_for(&health).is_ok());
    assert!(matches!(
        after.renderer_for(&health),
        Err(ThemeError::RendererConstructionFailure { .. })
    ));
    Ok(())
}
