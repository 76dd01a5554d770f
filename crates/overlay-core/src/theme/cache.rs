//! Per-component renderer cache.
//!
//! Entries are keyed by component allocation and hold only a `Weak` to the
//! component. A `Weak` keeps the allocation's address reserved, so a key can
//! never be reused by another component while its slot exists; slots whose
//! component has been dropped are removed lazily by [`RendererCache::sweep`].

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::OnceCell;
use overlay_config::CacheConfig;

use crate::component::{Component, ComponentKey, ComponentProbe};
use crate::renderer::ErasedRenderer;

/// One cache entry. The renderer is constructed at most once per slot.
pub(crate) struct CacheSlot {
    probe: ComponentProbe,
    renderer: OnceCell<Arc<dyn ErasedRenderer>>,
}

impl CacheSlot {
    fn new(component: &Arc<dyn Component>) -> Self {
        Self {
            probe: ComponentProbe::new(component),
            renderer: OnceCell::new(),
        }
    }

    pub(crate) fn renderer(&self) -> &OnceCell<Arc<dyn ErasedRenderer>> {
        &self.renderer
    }
}

pub(crate) struct RendererCache {
    entries: DashMap<ComponentKey, Arc<CacheSlot>>,
    sweep_interval: usize,
    insertions: AtomicUsize,
}

impl RendererCache {
    pub(crate) fn new(config: &CacheConfig) -> Self {
        Self {
            entries: DashMap::with_capacity(config.initial_capacity),
            sweep_interval: config.sweep_interval,
            insertions: AtomicUsize::new(0),
        }
    }

    /// Constructed renderer for a live component, if any.
    pub(crate) fn lookup(&self, key: ComponentKey) -> Option<Arc<dyn ErasedRenderer>> {
        let slot = self.entries.get(&key)?;
        slot.renderer.get().cloned()
    }

    /// Slot for `component`, inserting an empty one on first lookup.
    ///
    /// Slots stay in place when construction fails so that every lookup
    /// for a live component shares one `OnceCell`; `len` skips them and
    /// `sweep` collects them once the component is dropped.
    pub(crate) fn slot_for(
        &self,
        key: ComponentKey,
        component: &Arc<dyn Component>,
    ) -> Arc<CacheSlot> {
        let (slot, inserted) = match self.entries.entry(key) {
            Entry::Occupied(occupied) => (occupied.get().clone(), false),
            Entry::Vacant(vacant) => {
                let fresh = Arc::new(CacheSlot::new(component));
                vacant.insert(fresh.clone());
                (fresh, true)
            }
        };

        // Shard lock is released here; sweeping needs it.
        if inserted {
            self.note_insertion();
        }
        slot
    }

    pub(crate) fn evict(&self, key: ComponentKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    /// Removes entries whose component has been dropped.
    pub(crate) fn sweep(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, slot| {
            let alive = slot.probe.is_alive();
            if !alive {
                removed += 1;
            }
            alive
        });
        if removed > 0 {
            log::debug!("swept {} dead renderer cache entries", removed);
        }
        removed
    }

    /// Entries holding a constructed renderer, including ones whose
    /// component was dropped but not yet swept.
    pub(crate) fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().renderer.get().is_some())
            .count()
    }

    fn note_insertion(&self) {
        if self.sweep_interval == 0 {
            return;
        }
        let count = self.insertions.fetch_add(1, Ordering::Relaxed) + 1;
        if count % self.sweep_interval == 0 {
            self.sweep();
        }
    }
}
