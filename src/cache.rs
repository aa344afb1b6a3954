// ============================================================================
// GLASS EFFECT CACHE — byte-budgeted LRU of finished glass rasters
// ============================================================================
//
// Owned by whoever orchestrates rendering and shared with renderers through
// an `Arc`.  Values are `SharedRaster`s: a hit hands back the very buffer that
// was stored, never a copy.

use std::sync::{Mutex, MutexGuard};

use lru::LruCache;

use crate::raster::{byte_size, SharedRaster};

/// Resident-byte budget for all cached rasters (15 MiB).
pub const DEFAULT_BUDGET_BYTES: usize = 15 * 1024 * 1024;

/// Snapshot of cache occupancy and traffic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub resident_bytes: usize,
    pub hits: u64,
    pub misses: u64,
}

struct CacheState {
    entries: LruCache<String, SharedRaster>,
    resident_bytes: usize,
    hits: u64,
    misses: u64,
}

pub struct GlassEffectCache {
    state: Mutex<CacheState>,
    budget_bytes: usize,
}

impl GlassEffectCache {
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_BUDGET_BYTES)
    }

    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                resident_bytes: 0,
                hits: 0,
                misses: 0,
            }),
            budget_bytes,
        }
    }

    /// Cache key for one consumer's glass layer.
    ///
    /// The radius uses `Debug` formatting so `25.0` stays `25.0`; distinct
    /// floats always print distinctly.
    pub fn key(consumer_id: i32, width: u32, height: u32, blur_radius: f32, is_dark: bool) -> String {
        format!("{}{}x{}_{:?}_{}", Self::namespace(consumer_id), width, height, blur_radius, is_dark)
    }

    /// Prefix shared by every key of one consumer.  The trailing `_` keeps
    /// consumer 1 from matching consumer 12.
    fn namespace(consumer_id: i32) -> String {
        format!("glass_{}_", consumer_id)
    }

    pub fn get(&self, key: &str) -> Option<SharedRaster> {
        let mut state = self.lock();
        match state.entries.get(key).cloned() {
            Some(raster) => {
                state.hits += 1;
                Some(raster)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    /// Insert or replace, then evict least-recently-used entries until the
    /// budget holds.  A raster bigger than the whole budget is not kept.
    pub fn put(&self, key: impl Into<String>, raster: SharedRaster) {
        let size = byte_size(&raster);
        let mut state = self.lock();
        let key = key.into();

        if let Some(old) = state.entries.pop(&key) {
            state.resident_bytes -= byte_size(&old);
        }
        if size > self.budget_bytes {
            return;
        }

        state.entries.put(key, raster);
        state.resident_bytes += size;

        while state.resident_bytes > self.budget_bytes {
            match state.entries.pop_lru() {
                Some((_, evicted)) => state.resident_bytes -= byte_size(&evicted),
                None => break,
            }
        }
    }

    /// Drop every entry belonging to `consumer_id`.
    pub fn invalidate(&self, consumer_id: i32) {
        let prefix = Self::namespace(consumer_id);
        let mut state = self.lock();
        let doomed: Vec<String> = state
            .entries
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(k, _)| k.clone())
            .collect();
        for key in doomed {
            if let Some(old) = state.entries.pop(&key) {
                state.resident_bytes -= byte_size(&old);
            }
        }
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.resident_bytes = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entries: state.entries.len(),
            resident_bytes: state.resident_bytes,
            hits: state.hits,
            misses: state.misses,
        }
    }

    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    // Poisoned locks are recovered.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for GlassEffectCache {
    fn default() -> Self {
        Self::new()
    }
}
