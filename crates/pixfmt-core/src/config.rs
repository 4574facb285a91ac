//! Process-wide settings with environment overrides.
//!
//! Settings are resolved once, on first use, and never change afterwards.
//! A host application that wants fixed values can [`Settings::install`]
//! them before touching any color model.
//!
//! # Environment Variables
//!
//! - `PIXFMT_INDEX_CACHE` - entries in each indexed color model's
//!   nearest-color cache (default 20, clamped to 1..=1024)
//! - `PIXFMT_PREBUILD_LUTS` - build all gamma tables when the first color
//!   model is created instead of on first use ("1" or "true")

use std::env;
use std::sync::OnceLock;

use tracing::debug;

/// Default nearest-color cache size.
pub const DEFAULT_INDEX_CACHE_ENTRIES: usize = 20;

/// Upper bound for the nearest-color cache size.
pub const MAX_INDEX_CACHE_ENTRIES: usize = 1024;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Tunables for the conversion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Capacity of the per-model nearest-color lookup cache.
    pub index_cache_entries: usize,
    /// Eagerly build gamma lookup tables.
    pub prebuild_luts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_cache_entries: DEFAULT_INDEX_CACHE_ENTRIES,
            prebuild_luts: false,
        }
    }
}

impl Settings {
    /// Defaults overridden by any `PIXFMT_*` environment variables.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(n) = env_usize("PIXFMT_INDEX_CACHE") {
            settings = settings.with_index_cache_entries(n);
        }
        if let Some(flag) = env_flag("PIXFMT_PREBUILD_LUTS") {
            settings.prebuild_luts = flag;
        }
        settings
    }

    /// Sets the cache size, clamped to `1..=MAX_INDEX_CACHE_ENTRIES`.
    pub fn with_index_cache_entries(mut self, entries: usize) -> Self {
        self.index_cache_entries = entries.clamp(1, MAX_INDEX_CACHE_ENTRIES);
        self
    }

    /// Sets eager LUT construction.
    pub fn with_prebuild_luts(mut self, prebuild: bool) -> Self {
        self.prebuild_luts = prebuild;
        self
    }

    /// Pins these settings for the rest of the process.
    ///
    /// Returns `false` if settings were already resolved.
    pub fn install(self) -> bool {
        SETTINGS.set(self).is_ok()
    }
}

/// The active settings, resolved from the environment on first call.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let s = Settings::from_env();
        debug!(
            index_cache_entries = s.index_cache_entries,
            prebuild_luts = s.prebuild_luts,
            "pixfmt settings resolved"
        );
        s
    })
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok()?.trim().parse().ok()
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
