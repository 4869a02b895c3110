use std::path::PathBuf;
use std::time::Duration;

use storyreel_core::frames::TOTAL_FRAMES;

/// Default location of the preference store.
pub const DEFAULT_STORE_PATH: &str = "storyreel-preferences.json";

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_DISPATCH_DELAY_MS: u64 = 2000;
const DEFAULT_DOWNLOAD_DELAY_MS: u64 = 2000;
const DEFAULT_PREVIEW_DURATION_MS: u64 = 5000;

/// Studio configuration loaded from environment variables.
///
/// Defaults reproduce the timings of the hosted studio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    /// JSON file backing the preference store.
    pub store_path: PathBuf,
    /// Period between simulated frames.
    pub tick_interval: Duration,
    /// Frames revealed per job.
    pub total_frames: u32,
    /// Delay between a valid submit and the `generation-requested` event.
    pub dispatch_delay: Duration,
    /// Delay between "Download Started" and "Download Complete".
    pub download_delay: Duration,
    /// Length of a simulated voice sample.
    pub preview_duration: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            total_frames: TOTAL_FRAMES,
            dispatch_delay: Duration::from_millis(DEFAULT_DISPATCH_DELAY_MS),
            download_delay: Duration::from_millis(DEFAULT_DOWNLOAD_DELAY_MS),
            preview_duration: Duration::from_millis(DEFAULT_PREVIEW_DURATION_MS),
        }
    }
}

impl StudioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                      |
    /// |---------------------------------|------------------------------|
    /// | `STORYREEL_STORE_PATH`          | `storyreel-preferences.json` |
    /// | `STORYREEL_TICK_INTERVAL_MS`    | `1000`                       |
    /// | `STORYREEL_TOTAL_FRAMES`        | `10`                         |
    /// | `STORYREEL_DISPATCH_DELAY_MS`   | `2000`                       |
    /// | `STORYREEL_DOWNLOAD_DELAY_MS`   | `2000`                       |
    /// | `STORYREEL_PREVIEW_DURATION_MS` | `5000`                       |
    ///
    /// Values that fail to parse fall back to the default with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store_path = lookup("STORYREEL_STORE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let total_frames = match parse_var::<u32>(&lookup, "STORYREEL_TOTAL_FRAMES") {
            Some(0) => {
                tracing::warn!("STORYREEL_TOTAL_FRAMES must be at least 1, using default");
                defaults.total_frames
            }
            Some(n) => n,
            None => defaults.total_frames,
        };

        Self {
            store_path,
            tick_interval: millis_var(&lookup, "STORYREEL_TICK_INTERVAL_MS")
                .unwrap_or(defaults.tick_interval),
            total_frames,
            dispatch_delay: millis_var(&lookup, "STORYREEL_DISPATCH_DELAY_MS")
                .unwrap_or(defaults.dispatch_delay),
            download_delay: millis_var(&lookup, "STORYREEL_DOWNLOAD_DELAY_MS")
                .unwrap_or(defaults.download_delay),
            preview_duration: millis_var(&lookup, "STORYREEL_PREVIEW_DURATION_MS")
                .unwrap_or(defaults.preview_duration),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

fn millis_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    parse_var::<u64>(lookup, key).map(Duration::from_millis)
}
