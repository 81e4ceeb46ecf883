// SPDX-License-Identifier: MIT
use tracing::warn;

/// Default growth slack reserved on reallocation
pub const DEFAULT_BUFFER_MARGIN: usize = 1024;

/// Default upper bound for a single buffer (10 MiB)
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Default minimum run length reported by the string finder
pub const DEFAULT_STRINGS_MIN_LENGTH: usize = 3;

/// Growth policy for [`crate::ByteBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Extra bytes reserved past the new length whenever storage grows
    pub margin: usize,
    /// Hard ceiling on the logical length
    pub max_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_BUFFER_MARGIN,
            max_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }
}

/// Settings for the background string scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub min_length: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_STRINGS_MIN_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub buffer: BufferConfig,
    pub scan: ScanConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            buffer: BufferConfig {
                margin: env_or("HEXVIEW_BUFFER_MARGIN", DEFAULT_BUFFER_MARGIN),
                max_size: env_or("HEXVIEW_MAX_BUFFER_SIZE", DEFAULT_MAX_BUFFER_SIZE),
            },
            scan: ScanConfig {
                min_length: env_or("HEXVIEW_STRINGS_MIN_LENGTH", DEFAULT_STRINGS_MIN_LENGTH),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer.max_size == 0 {
            return Err("HEXVIEW_MAX_BUFFER_SIZE must be greater than 0".to_string());
        }

        if self.buffer.margin > self.buffer.max_size {
            return Err(format!(
                "HEXVIEW_BUFFER_MARGIN ({}) cannot exceed HEXVIEW_MAX_BUFFER_SIZE ({})",
                self.buffer.margin, self.buffer.max_size
            ));
        }

        if self.scan.min_length == 0 {
            return Err("HEXVIEW_STRINGS_MIN_LENGTH must be at least 1".to_string());
        }

        Ok(())
    }
}

fn env_or(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring non-numeric {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
