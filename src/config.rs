//! Configuration management
//!
//! All settings come from the environment with sensible defaults; nothing
//! is required. The crop margins are deliberately not environment-tunable:
//! they are the named constant set in [`CropMargins::default`].

use std::env;
use std::path::PathBuf;

use crate::crop::CropMargins;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub crop: CropConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory the static landing page is served from.
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Staging directory for uploaded source files.
    pub upload_dir: PathBuf,
    /// Directory cropped outputs are written to.
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CropConfig {
    pub margins: CropMargins,
    /// Pages processed per batch. Bounds transient footprint only; the
    /// output is identical for any batch size.
    pub batch_size: usize,
}

#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Age past which a managed file is eligible for deletion.
    pub max_age_hours: u64,
    /// Sweep cadence.
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 10000,
                public_dir: PathBuf::from("public"),
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from("uploads"),
                output_dir: PathBuf::from("cropped_pdfs"),
            },
            crop: CropConfig {
                margins: CropMargins::default(),
                batch_size: 100,
            },
            retention: RetentionConfig {
                max_age_hours: 1,
                sweep_interval_secs: 60,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or(defaults.server.host),
                port: env::var("PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.server.port),
                public_dir: env::var("PUBLIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.server.public_dir),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.upload_dir),
                output_dir: env::var("OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.output_dir),
            },
            crop: CropConfig {
                margins: CropMargins::default(),
                batch_size: env::var("CROP_BATCH_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|&n| n > 0)
                    .unwrap_or(defaults.crop.batch_size),
            },
            retention: RetentionConfig {
                max_age_hours: env::var("RETENTION_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.retention.max_age_hours),
                sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.retention.sweep_interval_secs),
            },
        }
    }
}
