use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{TypoError, TypoResult};

pub const LOG_ENV: &str = "TYPOGRAPH_LOG";

/// Routes `tracing` output to an append-only file; the terminal belongs to the UI.
/// Verbosity comes from `TYPOGRAPH_LOG` and defaults to `info`.
pub fn init_file_logging(path: &Path) -> TypoResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| TypoError::Logging(err.to_string()))
}
