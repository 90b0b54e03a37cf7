//! Log file setup.
//!
//! The terminal belongs to the dashboard, so logs go to a daily-rolling file
//! instead.  `RUST_LOG` adds or overrides directives on top of the default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "freshoffthebuild=info";

/// `<cache dir>/freshoffthebuild/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("freshoffthebuild").join("logs"))
}

pub fn init_logging(log_dir: Option<PathBuf>) -> Result<()> {
    let dir = log_dir
        .or_else(default_log_dir)
        .context("no cache directory for log files; pass --log-dir")?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("freshoffthebuild")
        .filename_suffix("log")
        .build(&dir)
        .with_context(|| format!("could not open log file in {}", dir.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(false)
                .with_writer(appender),
        )
        .with(EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?))
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directive_parses() {
        assert!(DEFAULT_DIRECTIVE.parse::<tracing_subscriber::filter::Directive>().is_ok());
    }

    #[test]
    fn default_log_dir_is_namespaced() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.ends_with("freshoffthebuild/logs"));
        }
    }
}
