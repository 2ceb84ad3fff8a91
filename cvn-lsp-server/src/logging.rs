use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "cvn_lsp=info";

/// Filter from the explicit directive, then `RUST_LOG`, then the default.
pub fn env_filter(directive: Option<&str>) -> Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log filter '{}'", directive)),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global subscriber. Stdout belongs to the protocol, so logs go to
/// stderr unless a file is given. Keep the returned guard alive until exit.
pub fn init(directive: Option<&str>, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(directive)?;

    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("Log file path has no file name: {}", path.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_directive() {
        assert!(env_filter(Some("cvn_lsp_core=trace")).is_ok());
        assert!(env_filter(Some("debug")).is_ok());
    }

    #[test]
    fn test_invalid_directive_is_rejected() {
        assert!(env_filter(Some("cvn_lsp=loud")).is_err());
    }
}
