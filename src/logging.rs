// src/logging.rs

use flexi_logger::{FileSpec, Logger, LoggerHandle};

use crate::errors::{SmolchatError, SmolchatResult};

/// Starts the file-backed logger. The TUI owns the terminal, so diagnostics
/// go to `smolchat.log` in the working directory instead of stderr.
///
/// The returned handle must stay alive for the lifetime of the process.
pub fn init(level: &str) -> SmolchatResult<LoggerHandle> {
    Logger::try_with_str(level)
        .map_err(|e| SmolchatError::logging_error(format!("invalid log level: {e}")))?
        .log_to_file(FileSpec::default().basename("smolchat").suppress_timestamp())
        .start()
        .map_err(|e| SmolchatError::logging_error(format!("failed to start logger: {e}")))
}
