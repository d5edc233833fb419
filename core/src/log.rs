//! Logger and logging macros
//!
//! Logging goes through the `log` facade. Binaries call [`init_logger`] once at
//! startup; library crates only use the re-exported macros of this crate.

mod appender;
mod consts;
mod logger;

pub use consts::*;
pub use logger::LogError;

use appender::AppenderSpec;
use log::LevelFilter;
use log4rs::{Config, config::Root};

// Standard output is left to the program's own output.
const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Installs the global logger.
///
/// `filters` follows the `RUST_LOG` syntax (`info`, `overlay_topics=debug,warn`, ...) and is
/// applied after the content of the `RUST_LOG` environment variable. When `log_dir` is provided,
/// a rolling log file and an error-only log file are written in that directory.
pub fn init_logger(log_dir: Option<&str>, filters: &str) -> Result<(), LogError> {
    let loggers = logger::Builder::new()
        .root_level(LevelFilter::Info)
        .parse_env(DEFAULT_LOGGER_ENV)
        .parse_expression(filters)
        .build();

    let mut specs = vec![AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        specs.push(AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME)?);
        specs.push(AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), log_dir, ERR_LOG_FILE_NAME)?);
    }

    let names = specs.iter().map(|spec| spec.name).collect::<Vec<_>>();
    let appenders = specs.iter_mut().map(|spec| spec.appender()).collect::<Result<Vec<_>, _>>()?;

    let config = Config::builder()
        .appenders(appenders)
        .loggers(loggers.items())
        .build(Root::builder().appenders(names).build(loggers.root_level()))
        .map_err(|err| LogError::Config(err.to_string()))?;

    log4rs::init_config(config).map_err(|err| LogError::Init(err.to_string()))?;
    Ok(())
}
