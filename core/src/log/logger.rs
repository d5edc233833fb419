use log::LevelFilter;
use log4rs::config::Logger;
use std::{collections::HashMap, env, mem, str::FromStr};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LogError {
    #[error("Logger spec parsing error: {0}")]
    ParseLoggerSpecError(String),

    #[error("Log appender error: {0}")]
    Appender(String),

    #[error("Logger configuration error: {0}")]
    Config(String),

    #[error("Logger initialization error: {0}")]
    Init(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct LoggerSpec {
    pub name: String,
    pub level: LevelFilter,
}

impl LoggerSpec {
    pub fn new(name: String, level: LevelFilter) -> Self {
        Self { name, level }
    }

    pub fn logger(&self) -> Logger {
        Logger::builder().build(self.name.clone(), self.level)
    }
}

pub(super) struct Loggers {
    loggers: Vec<LoggerSpec>,
    root_level: LevelFilter,
}

impl Loggers {
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    pub fn items(&self) -> impl IntoIterator<Item = Logger> + '_ {
        self.loggers.iter().map(|x| x.logger())
    }

    #[cfg(test)]
    pub fn specs(&self) -> &[LoggerSpec] {
        &self.loggers
    }
}

/// Collects per-module level filters out of `RUST_LOG`-like expressions.
pub(super) struct Builder {
    loggers: HashMap<String, LevelFilter>,
    root_level: Option<LevelFilter>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder { loggers: HashMap::new(), root_level: None }
    }

    pub fn parse_env(&mut self, env: &str) -> &mut Self {
        self.parse_expression(&env::var(env).unwrap_or_default())
    }

    /// Initializes the builder from a specs expression.
    #[allow(dead_code)]
    pub fn from_expression(expression: &str) -> Self {
        let mut builder = Self::new();
        builder.parse_expression(expression);
        builder
    }

    pub fn parse_expression(&mut self, expression: &str) -> &mut Self {
        for spec in expression.split(',').map(|x| x.trim()) {
            if spec.is_empty() {
                continue;
            }
            let mut parts = spec.split('=');
            let (log_level, name) = match (parts.next(), parts.next().map(|x| x.trim()), parts.next()) {
                // A single argument is either a level (root) or a module name enabled at max level
                (Some(part0), None, None) => match part0.parse() {
                    Ok(lvl) => (lvl, None),
                    Err(_) => (LevelFilter::max(), Some(part0)),
                },
                (Some(part0), Some(""), None) => (LevelFilter::max(), Some(part0)),
                (Some(part0), Some(part1), None) => match part1.parse() {
                    Ok(lvl) => (lvl, Some(part0)),
                    _ => {
                        eprintln!("Ignoring invalid logging spec '{}'", LogError::ParseLoggerSpecError(part1.to_string()));
                        continue;
                    }
                },
                _ => {
                    eprintln!("Ignoring invalid logging spec '{}'", LogError::ParseLoggerSpecError(spec.to_string()));
                    continue;
                }
            };
            match name {
                Some(name) => {
                    self.logger(name.to_string(), log_level);
                }
                None => {
                    self.root_level(log_level);
                }
            }
        }
        self
    }

    pub fn root_level(&mut self, root_level: LevelFilter) -> &mut Self {
        self.root_level.replace(root_level);
        self
    }

    pub fn logger(&mut self, name: String, level: LevelFilter) -> &mut Self {
        self.loggers.insert(name, level);
        self
    }

    pub fn build(&mut self) -> Loggers {
        let mut loggers = mem::take(&mut self.loggers).into_iter().map(|(name, level)| LoggerSpec::new(name, level)).collect::<Vec<_>>();
        loggers.sort_by(|a, b| a.name.cmp(&b.name));
        Loggers { loggers, root_level: self.root_level.take().unwrap_or(LevelFilter::Error) }
    }
}

impl FromStr for Builder {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_expression(s))
    }
}
