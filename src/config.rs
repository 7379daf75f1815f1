//! Command-line configuration for the interpreter.
//!
//! The same [`Config`] drives both the binary and library callers of
//! [`crate::interpret`]. Logging is configured separately through `RUST_LOG`.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

pub const USAGE: &str = "usage: when [--today YYYY-MM-DD] [--tokens] [--ast] [--max-depth N] <file>\n       when --who";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Source file to run.
    pub file: Option<PathBuf>,
    /// Fixed value for the `Today` built-in; the system clock is used when unset.
    pub today: Option<NaiveDate>,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub max_call_depth: usize,
    pub who: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file: None,
            today: None,
            dump_tokens: false,
            dump_ast: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            who: false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing value for {flag}")]
    MissingValue { flag: String },
    #[error("invalid date {value:?} for --today, expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("invalid call depth {value:?}")]
    InvalidDepth { value: String },
    #[error("unknown option {option}")]
    UnknownOption { option: String },
    #[error("more than one source file given")]
    TooManyFiles,
    #[error("no source file given")]
    NoFile,
}

impl Config {
    /// Builds a config from command-line arguments, excluding the program name.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--who" => config.who = true,
                "--tokens" => config.dump_tokens = true,
                "--ast" => config.dump_ast = true,
                "--today" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                        .map_err(|_| ConfigError::InvalidDate { value: value.clone() })?;
                    config.today = Some(date);
                }
                "--max-depth" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    config.max_call_depth = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidDepth { value: value.clone() })?;
                }
                "-f" | "--file" => {
                    let value = args.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    config.set_file(value)?;
                }
                option if option.starts_with('-') => {
                    return Err(ConfigError::UnknownOption {
                        option: option.to_string(),
                    })
                }
                _ => config.set_file(arg)?,
            }
        }

        if config.file.is_none() && !config.who {
            return Err(ConfigError::NoFile);
        }

        Ok(config)
    }

    fn set_file(&mut self, file: String) -> Result<(), ConfigError> {
        if self.file.is_some() {
            return Err(ConfigError::TooManyFiles);
        }
        self.file = Some(PathBuf::from(file));
        Ok(())
    }
}
