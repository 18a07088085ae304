// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logger configuration.

use crate::Error;
use crate::Level;
use crate::append::Output;

const LEVEL_ENV: &str = "FIELDLOG_LEVEL";
const STDERR_ENV: &str = "FIELDLOG_STDERR";

/// The names printed for each level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefixes {
    pub error: String,
    pub warn: String,
    pub info: String,
    pub debug: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            error: Level::Error.as_str().to_owned(),
            warn: Level::Warn.as_str().to_owned(),
            info: Level::Info.as_str().to_owned(),
            debug: Level::Debug.as_str().to_owned(),
        }
    }
}

impl Prefixes {
    /// The prefix printed for `level`.
    pub fn get(&self, level: Level) -> &str {
        match level {
            Level::Error => &self.error,
            Level::Warn => &self.warn,
            Level::Info => &self.info,
            Level::Debug => &self.debug,
        }
    }

    /// The width of the widest prefix.
    pub fn max_width(&self) -> usize {
        [&self.error, &self.warn, &self.info, &self.debug]
            .into_iter()
            .map(|prefix| prefix.chars().count())
            .max()
            .unwrap_or_default()
    }

    fn with_defaults(self) -> Self {
        fn or_default(prefix: String, level: Level) -> String {
            if prefix.is_empty() {
                level.as_str().to_owned()
            } else {
                prefix
            }
        }

        Self {
            error: or_default(self.error, Level::Error),
            warn: or_default(self.warn, Level::Warn),
            info: or_default(self.info, Level::Info),
            debug: or_default(self.debug, Level::Debug),
        }
    }
}

/// Configuration for a [`Logger`](crate::Logger).
///
/// Every setting is optional. Empty prefixes fall back to `ERROR`, `WARN`, `INFO` and `DEBUG`,
/// the level defaults to [`Level::Debug`] and the output to stdout.
///
/// # Examples
///
/// ```
/// use fieldlog::Config;
/// use fieldlog::Level;
/// use fieldlog::Output;
///
/// let config = Config::default()
///     .level(Level::Info)
///     .warn_prefix("WARNING")
///     .output(Output::Stdout)
///     .use_stderr(true);
/// ```
#[derive(Debug, Default)]
pub struct Config {
    error_prefix: String,
    warn_prefix: String,
    info_prefix: String,
    debug_prefix: String,
    level: Level,
    output: Output,
    use_stderr: bool,
}

impl Config {
    /// Sets the label printed for `Error` records.
    ///
    /// An empty prefix falls back to the default, `ERROR`.
    pub fn error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    /// Sets the label printed for `Warn` records; empty means `WARN`.
    pub fn warn_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.warn_prefix = prefix.into();
        self
    }

    /// Sets the label printed for `Info` records; empty means `INFO`.
    pub fn info_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.info_prefix = prefix.into();
        self
    }

    /// Sets the label printed for `Debug` records; empty means `DEBUG`.
    pub fn debug_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.debug_prefix = prefix.into();
        self
    }

    /// Sets the minimum level of emitted records.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets where records are written.
    pub fn output(mut self, output: impl Into<Output>) -> Self {
        self.output = output.into();
        self
    }

    /// Writes error records to stderr instead of the output.
    ///
    /// Only honored when the output is [`Output::Stdout`].
    pub fn use_stderr(mut self, use_stderr: bool) -> Self {
        self.use_stderr = use_stderr;
        self
    }

    /// Loads the level and stderr toggle from the environment.
    ///
    /// `FIELDLOG_LEVEL` takes a level name or its number (`0` for debug to `3` for error).
    /// `FIELDLOG_STDERR` takes `true`, `false`, `1` or `0`.
    ///
    /// # Panics
    ///
    /// Panics if either variable holds an invalid value. Continuing with an unknown level is
    /// never what the program wants; use [`Config::try_from_env`] to handle the error instead.
    pub fn from_env() -> Self {
        Self::or_abort(Self::try_from_env())
    }

    /// Fallible version of [`Config::from_env`].
    pub fn try_from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn or_abort(config: Result<Self, Error>) -> Self {
        match config {
            Ok(config) => config,
            Err(err) => panic!("{err}"),
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Config::default();

        if let Some(level) = lookup(LEVEL_ENV) {
            let level = level
                .parse::<Level>()
                .map_err(|err| err.with_context("variable", LEVEL_ENV))?;
            config = config.level(level);
        }

        if let Some(use_stderr) = lookup(STDERR_ENV) {
            let use_stderr = match use_stderr.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                _ => {
                    return Err(Error::new(format!("invalid boolean {use_stderr}"))
                        .with_context("variable", STDERR_ENV));
                }
            };
            config = config.use_stderr(use_stderr);
        }

        Ok(config)
    }

    pub(crate) fn validate(self) -> Settings {
        let prefixes = Prefixes {
            error: self.error_prefix,
            warn: self.warn_prefix,
            info: self.info_prefix,
            debug: self.debug_prefix,
        }
        .with_defaults();

        // Redirecting errors only makes sense when the output is interchangeable with stderr.
        let use_stderr = self.use_stderr && matches!(self.output, Output::Stdout);

        Settings {
            prefixes,
            level: self.level,
            output: self.output,
            use_stderr,
        }
    }
}

/// A validated [`Config`].
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) prefixes: Prefixes,
    pub(crate) level: Level,
    pub(crate) output: Output,
    pub(crate) use_stderr: bool,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_prefixes_get_defaults() {
        let settings = Config::default().warn_prefix("WARNING").validate();
        assert_eq!(settings.prefixes.error, "ERROR");
        assert_eq!(settings.prefixes.warn, "WARNING");
        assert_eq!(settings.prefixes.info, "INFO");
        assert_eq!(settings.prefixes.debug, "DEBUG");
        assert_eq!(settings.prefixes.max_width(), 7);
        assert_eq!(settings.level, Level::Debug);
    }

    #[test]
    fn use_stderr_requires_stdout() {
        let settings = Config::default().use_stderr(true).validate();
        assert!(settings.use_stderr);

        let settings = Config::default()
            .output(Output::writer(Vec::new()))
            .use_stderr(true)
            .validate();
        assert!(!settings.use_stderr);

        let settings = Config::default()
            .output(Output::Stderr)
            .use_stderr(true)
            .validate();
        assert!(!settings.use_stderr);
    }

    #[test]
    fn env_level_and_stderr() {
        let config =
            Config::from_lookup(lookup(&[(LEVEL_ENV, "warn"), (STDERR_ENV, "1")])).unwrap();
        let settings = config.validate();
        assert_eq!(settings.level, Level::Warn);
        assert!(settings.use_stderr);

        let config = Config::from_lookup(lookup(&[(LEVEL_ENV, "3")])).unwrap();
        assert_eq!(config.validate().level, Level::Error);

        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.validate().level, Level::Debug);
    }

    #[test]
    fn env_invalid_level_is_rejected() {
        let err = Config::from_lookup(lookup(&[(LEVEL_ENV, "7")])).unwrap_err();
        assert_eq!(err.message(), "invalid log level 7");
        assert!(err.to_string().contains(LEVEL_ENV));

        let err = Config::from_lookup(lookup(&[(STDERR_ENV, "maybe")])).unwrap_err();
        assert_eq!(err.message(), "invalid boolean maybe");
    }

    #[test]
    #[should_panic(expected = "invalid log level verbose")]
    fn env_invalid_level_aborts() {
        Config::or_abort(Config::from_lookup(lookup(&[(LEVEL_ENV, "verbose")])));
    }
}
