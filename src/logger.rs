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

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::OnceLock;

use jiff::Zoned;

use crate::Caller;
use crate::Config;
use crate::Context;
use crate::Entry;
use crate::Error;
use crate::Fields;
use crate::Level;
use crate::append::Appender;
use crate::caller;
use crate::encoder::Encoder;
#[cfg(feature = "layout-json")]
use crate::encoder::JsonEncoder;
use crate::encoder::TextEncoder;
use crate::record::Record;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();
static FALLBACK_LOGGER: OnceLock<Logger> = OnceLock::new();

/// A configured logger: a minimum level, an encoder and an output.
///
/// Loggers are cheap to clone; clones share the same output.
///
/// # Examples
///
/// ```
/// use fieldlog::Config;
/// use fieldlog::Level;
/// use fieldlog::Logger;
///
/// let logger = Logger::simple(Config::default().level(Level::Info));
/// logger.with_fields([("user", "alice")]).info("logged in");
/// logger.debug("dropped, below the minimum level");
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

#[derive(Debug)]
struct LoggerInner {
    level: Level,
    encoder: Encoder,
    appender: Appender,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("encoder", &self.inner.encoder)
            .field("appender", &self.inner.appender)
            .finish()
    }
}

impl Logger {
    /// Creates a logger writing human-readable lines.
    pub fn simple(config: Config) -> Self {
        let settings = config.validate();
        let encoder = TextEncoder::new(settings.prefixes);
        Self::new(
            settings.level,
            encoder.into(),
            Appender::new(settings.output, settings.use_stderr),
        )
    }

    /// Creates a logger writing one JSON object per line.
    #[cfg(feature = "layout-json")]
    pub fn json(config: Config) -> Self {
        let settings = config.validate();
        let encoder = JsonEncoder::new(settings.prefixes);
        Self::new(
            settings.level,
            encoder.into(),
            Appender::new(settings.output, settings.use_stderr),
        )
    }

    fn new(level: Level, encoder: Encoder, appender: Appender) -> Self {
        Self {
            inner: Arc::new(LoggerInner {
                level,
                encoder,
                appender,
            }),
        }
    }

    /// The minimum level of emitted records.
    pub fn level(&self) -> Level {
        self.inner.level
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.inner.level
    }

    /// Creates an entry without fields bound to this logger.
    pub fn entry(&self) -> Entry {
        Entry::new(self.clone())
    }

    /// Creates an entry carrying `fields`.
    pub fn with_fields(&self, fields: impl Into<Fields>) -> Entry {
        self.entry().with_fields(fields)
    }

    /// Creates an entry carrying `err` as its `error` field.
    pub fn with_error(&self, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Entry {
        self.entry().with_error(err)
    }

    /// Creates an entry carrying the fields of `context`.
    pub fn with_context(&self, context: &Context) -> Entry {
        self.entry().with_context(context)
    }

    /// Logs `message` without fields at `Debug`.
    ///
    /// Like every emitting method, the record is attributed to the caller's file, line and
    /// function, and nothing is formatted when `Debug` is below the configured level.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, Location::caller(), None, &Fields::new(), &message);
    }

    /// Logs `message` without fields at `Info`.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, Location::caller(), None, &Fields::new(), &message);
    }

    /// Logs `message` without fields at `Warn`.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, Location::caller(), None, &Fields::new(), &message);
    }

    /// Logs `message` without fields at `Error`.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, Location::caller(), None, &Fields::new(), &message);
    }

    /// Flushes the output.
    pub fn flush(&self) {
        self.inner.appender.flush();
    }

    pub(crate) fn log(
        &self,
        level: Level,
        location: &'static Location<'static>,
        pinned: Option<&Caller>,
        fields: &Fields,
        message: &dyn fmt::Display,
    ) {
        if !self.enabled(level) {
            return;
        }

        let resolved;
        let caller = match pinned {
            Some(caller) => caller,
            None => {
                resolved = caller::resolve(location);
                &resolved
            }
        };

        self.emit(level, caller, fields, message);
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        caller: &Caller,
        fields: &Fields,
        message: &dyn fmt::Display,
    ) {
        let time = Zoned::now();
        let record = Record::new(level, &time, caller, message, fields);

        // Logging is best effort: a record that cannot be encoded is dropped.
        if let Ok(bytes) = self.inner.encoder.format(&record) {
            self.inner.appender.append(level, &bytes);
        }
    }
}

/// Returns the process-wide default logger.
///
/// Before [`init_simple_logger`] or [`init_json_logger`] is called, this is a text logger
/// writing every level to stdout.
pub fn default_logger() -> &'static Logger {
    match DEFAULT_LOGGER.get() {
        Some(logger) => logger,
        None => FALLBACK_LOGGER.get_or_init(|| Logger::simple(Config::default())),
    }
}

fn set_default_logger(logger: Logger) -> Result<(), Error> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::new("the default logger has already been initialized"))
}

/// Sets up the default logger to write human-readable lines.
///
/// # Errors
///
/// Returns an error if the default logger has already been initialized.
pub fn try_init_simple_logger(config: Config) -> Result<(), Error> {
    set_default_logger(Logger::simple(config))
}

/// Sets up the default logger to write human-readable lines.
///
/// # Panics
///
/// Panics if the default logger has already been initialized.
///
/// # Examples
///
/// ```
/// use fieldlog::Config;
///
/// fieldlog::init_simple_logger(Config::default());
/// fieldlog::info("ready");
/// ```
pub fn init_simple_logger(config: Config) {
    if let Err(err) = try_init_simple_logger(config) {
        panic!("{err}");
    }
}

/// Sets up the default logger to write human-readable lines, configured from the environment.
///
/// See [`Config::from_env`] for the variables read.
///
/// # Errors
///
/// Returns an error if a variable holds an invalid value or the default logger has already
/// been initialized.
pub fn try_init_from_env() -> Result<(), Error> {
    try_init_simple_logger(Config::try_from_env()?)
}

/// Sets up the default logger to write human-readable lines, configured from the environment.
///
/// # Panics
///
/// Panics with `invalid log level <value>` if `FIELDLOG_LEVEL` cannot be parsed, and if the
/// default logger has already been initialized.
pub fn init_from_env() {
    if let Err(err) = try_init_from_env() {
        panic!("{err}");
    }
}

/// Sets up the default logger to write JSON lines.
///
/// # Errors
///
/// Returns an error if the default logger has already been initialized.
#[cfg(feature = "layout-json")]
pub fn try_init_json_logger(config: Config) -> Result<(), Error> {
    set_default_logger(Logger::json(config))
}

/// Sets up the default logger to write JSON lines.
///
/// # Panics
///
/// Panics if the default logger has already been initialized.
#[cfg(feature = "layout-json")]
pub fn init_json_logger(config: Config) {
    if let Err(err) = try_init_json_logger(config) {
        panic!("{err}");
    }
}
