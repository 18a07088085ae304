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

use crate::Caller;
use crate::Context;
use crate::Fields;
use crate::Level;
use crate::Logger;
use crate::kv::Value;

/// A log entry: fields to attach to records, bound to the logger that emits them.
///
/// Builder methods take the entry by value and hand it back, so a chain mutates one entry in
/// place. Emitting takes `&self`; an entry can be kept and emitted several times. Use
/// [`Clone`] to branch an entry: the copies share no fields afterwards.
///
/// # Examples
///
/// ```
/// use fieldlog::Config;
/// use fieldlog::Logger;
///
/// let logger = Logger::simple(Config::default());
/// let entry = logger.with_fields([("request_id", 42)]);
///
/// entry.clone().with_field("attempt", 2).warn("retrying");
/// entry
///     .with_error(std::io::Error::other("connection reset"))
///     .error("request failed");
/// ```
#[derive(Clone, Debug)]
pub struct Entry {
    logger: Logger,
    fields: Fields,
    caller: Option<Caller>,
}

impl Entry {
    pub(crate) fn new(logger: Logger) -> Self {
        Self {
            logger,
            fields: Fields::new(),
            caller: None,
        }
    }

    /// Adds `fields`, overwriting existing fields with the same keys.
    pub fn with_fields(mut self, fields: impl Into<Fields>) -> Self {
        self.fields.merge(fields.into());
        self
    }

    /// Adds a single field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value);
        self
    }

    /// Adds `err` as the `error` field. It renders as the error's message.
    pub fn with_error(self, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.with_field("error", Value::error(err))
    }

    /// Adds the fields carried by `context`.
    pub fn with_context(mut self, context: &Context) -> Self {
        self.fields.merge(context.fields().clone());
        self
    }

    /// Pins the call site records are attributed to, instead of resolving it per call.
    ///
    /// This is for entries emitted away from where the log statement is written, such as an
    /// entry handed to a callback. See [`caller!`](crate::caller!).
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Drops a pinned call site, going back to per-call resolution.
    pub fn reset_caller(mut self) -> Self {
        self.caller = None;
        self
    }

    /// The fields attached so far.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The logger this entry emits through.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Emits this entry at `Debug`, attributed to the caller of this method.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, Location::caller(), &message);
    }

    /// Emits this entry at `Info`, attributed to the caller of this method.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, Location::caller(), &message);
    }

    /// Emits this entry at `Warn`, attributed to the caller of this method.
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, Location::caller(), &message);
    }

    /// Emits this entry at `Error`, attributed to the caller of this method.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, Location::caller(), &message);
    }

    fn log(&self, level: Level, location: &'static Location<'static>, message: &dyn fmt::Display) {
        self.logger.log(
            level,
            location,
            self.caller.as_ref(),
            &self.fields,
            message,
        );
    }
}
