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

//! The per-call log record handed to an encoder.

use std::fmt;

use jiff::Zoned;

use crate::Caller;
use crate::Fields;
use crate::Level;

/// The payload of a single log call.
///
/// A record is built after the level check passed, formatted by exactly one encoder and
/// dropped.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    level: Level,
    time: &'a Zoned,
    caller: &'a Caller,
    message: &'a dyn fmt::Display,
    fields: &'a Fields,
}

impl<'a> Record<'a> {
    pub fn new(
        level: Level,
        time: &'a Zoned,
        caller: &'a Caller,
        message: &'a dyn fmt::Display,
        fields: &'a Fields,
    ) -> Self {
        Self {
            level,
            time,
            caller,
            message,
            fields,
        }
    }

    /// The verbosity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The observed time.
    pub fn time(&self) -> &'a Zoned {
        self.time
    }

    /// The resolved call site.
    pub fn caller(&self) -> &'a Caller {
        self.caller
    }

    /// The message body.
    pub fn message(&self) -> &'a dyn fmt::Display {
        self.message
    }

    /// The fields of the emitting entry.
    pub fn fields(&self) -> &'a Fields {
        self.fields
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("level", &self.level)
            .field("time", &self.time)
            .field("caller", &self.caller)
            .field("message", &self.message.to_string())
            .field("fields", &self.fields)
            .finish()
    }
}
