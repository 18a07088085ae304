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

//! Fieldlog is a leveled, structured logging facade that attributes every record to the
//! function that logged it.
//!
//! # Overview
//!
//! Records carry a level, a timestamp, the call site (file, line and function), a message and
//! key-value fields. They are encoded either as human-readable lines or as JSON objects, and
//! written to stdout, stderr or any writer.
//!
//! A [`Logger`] holds the configuration. The process-wide default logger is set up once with
//! [`init_simple_logger`] or [`init_json_logger`] and used by the free functions of this crate.
//! [`init_from_env`] does the same from the `FIELDLOG_LEVEL` and `FIELDLOG_STDERR` variables.
//! Loggers can also be created and passed around explicitly.
//!
//! # Examples
//!
//! ```
//! use fieldlog::Config;
//! use fieldlog::Level;
//!
//! fieldlog::init_simple_logger(Config::default().level(Level::Info));
//!
//! fieldlog::info("server started");
//! fieldlog::with_fields(fieldlog::fields! { "port" => 8080, "tls" => true })
//!     .info("listening");
//! fieldlog::with_error(std::io::Error::other("connection reset")).error("request failed");
//! fieldlog::warn!("slow request took {}ms", 1200);
//! ```
//!
//! The text encoder writes:
//!
//! ```text
//! 2024-08-11 22:44:57+08:00 [INFO ] main.rs:6:main() server started
//! 2024-08-11 22:44:57+08:00 [INFO ] main.rs:8:main() listening
//!     port=8080 tls=true
//! 2024-08-11 22:44:57+08:00 [ERROR] main.rs:9:main() request failed
//!     error=connection reset
//! 2024-08-11 22:44:57+08:00 [WARN ] main.rs:10:main() slow request took 1200ms
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

use std::fmt;
use std::panic::Location;

pub mod bridge;
pub mod encoder;
pub mod kv;
pub mod record;

mod append;
mod caller;
mod config;
mod context;
mod entry;
mod error;
mod level;
mod logger;

pub use self::append::Output;
pub use self::caller::Caller;
pub use self::config::Config;
pub use self::config::Prefixes;
pub use self::context::Context;
pub use self::entry::Entry;
pub use self::error::Error;
pub use self::kv::Fields;
pub use self::level::Level;
pub use self::logger::*;

/// Creates an entry without fields bound to the default logger.
pub fn entry() -> Entry {
    default_logger().entry()
}

/// Creates an entry carrying `fields`, bound to the default logger.
pub fn with_fields(fields: impl Into<Fields>) -> Entry {
    default_logger().with_fields(fields)
}

/// Creates an entry carrying `err` as its `error` field, bound to the default logger.
pub fn with_error(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Entry {
    default_logger().with_error(err)
}

/// Creates an entry carrying the fields of `context`, bound to the default logger.
pub fn with_context(context: &Context) -> Entry {
    default_logger().with_context(context)
}

/// Logs `message` at the debug level through the default logger.
#[track_caller]
pub fn debug(message: impl fmt::Display) {
    log_default(Level::Debug, Location::caller(), &message);
}

/// Logs `message` at the info level through the default logger.
#[track_caller]
pub fn info(message: impl fmt::Display) {
    log_default(Level::Info, Location::caller(), &message);
}

/// Logs `message` at the warn level through the default logger.
#[track_caller]
pub fn warn(message: impl fmt::Display) {
    log_default(Level::Warn, Location::caller(), &message);
}

/// Logs `message` at the error level through the default logger.
#[track_caller]
pub fn error(message: impl fmt::Display) {
    log_default(Level::Error, Location::caller(), &message);
}

fn log_default(level: Level, location: &'static Location<'static>, message: &dyn fmt::Display) {
    default_logger().log(level, location, None, &Fields::new(), message);
}

/// Logs a formatted message at the debug level through the default logger.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::debug(::std::format_args!($($arg)+))
    };
}

/// Logs a formatted message at the info level through the default logger.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::info(::std::format_args!($($arg)+))
    };
}

/// Logs a formatted message at the warn level through the default logger.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warn(::std::format_args!($($arg)+))
    };
}

/// Logs a formatted message at the error level through the default logger.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::error(::std::format_args!($($arg)+))
    };
}
