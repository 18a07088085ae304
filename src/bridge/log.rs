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

use std::borrow::Cow;

use crate::Caller;
use crate::Error;
use crate::Fields;
use crate::Level;
use crate::Logger;
use crate::caller;
use crate::default_logger;
use crate::kv::Value;

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        log::Log::enabled(default_logger(), metadata)
    }

    fn log(&self, record: &log::Record) {
        log::Log::log(default_logger(), record);
    }

    fn flush(&self) {
        log::Log::flush(default_logger());
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a `LogCrateLogger` and all logs from the
/// log crate will be forwarded to the [default logger](crate::default_logger).
///
/// The log crate's maximum level is set from the default logger's level, so call this after
/// the default logger is initialized.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
pub fn try_setup_log_crate() -> Result<(), Error> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)
        .map_err(|err| Error::new("failed to set up the log crate logger").with_source(err))?;
    log::set_max_level(default_logger().level().into());
    Ok(())
}

/// Set up the log crate global logger.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// fieldlog::init_simple_logger(fieldlog::Config::default());
/// fieldlog::bridge::setup_log_crate();
///
/// log::info!(user = "alice"; "logged in");
/// ```
pub fn setup_log_crate() {
    if let Err(err) = try_setup_log_crate() {
        panic!("{err}");
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }

        let file = match record.file_static() {
            Some(file) => Cow::Borrowed(file),
            None => Cow::Owned(record.file().unwrap_or_default().to_owned()),
        };
        let function = match caller::resolve_function() {
            Some(function) => Cow::Owned(function),
            None => Cow::Owned(record.module_path().unwrap_or_default().to_owned()),
        };
        let caller = Caller::new(file, record.line().unwrap_or_default(), function);

        let mut fields = Fields::new();
        let mut visitor = KeyValueVisitor {
            fields: &mut fields,
        };
        // Best effort: keep the pairs visited before a failure.
        let _ = record.key_values().visit(&mut visitor);

        self.emit(level, &caller, &fields, record.args());
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

struct KeyValueVisitor<'a> {
    fields: &'a mut Fields,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.fields.insert(key.as_str(), convert_value(&value));
        Ok(())
    }
}

fn convert_value(value: &log::kv::Value) -> Value {
    if let Some(v) = value.to_bool() {
        Value::Bool(v)
    } else if let Some(v) = value.to_i64() {
        Value::I64(v)
    } else if let Some(v) = value.to_u64() {
        Value::U64(v)
    } else if let Some(v) = value.to_f64() {
        Value::F64(v)
    } else if let Some(v) = value.to_borrowed_str() {
        Value::from(v)
    } else {
        Value::from(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::Config;
    use crate::Output;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn log_records_are_encoded() {
        let buffer = Buffer::default();
        let logger = Logger::simple(
            Config::default()
                .level(Level::Info)
                .output(Output::writer(buffer.clone())),
        );

        let kvs: &[(&str, i32)] = &[("attempt", 3)];
        let record = log::Record::builder()
            .args(format_args!("retrying"))
            .level(log::Level::Warn)
            .file_static(Some("src/net/client.rs"))
            .line(Some(88))
            .module_path_static(Some("app::net::client"))
            .key_values(&kvs)
            .build();
        log::Log::log(&logger, &record);

        let trace = log::Record::builder()
            .args(format_args!("dropped"))
            .level(log::Level::Trace)
            .build();
        log::Log::log(&logger, &trace);

        let out = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let mut lines = out.lines();
        let header = lines.next().unwrap();
        assert!(header.contains(" [WARN ] client.rs:88:"), "{out}");
        assert!(header.ends_with(" retrying"), "{out}");
        assert_eq!(lines.next(), Some("\tattempt=3"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn convert_values() {
        assert!(matches!(
            convert_value(&log::kv::Value::from(true)),
            Value::Bool(true)
        ));
        assert!(matches!(
            convert_value(&log::kv::Value::from(-3i32)),
            Value::I64(-3)
        ));
        assert!(matches!(
            convert_value(&log::kv::Value::from("text")),
            Value::Str(ref s) if s == "text"
        ));
    }
}
