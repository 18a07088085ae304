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

use std::fmt::Write;

use jiff::Zoned;

use crate::config::Prefixes;
use crate::encoder::Encoder;
use crate::record::Record;

/// An encoder that formats log records as human-readable lines.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57+08:00 [ERROR] main.rs:51:serve() failed to bind
///     addr=0.0.0.0:80 error=permission denied
/// 2024-08-11 22:44:57+08:00 [INFO ] main.rs:53:serve() listening
/// ```
///
/// The level prefix is padded to the longest configured prefix. The indented second line holds
/// the record's fields and is omitted when there are none.
#[derive(Debug, Clone)]
pub struct TextEncoder {
    prefixes: Prefixes,
    padding: usize,
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new(Prefixes::default())
    }
}

impl TextEncoder {
    /// Creates a text encoder, with padding computed from the widest prefix.
    pub fn new(prefixes: Prefixes) -> Self {
        let padding = prefixes.max_width();
        Self { prefixes, padding }
    }

    /// The width level prefixes are padded to.
    pub fn padding(&self) -> usize {
        self.padding
    }

    pub(crate) fn format(&self, record: &Record) -> Vec<u8> {
        let mut line = String::new();
        let _ = writeln!(
            line,
            "{time} [{prefix:<padding$}] {caller} {message}",
            time = format_time(record.time()),
            prefix = self.prefixes.get(record.level()),
            padding = self.padding,
            caller = record.caller(),
            message = record.message(),
        );
        line.push_str(&record.fields().render());
        line.into_bytes()
    }
}

/// Formats as `YYYY-MM-DD HH:MM:SS` followed by `Z` for UTC or the `±HH:MM` offset.
fn format_time(time: &Zoned) -> String {
    let datetime = time.strftime("%Y-%m-%d %H:%M:%S");
    if time.offset().seconds() == 0 {
        format!("{datetime}Z")
    } else {
        format!("{datetime}{}", time.strftime("%:z"))
    }
}

impl From<TextEncoder> for Encoder {
    fn from(encoder: TextEncoder) -> Self {
        Encoder::Text(encoder)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::tz;
    use jiff::tz::TimeZone;

    use super::*;
    use crate::Caller;
    use crate::Fields;
    use crate::Level;
    use crate::kv::Value;

    fn at(tz: TimeZone) -> Zoned {
        "2024-08-11T14:44:57Z"
            .parse::<Timestamp>()
            .unwrap()
            .to_zoned(tz)
    }

    fn encode(encoder: &TextEncoder, level: Level, time: &Zoned, fields: &Fields) -> String {
        let caller = Caller::new("src/server.rs", 51, "app::server::serve");
        let message = "there was an error";
        let record = Record::new(level, time, &caller, &message, fields);
        String::from_utf8(encoder.format(&record)).unwrap()
    }

    #[test]
    fn single_line_without_fields() {
        let encoder = TextEncoder::default();
        let time = at(TimeZone::UTC);

        let out = encode(&encoder, Level::Info, &time, &Fields::new());
        assert_eq!(
            out,
            "2024-08-11 14:44:57Z [INFO ] server.rs:51:serve() there was an error\n"
        );
    }

    #[test]
    fn fields_on_second_line() {
        let encoder = TextEncoder::default();
        let time = at(TimeZone::fixed(tz::offset(8)));
        let fields = crate::fields! {
            "sample" => "banana",
            "error" => Value::error("sample text"),
        };

        let out = encode(&encoder, Level::Error, &time, &fields);
        assert_eq!(
            out,
            "2024-08-11 22:44:57+08:00 [ERROR] server.rs:51:serve() there was an error\n\
             \terror=sample text sample=banana\n"
        );
    }

    #[test]
    fn negative_offsets() {
        let time = at(TimeZone::fixed(tz::offset(-5)));
        assert_eq!(format_time(&time), "2024-08-11 09:44:57-05:00");
    }

    #[test]
    fn padding_follows_widest_prefix() {
        let prefixes = Prefixes {
            error: "E".to_owned(),
            warn: "WARNING".to_owned(),
            info: "I".to_owned(),
            debug: "D".to_owned(),
        };
        let encoder = TextEncoder::new(prefixes);
        assert_eq!(encoder.padding(), 7);

        let out = encode(&encoder, Level::Debug, &at(TimeZone::UTC), &Fields::new());
        assert!(out.contains(" [D      ] "), "{out}");
    }
}
