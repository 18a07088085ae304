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

use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::config::Prefixes;
use crate::encoder::Encoder;
use crate::record::Record;

/// A JSON encoder for formatting log records.
///
/// Every record is one object on a single line. Fields are inlined next to the fixed keys,
/// with error values replaced by their message. Fixed keys win over fields of the same name.
///
/// Output format:
///
/// ```json
/// {"_file":"server.rs","_function":"serve","_line":51,"error":"permission denied","level":"ERROR","message":"failed to bind","time":"2024-08-11T22:44:57.172051+08:00"}
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonEncoder {
    prefixes: Prefixes,
}

impl JsonEncoder {
    /// Creates a JSON encoder reporting levels with the given prefixes.
    pub fn new(prefixes: Prefixes) -> Self {
        Self { prefixes }
    }

    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let caller = record.caller();

        let mut object: Map<String, Value> = record.fields().to_json();
        object.insert("_file".to_owned(), caller.file().into());
        object.insert("_function".to_owned(), caller.function().into());
        object.insert("_line".to_owned(), caller.line().into());
        object.insert(
            "level".to_owned(),
            self.prefixes.get(record.level()).into(),
        );
        object.insert("message".to_owned(), record.message().to_string().into());
        object.insert(
            "time".to_owned(),
            record
                .time()
                .strftime("%Y-%m-%dT%H:%M:%S%.f%:z")
                .to_string()
                .into(),
        );

        let mut bytes = serde_json::to_vec(&object)
            .map_err(|err| Error::new("failed to encode record as json").with_source(err))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

impl From<JsonEncoder> for Encoder {
    fn from(encoder: JsonEncoder) -> Self {
        Encoder::Json(encoder)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::tz::TimeZone;

    use super::*;
    use crate::Caller;
    use crate::Level;
    use crate::kv;

    #[test]
    fn fixed_keys_and_fields() {
        let encoder = JsonEncoder::default();
        let time = "2024-08-11T14:44:57.5Z"
            .parse::<Timestamp>()
            .unwrap()
            .to_zoned(TimeZone::UTC);
        let caller = Caller::new("src/server.rs", 51, "app::server::serve");
        let fields = crate::fields! {
            "error" => kv::Value::error("bepis"),
            "hello" => "world",
            "sample" => 1,
            "text" => kv::Value::Null,
        };
        let message = "banana";
        let record = Record::new(Level::Error, &time, &caller, &message, &fields);

        let bytes = encoder.format(&record).unwrap();
        assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 1);
        assert_eq!(bytes.last(), Some(&b'\n'));

        let data: Value = serde_json::from_slice(&bytes).unwrap();
        let data = data.as_object().unwrap();
        assert_eq!(data.len(), 10);
        assert_eq!(data["message"], "banana");
        assert_eq!(data["level"], "ERROR");
        assert_eq!(data["error"], "bepis");
        assert_eq!(data["hello"], "world");
        assert_eq!(data["sample"], 1);
        assert_eq!(data["text"], Value::Null);
        assert_eq!(data["_file"], "server.rs");
        assert_eq!(data["_function"], "serve");
        assert_eq!(data["_line"], 51);
        let time = data["time"].as_str().unwrap();
        assert!(time.starts_with("2024-08-11T14:44:57.5"), "{time}");
        assert!(time.ends_with("+00:00"), "{time}");
    }

    #[test]
    fn fixed_keys_win() {
        let encoder = JsonEncoder::default();
        let time = Timestamp::UNIX_EPOCH.to_zoned(TimeZone::UTC);
        let caller = Caller::new("main.rs", 1, "main");
        let fields = crate::fields! { "message" => "shadowed" };
        let message = "kept";
        let record = Record::new(Level::Info, &time, &caller, &message, &fields);

        let data: Value = serde_json::from_slice(&encoder.format(&record).unwrap()).unwrap();
        assert_eq!(data["message"], "kept");
        assert_eq!(data["level"], "INFO");
    }
}
