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

#![cfg(feature = "layout-json")]

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use fieldlog::Config;
use fieldlog::Logger;
use fieldlog::Output;
use fieldlog::kv::Value;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Buffer {
    fn take(&self) -> String {
        String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn json_logger() -> (Logger, Buffer) {
    let buffer = Buffer::default();
    let logger = Logger::json(Config::default().output(Output::writer(buffer.clone())));
    (logger, buffer)
}

#[test]
fn error_with_fields() {
    let (logger, buffer) = json_logger();

    logger
        .with_error(io::Error::other("bepis"))
        .with_fields(fieldlog::fields! {
            "hello" => "world",
            "sample" => 1,
            "text" => Value::Null,
        })
        .error("banana");
    let line = line!() - 1;

    let out = buffer.take();
    assert_eq!(out.lines().count(), 1, "{out}");

    let data: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&out).unwrap();
    assert_eq!(data.len(), 10, "{out}");
    assert_eq!(data["message"], "banana");
    assert_eq!(data["level"], "ERROR");
    assert_eq!(data["error"], "bepis");
    assert_eq!(data["hello"], "world");
    assert_eq!(data["sample"], 1);
    assert_eq!(data["text"], serde_json::Value::Null);
    assert_eq!(data["_file"], "json_logger.rs");
    assert_eq!(data["_function"], "error_with_fields");
    assert_eq!(data["_line"], line);
    assert!(data["time"].is_string());
}

#[test]
fn one_object_per_line() {
    let (logger, buffer) = json_logger();

    logger.info("first");
    logger.with_fields([("n", 2)]).warn("second");
    logger.debug("third");

    let out = buffer.take();
    let messages = out
        .lines()
        .map(|line| {
            let data: serde_json::Value = serde_json::from_str(line).unwrap();
            (
                data["level"].as_str().unwrap().to_owned(),
                data["message"].as_str().unwrap().to_owned(),
            )
        })
        .collect::<Vec<_>>();

    assert_eq!(
        messages,
        [
            ("INFO".to_owned(), "first".to_owned()),
            ("WARN".to_owned(), "second".to_owned()),
            ("DEBUG".to_owned(), "third".to_owned()),
        ]
    );
}

#[test]
fn prefixes_are_not_padded() {
    let buffer = Buffer::default();
    let logger = Logger::json(
        Config::default()
            .warn_prefix("WARNING")
            .output(Output::writer(buffer.clone())),
    );

    logger.info("x");
    let data: serde_json::Value = serde_json::from_str(&buffer.take()).unwrap();
    assert_eq!(data["level"], "INFO");
}
