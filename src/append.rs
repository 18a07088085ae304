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

//! Destinations for encoded records.

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::Level;

/// Where a logger writes its records.
#[derive(Default)]
pub enum Output {
    /// The process's standard output.
    #[default]
    Stdout,
    /// The process's standard error.
    Stderr,
    /// Any writer, such as a file or an in-memory buffer.
    Writer(Box<dyn Write + Send>),
}

impl Output {
    /// Wraps a writer as an output.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Output::Writer(Box::new(writer))
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("Stdout"),
            Output::Stderr => f.write_str("Stderr"),
            Output::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// The stream a record is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stream {
    Primary,
    Error,
}

/// Writes encoded records to the configured output.
#[derive(Debug)]
pub(crate) struct Appender {
    primary: Sink,
    // Set only when error records are split off the primary stream.
    error: Option<Sink>,
}

enum Sink {
    Stdout,
    Stderr,
    // Writers need exclusive access; the lock is held for one record at a time.
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::Writer(_) => f.write_str("Writer"),
        }
    }
}

impl Sink {
    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().write_all(bytes),
            Sink::Stderr => io::stderr().write_all(bytes),
            Sink::Writer(writer) => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(bytes),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::Stderr => io::stderr().flush(),
            Sink::Writer(writer) => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
        }
    }
}

impl Appender {
    pub(crate) fn new(output: Output, use_stderr: bool) -> Self {
        let primary = match output {
            Output::Stdout => Sink::Stdout,
            Output::Stderr => Sink::Stderr,
            Output::Writer(writer) => Sink::Writer(Mutex::new(writer)),
        };
        let error = (use_stderr && matches!(primary, Sink::Stdout)).then_some(Sink::Stderr);
        Self { primary, error }
    }

    /// An appender splitting error records to `error` and everything else to `primary`, the
    /// way stdout and stderr are split when `use_stderr` is set.
    #[cfg(test)]
    pub(crate) fn split(
        primary: impl Write + Send + 'static,
        error: impl Write + Send + 'static,
    ) -> Self {
        Self {
            primary: Sink::Writer(Mutex::new(Box::new(primary))),
            error: Some(Sink::Writer(Mutex::new(Box::new(error)))),
        }
    }

    pub(crate) fn stream(&self, level: Level) -> Stream {
        if level == Level::Error && self.error.is_some() {
            Stream::Error
        } else {
            Stream::Primary
        }
    }

    /// Writes one encoded record. Failures are dropped.
    pub(crate) fn append(&self, level: Level, bytes: &[u8]) {
        let sink = match (self.stream(level), &self.error) {
            (Stream::Error, Some(error)) => error,
            _ => &self.primary,
        };
        let _ = sink.write_all(bytes);
    }

    pub(crate) fn flush(&self) {
        let _ = self.primary.flush();
        if let Some(error) = &self.error {
            let _ = error.flush();
        }
    }
}
