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

//! Encoders turning records into bytes.

#[cfg(feature = "layout-json")]
pub use json::JsonEncoder;
pub use text::TextEncoder;

use crate::Error;
use crate::record::Record;

#[cfg(feature = "layout-json")]
mod json;
mod text;

/// Represents an encoder for formatting log records.
///
/// Every encoding ends with a newline, so the output is ready to be written as is.
#[derive(Debug, Clone)]
pub enum Encoder {
    Text(TextEncoder),
    #[cfg(feature = "layout-json")]
    Json(JsonEncoder),
}

impl Encoder {
    pub(crate) fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        match self {
            Encoder::Text(encoder) => Ok(encoder.format(record)),
            #[cfg(feature = "layout-json")]
            Encoder::Json(encoder) => encoder.format(record),
        }
    }
}
