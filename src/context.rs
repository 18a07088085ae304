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

use std::sync::Arc;

use crate::Fields;
use crate::kv::Value;

/// Fields scoped to a unit of work, such as a request.
///
/// A context is cheap to clone and is meant to be passed down the call chain. Entries pick up
/// its fields with [`Entry::with_context`](crate::Entry::with_context).
///
/// # Examples
///
/// ```
/// use fieldlog::Context;
///
/// let context = Context::new().with_field("request_id", 42);
/// fieldlog::with_context(&context).info("handling request");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    fields: Arc<Fields>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `fields`, overwriting existing fields with the same keys.
    ///
    /// Clones made before this call keep their fields.
    pub fn with_fields(mut self, fields: impl Into<Fields>) -> Self {
        Arc::make_mut(&mut self.fields).merge(fields.into());
        self
    }

    /// Adds a single field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.fields).insert(key, value);
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

impl From<Fields> for Context {
    fn from(fields: Fields) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }
}
