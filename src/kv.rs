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

//! Key-value fields attached to log records.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::fmt::Write;
use std::sync::Arc;

/// A field value.
///
/// Values form a closed set. Errors are a distinct variant so that encoders render them as
/// their message text instead of an opaque structure.
#[derive(Clone, Debug)]
pub enum Value {
    /// An explicit absence of a value. Rendered as `null`.
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(Cow<'static, str>),
    /// A sequence of values, rendered as `[a b c]` in text.
    Seq(Vec<Value>),
    /// An error, rendered as its message.
    Error(Arc<dyn std::error::Error + Send + Sync>),
}

impl Value {
    /// Captures an error as a field value.
    pub fn error(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Value::Error(Arc::from(err.into()))
    }

    /// Returns the error if this value carries one.
    pub fn as_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Value::Error(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Whether this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Seq(values) => {
                f.write_char('[')?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_char(']')
            }
            Value::Error(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "layout-json")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Seq(values) => serializer.collect_seq(values),
            Value::Error(err) => serializer.collect_str(err.as_ref()),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $target:ty => $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(I64: i64 => i8, i16, i32, i64, isize);
impl_from_int!(U64: u64 => u8, u16, u32, u64, usize);
impl_from_int!(F64: f64 => f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Cow::Owned(v.to_owned()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl From<Cow<'static, str>> for Value {
    fn from(v: Cow<'static, str>) -> Self {
        Value::Str(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

/// A set of fields, always iterated and rendered in ascending key order.
#[derive(Clone, Debug, Default)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`Fields::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the fields in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Applies `other` on top of these fields. Values in `other` win on duplicate keys.
    pub fn merge(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Renders the fields as the suffix line of the text layout.
    ///
    /// The result is a tab, then `key=value` pairs sorted by key and separated by a single
    /// space, then a newline. Empty fields render as the empty string.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut pairs = Vec::with_capacity(self.len());
        for (k, v) in self.iter() {
            pairs.push(format!("{k}={v}").trim().to_owned());
        }

        format!("\t{}\n", pairs.join(" "))
    }

    /// Converts the fields into a JSON object, with errors replaced by their message.
    #[cfg(feature = "layout-json")]
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.iter()
            .map(|(k, v)| {
                // Value serialization cannot fail: no map keys and finite shapes only.
                let v = serde_json::to_value(v).unwrap_or(serde_json::Value::Null);
                (k.clone(), v)
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds [`Fields`] from `key => value` pairs of mixed value types.
///
/// # Examples
///
/// ```
/// let fields = fieldlog::fields! {
///     "hello" => "world",
///     "sample" => 1,
///     "text" => fieldlog::kv::Value::Null,
/// };
/// assert_eq!(fields.render(), "\thello=world sample=1 text=null\n");
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert($key, $value);
        )+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use rand::seq::SliceRandom;

    use super::*;

    #[test]
    fn render_empty_is_empty_string() {
        assert_eq!(Fields::new().render(), "");
    }

    #[test]
    fn render_sorts_keys_regardless_of_insertion_order() {
        let mut keys = vec!["delta", "alpha", "echo", "charlie", "bravo", "foxtrot", "a", "z"];
        for _ in 0..16 {
            keys.shuffle(&mut rand::rng());

            let mut fields = Fields::new();
            for (i, key) in keys.iter().enumerate() {
                fields.insert(*key, i);
            }

            let rendered = fields.render();
            let line = rendered
                .strip_prefix('\t')
                .and_then(|s| s.strip_suffix('\n'))
                .unwrap();
            let rendered_keys = line
                .split(' ')
                .map(|pair| pair.split_once('=').unwrap().0)
                .collect::<Vec<_>>();

            let mut sorted = rendered_keys.clone();
            sorted.sort();
            assert_eq!(rendered_keys, sorted);
            assert_eq!(rendered_keys.len(), keys.len());
        }
    }

    #[test]
    fn render_values() {
        let fields = crate::fields! {
            "one" => Value::Null,
            "okay but" => "epic",
            "dreamwork" => vec![false, true],
            "teamwork" => -1,
            "padded" => "  spaced  ",
            "error" => Value::error("sample text"),
        };

        assert_eq!(
            fields.render(),
            "\tdreamwork=[false true] error=sample text okay but=epic one=null padded=  spaced teamwork=-1\n"
        );
    }

    #[test]
    fn merge_overwrites_duplicates() {
        let mut fields = Fields::from([("a", 1), ("b", 2)]);
        fields.merge(Fields::from([("b", 3), ("c", 4)]));
        assert_eq!(fields.render(), "\ta=1 b=3 c=4\n");

        fields.merge(Fields::new());
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn error_capability() {
        let value = Value::error(std::io::Error::other("bepis"));
        assert_eq!(value.as_error().unwrap().to_string(), "bepis");
        assert!(Value::from("bepis").as_error().is_none());
        assert!(Value::from(None::<i32>).is_null());
    }

    #[cfg(feature = "layout-json")]
    #[test]
    fn to_json_replaces_errors_with_messages() {
        let fields = crate::fields! {
            "error" => Value::error("bepis"),
            "hello" => "world",
            "sample" => 1,
            "text" => Value::Null,
            "list" => vec!["a", "b"],
        };

        let json = fields.to_json();
        assert_eq!(json["error"], serde_json::json!("bepis"));
        assert_eq!(json["hello"], serde_json::json!("world"));
        assert_eq!(json["sample"], serde_json::json!(1));
        assert_eq!(json["text"], serde_json::Value::Null);
        assert_eq!(json["list"], serde_json::json!(["a", "b"]));
    }
}
