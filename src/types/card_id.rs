// Copyright 2025 Fernando Borretti
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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// The identifier of a flashcard, as the server hands it out.
///
/// The client never interprets it: whatever JSON value the page rendered
/// is sent back unchanged, including `null`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Value);

impl CardId {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse a command-line argument. JSON literals (`3`, `null`, `"x"`)
    /// keep their type; anything else is sent as a string.
    pub fn parse_arg(arg: &str) -> Self {
        match serde_json::from_str::<Value>(arg) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(arg.to_string())),
        }
    }

    /// The integer this identifier denotes, if any. Numeric strings count,
    /// since form-rendered pages often quote the identifier.
    pub fn as_integer(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether the identifier is blank: null, `false`, zero, or empty.
    pub fn is_blank(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
        }
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<i64> for CardId {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}
