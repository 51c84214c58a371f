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

/// Which face of a card was shown first.
///
/// The value set belongs to the server. The client carries the token
/// through verbatim.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(String);

impl Direction {
    /// Source word shown, target word asked.
    pub const SOURCE_TO_TARGET: &'static str = "source_to_target";
    /// Target word shown, source word asked.
    pub const TARGET_TO_SOURCE: &'static str = "target_to_source";
    /// Example-sentence question. Never recorded in review history.
    pub const CONTEXT: &'static str = "context";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn source_to_target() -> Self {
        Self::new(Self::SOURCE_TO_TARGET)
    }

    pub fn target_to_source() -> Self {
        Self::new(Self::TARGET_TO_SOURCE)
    }

    pub fn context() -> Self {
        Self::new(Self::CONTEXT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_context(&self) -> bool {
        self.0 == Self::CONTEXT
    }

    pub fn is_reversed(&self) -> bool {
        self.0 == Self::TARGET_TO_SOURCE
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert!(Direction::context().is_context());
        assert!(!Direction::source_to_target().is_context());
        assert!(Direction::target_to_source().is_reversed());
        assert!(!Direction::new("sideways").is_reversed());
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        let direction = Direction::new("sideways");
        assert_eq!(direction.as_str(), "sideways");
        assert_eq!(serde_json::to_string(&direction).unwrap(), "\"sideways\"");
    }
}
