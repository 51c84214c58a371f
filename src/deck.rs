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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

/// A chapter of vocabulary cards, loaded from a TOML file.
#[derive(Clone, Debug, Deserialize)]
pub struct Deck {
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    pub cards: Vec<VocabularyCard>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VocabularyCard {
    pub id: i64,
    /// The word in the source language.
    pub source: String,
    /// The word in the target language.
    pub target: String,
    /// A sentence using the word, asked in context mode.
    #[serde(default)]
    pub example: Option<String>,
    /// A hint shown alongside context questions.
    #[serde(default)]
    pub hint: Option<String>,
}

impl VocabularyCard {
    /// Whether the card can be asked as a context question.
    pub fn has_context(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.example) && filled(&self.hint)
    }
}

impl Deck {
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            return fail("deck file does not exist.");
        }
        let content = read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let deck: Deck = toml::from_str(content)?;
        deck.validate()?;
        log::debug!("Loaded deck '{}' with {} cards.", deck.name, deck.cards.len());
        Ok(deck)
    }

    fn validate(&self) -> Fallible<()> {
        if self.cards.is_empty() {
            return fail("deck has no cards.");
        }
        let mut seen = HashSet::new();
        for card in &self.cards {
            if !seen.insert(card.id) {
                return fail(format!("duplicate card id: {}", card.id));
            }
            if card.source.trim().is_empty() || card.target.trim().is_empty() {
                return fail(format!("card {} has an empty word.", card.id));
            }
        }
        Ok(())
    }

    pub fn card(&self, id: i64) -> Option<&VocabularyCard> {
        self.cards.iter().find(|card| card.id == id)
    }
}
