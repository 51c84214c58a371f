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

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::db::percentage;
use crate::deck::Deck;
use crate::deck::VocabularyCard;
use crate::types::direction::Direction;

pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on the number of cards drawn into one session.
pub const MAX_LIMIT: usize = 50;

/// How a card is asked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntryMode {
    /// Ask for the translation of a word.
    Word,
    /// Ask for the example sentence, with the hint shown.
    Context,
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::Word => "word",
            EntryMode::Context => "context",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    /// Only context questions, for cards that have an example and a hint.
    Context,
    /// Only word questions.
    Word,
    /// Word questions for every card, plus a context question for cards
    /// that support one.
    #[default]
    Combined,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionChoice {
    /// Pick a direction per card.
    #[default]
    Random,
    SourceToTarget,
    TargetToSource,
}

impl DirectionChoice {
    fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Direction {
        match self {
            DirectionChoice::SourceToTarget => Direction::source_to_target(),
            DirectionChoice::TargetToSource => Direction::target_to_source(),
            DirectionChoice::Random => {
                if rng.random_bool(0.5) {
                    Direction::source_to_target()
                } else {
                    Direction::target_to_source()
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SessionOptions {
    #[serde(default)]
    pub direction: DirectionChoice,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub context_mode: ContextMode,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            direction: DirectionChoice::default(),
            limit: DEFAULT_LIMIT,
            context_mode: ContextMode::default(),
        }
    }
}

/// One card presentation in a session. The direction is fixed when the
/// session is built so a recap asks the card the same way.
#[derive(Clone, PartialEq, Debug)]
pub struct SessionEntry {
    pub card_id: i64,
    pub mode: EntryMode,
    pub direction: Direction,
}

#[derive(Clone, Debug)]
pub struct LearningSession {
    pub entries: Vec<SessionEntry>,
    pub context_mode: ContextMode,
    pub current_index: usize,
    pub correct_count: usize,
    /// Entries answered incorrectly, in the order they were answered.
    pub wrong_cards: Vec<SessionEntry>,
    /// Recap sessions never touch review history.
    pub is_recap: bool,
}

impl LearningSession {
    /// Draw a session from the deck. Returns `None` if no card qualifies.
    pub fn build<R: Rng + ?Sized>(
        deck: &Deck,
        options: &SessionOptions,
        rng: &mut R,
    ) -> Option<Self> {
        let limit = options.limit.min(MAX_LIMIT);
        let mut cards: Vec<&VocabularyCard> = deck.cards.iter().collect();
        cards.shuffle(rng);
        cards.truncate(limit);
        if options.context_mode == ContextMode::Context {
            cards.retain(|card| card.has_context());
        }

        let mut entries = Vec::new();
        for card in cards {
            let context_entry = SessionEntry {
                card_id: card.id,
                mode: EntryMode::Context,
                direction: Direction::context(),
            };
            match options.context_mode {
                ContextMode::Context => entries.push(context_entry),
                ContextMode::Combined if card.has_context() => {
                    entries.push(context_entry);
                    entries.push(SessionEntry {
                        card_id: card.id,
                        mode: EntryMode::Word,
                        direction: options.direction.pick(rng),
                    });
                }
                ContextMode::Combined | ContextMode::Word => entries.push(SessionEntry {
                    card_id: card.id,
                    mode: EntryMode::Word,
                    direction: options.direction.pick(rng),
                }),
            }
        }
        if entries.is_empty() {
            return None;
        }
        if options.context_mode == ContextMode::Combined {
            entries.shuffle(rng);
        }
        log::debug!("Built session with {} entries.", entries.len());
        Some(Self {
            entries,
            context_mode: options.context_mode,
            current_index: 0,
            correct_count: 0,
            wrong_cards: Vec::new(),
            is_recap: false,
        })
    }

    /// A session over the cards this one got wrong.
    pub fn recap(&self) -> Option<Self> {
        if self.wrong_cards.is_empty() {
            return None;
        }
        Some(Self {
            entries: self.wrong_cards.clone(),
            context_mode: self.context_mode,
            current_index: 0,
            correct_count: 0,
            wrong_cards: Vec::new(),
            is_recap: true,
        })
    }

    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn current(&self) -> Option<&SessionEntry> {
        self.entries.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.entries.len()
    }

    /// Whether an answer given with `direction` goes into review history.
    pub fn records_history(&self, direction: &Direction) -> bool {
        !direction.is_context() && !self.is_recap
    }

    /// Count an answer for the current entry and move on. Answers arriving
    /// after the last entry are ignored.
    pub fn record_answer(&mut self, correct: bool) {
        let Some(entry) = self.current().cloned() else {
            log::warn!("Answer received for a completed session.");
            return;
        };
        if correct {
            self.correct_count += 1;
        } else {
            self.wrong_cards.push(entry);
        }
        self.current_index += 1;
    }

    pub fn accuracy(&self) -> f64 {
        percentage(self.correct_count, self.total_count())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::deck::tests::SAMPLE_DECK;
    use crate::error::Fallible;

    fn options(context_mode: ContextMode, limit: usize) -> SessionOptions {
        SessionOptions {
            direction: DirectionChoice::SourceToTarget,
            limit,
            context_mode,
        }
    }

    fn big_deck(n: i64) -> Fallible<Deck> {
        let mut content = String::from(
            "name = \"big\"\nsource_language = \"a\"\ntarget_language = \"b\"\n",
        );
        for id in 1..=n {
            content.push_str(&format!(
                "\n[[cards]]\nid = {id}\nsource = \"s{id}\"\ntarget = \"t{id}\"\n"
            ));
        }
        Deck::parse(&content)
    }

    #[test]
    fn test_word_mode() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(1);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Word, 10), &mut rng).unwrap();
        assert_eq!(session.total_count(), 3);
        assert!(session.entries.iter().all(|e| e.mode == EntryMode::Word));
        assert!(
            session
                .entries
                .iter()
                .all(|e| e.direction == Direction::source_to_target())
        );
        Ok(())
    }

    #[test]
    fn test_limit_is_capped() -> Fallible<()> {
        let deck = big_deck(60)?;
        let mut rng = StdRng::seed_from_u64(2);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Word, 500), &mut rng).unwrap();
        assert_eq!(session.total_count(), MAX_LIMIT);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Word, 5), &mut rng).unwrap();
        assert_eq!(session.total_count(), 5);
        let ids: HashSet<i64> = session.entries.iter().map(|e| e.card_id).collect();
        assert_eq!(ids.len(), 5);
        Ok(())
    }

    #[test]
    fn test_context_mode_filters_cards() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(3);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Context, 10), &mut rng).unwrap();
        assert_eq!(
            session.entries,
            vec![SessionEntry {
                card_id: 1,
                mode: EntryMode::Context,
                direction: Direction::context(),
            }]
        );
        Ok(())
    }

    #[test]
    fn test_context_mode_without_context_cards() -> Fallible<()> {
        let deck = big_deck(3)?;
        let mut rng = StdRng::seed_from_u64(4);
        assert!(LearningSession::build(&deck, &options(ContextMode::Context, 10), &mut rng).is_none());
        Ok(())
    }

    #[test]
    fn test_combined_mode_duplicates_context_cards() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(5);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Combined, 10), &mut rng).unwrap();
        assert_eq!(session.total_count(), 4);
        let card_one: Vec<&SessionEntry> =
            session.entries.iter().filter(|e| e.card_id == 1).collect();
        assert_eq!(card_one.len(), 2);
        assert!(card_one.iter().any(|e| e.mode == EntryMode::Context));
        assert!(card_one.iter().any(|e| e.mode == EntryMode::Word));
        Ok(())
    }

    #[test]
    fn test_random_direction_uses_both_faces() -> Fallible<()> {
        let deck = big_deck(40)?;
        let mut rng = StdRng::seed_from_u64(6);
        let opts = SessionOptions {
            direction: DirectionChoice::Random,
            limit: 40,
            context_mode: ContextMode::Word,
        };
        let session = LearningSession::build(&deck, &opts, &mut rng).unwrap();
        let directions: HashSet<&str> =
            session.entries.iter().map(|e| e.direction.as_str()).collect();
        assert!(directions.contains(Direction::SOURCE_TO_TARGET));
        assert!(directions.contains(Direction::TARGET_TO_SOURCE));
        Ok(())
    }

    #[test]
    fn test_record_answers_and_recap() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(7);
        let mut session =
            LearningSession::build(&deck, &options(ContextMode::Word, 10), &mut rng).unwrap();
        let second = session.entries[1].clone();
        session.record_answer(true);
        session.record_answer(false);
        session.record_answer(true);
        assert!(session.is_complete());
        assert_eq!(session.correct_count, 2);
        assert_eq!(session.wrong_cards, vec![second.clone()]);
        assert_eq!(session.accuracy(), 66.7);

        // Late answers change nothing.
        session.record_answer(false);
        assert_eq!(session.current_index, 3);
        assert_eq!(session.wrong_cards.len(), 1);

        let recap = session.recap().unwrap();
        assert!(recap.is_recap);
        assert_eq!(recap.entries, vec![second]);
        assert!(!recap.records_history(&Direction::source_to_target()));
        Ok(())
    }

    #[test]
    fn test_no_recap_without_mistakes() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(8);
        let mut session =
            LearningSession::build(&deck, &options(ContextMode::Word, 1), &mut rng).unwrap();
        session.record_answer(true);
        assert!(session.recap().is_none());
        Ok(())
    }

    #[test]
    fn test_context_answers_are_not_recorded() -> Fallible<()> {
        let deck = Deck::parse(SAMPLE_DECK)?;
        let mut rng = StdRng::seed_from_u64(9);
        let session =
            LearningSession::build(&deck, &options(ContextMode::Word, 10), &mut rng).unwrap();
        assert!(session.records_history(&Direction::source_to_target()));
        assert!(!session.records_history(&Direction::context()));
        Ok(())
    }
}
