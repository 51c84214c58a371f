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

use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::db::Database;
use crate::deck::Deck;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::learn::server::ServerConfig;
use crate::learn::server::start_server;
use crate::review::page::Page;
use crate::review::page::TerminalAction;
use crate::review::submitter::ReviewSubmitter;
use crate::review::submitter::terminal_action;
use crate::types::card_id::CardId;
use crate::types::direction::Direction;
use crate::types::submission::RatingSubmission;

const DEFAULT_DECK: &str = "deck.toml";

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Review a deck in the browser.
    Serve {
        /// Path to the deck file. Defaults to `deck.toml`.
        deck: Option<String>,
        /// Port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Path to the review history database. Defaults to the deck path
        /// with a `.db` extension.
        #[arg(long)]
        db: Option<String>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Submit one rating to a running server.
    Rate {
        /// Base URL of the server.
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,
        /// The card identifier. JSON literals keep their type.
        #[arg(long)]
        card_id: String,
        /// The direction token the card was shown with.
        #[arg(long)]
        direction: String,
        /// Rate the card as answered incorrectly.
        #[arg(long)]
        incorrect: bool,
    },
    /// Check that a deck file is valid.
    Check {
        /// Path to the deck file. Defaults to `deck.toml`.
        deck: Option<String>,
    },
    /// Print review statistics as JSON.
    Stats {
        /// Path to the deck file. Defaults to `deck.toml`.
        deck: Option<String>,
        /// Path to the review history database.
        #[arg(long)]
        db: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            deck,
            port,
            db,
            no_open,
        } => {
            let deck_path = deck_path(deck);
            let deck = Deck::load(&deck_path)?;
            let db_path = db_path(&deck_path, db)?;
            println!("Serving '{}' on http://127.0.0.1:{port}/", deck.name);
            start_server(ServerConfig {
                deck,
                db_path,
                port,
                open_browser: !no_open,
            })
            .await
        }
        Command::Rate {
            url,
            card_id,
            direction,
            incorrect,
        } => {
            let submitter = ReviewSubmitter::new(url);
            let submission = RatingSubmission::new(
                !incorrect,
                CardId::parse_arg(&card_id),
                Direction::new(direction),
            );
            let action = terminal_action(submitter.submit(&submission).await);
            let recorded = matches!(action, TerminalAction::Navigate(_));
            let mut page = ConsolePage {
                base_url: submitter.base_url().to_string(),
            };
            action.apply(&mut page);
            if recorded {
                Ok(())
            } else {
                fail("rating was not recorded.")
            }
        }
        Command::Check { deck } => {
            Deck::load(&deck_path(deck))?;
            println!("ok");
            Ok(())
        }
        Command::Stats { deck, db } => {
            let deck_path = deck_path(deck);
            let deck = Deck::load(&deck_path)?;
            let db = Database::new(&db_path(&deck_path, db)?)?;
            let stats = deck_stats(&deck, &db)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

fn deck_path(deck: Option<String>) -> PathBuf {
    PathBuf::from(deck.unwrap_or_else(|| DEFAULT_DECK.to_string()))
}

fn db_path(deck_path: &Path, db: Option<String>) -> Fallible<String> {
    match db {
        Some(db) => Ok(db),
        None => deck_path
            .with_extension("db")
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| ErrorReport::new("invalid path")),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    card_count: usize,
    context_card_count: usize,
    review_count: usize,
    success_rate: f64,
    cards: Vec<CardStats>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardStats {
    id: i64,
    source: String,
    target: String,
    review_count: usize,
    correct_count: usize,
}

fn deck_stats(deck: &Deck, db: &Database) -> Fallible<Stats> {
    let mut cards = Vec::new();
    for card in &deck.cards {
        let reviews = db.reviews_for_card(card.id)?;
        cards.push(CardStats {
            id: card.id,
            source: card.source.clone(),
            target: card.target.clone(),
            review_count: reviews.len(),
            correct_count: reviews.iter().filter(|r| r.correct).count(),
        });
    }
    Ok(Stats {
        card_count: deck.cards.len(),
        context_card_count: deck.cards.iter().filter(|c| c.has_context()).count(),
        review_count: db.review_count()?,
        success_rate: db.success_rate()?,
        cards,
    })
}

/// Reports the terminal action on the console.
struct ConsolePage {
    base_url: String,
}

impl Page for ConsolePage {
    fn navigate(&mut self, url: &str) {
        println!("Recorded. Next card: {}{url}", self.base_url);
    }

    fn reload(&mut self) {
        println!("Submission failed. Reload the review page.");
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
