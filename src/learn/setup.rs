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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use maud::html;

use crate::learn::session::ContextMode;
use crate::learn::session::DEFAULT_LIMIT;
use crate::learn::session::LearningSession;
use crate::learn::session::MAX_LIMIT;
use crate::learn::session::SessionOptions;
use crate::learn::state::FlashLevel;
use crate::learn::state::ServerState;
use crate::learn::template::page_template;

pub async fn setup_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut mutable = state.mutable.lock().unwrap();
    let deck = &state.deck;
    let success_rate = match mutable.db.success_rate() {
        Ok(rate) => rate,
        Err(e) => {
            log::error!("{e}");
            0.0
        }
    };
    let has_session = mutable.session.as_ref().is_some_and(|s| !s.is_complete());
    let body = html! {
        div.root {
            div.setup {
                h1 { (deck.name) }
                p.languages {
                    (deck.source_language) " → " (deck.target_language)
                }
                p.stats {
                    (deck.cards.len()) " cards · " (success_rate) "% success rate"
                }
                @if has_session {
                    p {
                        a href="/learn/review" { "Continue session" }
                        " · "
                        a href="/learn/session/end" data-confirm="End the current session?" { "End session" }
                    }
                }
                form action="/learn/session" method="post" {
                    label for="direction" { "Direction" }
                    select id="direction" name="direction" {
                        option value="random" selected { "Random" }
                        option value="source_to_target" {
                            (deck.source_language) " → " (deck.target_language)
                        }
                        option value="target_to_source" {
                            (deck.target_language) " → " (deck.source_language)
                        }
                    }
                    label for="limit" { "Cards" }
                    input id="limit" type="number" name="limit" min="1" max=(MAX_LIMIT) value=(DEFAULT_LIMIT);
                    label for="context_mode" { "Mode" }
                    select id="context_mode" name="context_mode" {
                        option value="combined" selected { "Words and context" }
                        option value="word" { "Words only" }
                        option value="context" { "Context only" }
                    }
                    input id="start" type="submit" value="Start";
                }
            }
        }
    };
    let flash = mutable.flash.take();
    let html = page_template(flash, body);
    (StatusCode::OK, Html(html.into_string()))
}

pub async fn create_session_handler(
    State(state): State<ServerState>,
    Form(options): Form<SessionOptions>,
) -> Redirect {
    let mut mutable = state.mutable.lock().unwrap();
    let session = LearningSession::build(&state.deck, &options, &mut rand::rng());
    match session {
        Some(session) => {
            log::debug!(
                "Starting session: {} entries, {:?} mode.",
                session.total_count(),
                options.context_mode
            );
            mutable.session = Some(session);
            Redirect::to("/learn/review")
        }
        None => {
            let message = if options.context_mode == ContextMode::Context {
                "No cards with context hints available for review."
            } else {
                "No cards available for review."
            };
            mutable.flash(FlashLevel::Info, message);
            Redirect::to("/")
        }
    }
}
