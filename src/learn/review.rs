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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::Markup;
use maud::html;

use crate::deck::Deck;
use crate::learn::session::EntryMode;
use crate::learn::session::SessionEntry;
use crate::learn::state::ServerState;
use crate::learn::template::page_template;

/// What the learner is asked, and in which languages.
struct Prompt<'a> {
    question: &'a str,
    answer: &'a str,
    question_lang: &'a str,
    answer_lang: &'a str,
    hint: Option<&'a str>,
}

fn prompt<'a>(deck: &'a Deck, entry: &SessionEntry) -> Option<Prompt<'a>> {
    let card = deck.card(entry.card_id)?;
    let prompt = match entry.mode {
        EntryMode::Context => Prompt {
            question: &card.source,
            answer: card.example.as_deref().unwrap_or(""),
            question_lang: &deck.source_language,
            answer_lang: &deck.target_language,
            hint: card.hint.as_deref(),
        },
        // Unknown direction tokens are asked source first.
        EntryMode::Word if entry.direction.is_reversed() => Prompt {
            question: &card.target,
            answer: &card.source,
            question_lang: &deck.target_language,
            answer_lang: &deck.source_language,
            hint: None,
        },
        EntryMode::Word => Prompt {
            question: &card.source,
            answer: &card.target,
            question_lang: &deck.source_language,
            answer_lang: &deck.target_language,
            hint: None,
        },
    };
    Some(prompt)
}

pub async fn review_handler(State(state): State<ServerState>) -> Response {
    let mut mutable = state.mutable.lock().unwrap();
    let Some(session) = &mutable.session else {
        let body = html! {
            div.root {
                div.message {
                    h1 { "No active learning session" }
                    a href="/" { "Start a session" }
                }
            }
        };
        return (StatusCode::OK, Html(page_template(None, body).into_string())).into_response();
    };
    let Some(entry) = session.current() else {
        return Redirect::to("/learn/session-complete").into_response();
    };
    let Some(prompt) = prompt(&state.deck, entry) else {
        log::error!("Card {} is not in the deck.", entry.card_id);
        return (StatusCode::NOT_FOUND, Html("Card not found".to_string())).into_response();
    };
    let progress = format!("{} / {}", session.current_index + 1, session.total_count());
    let body = render_card(entry, &prompt, &progress);
    let flash = mutable.flash.take();
    let html = page_template(flash, body);
    (StatusCode::OK, Html(html.into_string())).into_response()
}

fn render_card(entry: &SessionEntry, prompt: &Prompt, progress: &str) -> Markup {
    let card_id = entry.card_id.to_string();
    let direction = entry.direction.as_str();
    html! {
        div.root {
            div.card data-mode=(entry.mode.as_str()) {
                div.header {
                    div.progress { (progress) }
                    a.end href="/learn/session/end" data-confirm="End this session?" { "End" }
                }
                div.question {
                    span.lang { (prompt.question_lang) }
                    p { (prompt.question) }
                    @if let Some(hint) = prompt.hint {
                        p.hint { (hint) }
                    }
                }
                div #answer-section .answer style="display: none;" {
                    span.lang { (prompt.answer_lang) }
                    p { (prompt.answer) }
                }
                div.controls {
                    button #show-answer type="button" { "Show answer" }
                    div #rating-buttons style="display: none;" {
                        button.rating.wrong type="button"
                            data-correct="false" data-card-id=(card_id) data-direction=(direction) {
                            "Wrong"
                        }
                        button.rating.right type="button"
                            data-correct="true" data-card-id=(card_id) data-direction=(direction) {
                            "Right"
                        }
                    }
                }
            }
        }
    }
}
