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
use maud::html;

use crate::learn::state::FlashLevel;
use crate::learn::state::ServerState;
use crate::learn::template::page_template;

pub async fn complete_handler(State(state): State<ServerState>) -> Response {
    let mut mutable = state.mutable.lock().unwrap();
    let Some(session) = &mutable.session else {
        mutable.flash(FlashLevel::Error, "No session data found");
        return Redirect::to("/").into_response();
    };
    if !session.is_complete() {
        return Redirect::to("/learn/review").into_response();
    }
    let correct_count = session.correct_count;
    let total_count = session.total_count();
    let accuracy = session.accuracy();
    let wrong_count = session.wrong_cards.len();
    let is_recap = session.is_recap;
    // Keep the session around while it still has cards to recap.
    if wrong_count == 0 {
        mutable.session = None;
    }
    let body = html! {
        div.root {
            div.finished {
                h1 {
                    @if is_recap { "Recap Completed" } @else { "Session Completed" }
                }
                p.score { (correct_count) " / " (total_count) " correct" }
                p.accuracy { (accuracy) "% accuracy" }
                @if wrong_count > 0 {
                    p {
                        a #recap href="/learn/recap" {
                            "Recap " (wrong_count) " wrong card(s)"
                        }
                    }
                }
                p {
                    a href="/learn/session/end" { "Done" }
                }
            }
        }
    };
    let flash = mutable.flash.take();
    let html = page_template(flash, body);
    (StatusCode::OK, Html(html.into_string())).into_response()
}

pub async fn recap_handler(State(state): State<ServerState>) -> Redirect {
    let mut mutable = state.mutable.lock().unwrap();
    let Some(session) = &mutable.session else {
        mutable.flash(FlashLevel::Error, "No previous session found for recap");
        return Redirect::to("/");
    };
    match session.recap() {
        Some(recap) => {
            let count = recap.total_count();
            log::debug!("Starting recap of {count} cards.");
            mutable.session = Some(recap);
            mutable.flash(
                FlashLevel::Info,
                format!("Recapping {count} card(s) you got wrong"),
            );
            Redirect::to("/learn/review")
        }
        None => {
            mutable.session = None;
            mutable.flash(FlashLevel::Info, "No wrong cards to recap");
            Redirect::to("/")
        }
    }
}

pub async fn end_handler(State(state): State<ServerState>) -> Redirect {
    let mut mutable = state.mutable.lock().unwrap();
    mutable.session = None;
    mutable.flash(FlashLevel::Info, "Session ended");
    Redirect::to("/")
}
