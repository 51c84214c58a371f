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

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::db::Database;
use crate::deck::Deck;
use crate::error::Fallible;
use crate::learn::answer::answer_handler;
use crate::learn::complete::complete_handler;
use crate::learn::complete::end_handler;
use crate::learn::complete::recap_handler;
use crate::learn::review::review_handler;
use crate::learn::setup::create_session_handler;
use crate::learn::setup::setup_handler;
use crate::learn::state::MutableState;
use crate::learn::state::ServerState;

pub struct ServerConfig {
    pub deck: Deck,
    pub db_path: String,
    pub port: u16,
    pub open_browser: bool,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let db = Database::new(&config.db_path)?;
    let state = ServerState {
        deck: Arc::new(config.deck),
        mutable: Arc::new(Mutex::new(MutableState {
            db,
            session: None,
            flash: None,
        })),
    };
    let app = router(state);
    let bind = format!("0.0.0.0:{}", config.port);

    if config.open_browser {
        // Start a separate task to open the browser.
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: ServerState) -> Router {
    let app = Router::new();
    let app = app.route("/", get(setup_handler));
    let app = app.route("/learn/session", post(create_session_handler));
    let app = app.route("/learn/review", get(review_handler));
    let app = app.route("/learn/api/answer", post(answer_handler));
    let app = app.route("/learn/session-complete", get(complete_handler));
    let app = app.route("/learn/recap", get(recap_handler));
    let app = app.route("/learn/session/end", get(end_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    app.with_state(state)
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    let content = include_str!("script.js");
    (StatusCode::OK, [(CONTENT_TYPE, "text/javascript")], content)
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
