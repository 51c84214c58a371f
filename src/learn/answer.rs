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

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

use crate::db::ReviewRecord;
use crate::error::Fallible;
use crate::learn::state::ServerState;
use crate::types::card_id::CardId;
use crate::types::direction::Direction;
use crate::types::timestamp::Timestamp;

#[derive(Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    card_id: Option<CardId>,
    #[serde(default)]
    correct: Option<Value>,
    #[serde(default)]
    direction: Option<Value>,
}

/// A request that passed validation.
struct Answer {
    card_id: i64,
    correct: bool,
    direction: Direction,
}

pub async fn answer_handler(
    State(state): State<ServerState>,
    request: Result<Json<AnswerRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::debug!("Rejected answer body: {rejection}");
            return bad_request("Invalid JSON body");
        }
    };
    let (card_id, correct, direction) = match (request.card_id, request.correct, request.direction) {
        (Some(card_id), Some(correct), Some(direction))
            if !card_id.is_blank() && !correct.is_null() && !is_blank_text(&direction) =>
        {
            (card_id, correct, direction)
        }
        _ => return bad_request("Missing required data"),
    };
    let Value::Bool(correct) = correct else {
        return bad_request("Invalid value for correct");
    };
    let Value::String(direction) = direction else {
        return bad_request("Invalid value for direction");
    };
    let direction = Direction::new(direction);
    let Some(card) = card_id.as_integer().and_then(|id| state.deck.card(id)) else {
        log::debug!("Answer for unknown card {card_id}.");
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Card not found"})),
        );
    };
    let answer = Answer {
        card_id: card.id,
        correct,
        direction,
    };
    match record_answer(&state, answer) {
        Ok(()) => (StatusCode::OK, Json(json!({"success": true}))),
        Err(e) => {
            log::error!("{e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to record answer"})),
            )
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn is_blank_text(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Apply an answer to the active session, if there is one.
fn record_answer(state: &ServerState, answer: Answer) -> Fallible<()> {
    let mut mutable = state.mutable.lock().unwrap();
    let mutable = &mut *mutable;
    let Some(session) = mutable.session.as_mut() else {
        log::debug!("No active session; answer for card {} ignored.", answer.card_id);
        return Ok(());
    };
    if session.is_complete() {
        log::warn!("Answer for card {} arrived after the session ended.", answer.card_id);
        return Ok(());
    }
    if session.records_history(&answer.direction) {
        let review = ReviewRecord {
            card_id: answer.card_id,
            correct: answer.correct,
            direction: answer.direction.clone(),
            reviewed_at: Timestamp::now(),
        };
        mutable.db.record_review(&review)?;
    }
    log::debug!(
        "Card {} ({}) answered {}.",
        answer.card_id,
        answer.direction,
        if answer.correct { "correctly" } else { "incorrectly" }
    );
    session.record_answer(answer.correct);
    Ok(())
}
