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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use reqwest::Client;
use serde_json::Value;

use crate::review::page::Page;
use crate::review::page::TerminalAction;
use crate::types::card_id::CardId;
use crate::types::direction::Direction;
use crate::types::submission::RatingSubmission;

pub const ANSWER_PATH: &str = "/learn/api/answer";

pub const REVIEW_PATH: &str = "/learn/review";

/// The server accepted the rating; the page should move on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Advance {
    pub navigate_to: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SubmitError {
    /// The request never got a response.
    Transport(String),
    /// The server answered with a non-2xx status.
    Status(u16),
    /// The body was not a JSON object.
    Decode(String),
    /// The body decoded but `success` was not truthy.
    Rejected { reason: Option<String> },
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Transport(e) => write!(f, "request failed: {e}"),
            SubmitError::Status(code) => write!(f, "server responded with status {code}"),
            SubmitError::Decode(e) => write!(f, "unexpected response body: {e}"),
            SubmitError::Rejected { reason: Some(reason) } => {
                write!(f, "rating was not accepted: {reason}")
            }
            SubmitError::Rejected { reason: None } => write!(f, "rating was not accepted"),
        }
    }
}

impl Error for SubmitError {}

/// Sends rating decisions to the review server.
#[derive(Clone)]
pub struct ReviewSubmitter {
    client: Client,
    base_url: String,
}

impl ReviewSubmitter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post one submission and interpret the response.
    pub async fn submit(&self, submission: &RatingSubmission) -> Result<Advance, SubmitError> {
        let url = format!("{}{ANSWER_PATH}", self.base_url);
        log::debug!(
            "Submitting rating for card {} ({}, correct={})",
            submission.card_id,
            submission.direction,
            submission.correct
        );
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| SubmitError::Decode(e.to_string()))?;
        let body = match body {
            Value::Object(body) => body,
            other => {
                return Err(SubmitError::Decode(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };
        if body.get("success").is_some_and(is_truthy) {
            Ok(Advance {
                navigate_to: REVIEW_PATH.to_string(),
            })
        } else {
            let reason = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(SubmitError::Rejected { reason })
        }
    }

    /// Submit a rating and finish with exactly one action on `page`.
    ///
    /// Accepted ratings navigate to the next card. Transport and decode
    /// failures reload the page, leaving the server to decide what comes
    /// next. A rejected rating is shown to the learner and nothing else
    /// happens.
    pub async fn submit_rating<P: Page + ?Sized>(
        &self,
        correct: bool,
        card_id: CardId,
        direction: Direction,
        page: &mut P,
    ) {
        let submission = RatingSubmission::new(correct, card_id, direction);
        let result = self.submit(&submission).await;
        terminal_action(result).apply(page);
    }
}

/// Truthiness of a JSON value as a browser script sees it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn terminal_action(result: Result<Advance, SubmitError>) -> TerminalAction {
    match result {
        Ok(advance) => TerminalAction::Navigate(advance.navigate_to),
        Err(e @ SubmitError::Rejected { .. }) => {
            log::warn!("{e}");
            TerminalAction::Notify(e.to_string())
        }
        Err(e) => {
            log::error!("error: {e}");
            TerminalAction::Reload
        }
    }
}
