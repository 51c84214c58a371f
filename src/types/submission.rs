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

use serde::Serialize;

use crate::types::card_id::CardId;
use crate::types::direction::Direction;

/// One rating decision for the card under review. Built right before it is
/// sent and dropped once the request settles.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct RatingSubmission {
    pub card_id: CardId,
    pub correct: bool,
    pub direction: Direction,
}

impl RatingSubmission {
    pub fn new(correct: bool, card_id: CardId, direction: Direction) -> Self {
        Self {
            card_id,
            correct,
            direction,
        }
    }
}
