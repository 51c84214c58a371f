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

use crate::db::Database;
use crate::deck::Deck;
use crate::learn::session::LearningSession;

#[derive(Clone)]
pub struct ServerState {
    pub deck: Arc<Deck>,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub db: Database,
    pub session: Option<LearningSession>,
    /// A message shown once, on the next page rendered.
    pub flash: Option<Flash>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FlashLevel {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl MutableState {
    pub fn flash(&mut self, level: FlashLevel, message: impl Into<String>) {
        self.flash = Some(Flash {
            level,
            message: message.into(),
        });
    }
}
