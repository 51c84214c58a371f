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

/// The navigation surface a review screen exposes to the submitter.
pub trait Page {
    /// Full navigation to another URL.
    fn navigate(&mut self, url: &str);

    /// Full reload of the current document.
    fn reload(&mut self);

    /// Tell the learner something went wrong without leaving the page.
    fn show_error(&mut self, message: &str);
}

/// The single action a submission ends with.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TerminalAction {
    Navigate(String),
    Reload,
    Notify(String),
}

impl TerminalAction {
    pub fn apply<P: Page + ?Sized>(self, page: &mut P) {
        match self {
            TerminalAction::Navigate(url) => page.navigate(&url),
            TerminalAction::Reload => page.reload(),
            TerminalAction::Notify(message) => page.show_error(&message),
        }
    }
}

/// A page that remembers what it was asked to do.
#[derive(Default, Debug)]
pub struct RecordingPage {
    pub actions: Vec<TerminalAction>,
}

impl Page for RecordingPage {
    fn navigate(&mut self, url: &str) {
        self.actions.push(TerminalAction::Navigate(url.to_string()));
    }

    fn reload(&mut self) {
        self.actions.push(TerminalAction::Reload);
    }

    fn show_error(&mut self, message: &str) {
        self.actions.push(TerminalAction::Notify(message.to_string()));
    }
}
