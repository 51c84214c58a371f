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

pub mod page;
pub mod submitter;

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use axum::Router;
    use axum::http::HeaderMap;
    use axum::http::StatusCode;
    use axum::http::header::CONTENT_TYPE;
    use axum::routing::post;
    use serde_json::Value;
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::review::page::RecordingPage;
    use crate::review::page::TerminalAction;
    use crate::review::submitter::ANSWER_PATH;
    use crate::review::submitter::ReviewSubmitter;
    use crate::review::submitter::SubmitError;
    use crate::types::card_id::CardId;
    use crate::types::direction::Direction;
    use crate::types::submission::RatingSubmission;

    type Captured = Arc<Mutex<Vec<(Option<String>, String)>>>;

    /// Serve `reply` with `status` on the answer endpoint, remembering every
    /// request's content type and body.
    async fn stub(status: StatusCode, reply: &'static str) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let app = Router::new().route(
            ANSWER_PATH,
            post(move |headers: HeaderMap, body: String| {
                let sink = sink.clone();
                async move {
                    let content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    sink.lock().unwrap().push((content_type, body));
                    (status, reply)
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        (format!("http://{addr}"), captured)
    }

    fn bodies(captured: &Captured) -> Vec<Value> {
        captured
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| serde_json::from_str(body).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_success_navigates_to_review() {
        let (url, captured) = stub(StatusCode::OK, r#"{"success": true}"#).await;
        let submitter = ReviewSubmitter::new(url);
        let mut page = RecordingPage::default();
        submitter
            .submit_rating(true, CardId::from(7), Direction::source_to_target(), &mut page)
            .await;
        assert_eq!(
            page.actions,
            vec![TerminalAction::Navigate("/learn/review".to_string())]
        );
        let requests = captured.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_deref(), Some("application/json"));
        assert_eq!(
            bodies(&captured),
            vec![json!({"card_id": 7, "correct": true, "direction": "source_to_target"})]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_reloads() {
        let port = portpicker::pick_unused_port().unwrap();
        let submitter = ReviewSubmitter::new(format!("http://127.0.0.1:{port}"));
        let mut page = RecordingPage::default();
        submitter
            .submit_rating(false, CardId::from(1), Direction::context(), &mut page)
            .await;
        assert_eq!(page.actions, vec![TerminalAction::Reload]);
    }

    #[tokio::test]
    async fn test_malformed_body_reloads() {
        let (url, _) = stub(StatusCode::OK, "<html>oops</html>").await;
        let submitter = ReviewSubmitter::new(url);
        let submission = RatingSubmission::new(true, CardId::from(1), Direction::new("x"));
        let result = submitter.submit(&submission).await;
        assert!(matches!(result, Err(SubmitError::Decode(_))));

        let mut page = RecordingPage::default();
        submitter
            .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
            .await;
        assert_eq!(page.actions, vec![TerminalAction::Reload]);
    }

    #[tokio::test]
    async fn test_error_status_reloads() {
        let (url, _) = stub(StatusCode::INTERNAL_SERVER_ERROR, r#"{"success": true}"#).await;
        let submitter = ReviewSubmitter::new(url);
        let submission = RatingSubmission::new(true, CardId::from(1), Direction::new("x"));
        assert_eq!(
            submitter.submit(&submission).await,
            Err(SubmitError::Status(500))
        );

        let mut page = RecordingPage::default();
        submitter
            .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
            .await;
        assert_eq!(page.actions, vec![TerminalAction::Reload]);
    }

    #[tokio::test]
    async fn test_rejection_is_shown() {
        let (url, _) = stub(StatusCode::OK, r#"{"success": false}"#).await;
        let submitter = ReviewSubmitter::new(url);
        let mut page = RecordingPage::default();
        submitter
            .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
            .await;
        assert_eq!(
            page.actions,
            vec![TerminalAction::Notify("rating was not accepted".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_success_flag_is_a_rejection() {
        let (url, _) = stub(StatusCode::OK, r#"{"error": "Missing required data"}"#).await;
        let submitter = ReviewSubmitter::new(url);
        let submission = RatingSubmission::new(true, CardId::from(1), Direction::new("x"));
        assert_eq!(
            submitter.submit(&submission).await,
            Err(SubmitError::Rejected {
                reason: Some("Missing required data".to_string())
            })
        );
    }

    #[tokio::test]
    async fn test_non_object_bodies_reload() {
        for reply in ["null", "[]", "42", "\"success\""] {
            let (url, _) = stub(StatusCode::OK, reply).await;
            let submitter = ReviewSubmitter::new(url);
            let submission = RatingSubmission::new(true, CardId::from(1), Direction::new("x"));
            assert!(matches!(
                submitter.submit(&submission).await,
                Err(SubmitError::Decode(_))
            ));

            let mut page = RecordingPage::default();
            submitter
                .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
                .await;
            assert_eq!(page.actions, vec![TerminalAction::Reload], "body: {reply}");
        }
    }

    #[tokio::test]
    async fn test_truthy_success_flag_navigates() {
        for reply in [r#"{"success": 1}"#, r#"{"success": "true"}"#] {
            let (url, _) = stub(StatusCode::OK, reply).await;
            let submitter = ReviewSubmitter::new(url);
            let mut page = RecordingPage::default();
            submitter
                .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
                .await;
            assert_eq!(
                page.actions,
                vec![TerminalAction::Navigate("/learn/review".to_string())],
                "body: {reply}"
            );
        }
    }

    #[tokio::test]
    async fn test_falsy_success_flag_is_a_rejection() {
        for reply in [r#"{"success": 0}"#, r#"{"success": ""}"#, r#"{"success": null}"#] {
            let (url, _) = stub(StatusCode::OK, reply).await;
            let submitter = ReviewSubmitter::new(url);
            let mut page = RecordingPage::default();
            submitter
                .submit_rating(true, CardId::from(1), Direction::new("x"), &mut page)
                .await;
            assert_eq!(
                page.actions,
                vec![TerminalAction::Notify("rating was not accepted".to_string())],
                "body: {reply}"
            );
        }
    }

    #[tokio::test]
    async fn test_identical_calls_send_identical_bodies() {
        let (url, captured) = stub(StatusCode::OK, r#"{"success": true}"#).await;
        let submitter = ReviewSubmitter::new(format!("{url}/"));
        let mut page = RecordingPage::default();
        for _ in 0..2 {
            submitter
                .submit_rating(false, CardId::from("9"), Direction::target_to_source(), &mut page)
                .await;
        }
        let bodies = bodies(&captured);
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(page.actions.len(), 2);
    }

    #[tokio::test]
    async fn test_null_card_id_is_still_sent() {
        let (url, captured) = stub(StatusCode::OK, r#"{"success": true}"#).await;
        let submitter = ReviewSubmitter::new(url);
        let mut page = RecordingPage::default();
        submitter
            .submit_rating(true, CardId::new(Value::Null), Direction::new("x"), &mut page)
            .await;
        assert_eq!(
            bodies(&captured),
            vec![json!({"card_id": null, "correct": true, "direction": "x"})]
        );
    }
}
