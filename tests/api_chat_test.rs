//! Integration tests for the chat API endpoint

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, test_app, test_rag_app};

    async fn create_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/sessions")
                    .method("POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        body["session_id"].as_str().unwrap().to_string()
    }

    async fn chat(app: &Router, session_id: &str, message: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "session_id": session_id,
                            "message": message,
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Tests that each turn sends the full history to the model
    #[tokio::test]
    async fn it_keeps_history_across_turns() {
        let (app, _dir) = test_app().await;
        let id = create_session(&app).await;

        let response = chat(&app, &id, "こんにちは").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        // System message plus the question
        assert_eq!(body["message"], "2: こんにちは");
        assert_eq!(body["sources"].as_array().unwrap().len(), 0);

        let response = chat(&app, &id, "元気ですか").await;
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["message"], "4: 元気ですか");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[1]["content"], "こんにちは");
        assert_eq!(transcript[4]["role"], "assistant");
    }

    /// Tests that sessions don't see each other's conversations
    #[tokio::test]
    async fn it_isolates_sessions() {
        let (app, _dir) = test_app().await;
        let first = create_session(&app).await;
        let second = create_session(&app).await;

        chat(&app, &first, "one").await;
        chat(&app, &first, "two").await;

        let response = chat(&app, &second, "three").await;
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["message"], "2: three");
    }

    /// Tests that the RAG bot returns the chunks it used
    #[tokio::test]
    async fn it_returns_sources_for_rag_sessions() {
        let (app, _dir) = test_rag_app().await;
        let id = create_session(&app).await;

        let response = chat(&app, &id, "RAGとは何ですか？").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;

        // System message, context message, and the question
        assert_eq!(body["message"], "3: RAGとは何ですか？");
        let sources = body["sources"].as_array().unwrap();
        assert_eq!(sources.len(), 3);
        assert!(sources.iter().all(|s| s["source"].is_string()));
    }

    /// Tests that the RAG transcript keeps the literal question and
    /// not the retrieved context
    #[tokio::test]
    async fn it_stores_rag_questions_without_context() {
        let (app, _dir) = test_rag_app().await;
        let id = create_session(&app).await;

        chat(&app, &id, "ベクトルデータベースの例は？").await;
        let response = chat(&app, &id, "LLMは何ができますか").await;
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["message"], "5: LLMは何ができますか");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        let transcript = body["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 5);
        assert_eq!(
            transcript
                .iter()
                .filter(|m| m["role"] == "system")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn it_returns_not_found_for_unknown_sessions() {
        let (app, _dir) = test_app().await;

        let response = chat(&app, "missing", "hello").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_rejects_malformed_requests() {
        let (app, _dir) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/chat")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "no session"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
