use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::config::AppConfig;
use crate::contacts;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api",
              Router::new()
                  .merge(contacts::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::{dto::ContactPage, Contact};
    use crate::error::MessageResponse;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde::de::DeserializeOwned;
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn add(app: &Router, name: &str) -> Contact {
        let (status, bytes) = send(
            app,
            Method::POST,
            "/api/contacts",
            Some(json!({"name": name, "phone": "1234567890", "email": "x@y.z"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        parse(&bytes)
    }

    async fn list(app: &Router, uri: &str) -> ContactPage {
        let (status, bytes) = send(app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        parse(&bytes)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let (status, bytes) = send(&app, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"ok");
    }

    #[tokio::test]
    async fn create_returns_created_record() {
        let app = build_app(AppState::fake());
        let (status, bytes) = send(
            &app,
            Method::POST,
            "/api/contacts",
            Some(json!({"name": "  Ada Lovelace ", "phone": "1234567890", "email": "ada@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let body: serde_json::Value = parse(&bytes);
        assert_eq!(body["name"], "Ada Lovelace");
        assert_eq!(body["phone"], "1234567890");
        assert_eq!(body["email"], "ada@example.com");
        assert!(body["id"].is_string());
        assert!(body["createdAt"].is_string());
        assert_eq!(body["createdAt"], body["updatedAt"]);

        let page = list(&app, "/api/contacts").await;
        assert_eq!(page.contacts[0].name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn create_with_missing_field_is_rejected_without_write() {
        let app = build_app(AppState::fake());
        for payload in [
            json!({"phone": "1234567890", "email": "a@b.c"}),
            json!({"name": "Ada", "email": "a@b.c"}),
            json!({"name": "Ada", "phone": "1234567890", "email": "   "}),
        ] {
            let (status, bytes) = send(&app, Method::POST, "/api/contacts", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            let msg: MessageResponse = parse(&bytes);
            assert_eq!(msg.message, "Name, phone and email all fields are required");
        }
        assert_eq!(list(&app, "/api/contacts").await.total_pages, 0);
    }

    #[tokio::test]
    async fn malformed_body_gets_json_message() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/contacts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let msg: MessageResponse = parse(&bytes);
        assert!(!msg.message.is_empty());
    }

    #[tokio::test]
    async fn format_is_not_checked_unless_strict() {
        let lenient = build_app(AppState::fake());
        let (status, _) = send(
            &lenient,
            Method::POST,
            "/api/contacts",
            Some(json!({"name": "Ada", "phone": "12345", "email": "abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let mut config = AppConfig::in_memory();
        config.strict_validation = true;
        let strict = build_app(AppState::from_parts(
            Arc::new(crate::contacts::MemoryContactStore::new()),
            Arc::new(config),
        ));
        let (status, bytes) = send(
            &strict,
            Method::POST,
            "/api/contacts",
            Some(json!({"name": "Ada", "phone": "12345", "email": "abc"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let msg: MessageResponse = parse(&bytes);
        assert_eq!(msg.message, "Phone must be 10 digits; Invalid email format");
    }

    #[tokio::test]
    async fn pages_newest_first() {
        let app = build_app(AppState::fake());
        for name in ["A", "B", "C"] {
            add(&app, name).await;
        }

        let first = list(&app, "/api/contacts?page=1&limit=2").await;
        let names: Vec<_> = first.contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["C", "B"]);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.current_page, 1);

        let second = list(&app, "/api/contacts?page=2&limit=2").await;
        let names: Vec<_> = second.contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A"]);
        assert_eq!(second.current_page, 2);

        let defaults = list(&app, "/api/contacts").await;
        assert_eq!(defaults.contacts.len(), 3);
        assert_eq!(defaults.total_pages, 1);
        assert_eq!(defaults.current_page, 1);
    }

    #[tokio::test]
    async fn page_size_arithmetic_holds() {
        let app = build_app(AppState::fake());
        let n = 7;
        for i in 0..n {
            add(&app, &format!("c{i}")).await;
        }
        let limit = 3;
        for p in 1..=4i64 {
            let page = list(&app, &format!("/api/contacts?page={p}&limit={limit}")).await;
            let expected = limit.min((n - (p - 1) * limit).max(0));
            assert_eq!(page.contacts.len() as i64, expected, "page {p}");
            assert_eq!(page.total_pages, 3);
            assert!(page
                .contacts
                .windows(2)
                .all(|w| w[0].created_at >= w[1].created_at));
        }
    }

    #[tokio::test]
    async fn invalid_paging_is_bad_request() {
        let app = build_app(AppState::fake());
        for uri in ["/api/contacts?page=0", "/api/contacts?limit=-2", "/api/contacts?page=x"] {
            let (status, bytes) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let msg: MessageResponse = parse(&bytes);
            assert!(msg.message.contains("positive integer"));
        }
    }

    #[tokio::test]
    async fn duplicate_query_key_gets_json_message() {
        let app = build_app(AppState::fake());
        let (status, bytes) = send(&app, Method::GET, "/api/contacts?page=1&page=2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let msg: MessageResponse = parse(&bytes);
        assert!(msg.message.contains("page"), "{}", msg.message);
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let app = build_app(AppState::fake());
        let keep = add(&app, "keep").await;
        let gone = add(&app, "gone").await;

        let (status, bytes) =
            send(&app, Method::DELETE, &format!("/api/contacts/{}", gone.id), None).await;
        assert_eq!(status, StatusCode::OK);
        let msg: MessageResponse = parse(&bytes);
        assert_eq!(msg.message, "Contact Deleted");

        let page = list(&app, "/api/contacts").await;
        assert_eq!(page.contacts.len(), 1);
        assert_eq!(page.contacts[0].id, keep.id);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let app = build_app(AppState::fake());
        add(&app, "only").await;

        let (status, bytes) = send(
            &app,
            Method::DELETE,
            &format!("/api/contacts/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let msg: MessageResponse = parse(&bytes);
        assert_eq!(msg.message, "Contact not found");
        assert_eq!(list(&app, "/api/contacts").await.contacts.len(), 1);
    }

    #[tokio::test]
    async fn delete_malformed_id_is_server_error() {
        let app = build_app(AppState::fake());
        let (status, bytes) = send(&app, Method::DELETE, "/api/contacts/12345", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let msg: MessageResponse = parse(&bytes);
        assert!(msg.message.starts_with("Failed to DELETE contact"));
    }
}
