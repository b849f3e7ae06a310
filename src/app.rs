use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, products, suppliers, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(products::router())
        .merge(suppliers::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
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

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn grace() -> Value {
        json!({
            "name": "Grace Hopper",
            "email": "grace@navy.mil",
            "login": "grace",
            "password": "cobol-1959"
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn product_lifecycle_applies_defaults() {
        let app = build_app(AppState::fake());

        let (status, created) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Widget", "price": 9.99 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["quantity"], 0.0);
        assert_eq!(created["category"], "General");
        assert_eq!(created["price"], 9.99);

        let id = created["id"].as_str().unwrap().to_string();
        let (status, fetched) = send(&app, "GET", &format!("/products/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, body) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = send(&app, "GET", &format!("/products/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn fractional_quantity_is_accepted() {
        let app = build_app(AppState::fake());
        let (status, created) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Rope", "quantity": 2.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["quantity"], 2.5);

        let id = created["id"].as_str().unwrap();
        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/products/{id}"),
            Some(json!({ "quantity": 0.75 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["quantity"], 0.75);
    }

    #[tokio::test]
    async fn blank_category_update_is_rejected() {
        let app = build_app(AppState::fake());
        let (_, created) = send(
            &app,
            "POST",
            "/products",
            Some(json!({ "name": "Rope", "category": "Marine" })),
        )
        .await;
        let uri = format!("/products/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, Some(json!({ "category": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "category is required");

        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["category"], "Marine");
    }

    #[tokio::test]
    async fn user_responses_never_include_password() {
        let app = build_app(AppState::fake());
        let (status, created) = send(&app, "POST", "/users", Some(grace())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.get("password").is_none());
        assert_eq!(created["profile"], "User");

        let (status, list) = send(&app, "GET", "/users", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.iter().all(|u| u.get("password").is_none()));

        let id = created["id"].as_str().unwrap();
        let (_, one) = send(&app, "GET", &format!("/users/{id}"), None).await;
        assert!(one.get("password").is_none());
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        send(&app, "POST", "/users", Some(grace())).await;

        let stored = state
            .users
            .find_by_email("grace@navy.mil")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "cobol-1959");
        assert!(state.hasher.verify_password("cobol-1959", &stored.password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_user_is_a_validation_failure() {
        let app = build_app(AppState::fake());
        send(&app, "POST", "/users", Some(grace())).await;

        let mut dup = grace();
        dup["login"] = json!("someone-else");
        let (status, body) = send(&app, "POST", "/users", Some(dup)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (_, list) = send(&app, "GET", "/users", None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_required_field_is_bad_request() {
        let app = build_app(AppState::fake());
        let (status, body) = send(&app, "POST", "/suppliers", Some(json!({ "phone": "1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = build_app(AppState::fake());
        let req = Request::post("/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_outcomes() {
        let state = AppState::fake();
        let app = build_app(state.clone());
        let (_, created) = send(&app, "POST", "/users", Some(grace())).await;

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            Some(json!({ "email": "nobody@navy.mil", "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            Some(json!({ "email": "grace@navy.mil", "password": "fortran" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid password");

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            Some(json!({ "email": "Grace@Navy.mil", "password": "cobol-1959" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");

        let claims = state.jwt.verify(body["token"].as_str().unwrap()).unwrap();
        assert_eq!(claims.sub.to_string(), created["id"].as_str().unwrap());
        assert_eq!(claims.email, "grace@navy.mil");
        assert_eq!(claims.profile, "User");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn login_uses_updated_password() {
        let app = build_app(AppState::fake());
        let (_, created) = send(&app, "POST", "/users", Some(grace())).await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/users/{id}"),
            Some(json!({ "password": "rear-admiral" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            "/login",
            Some(json!({ "email": "grace@navy.mil", "password": "cobol-1959" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            "POST",
            "/login",
            Some(json!({ "email": "grace@navy.mil", "password": "rear-admiral" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = build_app(AppState::fake());
        let missing = uuid::Uuid::new_v4();
        for collection in ["users", "products", "suppliers"] {
            let uri = format!("/{collection}/{missing}");
            let (status, _) = send(&app, "PUT", &uri, Some(json!({ "name": "x" }))).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "PUT {uri}");
            let (status, _) = send(&app, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
            let (status, _) = send(&app, "GET", &format!("/{collection}/not-an-id"), None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "GET malformed id on {collection}");
        }
    }

    #[tokio::test]
    async fn user_and_supplier_delete_then_not_found() {
        let app = build_app(AppState::fake());
        let cases = [
            ("users", grace(), "User"),
            ("suppliers", json!({ "name": "Acme" }), "Supplier"),
        ];
        for (collection, body, label) in cases {
            let (status, created) = send(&app, "POST", &format!("/{collection}"), Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "create {collection}");
            let uri = format!("/{collection}/{}", created["id"].as_str().unwrap());

            let (status, body) = send(&app, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::OK, "DELETE {uri}");
            assert_eq!(body["message"], format!("{label} deleted"));

            let (status, body) = send(&app, "GET", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
            assert_eq!(body["message"], format!("{label} not found"));

            let (status, _) = send(&app, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "second DELETE {uri}");
        }
    }

    #[tokio::test]
    async fn supplier_update_roundtrip() {
        let app = build_app(AppState::fake());
        let (status, created) = send(
            &app,
            "POST",
            "/suppliers",
            Some(json!({ "name": "Acme", "contact": "Wile E." })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/suppliers/{id}"),
            Some(json!({ "phone": "555-0100" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["contact"], "Wile E.");
        assert_eq!(updated["phone"], "555-0100");
        assert_eq!(updated["email"], Value::Null);
    }
}
