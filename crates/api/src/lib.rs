pub mod routes;
pub mod state;
mod ws;

use axum::Router;

pub use state::{AppState, DashboardEvent};

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    routes::router(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
        Router,
    };
    use futures_util::StreamExt;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use crate::{app, app_with_state, routes, state::AppState};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let response = app
            .clone()
            .oneshot(post_json("/predictions", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn post_predictions_logs_forecast_with_location() {
        let app = app();

        let response = app
            .oneshot(post_json(
                "/predictions",
                json!({
                    "asset_type": "INDEX",
                    "horizon": "24h",
                    "current_value": 103.0,
                    "history": [100.0, 101.0, 99.0, 102.0, 103.0],
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();
        let record = body_json(response).await;
        let id = record["id"].as_str().unwrap();
        assert_eq!(location, format!("/predictions/{id}"));
        assert!(id.starts_with("index-"));
        assert_eq!(record["confidence"], json!(55.0));
        assert!(record.get("accuracy").is_none());
    }

    #[tokio::test]
    async fn post_predictions_rejects_blank_horizon() {
        let response = app()
            .oneshot(post_json(
                "/predictions",
                json!({"asset_type": "CRYPTO", "horizon": "  ", "current_value": 1.0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_unknown_prediction_is_not_found() {
        let response = app()
            .oneshot(
                Request::get("/predictions/index-0-0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn resolve_round_trip_reports_accuracy() {
        let app = app_with_state(AppState::with_seed_for_test(9));
        let record = create(
            &app,
            json!({"asset_type": "EQUITY", "symbol": "AAPL", "horizon": "7d", "current_value": 100.0}),
        )
        .await;
        let id = record["id"].as_str().unwrap().to_string();
        let predicted = record["predicted_value"].as_f64().unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/predictions/{id}/actual"),
                json!({"actual_value": predicted}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let resolved = body_json(response).await;
        assert_eq!(resolved["accuracy"], json!(100.0));

        let fetched = app
            .oneshot(
                Request::get(format!("/predictions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(body_json(fetched).await, resolved);
    }

    #[tokio::test]
    async fn resolve_unknown_prediction_is_not_found() {
        let response = app()
            .oneshot(post_json(
                "/predictions/crypto-0-0/actual",
                json!({"actual_value": 1.0}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_predictions_filters_by_type_and_limits() {
        let app = app();
        for asset_type in ["INDEX", "CRYPTO", "CRYPTO", "CRYPTO"] {
            create(
                &app,
                json!({"asset_type": asset_type, "horizon": "24h", "current_value": 10.0}),
            )
            .await;
        }

        let response = app
            .oneshot(
                Request::get("/predictions?type=CRYPTO&limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let predictions = body["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 2);
        assert!(predictions
            .iter()
            .all(|record| record["asset_type"] == json!("CRYPTO")));
    }

    #[tokio::test]
    async fn analytics_summarize_resolved_predictions() {
        let state = AppState::with_seed_for_test(4);
        state.seed_demo_history(30);
        let app = app_with_state(state);

        let response = app
            .oneshot(
                Request::get("/analytics/predictions?type=INDEX")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["accuracy"]["total"], json!(30));
        assert_eq!(summary["by_asset_type"][0]["asset_type"], json!("INDEX"));
        assert_eq!(summary["by_asset_type"][0]["count"], json!(30));
        assert_eq!(summary["by_asset_type"][1]["count"], json!(0));
        assert_eq!(summary["confidence_distribution"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn event_socket_sends_connected_then_ledger_events() {
        let state = AppState::with_seed_for_test(2);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = routes::router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/events"))
            .await
            .unwrap();

        let connected = socket.next().await.unwrap().unwrap();
        let connected: Value = serde_json::from_str(connected.to_text().unwrap()).unwrap();
        assert_eq!(connected, json!({"event_type": "connected"}));

        let record = state.submit_forecast(predictions::ForecastRequest {
            asset_type: predictions::AssetType::Crypto,
            symbol: None,
            horizon: "24h".to_string(),
            current_value: 64_000.0,
            history: Vec::new(),
        });

        let logged = socket.next().await.unwrap().unwrap();
        let logged: Value = serde_json::from_str(logged.to_text().unwrap()).unwrap();
        assert_eq!(
            logged,
            json!({"event_type": "prediction_logged", "id": record.id, "asset_type": "CRYPTO"})
        );
    }
}
