// Handler for GET /api/signal
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::helpers::{parse_signal_query, SignalQuery};
use super::SignalEngine;
use crate::error::EngineError;

pub async fn handle_generate_signal(
    State(engine): State<Arc<SignalEngine>>,
    Query(query): Query<SignalQuery>,
) -> Result<Response, EngineError> {
    let (pair, timeframe) = parse_signal_query(&query)?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate_signal", %request_id, symbol = %pair, %timeframe);

    async move {
        tracing::info!("Received signal request");
        let signal = engine.generate(&pair, timeframe).await?;
        let body = serde_json::to_string_pretty(&signal)
            .map_err(|e| EngineError::AnyhowError(e.into()))?;
        let headers = [(header::CONTENT_TYPE, "application/json")];
        Ok::<_, EngineError>((StatusCode::OK, headers, body).into_response())
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::EngineSettings;
    use crate::data::market_data::mock::StaticBars;
    use crate::indicators::test_support::create_candle;
    use crate::llm::mock::ScriptedModel;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn engine(reply: &str, key: Option<&str>) -> Arc<SignalEngine> {
        let candles = (0..120).map(|i| create_candle(i, 1.25 + i as f64 * 0.0001)).collect();
        let settings = EngineSettings {
            model_api_key: key.map(String::from),
            ..EngineSettings::default()
        };
        Arc::new(SignalEngine::new(
            Arc::new(StaticBars::new(candles)),
            Arc::new(ScriptedModel::replying(reply)),
            settings,
        ))
    }

    fn query(pair: &str, timeframe: &str) -> Query<SignalQuery> {
        Query(SignalQuery {
            pair: Some(pair.to_string()),
            timeframe: Some(timeframe.to_string()),
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_success_returns_signal_json() {
        let reply = r#"Sure: {"action":"sell","entry":1.262,"stopLoss":1.265,
            "takeProfit":1.257,"confidence":0.9,"rationale":"overbought"}"#;
        let engine = engine(reply, Some("k"));
        let response = handle_generate_signal(State(engine), query("gbpusd", "m5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["pair"], "GBPUSD");
        assert_eq!(json["timeframe"], "M5");
        assert_eq!(json["action"], "sell");
        assert_eq!(json["stopLoss"], 1.265);
        assert!(json["generatedAt"].is_string());
    }

    #[tokio::test]
    async fn test_bad_pair_is_400() {
        let err = handle_generate_signal(State(engine("{}", Some("k"))), query("EURO", "M15"))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_key_message_is_verbatim() {
        let err = handle_generate_signal(State(engine("{}", None)), query("EURUSD", "M15"))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Missing GOOGLE_API_KEY environment variable");
    }

    #[tokio::test]
    async fn test_invalid_model_output_is_502() {
        let engine = engine("no json here", Some("k"));
        let err = handle_generate_signal(State(engine), query("EURUSD", "M15"))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_text(response).await, "Model returned invalid JSON");
    }
}
