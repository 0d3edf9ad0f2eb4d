//! The invoice-processing endpoint.
//!
//! Registered for every method; dispatch happens here so non-POST methods
//! get a JSON error body rather than axum's bare 405.

use axum::Json;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use tickbook_core::{ExtractionProvider, ExtractionRequest, InvoiceError, NormalizedInvoice};
use tickbook_extract::prompt::MAX_TOKENS;
use tickbook_extract::{EXTRACTION_PROMPT, parse_invoice_reply, strip_data_url};

use crate::server::AppState;

/// Declared media type of the forwarded image. Uploads are assumed to be
/// pre-converted to JPEG upstream.
const IMAGE_MEDIA_TYPE: &str = "image/jpeg";

#[derive(Debug, Default, Deserialize)]
pub struct ProcessInvoiceBody {
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
}

/// Handler for `POST /` (and `OPTIONS` preflight).
pub async fn process_invoice(
    State(state): State<AppState>,
    method: Method,
    body: Option<Json<ProcessInvoiceBody>>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "error": "Method not allowed" })),
        )
            .into_response();
    }

    // An unparseable body is treated the same as a missing image field.
    let image_base64 = body
        .and_then(|Json(b)| b.image_base64)
        .filter(|s| !s.is_empty());
    let Some(image_base64) = image_base64 else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No image provided" })),
        )
            .into_response();
    };

    let Some(provider) = state.provider.clone() else {
        error!("Rejecting invoice request: no extraction provider configured");
        return error_response(&InvoiceError::ApiKeyMissing);
    };

    match run_extraction(provider.as_ref(), &image_base64).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(err) => {
            error!(error = %err, "Invoice processing failed");
            error_response(&err)
        }
    }
}

/// The linear success path: forward the image, parse the reply, normalize.
async fn run_extraction(
    provider: &dyn ExtractionProvider,
    image_base64: &str,
) -> Result<NormalizedInvoice, InvoiceError> {
    let request = ExtractionRequest {
        image_base64: strip_data_url(image_base64).to_string(),
        media_type: IMAGE_MEDIA_TYPE.to_string(),
        prompt: EXTRACTION_PROMPT.to_string(),
        max_tokens: MAX_TOKENS,
    };

    let reply = provider.extract(&request).await?;
    info!(
        provider = provider.name(),
        model = %reply.model,
        latency_ms = reply.latency_ms,
        "Received model reply"
    );

    let parsed = parse_invoice_reply(&reply.text)?;
    Ok(NormalizedInvoice::from_parsed(
        parsed,
        Utc::now().date_naive(),
    ))
}

fn error_response(err: &InvoiceError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use tickbook_core::{ExtractionReply, InvoiceError};
    use tickbook_extract::providers::MockProvider;

    use super::*;
    use crate::server::router;

    fn state_with(provider: MockProvider) -> AppState {
        AppState {
            provider: Some(Arc::new(provider)),
        }
    }

    fn post_image(image_base64: &str) -> Request<Body> {
        post_body(&json!({ "imageBase64": image_base64 }))
    }

    fn post_body(body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejects_other_methods() {
        for method in ["GET", "PUT", "DELETE", "PATCH"] {
            let app = router(state_with(MockProvider::new()));
            let request = Request::builder()
                .method(method)
                .uri("/")
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
            assert_eq!(
                json_body(response).await,
                json!({ "error": "Method not allowed" })
            );
        }
    }

    #[tokio::test]
    async fn options_preflight_is_bare_200_with_cors() {
        let app = router(state_with(MockProvider::new()));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Credentials"], "true");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            headers["Access-Control-Allow-Methods"],
            "GET,OPTIONS,PATCH,DELETE,POST,PUT"
        );
        assert_eq!(
            headers["Access-Control-Allow-Headers"],
            "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, \
             Content-MD5, Content-Type, Date, X-Api-Version"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_400() {
        for body in [json!({}), json!({ "imageBase64": "" })] {
            let app = router(state_with(MockProvider::new()));
            let response = app.oneshot(post_body(&body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({ "error": "No image provided" })
            );
        }
    }

    #[tokio::test]
    async fn missing_api_key_is_500() {
        let app = router(AppState { provider: None });
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "API key not configured" })
        );
    }

    #[tokio::test]
    async fn extracts_and_maps_cost_code() {
        let reply = r#"Here is the data you asked for:
{"vendor":"Acme","amount":150.5,"date":"2024-03-01","description":"water truck","category":"Water Hauling"}"#;
        let app = router(state_with(MockProvider::new().with_reply(reply)));
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            json_body(response).await,
            json!({
                "vendor": "Acme",
                "amount": 150.5,
                "date": "2024-03-01",
                "description": "water truck",
                "costCode": "8305-160",
                "category": "Water Hauling",
            })
        );
    }

    #[tokio::test]
    async fn defaults_missing_fields() {
        let app = router(state_with(
            MockProvider::new().with_reply(r#"{"category":"Fuel"}"#),
        ));
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["vendor"], "Unknown Vendor");
        assert_eq!(body["amount"], 0.0);
        assert_eq!(
            body["date"],
            Utc::now().date_naive().format("%Y-%m-%d").to_string()
        );
        assert_eq!(body["description"], "");
        assert_eq!(body["costCode"], "8303");
    }

    #[tokio::test]
    async fn unknown_category_maps_to_other() {
        let app = router(state_with(
            MockProvider::new().with_reply(r#"{"category":"Unknown Category"}"#),
        ));
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["costCode"], "OTHER");
        assert_eq!(body["category"], "Unknown Category");
    }

    #[tokio::test]
    async fn reply_without_json_is_500() {
        let app = router(state_with(
            MockProvider::new().with_reply("I could not read this image."),
        ));
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Could not extract data from invoice" })
        );
    }

    #[tokio::test]
    async fn upstream_error_propagates_status_and_message() {
        let app = router(state_with(
            MockProvider::new().with_upstream_error(429, "rate limited"),
        ));
        let response = app.oneshot(post_image("XXXX")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await, json!({ "error": "rate limited" }));
    }

    /// Records the request it receives so tests can inspect what the
    /// gateway forwards.
    struct CapturingProvider {
        seen: Arc<Mutex<Option<ExtractionRequest>>>,
    }

    #[async_trait]
    impl ExtractionProvider for CapturingProvider {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn extract(
            &self,
            request: &ExtractionRequest,
        ) -> Result<ExtractionReply, InvoiceError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            Ok(ExtractionReply {
                text: r#"{"category":"Fuel"}"#.to_string(),
                model: "capturing".to_string(),
                latency_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn forwards_stripped_base64_and_fixed_media_type() {
        let seen = Arc::new(Mutex::new(None));
        let app = router(AppState {
            provider: Some(Arc::new(CapturingProvider { seen: seen.clone() })),
        });
        let response = app
            .oneshot(post_image("data:image/jpeg;base64,XXXX"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let forwarded = seen.lock().unwrap().clone().unwrap();
        assert_eq!(forwarded.image_base64, "XXXX");
        assert_eq!(forwarded.media_type, "image/jpeg");
        assert_eq!(forwarded.max_tokens, 1024);
        assert!(forwarded.prompt.contains("oilfield invoice/ticket"));
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let app = router(state_with(MockProvider::new()));
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tickbook");
    }
}
