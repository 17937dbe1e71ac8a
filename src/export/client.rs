//! Rendering service HTTP client
//!
//! `POST {base}/api/pdf/edit` as `multipart/form-data` with two parts:
//! `pdf` (the original document) and `layout` (the layout model as a JSON
//! string). Success answers with the new document; failure answers with a
//! JSON body `{ "code": ..., "message": ... }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::LayoutExporter;
use crate::config::RenderServiceConfig;
use crate::error::{EditorError, Result};
use crate::layout::LayoutModel;

/// Error body returned by the rendering service
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Client for the external rendering service
#[derive(Debug, Clone)]
pub struct RenderServiceClient {
    client: reqwest::Client,
    config: RenderServiceConfig,
}

impl RenderServiceClient {
    pub fn new(config: RenderServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EditorError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RenderServiceConfig {
        &self.config
    }

    /// Query the service's health endpoint; returns its plain-text status.
    pub async fn health(&self) -> Result<String> {
        let url = self.config.health_url();
        debug!("Checking rendering service health at {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(EditorError::ServiceRejected {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    /// Turn a non-success response into [`EditorError::ServiceRejected`].
    async fn rejection(response: reqwest::Response) -> EditorError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ServiceErrorBody>(&body) {
            Ok(parsed) => {
                if let Some(code) = parsed.code {
                    debug!("Rendering service error code: {}", code);
                }
                parsed.message
            }
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        EditorError::ServiceRejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl LayoutExporter for RenderServiceClient {
    async fn export(&self, document: Vec<u8>, layout: &LayoutModel) -> Result<Vec<u8>> {
        let layout_json = layout.to_json()?;
        let url = self.config.edit_url();
        info!(
            "Exporting {} layout objects ({} document bytes) to {}",
            layout.objects.len(),
            document.len(),
            url
        );

        let pdf_part = Part::bytes(document)
            .file_name(self.config.document_file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("pdf", pdf_part)
            .text("layout", layout_json);

        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            warn!("Rendering service rejected export: {}", err);
            return Err(err);
        }

        let bytes = response.bytes().await?;
        info!("Rendering service returned {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutObject, LayoutObjectKind};
    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use std::net::SocketAddr;

    fn sample_layout() -> LayoutModel {
        LayoutModel {
            page_width: 612.0,
            page_height: 792.0,
            objects: vec![LayoutObject {
                kind: LayoutObjectKind::Text,
                content: "Hello".to_string(),
                x: 72.0,
                y: 700.0,
                font_size: 12.0,
                font_family: "Helvetica".to_string(),
                color: "#000000".to_string(),
                rotation: 0.0,
            }],
        }
    }

    /// Echoes the layout's first object content after the uploaded bytes.
    async fn edit(mut multipart: Multipart) -> axum::response::Response {
        let mut pdf = None;
        let mut layout = None;
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(_) => return StatusCode::BAD_REQUEST.into_response(),
            };
            match name.as_str() {
                "pdf" => {
                    assert_eq!(content_type.as_deref(), Some("application/pdf"));
                    pdf = Some(data.to_vec());
                }
                "layout" => layout = Some(data.to_vec()),
                _ => {}
            }
        }

        let (Some(mut pdf), Some(layout)) = (pdf, layout) else {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"code": "MISSING_PART", "message": "pdf and layout are required"})),
            )
                .into_response();
        };

        let layout: LayoutModel = match serde_json::from_slice(&layout) {
            Ok(layout) => layout,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"code": "INVALID_LAYOUT", "message": e.to_string()})),
                )
                    .into_response()
            }
        };

        if layout.objects.iter().any(|o| o.font_family == "Comic") {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"code": "FONT", "message": "Font 'Comic' is not available"})),
            )
                .into_response();
        }

        for object in &layout.objects {
            pdf.extend_from_slice(object.content.as_bytes());
        }
        pdf.into_response()
    }

    async fn spawn_service() -> SocketAddr {
        let app = Router::new()
            .route("/api/pdf/edit", post(edit))
            .route("/api/pdf/health", get(|| async { "PDF Editor Service is running" }))
            .route(
                "/broken/api/pdf/edit",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "stack trace here") }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(base_url: String) -> RenderServiceClient {
        RenderServiceClient::new(RenderServiceConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_export_round_trip() {
        let addr = spawn_service().await;
        let client = client_for(format!("http://{}", addr));

        let output = client
            .export(b"%PDF-1.4 original".to_vec(), &sample_layout())
            .await
            .unwrap();
        assert_eq!(output, b"%PDF-1.4 originalHello".to_vec());
    }

    #[tokio::test]
    async fn test_service_message_surfaced_verbatim() {
        let addr = spawn_service().await;
        let client = client_for(format!("http://{}", addr));
        let mut layout = sample_layout();
        layout.objects[0].font_family = "Comic".to_string();

        let err = client.export(b"%PDF".to_vec(), &layout).await.unwrap_err();
        match err {
            EditorError::ServiceRejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Font 'Comic' is not available");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept() {
        let addr = spawn_service().await;
        let client = client_for(format!("http://{}/broken", addr));

        let err = client.export(b"%PDF".to_vec(), &sample_layout()).await.unwrap_err();
        assert!(matches!(
            err,
            EditorError::ServiceRejected { status: 500, ref message } if message == "stack trace here"
        ));
    }

    #[tokio::test]
    async fn test_invalid_layout_never_sent() {
        let client = client_for("http://127.0.0.1:9".to_string());
        let mut layout = sample_layout();
        layout.objects[0].x = f64::NAN;

        let err = client.export(b"%PDF".to_vec(), &layout).await.unwrap_err();
        assert!(matches!(err, EditorError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr));
        let err = client.export(b"%PDF".to_vec(), &sample_layout()).await.unwrap_err();
        assert!(matches!(err, EditorError::ExportTransport(_)));
    }

    #[tokio::test]
    async fn test_health() {
        let addr = spawn_service().await;
        let client = client_for(format!("http://{}", addr));
        assert_eq!(client.health().await.unwrap(), "PDF Editor Service is running");
    }
}
