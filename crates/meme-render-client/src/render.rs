//! Render call against the meme service.

use crate::endpoint::{endpoint, parse_base_url};
use crate::error::RenderError;
use anyhow::{Context, Result};
use bytes::Bytes;
use meme_catalog::Catalog;
use reqwest::multipart::{Form, Part};
use reqwest::{header, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Reserved per-user substitution arguments; the list is always empty for now.
const RENDER_ARGS: &str = r#"{"user_infos":[]}"#;
const IMAGE_FIELD: &str = "images";
const TEXT_FIELD: &str = "texts";
const ARGS_FIELD: &str = "args";

/// Fully resolved arguments of one render call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeRequest {
    pub template_id: String,
    pub texts: Vec<String>,
    pub images: Vec<Bytes>,
}

/// Client for `POST <base_url>/memes/<template_id>/`.
#[derive(Clone)]
pub struct RenderClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RenderClient {
    /// Creates a client whose every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(&base_url.into())?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build render HTTP client")?;
        Ok(Self {
            http,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `<base>/memes/<template_id>/`; the id is always a single path segment.
    fn render_url(&self, template_id: &str) -> Url {
        endpoint(&self.base_url, &["memes", template_id, ""])
    }

    /// Renders `request` and returns the image bytes verbatim.
    ///
    /// Images are attached only when the catalog says the template takes images and at least one
    /// image was resolved; otherwise the body carries texts and args only.
    #[instrument(skip(self, catalog, request), fields(template_id = %request.template_id))]
    pub async fn render(
        &self,
        catalog: &Catalog,
        request: &MemeRequest,
    ) -> Result<Bytes, RenderError> {
        let accepts_images = catalog
            .lookup(&request.template_id)
            .map(|d| d.params.accepts_images())
            .unwrap_or(false);
        let attach_images = accepts_images && !request.images.is_empty();

        let form = build_form(request, attach_images)?;
        let url = self.render_url(&request.template_id);

        info!(
            url = %url,
            texts = request.texts.len(),
            images = if attach_images { request.images.len() } else { 0 },
            "Sending render request"
        );

        let resp = self
            .http
            .post(url)
            .header(header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RenderError::NotFound {
                template_id: request.template_id.clone(),
            });
        }
        if !status.is_success() {
            return Err(RenderError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        debug!(bytes = body.len(), "Render response received");
        Ok(body)
    }
}

fn build_form(request: &MemeRequest, attach_images: bool) -> Result<Form, RenderError> {
    let mut form = Form::new();
    if attach_images {
        for (i, image) in request.images.iter().enumerate() {
            let part = Part::bytes(image.to_vec())
                .file_name(format!("image_{}.png", i))
                .mime_str("image/png")?;
            form = form.part(IMAGE_FIELD, part);
        }
    }
    for text in &request.texts {
        form = form.text(TEXT_FIELD, text.clone());
    }
    Ok(form.text(ARGS_FIELD, RENDER_ARGS))
}
