use crate::catalog_service::ResourceCatalog;
use crate::config::Limits;
use crate::data_url;
use crate::gemini_service::GenerativeModel;
use crate::models::*;
use crate::prompt;
use crate::reply_parser;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Runs one submission through catalog fetch, prompt, model call and reply parsing.
pub struct AnalysisService {
    catalog: Arc<dyn ResourceCatalog>,
    model: Arc<dyn GenerativeModel>,
    limits: Limits,
}

impl AnalysisService {
    pub fn new(
        catalog: Arc<dyn ResourceCatalog>,
        model: Arc<dyn GenerativeModel>,
        limits: Limits,
    ) -> Self {
        Self {
            catalog,
            model,
            limits,
        }
    }

    /// Analyze free text and/or an image data URL. Empty strings count as absent.
    ///
    /// The parsed reply is returned as-is; nothing about its shape is enforced.
    pub async fn analyze(&self, user_input: Option<&str>, image_data_url: Option<&str>) -> Result<Value> {
        let image = match image_data_url.filter(|s| !s.is_empty()) {
            Some(url) => {
                log::info!("Received photo, data URL length: {}", url.len());
                Some(data_url::parse_bounded(url, self.limits.max_image_bytes)?)
            }
            None => None,
        };

        let records = self
            .catalog
            .fetch_all()
            .await
            .context("failed to load resource catalog")?;
        let catalog = prompt::serialize_catalog(&records);
        if catalog.len() > self.limits.max_catalog_bytes {
            bail!(
                "serialized catalog is {} bytes, limit is {}",
                catalog.len(),
                self.limits.max_catalog_bytes
            );
        }

        let request = ModelRequest {
            prompt: prompt::build_prompt(&catalog, user_input),
            image,
            json_output: true,
        };
        log::info!(
            "Matching against {} records (prompt {} chars, image: {})",
            records.len(),
            request.prompt.len(),
            request.image.is_some()
        );

        let reply = self
            .model
            .generate(&request)
            .await
            .context("model call failed")?;

        let data = reply_parser::parse_reply(&reply).context("could not parse model reply")?;
        Ok(data)
    }
}
