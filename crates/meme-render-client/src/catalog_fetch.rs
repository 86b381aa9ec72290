//! 表情包信息抓取：从渲染服务的 `/memes/keys` 与 `/memes/<key>/info` 生成本地 catalog 文档。

use crate::endpoint::{endpoint, parse_base_url};
use crate::error::CatalogFetchError;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use reqwest::Url;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};

pub struct CatalogFetcher {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(&base_url.into())?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self {
            http,
            base_url,
        })
    }

    async fn get_json<T>(&self, url: Url) -> Result<T, CatalogFetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<T>().await?)
    }

    pub async fn fetch_keys(&self) -> Result<Vec<String>, CatalogFetchError> {
        self.get_json(endpoint(&self.base_url, &["memes", "keys"]))
            .await
    }

    /// Info document of one template with its redundant `key` field removed.
    pub async fn fetch_info(&self, key: &str) -> Result<Value, CatalogFetchError> {
        let mut info: Value = self
            .get_json(endpoint(&self.base_url, &["memes", key, "info"]))
            .await?;
        if let Some(object) = info.as_object_mut() {
            object.remove("key");
        }
        Ok(info)
    }

    /// Fetches every template's info. Failing to list keys is an error; a single
    /// template failing is logged and left out.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_all(&self) -> Result<IndexMap<String, Value>, CatalogFetchError> {
        let keys = self.fetch_keys().await?;
        info!(count = keys.len(), "Fetched meme keys");

        let mut entries = IndexMap::with_capacity(keys.len());
        for (i, key) in keys.into_iter().enumerate() {
            match self.fetch_info(&key).await {
                Ok(info) => {
                    info!(key = %key, progress = i + 1, "Fetched meme info");
                    entries.insert(key, info);
                }
                Err(e) => warn!(key = %key, error = %e, "Failed to fetch meme info"),
            }
        }
        Ok(entries)
    }

    /// Writes the key-level YAML document, creating parent directories.
    pub fn write_yaml(
        entries: &IndexMap<String, Value>,
        path: impl AsRef<Path>,
    ) -> Result<(), CatalogFetchError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_yaml::to_string(entries)?)?;
        info!(path = %path.display(), templates = entries.len(), "Meme catalog written");
        Ok(())
    }
}
