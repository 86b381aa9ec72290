use thiserror::Error;

/// Classified failure of a render call. `NotFound` and `Upstream` are shown to users;
/// `Unknown` is swallowed by the caller.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The render service does not know the template id.
    #[error("未找到表情包：{template_id}")]
    NotFound { template_id: String },

    /// The render service answered with another non-success status.
    #[error("生成表情包时出错：HTTP错误 {status}")]
    Upstream { status: u16 },

    /// Transport failure, timeout, or unreadable response.
    #[error("Render request failed: {0}")]
    Unknown(#[from] reqwest::Error),
}

impl RenderError {
    /// Text to reply with, or `None` when the failure must stay silent.
    pub fn user_message(&self) -> Option<String> {
        match self {
            RenderError::NotFound { .. } | RenderError::Upstream { .. } => Some(self.to_string()),
            RenderError::Unknown(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Avatar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Avatar service returned HTTP {0}")]
    Status(u16),
}

#[derive(Error, Debug)]
pub enum CatalogFetchError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog endpoint {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to serialize catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write catalog: {0}")]
    Io(#[from] std::io::Error),
}
