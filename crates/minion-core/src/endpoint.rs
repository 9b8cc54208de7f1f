//! Endpoint resolution — relative API paths to full request targets.

/// Base URL of the archive server. Paths are joined onto it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    base: String,
}

impl ApiUrl {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve `path` against the base. Absolute `http(s)://` targets are
    /// returned unchanged.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base, path)
        } else {
            format!("{}/{}", self.base, path)
        }
    }
}

impl Default for ApiUrl {
    fn default() -> Self {
        Self::new("http://127.0.0.1:3000")
    }
}
