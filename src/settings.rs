use serde::{Deserialize, Serialize};

fn default_server_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

/// Client configuration loaded from `settings.json`. A missing file means
/// defaults; unknown fields are preserved by serde's defaulting rather
/// than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the backend server every remote call is issued against.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Marketplace instance shown by the dashboard. `None` means the
    /// general dashboard aggregating all confirmed instances.
    #[serde(default)]
    pub instance_id: Option<i64>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Last known window size. If absent, a default size is used.
    #[serde(default)]
    pub window_size: Option<(f32, f32)>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            instance_id: None,
            debug_logging: false,
            window_size: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
