use log::info;
use serde::Deserialize;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5036";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
}

/// Environment overrides, read with the `CHAOS_` prefix.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    chaos_api_url: Option<String>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
        }
    }

    /// Reads `CHAOS_API_URL` from the process environment, falling back to
    /// [`DEFAULT_API_BASE_URL`].
    pub fn from_env() -> Result<Self, serde_env::Error> {
        Self::from_vars(std::env::vars())
    }

    fn from_vars<S: AsRef<str>>(
        vars: impl IntoIterator<Item = (S, S)>,
    ) -> Result<Self, serde_env::Error> {
        let raw: RawConfig = serde_env::from_iter(vars)?;
        Ok(match raw.chaos_api_url {
            Some(url) if !url.trim().is_empty() => {
                info!("Using CHAOS_API_URL: {url}");
                Self::new(url)
            }
            _ => Self::default(),
        })
    }

    /// Joins the base URL and `path` with exactly one slash.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_api() {
        let config = BusinessConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:5036");
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let config = BusinessConfig::new("https://admin.example.com/");
        assert_eq!(
            config.url("/api/Admin/users"),
            "https://admin.example.com/api/Admin/users"
        );
        assert_eq!(config.url("login"), "https://admin.example.com/login");
    }

    #[test]
    fn test_env_override() {
        let config = BusinessConfig::from_vars(vec![("CHAOS_API_URL", "https://chaos.test")])
            .expect("config should deserialize");
        assert_eq!(config.api_base_url, "https://chaos.test");
    }

    #[test]
    fn test_blank_env_falls_back_to_default() {
        let config = BusinessConfig::from_vars(vec![("CHAOS_API_URL", "  ")])
            .expect("config should deserialize");
        assert_eq!(config, BusinessConfig::default());

        let config = BusinessConfig::from_vars(Vec::<(String, String)>::new())
            .expect("config should deserialize");
        assert_eq!(config, BusinessConfig::default());
    }
}
