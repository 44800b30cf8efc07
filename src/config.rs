#[derive(Debug, Clone)]
pub struct Config {
    // Pagination defaults applied to plan requests
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub default_sort_key: String,
    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            default_sort_key: "id".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_page_size: std::env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_page_size),
            max_page_size: std::env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_page_size),
            default_sort_key: std::env::var("DEFAULT_SORT_KEY")
                .unwrap_or(defaults.default_sort_key),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: std::env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_page_size < 1 {
            return Err("DEFAULT_PAGE_SIZE must be at least 1".to_string());
        }

        if self.max_page_size < self.default_page_size || self.max_page_size > 1000 {
            return Err(
                "MAX_PAGE_SIZE must be between DEFAULT_PAGE_SIZE and 1000".to_string(),
            );
        }

        if self.default_sort_key.trim().is_empty() {
            return Err("DEFAULT_SORT_KEY cannot be empty".to_string());
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err("LOG_FORMAT must be either text or json".to_string());
        }

        Ok(())
    }

    /// Clamp a requested page size into `1..=max_page_size`, using the
    /// default when none was requested
    pub fn page_size(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
            .max(1)
    }
}
