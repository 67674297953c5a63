/// Store configuration
///
/// Built with chained setters or parsed from a store URL.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Store name, used in log lines
    pub name: String,

    /// Reject commits that would duplicate an entity's natural key
    pub enforce_unique_keys: bool,

    /// Maximum number of changes a single unit of work may stage
    pub max_staged_changes: usize,
}

impl StoreConfig {
    /// Create a configuration with defaults for the given store name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enforce_unique_keys: true,
            max_staged_changes: 1024,
        }
    }

    /// Set the store name
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Toggle natural-key enforcement at commit
    pub fn enforce_unique_keys(mut self, enforce: bool) -> Self {
        self.enforce_unique_keys = enforce;
        self
    }

    /// Set the staged change cap
    pub fn max_staged_changes(mut self, max: usize) -> Self {
        self.max_staged_changes = max;
        self
    }

    /// Parse from a store URL
    ///
    /// Format: "investplan://name?unique=true&max_changes=256"
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let config = StoreConfig::from_url("investplan://planning?unique=false")?;
    /// ```
    pub fn from_url(url: &str) -> Result<Self, String> {
        let rest = url
            .strip_prefix("investplan://")
            .ok_or_else(|| "URL must start with 'investplan://'".to_string())?;

        let (name, query) = match rest.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (rest, None),
        };

        if name.is_empty() {
            return Err("Store name cannot be empty".to_string());
        }

        let mut config = Self::new(name);

        for pair in query.into_iter().flat_map(|q| q.split('&')).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Invalid parameter '{}'", pair))?;

            match key {
                "unique" => {
                    config.enforce_unique_keys = value
                        .parse()
                        .map_err(|_| format!("Invalid value for unique: '{}'", value))?;
                }
                "max_changes" => {
                    config.max_staged_changes = value
                        .parse()
                        .map_err(|_| format!("Invalid value for max_changes: '{}'", value))?;
                }
                other => return Err(format!("Unknown parameter '{}'", other)),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Convert to store URL
    pub fn to_url(&self) -> String {
        format!(
            "investplan://{}?unique={}&max_changes={}",
            self.name, self.enforce_unique_keys, self.max_staged_changes
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Store name cannot be empty".to_string());
        }

        if self.max_staged_changes == 0 {
            return Err("max_staged_changes must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("investplan")
    }
}
