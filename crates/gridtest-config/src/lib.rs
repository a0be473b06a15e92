use anyhow::Result;
use gridtest_core::Browser;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// WebDriver automation server endpoint (e.g. a Selenium grid hub)
    pub remote_url: String,
    /// Page loaded into every session before the suite runs
    pub test_host: String,
    /// Browsers the suite fans out to, one session each
    pub browsers: Vec<Browser>,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Remote async-script timeout, in seconds. The script bridge depends on
    /// this being set; it has no timeout of its own.
    pub script_secs: u64,
    /// Page-load timeout, in seconds
    pub page_load_secs: u64,
    /// Delay after navigation before scripts run, giving the page's polyfill
    /// bootstrap time to finish, in milliseconds
    pub settle_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            script_secs: 15,
            page_load_secs: 10,
            settle_ms: 2000,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            remote_url: "http://localhost:4444/wd/hub".to_string(),
            test_host: "http://localhost:8080/".to_string(),
            browsers: vec![Browser::Chrome, Browser::Firefox],
            timeouts: TimeoutsConfig::default(),
        }
    }
}

const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "./gridtest.toml",
    "~/.config/gridtest/config.toml",
    "~/.gridtest.toml",
];

impl GridConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Check if any config file exists
        let config_exists = if let Some(path) = config_path {
            Path::new(path).exists()
        } else {
            DEFAULT_CONFIG_PATHS.iter().any(|path| {
                let expanded_path = shellexpand::tilde(path);
                Path::new(expanded_path.as_ref()).exists()
            })
        };

        // If no config exists, create and save a default config
        if !config_exists {
            let default_config = Self::default();

            let config_dir = dirs::home_dir()
                .map(|mut path| {
                    path.push(".config");
                    path.push("gridtest");
                    path
                })
                .unwrap_or_else(|| std::path::PathBuf::from("."));

            std::fs::create_dir_all(&config_dir).ok();

            let config_file = config_dir.join("config.toml");
            if let Err(e) = default_config.save(config_file.to_str().unwrap()) {
                eprintln!("Warning: Could not save default config: {}", e);
            } else {
                println!(
                    "Created default configuration at: {}",
                    config_file.display()
                );
            }

            return Ok(default_config);
        }

        // Load config from file
        let config_path_to_load = if let Some(path) = config_path {
            Some(path.to_string())
        } else {
            DEFAULT_CONFIG_PATHS.iter().find_map(|path| {
                let expanded_path = shellexpand::tilde(path);
                if Path::new(expanded_path.as_ref()).exists() {
                    Some(expanded_path.to_string())
                } else {
                    None
                }
            })
        };

        if let Some(path) = config_path_to_load {
            let config_content = std::fs::read_to_string(&path)?;
            let config: GridConfig = toml::from_str(&config_content)?;
            config.validate()?;
            return Ok(config);
        }

        Ok(Self::default())
    }

    pub fn load_with_overrides(
        config_path: Option<&str>,
        remote_url_override: Option<String>,
        test_host_override: Option<String>,
        browsers_override: Option<Vec<Browser>>,
    ) -> Result<Self> {
        let mut config = Self::load(config_path)?;

        if let Some(remote_url) = remote_url_override {
            config.remote_url = remote_url;
        }
        if let Some(test_host) = test_host_override {
            config.test_host = test_host;
        }
        if let Some(browsers) = browsers_override {
            config.browsers = browsers;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.remote_url.trim().is_empty() {
            anyhow::bail!("remote_url must not be empty");
        }
        if self.test_host.trim().is_empty() {
            anyhow::bail!("test_host must not be empty");
        }
        if self.browsers.is_empty() {
            anyhow::bail!("at least one browser must be configured");
        }
        Ok(())
    }
}
