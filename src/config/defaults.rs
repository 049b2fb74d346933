//! Default configuration values

/// Default API server URL
pub fn default_api_url() -> String {
    "https://www.transifex.com/api/2".to_string()
}

/// Default request timeout in seconds
pub const fn default_timeout() -> u64 {
    60
}

/// Default transport driver preference
pub fn default_drivers() -> Vec<String> {
    vec!["pooled".to_string(), "stream".to_string()]
}

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory under the XDG config home
pub const APP_DIR_NAME: &str = "transifex";
