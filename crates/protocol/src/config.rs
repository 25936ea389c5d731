use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_connect_timeout", deserialize_with = "duration")]
    pub connect_timeout: Duration,
    #[serde(default = "default_probe_timeout", deserialize_with = "duration")]
    pub probe_timeout: Duration,
    #[serde(default = "default_request_timeout", deserialize_with = "duration")]
    pub request_timeout: Duration,
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default)]
    pub skin: Skin,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            connect_timeout: default_connect_timeout(),
            probe_timeout: default_probe_timeout(),
            request_timeout: default_request_timeout(),
            report_dir: default_report_dir(),
            skin: Skin::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Checks the values serde cannot: URL scheme and non-zero timeouts.
pub fn validate_client_config(config: &ClientConfig) -> Result<(), String> {
    let mut errors = Vec::new();
    let url = config.service_url.trim();
    if url.is_empty() {
        errors.push("service_url must not be empty".to_string());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("service_url must be http(s): {url}"));
    }
    for (name, value) in [
        ("connect_timeout", config.connect_timeout),
        ("probe_timeout", config.probe_timeout),
        ("request_timeout", config.request_timeout),
    ] {
        if value.is_zero() {
            errors.push(format!("{name} must be greater than zero"));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// Presentation of the results view. Both skins bind to the same session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Editorial,
    Compact,
}

impl FromStr for Skin {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "editorial" => Ok(Skin::Editorial),
            "compact" => Ok(Skin::Compact),
            other => Err(format!("unknown skin {other:?} (expected editorial|compact)")),
        }
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skin::Editorial => f.write_str("editorial"),
            Skin::Compact => f.write_str("compact"),
        }
    }
}

fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let parsed = ClientConfig::from_toml("").unwrap();
        assert_eq!(parsed.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(parsed.request_timeout, Duration::from_secs(120));
        assert_eq!(parsed.skin, Skin::Editorial);
        assert!(validate_client_config(&parsed).is_ok());
    }

    #[test]
    fn parses_humantime_durations() {
        let input = r#"
service_url = "http://analysis.local:8080"
probe_timeout = "750ms"
request_timeout = "3m"
skin = "compact"
"#;
        let parsed = ClientConfig::from_toml(input).unwrap();
        assert_eq!(parsed.probe_timeout, Duration::from_millis(750));
        assert_eq!(parsed.request_timeout, Duration::from_secs(180));
        assert_eq!(parsed.skin, Skin::Compact);
    }

    #[test]
    fn rejects_bad_duration() {
        let parsed = ClientConfig::from_toml(r#"connect_timeout = "soon""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_flags_scheme_and_zero_timeout() {
        let parsed = ClientConfig::from_toml(
            r#"
service_url = "127.0.0.1:5000"
request_timeout = "0s"
"#,
        )
        .unwrap();
        let err = validate_client_config(&parsed).unwrap_err();
        assert!(err.contains("service_url"));
        assert!(err.contains("request_timeout"));
    }

    #[test]
    fn skin_from_str() {
        assert_eq!("Compact".parse::<Skin>(), Ok(Skin::Compact));
        assert!("glossy".parse::<Skin>().is_err());
    }
}
