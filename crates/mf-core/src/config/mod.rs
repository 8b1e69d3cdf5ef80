//! # Forms configuration DTO
//!
//! ## Responsibilities
//!
//! - Define the configuration data structure
//! - Map a TOML value onto it
//!
//! ## Prohibited
//!
//! - No validation logic
//! - No default value calculation: a missing key is an empty value, and
//!   interpreting empty values is the bootstrap's job.

/// Configuration of the form runtime (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormsConfig {
    /// Base URL of the API gateway, e.g. `http://localhost:8000/api/v1`
    pub backend_base_url: String,

    /// Request timeout in milliseconds
    pub backend_timeout_ms: u64,

    /// `"http"` or `"fixture"`
    pub backend_mode: String,

    /// Simulated latency of the fixture gateways
    pub fixture_latency_ms: u64,

    /// Password accepted by the fixture current-password verifier
    pub fixture_current_password: String,

    /// Nicknames the fixture duplicate check reports as taken
    pub fixture_taken_nicknames: Vec<String>,

    /// Nickname assumed when the kakao profile carries none
    pub kakao_default_nickname: String,
}

impl FormsConfig {
    /// Create FormsConfig from TOML value
    ///
    /// Must not validate or default: empty strings and zero are facts.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let section = |name: &str, key: &str| toml_value.get(name).and_then(|s| s.get(key));
        let string = |name: &str, key: &str| {
            section(name, key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let integer = |name: &str, key: &str| {
            section(name, key)
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64
        };

        Ok(Self {
            backend_base_url: string("backend", "base_url"),
            backend_timeout_ms: integer("backend", "timeout_ms"),
            backend_mode: string("backend", "mode"),
            fixture_latency_ms: integer("fixture", "latency_ms"),
            fixture_current_password: string("fixture", "current_password"),
            fixture_taken_nicknames: section("fixture", "taken_nicknames")
                .and_then(|v| v.as_array())
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            kakao_default_nickname: string("kakao", "default_nickname"),
        })
    }

    /// Create empty FormsConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            backend_base_url: String::new(),
            backend_timeout_ms: 0,
            backend_mode: String::new(),
            fixture_latency_ms: 0,
            fixture_current_password: String::new(),
            fixture_taken_nicknames: Vec::new(),
            kakao_default_nickname: String::new(),
        }
    }
}
