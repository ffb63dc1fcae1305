use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Project-level report configuration (`.ticketstat/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Fixed UTC offset used for window boundaries and display dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Default staleness threshold for the daily digest.
    #[serde(default = "default_stale_days")]
    pub stale_days: u32,
    /// Team whose completion rate the trend table reports.
    #[serde(default = "default_primary_team")]
    pub primary_team: String,
    /// Query prefix handed to the keyword vocabulary lookup.
    #[serde(default = "default_keyword_prefix")]
    pub keyword_query: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            stale_days: default_stale_days(),
            primary_team: default_primary_team(),
            keyword_query: default_keyword_prefix(),
        }
    }
}

impl ReportSection {
    /// Parse [`Self::timezone`] into an offset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimezone`] for anything other than
    /// `Z`, `UTC`, or a `±HH:MM` / `±HHMM` offset under 24 hours.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_offset(&self.timezone)
    }
}

/// Label spellings recognised by the classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default = "default_urgency_high")]
    pub urgency_high: Vec<String>,
    #[serde(default = "default_urgency_mid")]
    pub urgency_mid: Vec<String>,
    #[serde(default = "default_urgency_low")]
    pub urgency_low: Vec<String>,
    #[serde(default = "default_team_prefix")]
    pub team_prefix: String,
    #[serde(default = "default_team_suffix")]
    pub team_suffix: String,
    #[serde(default = "default_genre_prefix")]
    pub genre_prefix: String,
    #[serde(default = "default_escalation_label")]
    pub escalation_label: String,
    #[serde(default = "default_keyword_prefix")]
    pub keyword_prefix: String,
    #[serde(default = "default_service_id_pattern")]
    pub service_id_pattern: String,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            urgency_high: default_urgency_high(),
            urgency_mid: default_urgency_mid(),
            urgency_low: default_urgency_low(),
            team_prefix: default_team_prefix(),
            team_suffix: default_team_suffix(),
            genre_prefix: default_genre_prefix(),
            escalation_label: default_escalation_label(),
            keyword_prefix: default_keyword_prefix(),
            service_id_pattern: default_service_id_pattern(),
        }
    }
}

/// Read a config file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str::<ReportConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Candidate config locations in precedence order (explicit path first).
#[must_use]
pub fn config_candidates(explicit: Option<&Path>, project_root: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
        return candidates;
    }
    candidates.push(project_root.join(".ticketstat/config.toml"));
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("ticketstat/config.toml"));
    }
    candidates
}

/// Resolve the effective config: an explicit path must exist; otherwise
/// the first existing candidate wins and defaults apply when none exists.
///
/// # Errors
///
/// Returns an error when the chosen file cannot be read or parsed.
pub fn resolve_config(
    explicit: Option<&Path>,
    project_root: &Path,
) -> Result<ReportConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    for candidate in config_candidates(None, project_root) {
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "loading config");
            return load_config_file(&candidate);
        }
    }

    Ok(ReportConfig::default())
}

fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidTimezone(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }
    trimmed.parse::<FixedOffset>().map_err(|_| invalid())
}

fn default_timezone() -> String {
    "+09:00".to_string()
}

const fn default_stale_days() -> u32 {
    7
}

fn default_primary_team() -> String {
    "CaaS-A".to_string()
}

fn default_urgency_high() -> Vec<String> {
    vec!["緊急度:高".to_string(), "緊急度：高".to_string()]
}

fn default_urgency_mid() -> Vec<String> {
    vec!["緊急度:中".to_string(), "緊急度：中".to_string()]
}

fn default_urgency_low() -> Vec<String> {
    vec!["緊急度:低".to_string(), "緊急度：低".to_string()]
}

fn default_team_prefix() -> String {
    "CaaS-".to_string()
}

fn default_team_suffix() -> String {
    " 対応中".to_string()
}

fn default_genre_prefix() -> String {
    "genre:".to_string()
}

fn default_escalation_label() -> String {
    "Escalation".to_string()
}

fn default_keyword_prefix() -> String {
    "keyword:".to_string()
}

fn default_service_id_pattern() -> String {
    r".*INC(?P<id>[0-9]{7}.*)".to_string()
}
