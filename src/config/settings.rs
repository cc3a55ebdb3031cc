// * Typed settings model lifted from the INI document.
// * One struct per comment group in the file: Download, Extraction,
// * Deduplication, URLs. Blank values fall back to the built-in defaults.

use crate::config::error::ConfigError;
use crate::config::ini::{unquote, IniDocument, IniEntry, IniSection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

// * Built-in defaults, mirrored by the shipped settings.cfg
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_FILE_SIZE: u64 = 20_000_000;
const DEFAULT_MIN_FILE_SIZE: u64 = 10;
const DEFAULT_SLEEP_TIME_SECS: f64 = 5.0;
const DEFAULT_MAX_REDIRECTS: u32 = 2;
const DEFAULT_MIN_EXTRACTED_SIZE: u64 = 250;
const DEFAULT_MIN_EXTRACTED_COMM_SIZE: u64 = 1;
const DEFAULT_MIN_OUTPUT_SIZE: u64 = 1;
const DEFAULT_MIN_OUTPUT_COMM_SIZE: u64 = 1;
const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MIN_DUPLCHECK_SIZE: u64 = 100;
const DEFAULT_MAX_REPETITIONS: u64 = 2;

// * Every key the loader recognizes; anything else only warns.
pub const RECOGNIZED_KEYS: [&str; 17] = [
    "DOWNLOAD_TIMEOUT",
    "MAX_FILE_SIZE",
    "MIN_FILE_SIZE",
    "SLEEP_TIME",
    "USER_AGENTS",
    "COOKIE",
    "MAX_REDIRECTS",
    "MIN_EXTRACTED_SIZE",
    "MIN_EXTRACTED_COMM_SIZE",
    "MIN_OUTPUT_SIZE",
    "MIN_OUTPUT_COMM_SIZE",
    "MAX_TREE_SIZE",
    "EXTRACTION_TIMEOUT",
    "EXTENSIVE_DATE_SEARCH",
    "MIN_DUPLCHECK_SIZE",
    "MAX_REPETITIONS",
    "EXTERNAL_URLS",
];

/// Network-fetch tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Per-request timeout in seconds.
    pub download_timeout: u64,
    /// Responses larger than this are discarded (bytes).
    pub max_file_size: u64,
    /// Responses smaller than this are discarded (bytes).
    pub min_file_size: u64,
    /// Pause between requests to the same host (seconds).
    pub sleep_time: f64,
    /// Cookie header sent with every request, if any.
    pub cookie: Option<String>,
    /// Redirect hop limit.
    pub max_redirects: u32,
    /// Rotation pool; empty means the caller's default identity.
    pub user_agents: Vec<String>,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            sleep_time: DEFAULT_SLEEP_TIME_SECS,
            cookie: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agents: Vec::new(),
        }
    }
}

impl DownloadSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout)
    }

    pub fn sleep_between_requests(&self) -> Duration {
        Duration::from_secs_f64(self.sleep_time)
    }

    /// Size gate applied to fetched bodies before extraction.
    pub fn accepts_body_size(&self, len: u64) -> bool {
        len >= self.min_file_size && len <= self.max_file_size
    }
}

/// Extraction acceptance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Minimum main-text length for an extraction to count (chars).
    pub min_extracted_size: u64,
    /// Minimum comment-text length for an extraction to count (chars).
    pub min_extracted_comm_size: u64,
    /// Minimum serialized output length (chars).
    pub min_output_size: u64,
    /// Minimum serialized comment output length (chars).
    pub min_output_comm_size: u64,
    /// Document node cap; `None` means uncapped.
    pub max_tree_size: Option<u64>,
    /// Per-document processing deadline in seconds; 0 disables it.
    pub extraction_timeout: u64,
    /// Run the slower date-search heuristics.
    pub extensive_date_search: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_extracted_size: DEFAULT_MIN_EXTRACTED_SIZE,
            min_extracted_comm_size: DEFAULT_MIN_EXTRACTED_COMM_SIZE,
            min_output_size: DEFAULT_MIN_OUTPUT_SIZE,
            min_output_comm_size: DEFAULT_MIN_OUTPUT_COMM_SIZE,
            max_tree_size: None,
            extraction_timeout: DEFAULT_EXTRACTION_TIMEOUT_SECS,
            extensive_date_search: true,
        }
    }
}

impl ExtractionSettings {
    /// Processing deadline, `None` when disabled via `EXTRACTION_TIMEOUT = 0`.
    pub fn deadline(&self) -> Option<Duration> {
        (self.extraction_timeout > 0).then(|| Duration::from_secs(self.extraction_timeout))
    }

    /// Whether extracted text of the given length passes the acceptance gate.
    pub fn accepts_extract(&self, len: u64, is_comment: bool) -> bool {
        if is_comment {
            len >= self.min_extracted_comm_size
        } else {
            len >= self.min_extracted_size
        }
    }

    /// Whether serialized output of the given length passes the final gate.
    pub fn accepts_output(&self, len: u64, is_comment: bool) -> bool {
        if is_comment {
            len >= self.min_output_comm_size
        } else {
            len >= self.min_output_size
        }
    }

    pub fn within_tree_budget(&self, node_count: u64) -> bool {
        match self.max_tree_size {
            Some(cap) => node_count <= cap,
            None => true,
        }
    }
}

/// Repeated-segment discard thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupSettings {
    /// Segments shorter than this (bytes) are never checked.
    pub min_duplcheck_size: u64,
    /// Occurrences allowed before a segment counts as repeated.
    pub max_repetitions: u64,
}

impl Default for DedupSettings {
    fn default() -> Self {
        Self {
            min_duplcheck_size: DEFAULT_MIN_DUPLCHECK_SIZE,
            max_repetitions: DEFAULT_MAX_REPETITIONS,
        }
    }
}

/// Feed and sitemap URL handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlSettings {
    /// Keep URLs pointing outside the source domain.
    pub external_urls: bool,
}

/// Resolved pipeline configuration, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub download: DownloadSettings,
    pub extraction: ExtractionSettings,
    pub dedup: DedupSettings,
    pub urls: UrlSettings,
}

impl Settings {
    /// Reads and validates a settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_ini_str(&raw)
    }

    /// Parses and validates settings from INI text.
    pub fn from_ini_str(input: &str) -> Result<Self, ConfigError> {
        let doc = IniDocument::parse(input)?;
        Self::from_document(&doc)
    }

    /// Lifts a parsed document into the typed model, validating every field.
    pub fn from_document(doc: &IniDocument) -> Result<Self, ConfigError> {
        let section = doc.default_section()?;
        warn_unknown_keys(section);

        let defaults = Self::default();

        let download = DownloadSettings {
            download_timeout: get_u64(
                section,
                "DOWNLOAD_TIMEOUT",
                defaults.download.download_timeout,
            )?,
            max_file_size: get_u64(section, "MAX_FILE_SIZE", defaults.download.max_file_size)?,
            min_file_size: get_u64(section, "MIN_FILE_SIZE", defaults.download.min_file_size)?,
            sleep_time: get_f64(section, "SLEEP_TIME", defaults.download.sleep_time)?,
            cookie: get_optional(section, "COOKIE")?,
            max_redirects: get_u32(section, "MAX_REDIRECTS", defaults.download.max_redirects)?,
            user_agents: get_user_agents(section)?,
        };

        let extraction = ExtractionSettings {
            min_extracted_size: get_u64(
                section,
                "MIN_EXTRACTED_SIZE",
                defaults.extraction.min_extracted_size,
            )?,
            min_extracted_comm_size: get_u64(
                section,
                "MIN_EXTRACTED_COMM_SIZE",
                defaults.extraction.min_extracted_comm_size,
            )?,
            min_output_size: get_u64(
                section,
                "MIN_OUTPUT_SIZE",
                defaults.extraction.min_output_size,
            )?,
            min_output_comm_size: get_u64(
                section,
                "MIN_OUTPUT_COMM_SIZE",
                defaults.extraction.min_output_comm_size,
            )?,
            max_tree_size: get_optional_u64(section, "MAX_TREE_SIZE")?,
            extraction_timeout: get_u64(
                section,
                "EXTRACTION_TIMEOUT",
                defaults.extraction.extraction_timeout,
            )?,
            extensive_date_search: get_bool(
                section,
                "EXTENSIVE_DATE_SEARCH",
                defaults.extraction.extensive_date_search,
            )?,
        };

        let dedup = DedupSettings {
            min_duplcheck_size: get_u64(
                section,
                "MIN_DUPLCHECK_SIZE",
                defaults.dedup.min_duplcheck_size,
            )?,
            max_repetitions: get_u64(section, "MAX_REPETITIONS", defaults.dedup.max_repetitions)?,
        };

        let urls = UrlSettings {
            external_urls: get_bool(section, "EXTERNAL_URLS", defaults.urls.external_urls)?,
        };

        Ok(Self {
            download,
            extraction,
            dedup,
            urls,
        })
    }
}

fn warn_unknown_keys(section: &IniSection) {
    for entry in section.entries() {
        let normalized = entry.key.to_ascii_uppercase();
        if !RECOGNIZED_KEYS.contains(&normalized.as_str()) {
            warn!(key = %entry.key, line = entry.line, "Ignoring unrecognized settings key");
        }
    }
}

fn require<'a>(section: &'a IniSection, key: &'static str) -> Result<&'a IniEntry, ConfigError> {
    section.get(key).ok_or(ConfigError::MissingKey(key))
}

fn get_u64(section: &IniSection, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(default);
    }
    entry
        .value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: entry.value.clone(),
        })
}

fn get_u32(section: &IniSection, key: &'static str, default: u32) -> Result<u32, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(default);
    }
    entry
        .value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: entry.value.clone(),
        })
}

fn get_optional_u64(section: &IniSection, key: &'static str) -> Result<Option<u64>, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(None);
    }
    entry
        .value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: entry.value.clone(),
        })
}

fn get_f64(section: &IniSection, key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(default);
    }
    let parsed = entry.value.trim().parse::<f64>().ok();
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: entry.value.clone(),
        }),
    }
}

fn get_bool(section: &IniSection, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(default);
    }
    match entry.value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            key,
            value: entry.value.clone(),
        }),
    }
}

fn get_optional(section: &IniSection, key: &'static str) -> Result<Option<String>, ConfigError> {
    let entry = require(section, key)?;
    if entry.is_blank() {
        return Ok(None);
    }
    let value = unquote(&entry.value).to_string();
    if !is_header_safe(&value) {
        return Err(ConfigError::Syntax {
            line: entry.line,
            reason: format!("value of '{key}' contains non-printable characters"),
        });
    }
    Ok(Some(value))
}

fn get_user_agents(section: &IniSection) -> Result<Vec<String>, ConfigError> {
    let entry = require(section, "USER_AGENTS")?;
    let mut agents = Vec::new();
    for raw in entry.value_lines() {
        // * Each list line must be a non-empty double-quoted string
        if !(raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2) {
            return Err(ConfigError::InvalidUserAgent {
                line: entry.line,
                reason: format!("expected a double-quoted string, got: {raw}"),
            });
        }
        let agent = unquote(raw);
        if agent.trim().is_empty() {
            return Err(ConfigError::InvalidUserAgent {
                line: entry.line,
                reason: "empty user-agent string".into(),
            });
        }
        if !is_header_safe(agent) {
            return Err(ConfigError::InvalidUserAgent {
                line: entry.line,
                reason: format!("non-printable characters in: {agent}"),
            });
        }
        agents.push(agent.to_string());
    }
    Ok(agents)
}

// * Accepts visible ASCII plus space and tab, i.e. a valid HTTP header value
fn is_header_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c == ' ' || c == '\t' || ('!'..='~').contains(&c))
}
