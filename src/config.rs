//! Probe configuration: `.env` parsing and credential resolution.
//!
//! The `.env` loader never mutates the process environment — parsed pairs
//! live in an explicit [`EnvFile`] map, and [`Config::resolve`] merges them
//! over a caller-supplied environment lookup. Tests pass a closure instead
//! of mutating env vars.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::AppError;

/// Environment key holding the Gemini credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Optional environment key overriding the REST base for both client tiers.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

/// Model probed by every run.
pub const PROBE_MODEL: &str = "gemini-3-flash-preview";

/// Fixed prompt sent to the model.
pub const PROBE_PROMPT: &str = "Hello, reply with 'OK' if you see this.";

/// Default REST base for both client tiers.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ── .env file ─────────────────────────────────────────────────────────────────

/// Key/value pairs parsed from a `.env` file.
///
/// Parsing rules: blank lines and lines whose first non-whitespace character
/// is `#` are ignored; remaining lines split on the FIRST `=`; a value
/// wrapped in a matching pair of double quotes has the quotes stripped;
/// lines with no `=` are skipped; later duplicates overwrite earlier ones.
/// Values are stored verbatim — no substitution, no escape processing.
#[derive(Debug, Default)]
pub struct EnvFile {
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load `.env` from `dir`. A missing file is not an error and yields an
    /// empty map.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(".env");
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(AppError::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        Ok(Self::parse(&raw))
    }

    /// Parse `.env` content. Infallible: malformed lines are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut vars = HashMap::new();
        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            vars.insert(key.to_string(), unquote(value).to_string());
        }
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Strip one matching pair of surrounding double quotes.
/// A lone `"` is not a pair and is kept verbatim.
fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

// ── Credential ────────────────────────────────────────────────────────────────

/// The Gemini API credential. Guaranteed non-empty; redacts itself in
/// `Debug` output so it can never leak through logs.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, rejecting empty strings.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked preview: first 6 and last 4 characters. Keys too short for
    /// the mask to hide anything collapse to `...`.
    pub fn preview(&self) -> String {
        let n = self.0.chars().count();
        if n < 10 {
            return "...".to_string();
        }
        let head: String = self.0.chars().take(6).collect();
        let tail: String = self.0.chars().skip(n - 4).collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.preview())
    }
}

// ── Resolved configuration ────────────────────────────────────────────────────

/// Fully-resolved probe configuration. Built once at startup, immutable
/// afterwards.
#[derive(Debug)]
pub struct Config {
    /// Credential, if any source supplied a non-empty one.
    pub api_key: Option<ApiKey>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Prompt text sent with every request.
    pub prompt: String,
    /// REST base for the primary-tier client.
    pub primary_base_url: String,
    /// REST base for the legacy-tier client.
    pub legacy_base_url: String,
}

impl Config {
    /// Load `.env` from the current directory and resolve against the
    /// process environment.
    pub fn load() -> Result<Self, AppError> {
        let env_file = EnvFile::load(Path::new("."))?;
        Ok(Self::resolve(&env_file, |key| std::env::var(key).ok()))
    }

    /// Resolve configuration from an explicit `.env` map and an environment
    /// lookup. A key present in the `.env` file wins over the environment,
    /// even when its value is empty — mirroring an overwrite-on-load store.
    pub fn resolve(env_file: &EnvFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| env_file.get(key).map(str::to_string).or_else(|| env(key));

        let api_key = lookup(API_KEY_VAR).and_then(ApiKey::new);
        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            api_key,
            model: PROBE_MODEL.to_string(),
            prompt: PROBE_PROMPT.to_string(),
            primary_base_url: base_url.clone(),
            legacy_base_url: base_url,
        }
    }
}
