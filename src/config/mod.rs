//! Typed Supabase configuration from environment variables.
//!
//! Loads once at startup and never fails: missing variables are simply
//! absent. Whether the record is usable is a separate question answered by
//! [`SupabaseConfig::is_valid`]. Credentials are wrapped in
//! `secrecy::SecretString` so they stay out of `Debug` output.

pub mod secrets;

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const SUPABASE_JWT_SECRET: &str = "SUPABASE_JWT_SECRET";
pub const DATABASE_URL: &str = "DATABASE_URL";

const MASK: &str = "********";

/// Connection settings for one Supabase project.
#[derive(Debug, Default)]
pub struct SupabaseConfig {
    /// Base URL of the project, e.g. `https://abc.supabase.co`.
    pub endpoint_url: Option<String>,
    /// Public key; requests are subject to row-level security.
    pub anon_key: Option<SecretString>,
    /// Privileged key; bypasses row-level security.
    pub service_role_key: Option<SecretString>,
    /// Only needed for local token verification.
    pub jwt_secret: Option<SecretString>,
    /// Direct Postgres connection string. Not used by the HTTP client.
    pub database_url: Option<SecretString>,
}

/// Whether [`SupabaseConfig::describe`] exposes credential values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    /// Every value as read.
    Reveal,
    /// Present credentials replaced by a fixed mask. The endpoint is kept.
    Mask,
}

impl SupabaseConfig {
    /// Load configuration from the process environment.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a record from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            endpoint_url: lookup(SUPABASE_URL),
            anon_key: lookup(SUPABASE_ANON_KEY).map(SecretString::from),
            service_role_key: lookup(SUPABASE_SERVICE_ROLE_KEY).map(SecretString::from),
            jwt_secret: lookup(SUPABASE_JWT_SECRET).map(SecretString::from),
            database_url: lookup(DATABASE_URL).map(SecretString::from),
        }
    }

    /// Read a `KEY=VALUE` file without touching the process environment.
    ///
    /// Values are taken literally: no quote stripping and no `$VAR`
    /// expansion, so a password containing `$` survives. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read env file {}: {e}", path.display()))
        })?;

        let vars = parse_env_lines(&text).map_err(|line| {
            Error::Configuration(format!(
                "bad env file {}: line {line} is not KEY=VALUE",
                path.display()
            ))
        })?;

        Ok(Self::from_lookup(|name| vars.get(name).cloned()))
    }

    /// True when both the endpoint and the anon key are present and non-empty.
    pub fn is_valid(&self) -> bool {
        self.endpoint().is_some() && present(&self.anon_key).is_some()
    }

    /// All five fields keyed by field name, for diagnostics.
    pub fn describe(&self, redaction: Redaction) -> BTreeMap<&'static str, Option<String>> {
        let secret = |value: &Option<SecretString>| {
            value.as_ref().map(|s| match redaction {
                Redaction::Reveal => s.expose_secret().to_string(),
                Redaction::Mask => MASK.to_string(),
            })
        };

        BTreeMap::from([
            ("endpoint_url", self.endpoint_url.clone()),
            ("anon_key", secret(&self.anon_key)),
            ("service_role_key", secret(&self.service_role_key)),
            ("jwt_secret", secret(&self.jwt_secret)),
            ("database_url", secret(&self.database_url)),
        ])
    }

    /// The endpoint, if set to something non-empty.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint_url.as_deref().filter(|url| !url.is_empty())
    }

    pub(crate) fn anon_key(&self) -> Option<&SecretString> {
        present(&self.anon_key)
    }

    pub(crate) fn service_role_key(&self) -> Option<&SecretString> {
        present(&self.service_role_key)
    }
}

/// Split each line on its first `=`. On failure returns the 1-based line number.
fn parse_env_lines(text: &str) -> std::result::Result<HashMap<String, String>, usize> {
    let mut vars = HashMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or(idx + 1)?;
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

fn present(value: &Option<SecretString>) -> Option<&SecretString> {
    value.as_ref().filter(|s| !s.expose_secret().is_empty())
}
