//! Shared test helpers: a transport that records requests instead of
//! sending them, and config builders that never touch the environment.

#![allow(dead_code)]

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use supabase_bootstrap::client::Transport;
use supabase_bootstrap::config::SupabaseConfig;
use supabase_bootstrap::config::secrets::{ExposeSecret, SecretString};
use supabase_bootstrap::error::{Error, Result};

pub const ENDPOINT: &str = "https://abc.supabase.co";
pub const ANON_KEY: &str = "anon-key";
pub const SERVICE_KEY: &str = "service-role-key";

/// A request the client tried to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub api_key: String,
}

/// Answers GETs from canned bodies keyed by path; anything else is a 404.
#[derive(Default)]
pub struct MockTransport {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str, api_key: &SecretString) -> Result<Value> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            api_key: api_key.expose_secret().to_string(),
        });

        url.strip_prefix(ENDPOINT)
            .and_then(|path| self.responses.get(path))
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                body: format!("no mock response for {url}"),
            })
    }
}

pub fn select_path(table: &str) -> String {
    format!("/rest/v1/{table}?select=*&limit=1")
}

/// Build a config from literal pairs.
pub fn config(pairs: &[(&str, &str)]) -> SupabaseConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SupabaseConfig::from_lookup(|name| vars.get(name).cloned())
}

/// Endpoint plus both keys.
pub fn full_config() -> SupabaseConfig {
    config(&[
        ("SUPABASE_URL", ENDPOINT),
        ("SUPABASE_ANON_KEY", ANON_KEY),
        ("SUPABASE_SERVICE_ROLE_KEY", SERVICE_KEY),
    ])
}
