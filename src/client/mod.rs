//! Authenticated Supabase client handles.
//!
//! Two scopes exist. The anon client uses the public key and is subject to
//! row-level security; the admin client uses the service-role key and
//! bypasses it. Both constructors check their preconditions up front and
//! never fall back to the other scope. Construction does no network I/O.
//!
//! # Example
//! ```no_run
//! use supabase_bootstrap::client::create_anon_client;
//! use supabase_bootstrap::config::SupabaseConfig;
//!
//! # async fn run() -> supabase_bootstrap::error::Result<()> {
//! let config = SupabaseConfig::from_env();
//! let client = create_anon_client(&config)?;
//! let rows = client.select("profiles", "*", 1).await?;
//! # Ok(())
//! # }
//! ```

pub mod transport;

pub use transport::{HttpTransport, Transport};

use crate::config::SupabaseConfig;
use crate::error::{Error, Result};
use crate::telemetry::{api, metrics};
use opentelemetry::KeyValue;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::Instrument as _;

/// One row returned by PostgREST.
pub type Row = serde_json::Map<String, Value>;

/// Which key a client authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Anon,
    ServiceRole,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Anon => "anon",
            Scope::ServiceRole => "service_role",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage bucket as listed by the Storage API.
///
/// Fields beyond the ones named here are kept in `extra` so the snapshot
/// preserves whatever the server returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Handle bound to one endpoint with one credential.
pub struct SupabaseClient<T = HttpTransport> {
    endpoint: String,
    api_key: SecretString,
    scope: Scope,
    transport: T,
}

impl<T> fmt::Debug for SupabaseClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("endpoint", &self.endpoint)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Build an anon-scope client.
///
/// # Errors
/// [`Error::Configuration`] unless both `SUPABASE_URL` and
/// `SUPABASE_ANON_KEY` are set.
pub fn create_anon_client(config: &SupabaseConfig) -> Result<SupabaseClient> {
    let (endpoint, key) = anon_credentials(config)?;
    Ok(bind(endpoint, key, Scope::Anon, HttpTransport::new()?))
}

/// [`create_anon_client`] over a caller-supplied transport.
pub fn create_anon_client_with<T: Transport>(
    config: &SupabaseConfig,
    transport: T,
) -> Result<SupabaseClient<T>> {
    let (endpoint, key) = anon_credentials(config)?;
    Ok(bind(endpoint, key, Scope::Anon, transport))
}

/// Build a service-role client.
///
/// The anon key is not required here.
///
/// # Errors
/// [`Error::Configuration`] if `SUPABASE_SERVICE_ROLE_KEY` or `SUPABASE_URL`
/// is missing.
pub fn create_admin_client(config: &SupabaseConfig) -> Result<SupabaseClient> {
    let (endpoint, key) = admin_credentials(config)?;
    Ok(bind(endpoint, key, Scope::ServiceRole, HttpTransport::new()?))
}

/// [`create_admin_client`] over a caller-supplied transport.
pub fn create_admin_client_with<T: Transport>(
    config: &SupabaseConfig,
    transport: T,
) -> Result<SupabaseClient<T>> {
    let (endpoint, key) = admin_credentials(config)?;
    Ok(bind(endpoint, key, Scope::ServiceRole, transport))
}

fn anon_credentials(config: &SupabaseConfig) -> Result<(&str, &SecretString)> {
    match (config.endpoint(), config.anon_key()) {
        (Some(endpoint), Some(key)) => Ok((endpoint, key)),
        _ => Err(Error::Configuration(
            "supabase configuration is incomplete: SUPABASE_URL and SUPABASE_ANON_KEY are required"
                .to_string(),
        )),
    }
}

fn admin_credentials(config: &SupabaseConfig) -> Result<(&str, &SecretString)> {
    let key = config.service_role_key().ok_or_else(|| {
        Error::Configuration("service role key is not configured".to_string())
    })?;
    let endpoint = config.endpoint().ok_or_else(|| {
        Error::Configuration("SUPABASE_URL is required for the admin client".to_string())
    })?;
    Ok((endpoint, key))
}

fn bind<T>(endpoint: &str, key: &SecretString, scope: Scope, transport: T) -> SupabaseClient<T> {
    let endpoint = endpoint.trim_end_matches('/').to_string();
    tracing::info!(endpoint = %endpoint, scope = %scope, "connecting to supabase");
    SupabaseClient {
        endpoint,
        api_key: SecretString::from(key.expose_secret().to_string()),
        scope,
        transport,
    }
}

impl<T> SupabaseClient<T> {
    /// Base URL without a trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }
}

impl<T: Transport> SupabaseClient<T> {
    /// `GET /rest/v1/{table}?select={columns}&limit={limit}`.
    ///
    /// The table name is percent-encoded as one path segment and the query
    /// values are form-encoded, so quoted identifiers survive.
    pub async fn select(&self, table: &str, columns: &str, limit: usize) -> Result<Vec<Row>> {
        let mut url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            Error::Configuration(format!("invalid SUPABASE_URL {}: {e}", self.endpoint))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::Configuration(format!("SUPABASE_URL {} cannot take a path", self.endpoint))
            })?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        url.query_pairs_mut()
            .append_pair("select", columns)
            .append_pair("limit", &limit.to_string());

        let path = url.path().to_string();
        let body = self.fetch("select", url.as_str(), &path).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// List storage buckets visible to this key.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let body = self.get("list_buckets", "/storage/v1/bucket").await?;
        Ok(serde_json::from_value(body)?)
    }

    /// First page of auth users. Only succeeds with the service-role key.
    pub async fn list_users(&self, per_page: usize) -> Result<Vec<Value>> {
        let path = format!("/auth/v1/admin/users?page=1&per_page={per_page}");
        let body = self.get("list_users", &path).await?;
        match body {
            Value::Object(mut obj) => match obj.remove("users") {
                Some(Value::Array(users)) => Ok(users),
                _ => Err(Error::Other("auth response has no users list".to_string())),
            },
            Value::Array(users) => Ok(users),
            _ => Err(Error::Other("unexpected auth response shape".to_string())),
        }
    }

    /// Table and view names exposed by PostgREST, read from its OpenAPI
    /// description. Sorted.
    pub async fn table_names(&self) -> Result<Vec<String>> {
        let body = self.get("introspect", "/rest/v1/").await?;
        let definitions = body
            .get("definitions")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Error::Other("schema introspection response has no definitions".to_string())
            })?;

        let mut names: Vec<String> = definitions.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn get(&self, operation: &'static str, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        self.fetch(operation, &url, path).await
    }

    async fn fetch(&self, operation: &'static str, url: &str, path: &str) -> Result<Value> {
        let span = api::start_request_span(operation, self.scope.as_str(), path);
        let started = Instant::now();

        let result = self
            .transport
            .get(url, &self.api_key)
            .instrument(span.clone())
            .await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        api::record_status(&span, outcome);
        metrics::api_requests().add(
            1,
            &[
                KeyValue::new("operation", operation),
                KeyValue::new("scope", self.scope.as_str()),
                KeyValue::new("result", outcome),
            ],
        );
        metrics::request_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", operation)],
        );

        result
    }
}
