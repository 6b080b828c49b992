//! Point-in-time dump of reachable tables and storage buckets.
//!
//! Enumeration is best-effort: a table that cannot be read is treated as
//! absent or inaccessible and skipped, and a failed bucket listing yields an
//! empty list. Only writing the artifact can fail the snapshot.

use crate::client::{Bucket, Row, SupabaseClient, Transport};
use crate::error::{Error, Result};
use crate::telemetry::metrics;
use chrono::Utc;
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

/// Table names probed when no other source is given.
pub const COMMON_TABLES: &[&str] = &["profiles", "users", "posts", "comments", "settings"];

/// Default artifact file name.
pub const DEFAULT_OUTPUT: &str = "database_schema.json";

const NOTE: &str = "Basic information collected through the Supabase REST API";

/// Where the list of table names comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Fixed(Vec<String>),
    /// Ask PostgREST; falls back to [`COMMON_TABLES`] if that fails.
    Introspect,
}

impl Default for TableSource {
    fn default() -> Self {
        TableSource::Fixed(COMMON_TABLES.iter().map(|t| t.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    pub exists: bool,
    /// At most one row.
    pub sample_data: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// UTC date, `YYYY-MM-DD`.
    pub generated_at: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<TableInfo>,
    pub storage_buckets: Vec<Bucket>,
    pub metadata: SnapshotMetadata,
}

impl SchemaSnapshot {
    /// Probe tables and buckets through `client`.
    pub async fn capture<T: Transport>(client: &SupabaseClient<T>, source: &TableSource) -> Self {
        let names = match source {
            TableSource::Fixed(names) => names.clone(),
            TableSource::Introspect => discover_table_names(client).await,
        };

        Self {
            tables: probe_tables(client, &names).await,
            storage_buckets: list_buckets(client).await,
            metadata: SnapshotMetadata {
                generated_at: Utc::now().format("%Y-%m-%d").to_string(),
                note: NOTE.to_string(),
            },
        }
    }

    /// Write the snapshot as indented JSON, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            Error::Other(format!("cannot create snapshot file {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Check that the key works against the auth admin API.
///
/// Returns whether it did. A failure is logged and otherwise ignored since it
/// may only mean the key lacks auth admin rights.
pub async fn check_connection<T: Transport>(client: &SupabaseClient<T>) -> bool {
    match client.list_users(1).await {
        Ok(_) => {
            tracing::info!(endpoint = client.endpoint(), "supabase connection ok");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "supabase connection test failed, continuing");
            false
        }
    }
}

/// Select one row from each table; keep the ones that answered.
pub async fn probe_tables<T: Transport>(client: &SupabaseClient<T>, names: &[String]) -> Vec<TableInfo> {
    let counter = metrics::tables_probed();
    let mut found = Vec::new();

    for name in names {
        match client.select(name, "*", 1).await {
            Ok(mut rows) => {
                rows.truncate(1);
                counter.add(1, &[KeyValue::new("result", "found")]);
                found.push(TableInfo {
                    table_name: name.clone(),
                    exists: true,
                    sample_data: rows,
                });
            }
            Err(e) => {
                counter.add(1, &[KeyValue::new("result", "missing")]);
                tracing::debug!(table = %name, error = %e, "table absent or inaccessible");
            }
        }
    }

    tracing::info!(count = found.len(), "found accessible tables");
    found
}

/// Storage buckets, or an empty list if the listing fails.
pub async fn list_buckets<T: Transport>(client: &SupabaseClient<T>) -> Vec<Bucket> {
    match client.list_buckets().await {
        Ok(buckets) => {
            tracing::info!(count = buckets.len(), "found storage buckets");
            buckets
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to list storage buckets");
            Vec::new()
        }
    }
}

/// Table names from PostgREST, or [`COMMON_TABLES`] if introspection fails.
pub async fn discover_table_names<T: Transport>(client: &SupabaseClient<T>) -> Vec<String> {
    match client.table_names().await {
        Ok(names) => names,
        Err(e) => {
            tracing::warn!(error = %e, "schema introspection failed, using common table names");
            COMMON_TABLES.iter().map(|t| t.to_string()).collect()
        }
    }
}
