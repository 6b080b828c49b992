mod common;

use common::{MockTransport, full_config, select_path};
use serde_json::json;
use supabase_bootstrap::client::create_admin_client_with;
use supabase_bootstrap::snapshot::{
    self, COMMON_TABLES, SchemaSnapshot, TableSource, discover_table_names,
};

fn buckets() -> serde_json::Value {
    json!([
        {"id": "avatars", "name": "avatars", "public": true, "owner": ""},
        {"id": "private", "name": "private", "public": false}
    ])
}

#[tokio::test]
async fn capture_keeps_reachable_tables_only() {
    let transport = MockTransport::new()
        .respond(
            &select_path("profiles"),
            json!([{"id": 1}, {"id": 2}]),
        )
        .respond(&select_path("posts"), json!([]))
        .respond("/storage/v1/bucket", buckets());
    let client = create_admin_client_with(&full_config(), transport).unwrap();

    let snapshot = SchemaSnapshot::capture(&client, &TableSource::default()).await;

    let names: Vec<_> = snapshot.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(names, ["profiles", "posts"]);
    assert!(snapshot.tables.iter().all(|t| t.exists));
    assert_eq!(snapshot.tables[0].sample_data.len(), 1);
    assert!(snapshot.tables[1].sample_data.is_empty());

    assert_eq!(snapshot.storage_buckets.len(), 2);
    assert_eq!(snapshot.storage_buckets[0].name, "avatars");
    assert_eq!(snapshot.metadata.generated_at.len(), "2026-01-01".len());
}

#[tokio::test]
async fn bucket_failure_yields_empty_list() {
    let transport = MockTransport::new().respond(&select_path("users"), json!([]));
    let client = create_admin_client_with(&full_config(), transport).unwrap();

    let snapshot = SchemaSnapshot::capture(&client, &TableSource::default()).await;
    assert_eq!(snapshot.tables.len(), 1);
    assert!(snapshot.storage_buckets.is_empty());
}

#[tokio::test]
async fn fixed_source_probes_only_given_tables() {
    let transport = std::sync::Arc::new(
        MockTransport::new().respond(&select_path("orders"), json!([{"id": 7}])),
    );
    let client =
        create_admin_client_with(&full_config(), std::sync::Arc::clone(&transport)).unwrap();

    let tables = snapshot::probe_tables(&client, &["orders".to_string(), "ghost".to_string()]).await;
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].sample_data[0]["id"], 7);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn introspection_discovers_named_tables() {
    let transport = MockTransport::new()
        .respond("/rest/v1/", json!({"definitions": {"invoices": {}}}))
        .respond(&select_path("invoices"), json!([{"total": 10}]));
    let client = create_admin_client_with(&full_config(), transport).unwrap();

    let snapshot = SchemaSnapshot::capture(&client, &TableSource::Introspect).await;
    assert_eq!(snapshot.tables.len(), 1);
    assert_eq!(snapshot.tables[0].table_name, "invoices");
}

#[tokio::test]
async fn introspection_failure_falls_back_to_common_tables() {
    let client = create_admin_client_with(&full_config(), MockTransport::new()).unwrap();
    let names = discover_table_names(&client).await;
    assert_eq!(names, COMMON_TABLES);
}

#[tokio::test]
async fn connection_check_reports_without_failing() {
    let ok = MockTransport::new().respond(
        "/auth/v1/admin/users?page=1&per_page=1",
        json!({"users": []}),
    );
    let client = create_admin_client_with(&full_config(), ok).unwrap();
    assert!(snapshot::check_connection(&client).await);

    let client = create_admin_client_with(&full_config(), MockTransport::new()).unwrap();
    assert!(!snapshot::check_connection(&client).await);
}

#[tokio::test]
async fn written_snapshot_reads_back() {
    let transport = MockTransport::new()
        .respond(&select_path("settings"), json!([{"theme": "dark"}]))
        .respond("/storage/v1/bucket", buckets());
    let client = create_admin_client_with(&full_config(), transport).unwrap();
    let snapshot = SchemaSnapshot::capture(&client, &TableSource::default()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database_schema.json");
    snapshot.write_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["tables", "storage_buckets", "metadata"] {
        assert!(raw.get(key).is_some(), "missing top-level key {key}");
    }
    assert_eq!(raw["storage_buckets"][0]["owner"], "");

    let back: SchemaSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back, snapshot);
}
