//! supabase-bootstrap CLI: check configuration, test connectivity, and
//! snapshot a Supabase project.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use supabase_bootstrap::client::{create_admin_client, create_anon_client};
use supabase_bootstrap::config::{Redaction, SupabaseConfig};
use supabase_bootstrap::scaffold::{self, Scaffolded};
use supabase_bootstrap::snapshot::{self, COMMON_TABLES, DEFAULT_OUTPUT, SchemaSnapshot, TableSource};
use supabase_bootstrap::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(
    name = "supabase-bootstrap",
    about = "Configuration and schema snapshots for Supabase projects"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the environment configuration and print it
    Check {
        /// Print credential values instead of masking them
        #[arg(long)]
        show_secrets: bool,
    },
    /// Query one table with the anon key
    Ping {
        /// Table to select from
        #[arg(long, default_value = "_supabase_tables")]
        table: String,
    },
    /// Snapshot tables and storage buckets with the service-role key
    Snapshot {
        /// Dotenv-style file holding the project credentials
        #[arg(long, default_value = "env_config.txt")]
        env_file: PathBuf,
        /// Where to write the JSON snapshot
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Discover tables from the PostgREST schema instead of a fixed list
        #[arg(long, conflicts_with = "table")]
        introspect: bool,
        /// Table to probe (repeatable; defaults to a list of common names)
        #[arg(long)]
        table: Vec<String>,
        /// Skip writing .env and the example Edge Function
        #[arg(long)]
        no_scaffold: bool,
    },
    /// Create the example Edge Function if it is missing
    Scaffold {
        /// Project root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_telemetry(TelemetryConfig::from_env())?;

    match cli.command {
        Command::Check { show_secrets } => cmd_check(show_secrets),
        Command::Ping { table } => cmd_ping(table).await,
        Command::Snapshot {
            env_file,
            output,
            introspect,
            table,
            no_scaffold,
        } => {
            let source = if introspect {
                TableSource::Introspect
            } else if table.is_empty() {
                TableSource::default()
            } else {
                TableSource::Fixed(table)
            };
            cmd_snapshot(&env_file, &output, source, !no_scaffold).await
        }
        Command::Scaffold { root } => cmd_scaffold(&root),
    }
}

fn cmd_check(show_secrets: bool) -> anyhow::Result<()> {
    let config = SupabaseConfig::from_env();
    let redaction = if show_secrets {
        Redaction::Reveal
    } else {
        Redaction::Mask
    };

    for (field, value) in config.describe(redaction) {
        println!("{:<18}  {}", field, value.as_deref().unwrap_or("-"));
    }

    if !config.is_valid() {
        anyhow::bail!("supabase configuration is incomplete, check SUPABASE_URL and SUPABASE_ANON_KEY");
    }
    println!("\nConfiguration OK.");
    Ok(())
}

async fn cmd_ping(table: String) -> anyhow::Result<()> {
    let config = SupabaseConfig::from_env();
    let client = create_anon_client(&config)?;

    let rows = client.select(&table, "*", 1).await?;
    println!("Connected to {}", client.endpoint());
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

async fn cmd_snapshot(
    env_file: &Path,
    output: &Path,
    source: TableSource,
    write_scaffold: bool,
) -> anyhow::Result<()> {
    let config = SupabaseConfig::from_env_file(env_file)?;
    let client = create_admin_client(&config)?;
    println!("Connecting to {}", client.endpoint());

    snapshot::check_connection(&client).await;

    let snapshot = SchemaSnapshot::capture(&client, &source).await;
    snapshot.write_to(output)?;
    println!("Wrote {}", output.display());

    if write_scaffold {
        scaffold::copy_env_file(env_file, Path::new(".env"))?;
        match scaffold::create_example_function(Path::new("."))? {
            Scaffolded::Created(path) => println!("Created {}", path.display()),
            Scaffolded::AlreadyExists(path) => println!("Kept existing {}", path.display()),
        }
    }

    println!("\nSummary:");
    println!("  tables:          {}", snapshot.tables.len());
    println!("  storage buckets: {}", snapshot.storage_buckets.len());
    if snapshot.tables.is_empty() && source == TableSource::default() {
        println!(
            "  (none of {} found, try --introspect)",
            COMMON_TABLES.join(", ")
        );
    }
    Ok(())
}

fn cmd_scaffold(root: &Path) -> anyhow::Result<()> {
    match scaffold::create_example_function(root)? {
        Scaffolded::Created(path) => println!("Created {}", path.display()),
        Scaffolded::AlreadyExists(path) => println!("Already exists: {}", path.display()),
    }
    Ok(())
}
