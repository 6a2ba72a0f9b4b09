//! Run a SOQL query and print every record as one JSON line.
//!
//! Credentials come from the environment (see `SfdcConfig::from_env`).
//!
//! ```sh
//! export SF_CLIENT_ID=... SF_CLIENT_SECRET=... SF_USERNAME=... SF_PASSWORD=...
//! cargo run --bin sfdc-query -- "SELECT Id, Name FROM Account"
//! cargo run --bin sfdc-query -- --include-deleted "SELECT Id FROM Account"
//! ```

use futures::StreamExt;
use sfdc::{Sfdc, SfdcConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut include_deleted = false;
    let mut soql = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--include-deleted" => include_deleted = true,
            _ => soql = Some(arg),
        }
    }

    let Some(soql) = soql else {
        eprintln!("Usage: sfdc-query [--include-deleted] <SOQL>");
        std::process::exit(2);
    };

    let config = SfdcConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    let sfdc = Sfdc::new(config);

    let mut cursor = sfdc
        .query_cursor::<serde_json::Value>(&soql, include_deleted)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        });

    let total = cursor.len().await.unwrap_or_default();
    let mut printed = 0u64;
    {
        let mut records = Box::pin(cursor.records());
        while let Some(record) = records.next().await {
            match record {
                Ok(record) => {
                    println!("{record}");
                    printed += 1;
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    eprintln!("{printed} of {total} records");
}
