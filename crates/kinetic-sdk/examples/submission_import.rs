//! Import submissions from a JSON file
//!
//! Reads connection settings from `KINETIC_*` environment variables (or a
//! `.env` file) and creates one submission per element of the input array.
//!
//! ```sh
//! KINETIC_SERVER_URL=https://kinetic.example.com KINETIC_SPACE_SLUG=acme \
//! KINETIC_USERNAME=admin KINETIC_PASSWORD=secret \
//!     cargo run --example submission_import --features trace -- services checklist rows.json
//! ```

use anyhow::{Context, bail};
use kinetic_sdk::observability::init_tracing;
use kinetic_sdk::{ConnectionConfig, ImportOptions, RequestCe, import_submissions};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [kapp, form, input] = args.as_slice() else {
        bail!("usage: submission_import <kapp> <form> <submissions.json>");
    };

    let config = ConnectionConfig::from_dotenv()?;
    init_tracing(config.options.log_level)?;

    let raw = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("reading {input}"))?;
    let submissions = match serde_json::from_str::<Value>(&raw)? {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| {
                if row.get("values").is_some() {
                    row
                } else {
                    serde_json::json!({ "values": row })
                }
            })
            .collect::<Vec<_>>(),
        _ => bail!("{input} must contain a JSON array"),
    };

    let client = RequestCe::new(&config)?;
    let report = import_submissions(&client, kapp, form, submissions, ImportOptions::default()).await?;

    println!("{} of {} submissions imported", report.succeeded, report.total());
    for failure in &report.failed {
        println!("  #{} -> {} {}", failure.index, failure.status, failure.message);
    }
    Ok(())
}
