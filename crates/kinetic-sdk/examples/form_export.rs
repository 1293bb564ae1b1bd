//! Export the form definitions of a kapp
//!
//! Uses a YAML connection file; `options.export_directory` names the target
//! unless a directory is given on the command line.
//!
//! ```sh
//! cargo run --example form_export -- kinetic.yaml services [./exports]
//! ```

use anyhow::bail;
use kinetic_sdk::{ConnectionConfig, RequestCe, export_forms};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_file, kapp, directory) = match args.as_slice() {
        [config_file, kapp] => (config_file, kapp, None),
        [config_file, kapp, directory] => (config_file, kapp, Some(Path::new(directory))),
        _ => bail!("usage: form_export <config.yaml> <kapp> [directory]"),
    };

    let config = ConnectionConfig::from_yaml_file(config_file)?;
    let client = RequestCe::new(&config)?;

    let written = export_forms(&client, kapp, directory).await?;
    for path in &written {
        println!("{}", path.display());
    }
    println!("{} forms exported", written.len());
    Ok(())
}
