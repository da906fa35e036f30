//! Schema command implementation

use clap::Args;
use tracing::instrument;

use zipfian_core::session::SessionReport;

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the JSON Schema of [`SessionReport`].
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(SessionReport);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
