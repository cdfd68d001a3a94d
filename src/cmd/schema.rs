//! Schema command CLI handler.

use crate::json_schema;

pub fn run(command: Option<String>) -> anyhow::Result<()> {
    match command {
        Some(name) => {
            let schema = json_schema::get_schema(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "No JSON output schema for '{}'. Available: {}",
                    name,
                    json_schema::schema_names().join(", ")
                )
            })?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json_schema::all_schemas())?
            );
        }
    }
    Ok(())
}
