//! `sift first`

use std::path::Path;
use std::sync::Arc;

use sift_sql::{row_to_json, QueryCompiler, SelectQuery, TracingSink};
use sqlx::postgres::PgPoolOptions;

use super::{load_schema, parse_input};
use crate::config::CliConfig;
use crate::OutputFormat;

pub async fn run(
    config: &CliConfig,
    schema_path: &Path,
    database_url: &str,
    table: &str,
    params: bool,
    input: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = load_schema(schema_path)?;
    let params = parse_input(input, params)?;

    let compiler =
        QueryCompiler::new(config.compiler_config()).with_diagnostics(Arc::new(TracingSink));
    let mut query = SelectQuery::new(&schema, table)?.with_compiler(compiler);
    query.apply(&params)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;
    tracing::info!(table = %table, "Connected to database");

    let row = query.first_or_fail(&pool).await?;
    let value = row_to_json(row);

    match format {
        OutputFormat::Text => {
            if let Some(obj) = value.as_object() {
                for (column, value) in obj {
                    println!("{}: {}", column, value);
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
    }

    Ok(())
}
