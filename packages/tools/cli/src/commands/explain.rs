//! `sift explain`

use std::path::Path;
use std::sync::Arc;

use sift_sql::{CollectingSink, QueryCompiler, SelectQuery};

use super::{load_schema, parse_input};
use crate::config::CliConfig;
use crate::OutputFormat;

pub fn run(
    config: &CliConfig,
    schema_path: &Path,
    table: &str,
    params: bool,
    input: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let schema = load_schema(schema_path)?;
    let params = parse_input(input, params)?;

    let sink = Arc::new(CollectingSink::new());
    let compiler = QueryCompiler::new(config.compiler_config()).with_diagnostics(sink.clone());

    let mut query = SelectQuery::new(&schema, table)?.with_compiler(compiler);
    query.apply(&params)?;
    let sql = query.to_sql();
    let diagnostics = sink.take();

    match format {
        OutputFormat::Text => {
            println!("{}", sql);
            for diagnostic in &diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "table": table,
                "sql": sql,
                "diagnostics": diagnostics.iter().map(|d| serde_json::json!({
                    "key": d.key(),
                    "message": d.to_string(),
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}
