//! `sift relations`

use std::path::Path;

use sift_core::schema::{RelationKind, SchemaIr};

use super::load_schema;
use crate::OutputFormat;

pub fn run(schema_path: &Path, table: &str, format: OutputFormat) -> anyhow::Result<()> {
    let schema = load_schema(schema_path)?;
    let lines = describe(&schema, table)?;

    match format {
        OutputFormat::Text => {
            if lines.is_empty() {
                println!("(no relations)");
            }
            for line in lines {
                println!(
                    "- {} ({}) -> {} on {}.{} = {}.{}",
                    line.name,
                    kind_label(line.kind),
                    line.target,
                    table,
                    line.parent_column,
                    line.target,
                    line.target_column
                );
            }
        }
        OutputFormat::Json => {
            let out: Vec<_> = lines
                .iter()
                .map(|line| {
                    serde_json::json!({
                        "name": line.name,
                        "kind": line.kind,
                        "table": line.target,
                        "parent_column": line.parent_column,
                        "target_column": line.target_column,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

struct RelationLine {
    name: String,
    kind: RelationKind,
    target: String,
    parent_column: String,
    target_column: String,
}

fn describe(schema: &SchemaIr, table: &str) -> anyhow::Result<Vec<RelationLine>> {
    let mut relations = schema.require_table(table)?.all_relations();
    relations.sort_by(|a, b| a.name.cmp(&b.name));

    relations
        .iter()
        .map(|relation| {
            let resolved = schema.resolve_relation(table, &relation.name)?;
            Ok(RelationLine {
                name: relation.name.clone(),
                kind: relation.kind,
                target: resolved.target.name.clone(),
                parent_column: resolved.parent_column,
                target_column: resolved.target_column,
            })
        })
        .collect()
}

fn kind_label(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::BelongsTo => "belongs_to",
        RelationKind::HasOne => "has_one",
        RelationKind::HasMany => "has_many",
    }
}
