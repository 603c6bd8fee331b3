//! 스키마 YAML 파서
//!
//! 스키마 YAML 파일을 파싱하여 Schema IR로 변환합니다.
//!
//! ```yaml
//! version: 1
//! tables:
//!   users:
//!     columns:
//!       name:
//!     relations:
//!       posts:
//!         type: has_many
//!         table: posts
//!         foreignKey: user_id
//!   posts:
//!     columns:
//!       user_id:
//!         references:
//!           table: users
//!           as: author
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::column::{Column, Reference};
use super::ir::SchemaIr;
use super::relation::{Relation, RelationKind};
use super::table::{IdColumn, Table};
use crate::error::{Error, Result};

/// 스키마 파서
pub struct SchemaParser;

impl SchemaParser {
    /// 단일 YAML 문자열 파싱
    pub fn parse_yaml(yaml: &str) -> Result<Vec<Table>> {
        let raw: RawSchema = serde_yaml::from_str(yaml)?;
        Self::convert_raw_schema(raw)
    }

    /// YAML 파일을 읽어 검증된 Schema IR 생성
    pub fn parse_file(path: impl AsRef<Path>) -> Result<SchemaIr> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading schema");
        let content = std::fs::read_to_string(path)?;
        Self::parse_multiple(&[content.as_str()])
    }

    /// 여러 YAML 문자열을 파싱하여 Schema IR 생성
    pub fn parse_multiple(yamls: &[&str]) -> Result<SchemaIr> {
        let mut all_tables = Vec::new();

        for yaml in yamls {
            let tables = Self::parse_yaml(yaml)?;
            all_tables.extend(tables);
        }

        Self::build_schema(all_tables)
    }

    /// 테이블 목록을 Schema IR로 변환
    pub fn build_schema(tables: Vec<Table>) -> Result<SchemaIr> {
        let mut ir = SchemaIr::new();
        let mut table_names = HashSet::new();

        for table in tables {
            if !table_names.insert(table.name.clone()) {
                return Err(Error::DuplicateTable {
                    name: table.name.clone(),
                });
            }
            Self::validate_relations(&table)?;
            ir.add_table(table);
        }

        if let Some(error) = ir.validate_references().into_iter().next() {
            return Err(error.into());
        }

        Ok(ir)
    }

    /// 관계 이름 검증
    ///
    /// 선언된 관계와 참조(`as` 별칭 또는 대상 테이블 이름)에서 유도된 관계는
    /// 같은 이름 공간을 공유하며, 검색 키 구분자(`.`, `:`, `%`)를 포함할 수 없습니다.
    fn validate_relations(table: &Table) -> Result<()> {
        let mut names = HashSet::new();

        for relation in table.relations.iter().cloned().chain(table.implicit_relations()) {
            if relation.name.is_empty() || relation.name.contains(['.', ':', '%']) {
                return Err(Error::SchemaValidation {
                    message: format!(
                        "invalid relation name '{}' on table '{}'",
                        relation.name, table.name
                    ),
                });
            }
            if !names.insert(relation.name.clone()) {
                return Err(Error::DuplicateRelation {
                    table: table.name.clone(),
                    relation: relation.name,
                });
            }
        }

        Ok(())
    }

    /// Raw 스키마를 Table 목록으로 변환
    fn convert_raw_schema(raw: RawSchema) -> Result<Vec<Table>> {
        let mut tables = Vec::new();

        for (name, raw_table) in raw.tables {
            let table = Self::convert_raw_table(name, raw_table.unwrap_or_default())?;
            tables.push(table);
        }

        tables.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tables)
    }

    /// Raw 테이블을 Table로 변환
    fn convert_raw_table(name: String, raw: RawTable) -> Result<Table> {
        let id = raw
            .id
            .and_then(|id| id.name)
            .map(|name| IdColumn { name })
            .unwrap_or_default();
        let columns = Self::convert_raw_columns(raw.columns);
        let relations = Self::convert_raw_relations(raw.relations);

        Ok(Table {
            name,
            id,
            columns,
            relations,
        })
    }

    /// Raw 컬럼들 변환
    fn convert_raw_columns(raw: Option<HashMap<String, Option<RawColumn>>>) -> Vec<Column> {
        let mut columns: Vec<Column> = raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, raw_col)| {
                let raw_col = raw_col.unwrap_or_default();
                Column {
                    name,
                    nullable: raw_col.nullable.unwrap_or(true),
                    references: raw_col.references.map(|r| Reference {
                        table: r.table,
                        column: r.column,
                        alias: r.alias,
                    }),
                }
            })
            .collect();

        // 이름순 정렬 (일관성)
        columns.sort_by(|a, b| a.name.cmp(&b.name));
        columns
    }

    /// Raw 관계들 변환
    fn convert_raw_relations(raw: Option<HashMap<String, RawRelation>>) -> Vec<Relation> {
        let mut relations: Vec<Relation> = raw
            .unwrap_or_default()
            .into_iter()
            .map(|(name, raw_rel)| Relation {
                name,
                kind: raw_rel.kind,
                table: raw_rel.table,
                foreign_key: raw_rel.foreign_key,
                owner_key: raw_rel.owner_key,
            })
            .collect();

        relations.sort_by(|a, b| a.name.cmp(&b.name));
        relations
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw YAML 구조체 (serde 역직렬화용)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default = "default_version")]
    #[allow(dead_code)]
    version: u32,
    tables: HashMap<String, Option<RawTable>>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
struct RawTable {
    id: Option<RawIdColumn>,
    columns: Option<HashMap<String, Option<RawColumn>>>,
    relations: Option<HashMap<String, RawRelation>>,
}

#[derive(Debug, Deserialize)]
struct RawIdColumn {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawColumn {
    nullable: Option<bool>,
    references: Option<RawReference>,
}

#[derive(Debug, Deserialize)]
struct RawReference {
    table: String,
    column: Option<String>,
    #[serde(rename = "as")]
    alias: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    #[serde(rename = "type")]
    kind: RelationKind,
    table: String,
    #[serde(rename = "foreignKey")]
    foreign_key: String,
    #[serde(rename = "ownerKey")]
    owner_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"
version: 1
tables:
  users:
    columns:
      name:
      profile_id:
        references:
          table: profiles
          as: profile
    relations:
      posts:
        type: has_many
        table: posts
        foreignKey: user_id
  profiles:
    columns:
      bio:
  posts:
    columns:
      title:
      user_id:
        nullable: false
        references:
          table: users
          as: author
"#;

    #[test]
    fn test_parse_simple_schema() {
        let tables = SchemaParser::parse_yaml(BLOG).unwrap();
        assert_eq!(tables.len(), 3);

        let users = tables.iter().find(|t| t.name == "users").unwrap();
        assert_eq!(users.id.name, "id");
        assert_eq!(users.columns.len(), 2);
        assert_eq!(users.relations.len(), 1);
    }

    #[test]
    fn test_parse_with_references() {
        let schema = SchemaParser::parse_multiple(&[BLOG]).unwrap();

        let posts = schema.get_table("posts").unwrap();
        let user_id = posts.find_column("user_id").unwrap();
        assert!(!user_id.nullable);

        let reference = user_id.references.as_ref().unwrap();
        assert_eq!(reference.table, "users");
        assert_eq!(reference.alias, Some("author".to_string()));

        let resolved = schema.resolve_relation("users", "posts").unwrap();
        assert_eq!(resolved.relation.kind, RelationKind::HasMany);
    }

    #[test]
    fn test_custom_primary_key() {
        let yaml = r#"
tables:
  accounts:
    id:
      name: account_no
"#;
        let tables = SchemaParser::parse_yaml(yaml).unwrap();
        assert_eq!(tables[0].id.name, "account_no");
    }

    #[test]
    fn test_dangling_reference_error() {
        let yaml = r#"
tables:
  posts:
    columns:
      user_id:
        references:
          table: users
"#;
        let err = SchemaParser::parse_multiple(&[yaml]).unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
    }

    #[test]
    fn test_invalid_relation_name() {
        let yaml = r#"
tables:
  users:
    relations:
      "a:b":
        type: has_one
        table: users
        foreignKey: parent_id
"#;
        let err = SchemaParser::parse_multiple(&[yaml]).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { .. }));
    }

    #[test]
    fn test_invalid_reference_alias() {
        let yaml = r#"
tables:
  users:
    columns:
      name:
  posts:
    columns:
      user_id:
        references:
          table: users
          as: "author.main"
"#;
        let err = SchemaParser::parse_multiple(&[yaml]).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { .. }));
    }

    #[test]
    fn test_implicit_relation_name_collision() {
        let yaml = r#"
tables:
  users:
    columns:
      name:
  messages:
    columns:
      sender_id:
        references:
          table: users
      recipient_id:
        references:
          table: users
"#;
        let err = SchemaParser::parse_multiple(&[yaml]).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_RELATION");
        assert!(matches!(
            err,
            Error::DuplicateRelation { ref table, ref relation } if table == "messages" && relation == "users"
        ));

        // 별칭으로 구분하면 통과
        let aliased = r#"
tables:
  users:
    columns:
      name:
  messages:
    columns:
      sender_id:
        references:
          table: users
          as: sender
      recipient_id:
        references:
          table: users
"#;
        let schema = SchemaParser::parse_multiple(&[aliased]).unwrap();
        let messages = schema.get_table("messages").unwrap();
        assert_eq!(messages.find_relation("sender").unwrap().foreign_key, "sender_id");
        assert_eq!(messages.find_relation("users").unwrap().foreign_key, "recipient_id");
    }

    #[test]
    fn test_declared_and_implicit_relation_collision() {
        let yaml = r#"
tables:
  users:
    columns:
      name:
  posts:
    columns:
      user_id:
        references:
          table: users
          as: author
    relations:
      author:
        type: has_one
        table: users
        foreignKey: post_id
"#;
        let err = SchemaParser::parse_multiple(&[yaml]).unwrap_err();
        assert!(matches!(err, Error::DuplicateRelation { .. }));
    }

    #[test]
    fn test_duplicate_table_error() {
        let tables = vec![Table::new("users"), Table::new("users")];

        let result = SchemaParser::build_schema(tables);
        assert!(matches!(result, Err(Error::DuplicateTable { .. })));
    }
}
