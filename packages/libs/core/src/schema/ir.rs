//! Schema IR (Intermediate Representation)
//!
//! 파서가 생성하고 검색 컴파일러가 관계 해석에 사용하는 스키마의 최종 형태입니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::relation::Relation;
use super::table::Table;
use crate::error::{Error, Result};

/// Schema IR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaIr {
    /// 스키마 버전 (YAML의 version 필드)
    pub version: u32,

    /// 테이블 맵 (테이블 이름 -> 테이블 정의)
    pub tables: HashMap<String, Table>,
}

/// 해석된 관계
///
/// `parent.parent_column = target.target_column` 으로 두 테이블이 연결됩니다.
#[derive(Debug, Clone)]
pub struct ResolvedRelation<'a> {
    pub relation: Relation,
    pub parent: &'a Table,
    pub target: &'a Table,
    pub parent_column: String,
    pub target_column: String,
}

impl Default for SchemaIr {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaIr {
    /// 빈 IR 생성
    pub fn new() -> Self {
        Self {
            version: 1,
            tables: HashMap::new(),
        }
    }

    /// 테이블 추가
    pub fn add_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// 테이블 조회
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// 테이블 조회 (없으면 에러)
    pub fn require_table(&self, name: &str) -> Result<&Table> {
        self.get_table(name).ok_or_else(|| Error::UnknownTable {
            name: name.to_string(),
        })
    }

    /// 테이블 존재 여부
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// 모든 테이블 이름 (정렬됨)
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// `table`에서 `relation` 이름의 관계를 해석
    pub fn resolve_relation(&self, table: &str, relation: &str) -> Result<ResolvedRelation<'_>> {
        let parent = self.require_table(table)?;
        let found = parent
            .find_relation(relation)
            .ok_or_else(|| Error::UnknownRelation {
                table: table.to_string(),
                relation: relation.to_string(),
            })?;
        let target = self.require_table(&found.table)?;

        let (parent_column, target_column) = if found.is_inverse() {
            (
                found.owner_key.clone().unwrap_or_else(|| parent.id.name.clone()),
                found.foreign_key.clone(),
            )
        } else {
            (
                found.foreign_key.clone(),
                found.owner_key.clone().unwrap_or_else(|| target.id.name.clone()),
            )
        };

        Ok(ResolvedRelation {
            relation: found,
            parent,
            target,
            parent_column,
            target_column,
        })
    }

    /// 외래키 참조 / 관계 대상 검증
    ///
    /// 모든 참조와 관계가 존재하는 테이블을 가리키는지 확인합니다.
    pub fn validate_references(&self) -> Vec<ReferenceError> {
        let mut errors = Vec::new();

        for table in self.tables.values() {
            for column in table.columns_with_references() {
                if let Some(ref reference) = column.references {
                    if !self.tables.contains_key(&reference.table) {
                        errors.push(ReferenceError::TableNotFound {
                            from_table: table.name.clone(),
                            from_column: column.name.clone(),
                            ref_table: reference.table.clone(),
                        });
                    }
                }
            }

            for relation in &table.relations {
                if !self.tables.contains_key(&relation.table) {
                    errors.push(ReferenceError::TableNotFound {
                        from_table: table.name.clone(),
                        from_column: relation.foreign_key.clone(),
                        ref_table: relation.table.clone(),
                    });
                }
            }
        }

        errors.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        errors
    }
}

/// 참조 검증 에러
#[derive(Debug, Clone)]
pub enum ReferenceError {
    TableNotFound {
        from_table: String,
        from_column: String,
        ref_table: String,
    },
}

impl ReferenceError {
    fn sort_key(&self) -> (&str, &str) {
        match self {
            ReferenceError::TableNotFound {
                from_table,
                from_column,
                ..
            } => (from_table, from_column),
        }
    }
}

impl From<ReferenceError> for Error {
    fn from(error: ReferenceError) -> Self {
        match error {
            ReferenceError::TableNotFound {
                from_table,
                from_column,
                ref_table,
            } => Error::InvalidReference {
                table: from_table,
                column: from_column,
                ref_table,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Reference, RelationKind};

    fn blog() -> SchemaIr {
        let mut ir = SchemaIr::new();
        ir.add_table(Table::new("users").with_relation(Relation {
            name: "posts".to_string(),
            kind: RelationKind::HasMany,
            table: "posts".to_string(),
            foreign_key: "user_id".to_string(),
            owner_key: None,
        }));
        ir.add_table(Table::new("posts").with_column(Column::referencing(
            "user_id",
            Reference::new("users").alias("author"),
        )));
        ir
    }

    #[test]
    fn test_resolve_belongs_to() {
        let ir = blog();
        let resolved = ir.resolve_relation("posts", "author").unwrap();

        assert_eq!(resolved.target.name, "users");
        assert_eq!(resolved.parent_column, "user_id");
        assert_eq!(resolved.target_column, "id");
    }

    #[test]
    fn test_resolve_has_many() {
        let ir = blog();
        let resolved = ir.resolve_relation("users", "posts").unwrap();

        assert_eq!(resolved.target.name, "posts");
        assert_eq!(resolved.parent_column, "id");
        assert_eq!(resolved.target_column, "user_id");
    }

    #[test]
    fn test_resolve_unknown_relation() {
        let ir = blog();
        let err = ir.resolve_relation("posts", "editor").unwrap_err();
        assert!(matches!(err, Error::UnknownRelation { .. }));

        let err = ir.resolve_relation("comments", "author").unwrap_err();
        assert!(matches!(err, Error::UnknownTable { .. }));
    }

    #[test]
    fn test_validate_references() {
        let mut ir = blog();
        assert!(ir.validate_references().is_empty());

        ir.add_table(
            Table::new("comments")
                .with_column(Column::referencing("post_id", Reference::new("articles"))),
        );
        let errors = ir.validate_references();
        assert_eq!(errors.len(), 1);
    }
}
