//! 테이블 정의

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::relation::{Relation, RelationKind};

/// PK 컬럼
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdColumn {
    pub name: String,
}

impl Default for IdColumn {
    fn default() -> Self {
        Self {
            name: "id".to_string(),
        }
    }
}

/// 테이블 정의
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// 테이블 이름
    pub name: String,

    /// PK 컬럼
    #[serde(default)]
    pub id: IdColumn,

    /// 컬럼 목록 (이름순)
    #[serde(default)]
    pub columns: Vec<Column>,

    /// 명시적으로 선언된 관계 (has_one / has_many 등)
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: IdColumn::default(),
            columns: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// 컬럼 조회
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 외래키 참조를 가진 컬럼들
    pub fn columns_with_references(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.references.is_some())
    }

    /// 외래키 참조에서 유도되는 belongs-to 관계들
    pub fn implicit_relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.columns_with_references().filter_map(|column| {
            column.references.as_ref().map(|reference| Relation {
                name: reference.relation_name().to_string(),
                kind: RelationKind::BelongsTo,
                table: reference.table.clone(),
                foreign_key: column.name.clone(),
                owner_key: reference.column.clone(),
            })
        })
    }

    /// 선언된 관계 + 유도된 관계 (선언이 우선)
    pub fn all_relations(&self) -> Vec<Relation> {
        let mut relations = self.relations.clone();
        for implicit in self.implicit_relations() {
            if !relations.iter().any(|r| r.name == implicit.name) {
                relations.push(implicit);
            }
        }
        relations
    }

    /// 이름으로 관계 조회
    pub fn find_relation(&self, name: &str) -> Option<Relation> {
        if let Some(declared) = self.relations.iter().find(|r| r.name == name) {
            return Some(declared.clone());
        }
        self.implicit_relations().find(|r| r.name == name)
    }
}
