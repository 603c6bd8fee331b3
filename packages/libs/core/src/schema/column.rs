//! 컬럼 정의
//!
//! 테이블의 컬럼 메타데이터를 정의합니다.

use serde::{Deserialize, Serialize};

/// 컬럼 정의
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// 컬럼 이름
    pub name: String,

    /// NULL 허용 여부
    #[serde(default)]
    pub nullable: bool,

    /// 외래키 참조
    #[serde(default)]
    pub references: Option<Reference>,
}

impl Column {
    /// 참조 없는 일반 컬럼
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: true,
            references: None,
        }
    }

    /// 외래키 컬럼
    pub fn referencing(name: impl Into<String>, reference: Reference) -> Self {
        Self {
            references: Some(reference),
            ..Self::new(name)
        }
    }
}

/// 외래키 참조 정의
///
/// 참조 컬럼은 그 자체로 belongs-to 관계가 됩니다.
/// 관계 이름은 `as`가 있으면 그 값, 없으면 대상 테이블 이름입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// 참조 대상 테이블
    pub table: String,

    /// 참조 대상 컬럼 (생략 시 대상 테이블의 PK)
    #[serde(default)]
    pub column: Option<String>,

    /// 관계 이름
    #[serde(rename = "as")]
    pub alias: Option<String>,
}

impl Reference {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// 이 참조가 만드는 관계의 이름
    pub fn relation_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_name_prefers_alias() {
        assert_eq!(Reference::new("users").relation_name(), "users");
        assert_eq!(
            Reference::new("users").alias("author").relation_name(),
            "author"
        );
    }
}
