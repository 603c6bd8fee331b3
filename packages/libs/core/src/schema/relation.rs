//! 관계 정의

use serde::{Deserialize, Serialize};

/// 관계 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// 현재 테이블이 FK를 가짐 (`posts.user_id -> users.id`)
    BelongsTo,
    /// 대상 테이블이 FK를 가짐, 최대 1건
    HasOne,
    /// 대상 테이블이 FK를 가짐, N건
    HasMany,
}

/// 관계 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// 관계 이름 (검색 키에서 사용)
    pub name: String,

    /// 관계 종류
    pub kind: RelationKind,

    /// 관계 대상 테이블
    pub table: String,

    /// FK 컬럼 (BelongsTo: 현재 테이블, HasOne/HasMany: 대상 테이블)
    pub foreign_key: String,

    /// FK가 가리키는 컬럼 (BelongsTo: 대상 테이블, HasOne/HasMany: 현재 테이블)
    ///
    /// 생략 시 해당 테이블의 PK를 사용합니다.
    #[serde(default)]
    pub owner_key: Option<String>,
}

impl Relation {
    /// FK가 대상 테이블 쪽에 있는지
    pub fn is_inverse(&self) -> bool {
        matches!(self.kind, RelationKind::HasOne | RelationKind::HasMany)
    }
}
