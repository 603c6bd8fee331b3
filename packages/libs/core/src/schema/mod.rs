//! 스키마(YAML) 파싱 및 IR 생성
//!
//! # 개요
//!
//! 검색 컴파일러는 관계 경로(`author:profile.bio`)를 해석하기 위해
//! 테이블 간의 관계 정보가 필요합니다. 이 모듈은 스키마 YAML을 파싱하여
//! 관계 해석이 가능한 IR(Intermediate Representation)로 변환합니다.
//!
//! # 모듈 구조
//!
//! - `column`: 컬럼 정의 (외래키 참조 포함)
//! - `relation`: 관계 정의 (belongs_to / has_one / has_many)
//! - `table`: 테이블 정의
//! - `ir`: Schema IR 및 관계 해석
//! - `parser`: YAML 파싱 로직

mod column;
mod ir;
mod parser;
mod relation;
mod table;

pub use column::{Column, Reference};
pub use ir::{ReferenceError, ResolvedRelation, SchemaIr};
pub use parser::SchemaParser;
pub use relation::{Relation, RelationKind};
pub use table::{IdColumn, Table};
