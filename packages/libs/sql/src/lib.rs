//! sift-sql: 검색 디스크립터 → SQL 조건 컴파일러
//!
//! HTTP 요청 파라미터 등에서 온 평면 검색 디스크립터
//! (`{"author:profile.bio%like": "engineer"}`)를 WHERE 조건으로 변환합니다.
//! SeaQuery를 사용하여 값은 항상 이스케이프되어 렌더링됩니다.
//!
//! # 모듈 구조
//!
//! - `key`: 검색 키 파서
//! - `compiler`: 디스크립터 컴파일러
//! - `builder`: 조건 빌더 API와 SeaQuery 구현
//! - `select`: SELECT 쿼리 빌더
//! - `exec`: 쿼리 실행 (first-or-fail)
//! - `params`: 검색 파라미터
//! - `diagnostics`: 무시된 검색 키 보고
//! - `config`: 컴파일러 설정

pub mod builder;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exec;
pub mod key;
pub mod params;
pub mod select;

pub use builder::{ColumnRef, ConditionBuilder, WhereBuilder};
pub use compiler::QueryCompiler;
pub use config::CompilerConfig;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use error::{QueryError, Result};
pub use exec::{row_to_json, rows_to_json, FirstOrFail};
pub use key::{Clause, ColumnPath, ParsedKey};
pub use params::{SearchDescriptor, SearchParams, SortOrder};
pub use select::SelectQuery;
