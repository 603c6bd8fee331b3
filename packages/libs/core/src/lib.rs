//! sift-core: Sift 공통 핵심 라이브러리
//!
//! 검색 컴파일러(`sift-sql`)와 CLI가 공유하는 스키마 IR과 에러 타입을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `schema`: 스키마(YAML) 파싱, 테이블/관계 IR, 관계 해석
//! - `error`: 공통 에러 타입

pub mod error;
pub mod schema;

pub use error::{Error, Result};
