//! 공통 에러 타입
//!
//! Sift 전체에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Sift 공통 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Schema Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("schema validation error: {message}")]
    SchemaValidation { message: String },

    #[error("duplicate table name: {name}")]
    DuplicateTable { name: String },

    #[error("duplicate relation '{relation}' on table '{table}'")]
    DuplicateRelation { table: String, relation: String },

    #[error("invalid reference: table '{table}' column '{column}' references non-existent table '{ref_table}'")]
    InvalidReference {
        table: String,
        column: String,
        ref_table: String,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookup Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("unknown table: {name}")]
    UnknownTable { name: String },

    #[error("unknown relation '{relation}' on table '{table}'")]
    UnknownRelation { table: String, relation: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::SchemaValidation { .. }
            | Error::DuplicateTable { .. }
            | Error::DuplicateRelation { .. }
            | Error::InvalidReference { .. }
            | Error::UnknownTable { .. }
            | Error::UnknownRelation { .. }
            | Error::Yaml(_)
            | Error::Json(_) => 400,

            // 500 Internal Server Error
            Error::Io(_) => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::SchemaValidation { .. } => "SCHEMA_VALIDATION_ERROR",
            Error::DuplicateTable { .. } => "DUPLICATE_TABLE",
            Error::DuplicateRelation { .. } => "DUPLICATE_RELATION",
            Error::InvalidReference { .. } => "INVALID_REFERENCE",
            Error::UnknownTable { .. } => "UNKNOWN_TABLE",
            Error::UnknownRelation { .. } => "UNKNOWN_RELATION",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Io(_) => "IO_ERROR",
        }
    }
}
