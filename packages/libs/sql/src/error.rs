//! 쿼리 에러 타입

/// 쿼리 빌드/실행 에러
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("No records found.")]
    NoRecordsFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("core error: {0}")]
    Core(#[from] sift_core::Error),
}

impl QueryError {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::NoRecordsFound => 403,
            QueryError::Database(_) => 500,
            QueryError::Core(e) => e.status_code(),
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::NoRecordsFound => "NO_RECORDS_FOUND",
            QueryError::Database(_) => "DATABASE_ERROR",
            QueryError::Core(e) => e.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
