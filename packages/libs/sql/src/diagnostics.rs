//! 컴파일 진단
//!
//! 알 수 없는 연산자처럼 조건 없이 건너뛴 검색 키를 외부에서 관찰할 수 있도록
//! 보고합니다. 컴파일 결과 자체는 바뀌지 않습니다.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::key::{Clause, KeyError};

/// 진단 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// 알 수 없는 연산자 → 조건 없음
    UnknownClause { key: String, clause: String },

    /// 일반 컬럼에 빈 연산자 (`name%`) → 조건 없음
    BlankClause { key: String },

    /// between/date 범위 인자 누락
    MissingBounds { key: String, clause: Clause, skipped: bool },

    /// 키 문법 오류 → 조건 없음
    MalformedKey { key: String, error: KeyError },
}

impl Diagnostic {
    pub fn key(&self) -> &str {
        match self {
            Diagnostic::UnknownClause { key, .. }
            | Diagnostic::BlankClause { key }
            | Diagnostic::MissingBounds { key, .. }
            | Diagnostic::MalformedKey { key, .. } => key,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownClause { key, clause } => {
                write!(f, "{}: unknown clause '{}' ignored", key, clause)
            }
            Diagnostic::BlankClause { key } => write!(f, "{}: empty clause ignored", key),
            Diagnostic::MissingBounds { key, clause, skipped: true } => {
                write!(f, "{}: {} without both bounds skipped", key, clause)
            }
            Diagnostic::MissingBounds { key, clause, skipped: false } => {
                write!(f, "{}: {} missing bounds defaulted to ''", key, clause)
            }
            Diagnostic::MalformedKey { key, error } => write!(f, "{}: {}", key, error),
        }
    }
}

/// 진단 수신자
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// `tracing` 경고로 기록 (기본값)
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnknownClause { key, clause } => {
                tracing::warn!(key = %key, clause = %clause, "Ignoring search key with unknown clause");
            }
            Diagnostic::BlankClause { key } => {
                tracing::warn!(key = %key, "Ignoring search key with empty clause");
            }
            Diagnostic::MissingBounds { key, clause, skipped } => {
                tracing::warn!(key = %key, clause = %clause, skipped, "Search key is missing range bounds");
            }
            Diagnostic::MalformedKey { key, error } => {
                tracing::warn!(key = %key, error = %error, "Ignoring malformed search key");
            }
        }
    }
}

/// 진단을 메모리에 수집 (테스트/운영 점검용)
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 수집된 진단 목록 (복사본)
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 수집된 진단을 비우고 반환
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
