//! 컴파일러 설정

use std::env;

use serde::Deserialize;

/// 검색 컴파일러 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompilerConfig {
    /// between/date 범위 인자가 없으면 조건을 추가하지 않음
    ///
    /// 기본값(false)은 누락된 인자를 빈 문자열로 채웁니다.
    #[serde(default)]
    pub strict_range_bounds: bool,
}

impl CompilerConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        Self {
            strict_range_bounds: env::var("SIFT_STRICT_RANGE_BOUNDS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}
