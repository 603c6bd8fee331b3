//! CLI 명령어 구현

pub mod explain;
pub mod first;
pub mod relations;

use std::path::Path;

use anyhow::Context;
use sift_core::schema::{SchemaIr, SchemaParser};
use sift_sql::{SearchDescriptor, SearchParams};

/// 스키마 파일 로드
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaIr> {
    SchemaParser::parse_file(path)
        .with_context(|| format!("Failed to load schema from {}", path.display()))
}

/// 명령줄 입력을 검색 파라미터로 해석
///
/// `params`가 false면 입력 전체를 디스크립터로 봅니다.
pub fn parse_input(input: &str, params: bool) -> anyhow::Result<SearchParams> {
    if params {
        return serde_json::from_str(input).context("Invalid search params JSON");
    }

    let value: serde_json::Value = serde_json::from_str(input).context("Invalid descriptor JSON")?;
    let filter = SearchDescriptor::try_from(value).context("Descriptor must be a JSON object")?;
    Ok(SearchParams {
        filter,
        ..Default::default()
    })
}
