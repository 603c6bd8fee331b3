//! CLI 설정

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// CLI 설정 (`~/.sift/config.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 기본 스키마 YAML 경로
    pub schema_path: Option<PathBuf>,

    /// 기본 Postgres URL
    pub database_url: Option<String>,

    /// between/date 범위 인자 누락 시 조건 생략
    #[serde(default)]
    pub strict_range_bounds: bool,
}

impl CliConfig {
    /// 설정 파일 경로
    fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".sift").join("config.json"))
    }

    /// 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 스키마 경로 결정 (CLI 옵션 > 환경변수 > 설정 파일)
    pub fn schema_path(&self, flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        flag.or_else(|| std::env::var("SIFT_SCHEMA").ok().map(PathBuf::from))
            .or_else(|| self.schema_path.clone())
            .ok_or_else(|| anyhow::anyhow!("Schema not configured. Use '--schema <path>' or set SIFT_SCHEMA"))
    }

    /// DB URL 결정 (CLI 옵션 > 환경변수 > 설정 파일)
    pub fn database_url(&self, flag: Option<String>) -> anyhow::Result<String> {
        flag.or_else(|| std::env::var("SIFT_DATABASE_URL").ok())
            .or_else(|| self.database_url.clone())
            .ok_or_else(|| anyhow::anyhow!("Database URL not configured. Use '--database-url <url>' or set SIFT_DATABASE_URL"))
    }

    /// 컴파일러 설정 (환경변수가 켜져 있으면 우선)
    pub fn compiler_config(&self) -> sift_sql::CompilerConfig {
        let from_env = sift_sql::CompilerConfig::from_env();
        sift_sql::CompilerConfig {
            strict_range_bounds: from_env.strict_range_bounds || self.strict_range_bounds,
        }
    }
}
