//! 쿼리 실행
//!
//! SELECT 쿼리를 Postgres에서 실행하고 결과 행을 JSON으로 변환합니다.

use sea_query::PostgresQueryBuilder;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};

use crate::error::{QueryError, Result};
use crate::select::SelectQuery;

/// 첫 번째 결과를 반환하고, 없으면 `NoRecordsFound`
pub trait FirstOrFail {
    type Item;

    fn first_or_fail(self) -> Result<Self::Item>;
}

impl<I: IntoIterator> FirstOrFail for I {
    type Item = I::Item;

    fn first_or_fail(self) -> Result<Self::Item> {
        self.into_iter().next().ok_or(QueryError::NoRecordsFound)
    }
}

impl SelectQuery<'_> {
    /// 모든 결과 행
    pub async fn fetch_all(&self, pool: &PgPool) -> Result<Vec<PgRow>> {
        let sql = self.to_sql();
        tracing::debug!(sql = %sql, "Executing select query");

        Ok(sqlx::query(&sql).fetch_all(pool).await?)
    }

    /// 첫 번째 결과 행 (기존 정렬 기준)
    ///
    /// 결과가 없으면 `QueryError::NoRecordsFound`를 반환합니다.
    pub async fn first_or_fail(&self, pool: &PgPool) -> Result<PgRow> {
        let sql = self.first_sql();
        tracing::debug!(sql = %sql, "Executing first-or-fail query");

        sqlx::query(&sql).fetch_optional(pool).await?.first_or_fail()
    }

    /// 정렬은 유지하고 `LIMIT 1`만 적용한 SQL
    pub fn first_sql(&self) -> String {
        let mut statement = self.statement().clone();
        statement.limit(1);
        statement.to_string(PostgresQueryBuilder)
    }
}

pub fn rows_to_json(rows: Vec<PgRow>) -> Vec<Value> {
    rows.into_iter().map(row_to_json).collect()
}

/// 결과 행을 JSON 객체로 변환
pub fn row_to_json(row: PgRow) -> Value {
    let mut obj = serde_json::Map::new();
    for column in row.columns() {
        let name = column.name();
        let type_name = column.type_info().name().to_ascii_uppercase();
        let value = match type_name.as_str() {
            "INT2" | "SMALLINT" => row
                .try_get::<Option<i16>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into())),
            "INT4" | "INTEGER" => row
                .try_get::<Option<i32>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into())),
            "INT8" | "BIGINT" => row
                .try_get::<Option<i64>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into())),
            "FLOAT4" | "REAL" => row
                .try_get::<Option<f32>, _>(name)
                .ok()
                .flatten()
                .and_then(|v| serde_json::Number::from_f64(v.into()))
                .map(Value::Number),
            "FLOAT8" | "DOUBLE PRECISION" => row
                .try_get::<Option<f64>, _>(name)
                .ok()
                .flatten()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            "BOOL" | "BOOLEAN" => row
                .try_get::<Option<bool>, _>(name)
                .ok()
                .flatten()
                .map(Value::Bool),
            "JSON" | "JSONB" => row
                .try_get::<Option<Value>, _>(name)
                .ok()
                .flatten(),
            "UUID" => row
                .try_get::<Option<uuid::Uuid>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string())),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_rfc3339())),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S").to_string())),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(name)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string())),
            _ => row
                .try_get::<Option<String>, _>(name)
                .ok()
                .flatten()
                .map(Value::String),
        }
        .unwrap_or(Value::Null);

        obj.insert(name.to_string(), value);
    }
    Value::Object(obj)
}
