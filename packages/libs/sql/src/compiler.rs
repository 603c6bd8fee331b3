//! 검색 디스크립터 컴파일러
//!
//! 검색 키 → 값 맵을 읽어 `WhereBuilder`에 조건을 추가합니다.
//! 디스크립터 전체는 하나의 AND 그룹으로 묶이므로, 같은 빌더에
//! 따로 추가된 다른 조건과 안전하게 결합됩니다.
//!
//! | 연산자 | 조건 |
//! |---|---|
//! | (없음) | `=` 또는 배열이면 `IN` |
//! | `between` | `BETWEEN from AND to` |
//! | `date` | `>= from 00:00:00 AND <= to 23:59:59` |
//! | `in` | `IN (값)`, 값이 비어 있으면 생략 |
//! | `null` / `notNull` | `IS NULL` / `IS NOT NULL` |
//! | `moreOrEqual` / `moreThan` / `lessOrEqual` | `>=` / `>` / `<=` |
//! | `like` | `LIKE '%값%'` |

use std::sync::Arc;

use serde_json::Value;

use crate::builder::{ColumnRef, WhereBuilder};
use crate::config::CompilerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::key::{Clause, ParsedKey};
use crate::params::{is_truthy, value_to_text, SearchDescriptor};

const DAY_START: &str = "00:00:00";
const DAY_END: &str = "23:59:59";

/// 검색 디스크립터 컴파일러
///
/// 상태를 갖지 않으므로 여러 스레드에서 공유할 수 있습니다.
#[derive(Clone)]
pub struct QueryCompiler {
    config: CompilerConfig,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl std::fmt::Debug for QueryCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCompiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryCompiler {
    /// 새 컴파일러 생성 (진단은 `tracing`으로 기록)
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// 진단 수신자 교체
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// 디스크립터를 빌더에 적용
    ///
    /// 조건을 추가한 빌더를 그대로 반환합니다.
    /// 관계 해석 실패처럼 빌더가 거부한 경우에만 에러가 발생합니다.
    pub fn compile<'b, B>(&self, builder: &'b mut B, descriptor: &SearchDescriptor) -> Result<&'b mut B>
    where
        B: WhereBuilder + ?Sized,
    {
        builder.where_group(&mut |group| {
            for (key, value) in descriptor.iter() {
                self.apply_entry(group, key, value)?;
            }
            Ok(())
        })?;

        Ok(builder)
    }

    fn apply_entry(&self, builder: &mut dyn WhereBuilder, key: &str, value: &Value) -> Result<()> {
        let parsed = match ParsedKey::parse(key) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.diagnostics.report(Diagnostic::MalformedKey {
                    key: key.to_string(),
                    error,
                });
                return Ok(());
            }
        };

        tracing::debug!(key, table = builder.table_name(), "Compiling search key");

        if parsed.path.is_relation() {
            return self.build_relation(builder, &parsed, value);
        }

        match &parsed.clause {
            Some(clause) => self.where_clause(builder, &parsed, clause, value),
            None => self.where_normal(builder, &parsed.path.attribute, value),
        }
        Ok(())
    }

    /// 관계 경로 조건: 체인 마지막 테이블에서 조건을 만족하는 레코드가 존재
    fn build_relation(&self, builder: &mut dyn WhereBuilder, key: &ParsedKey, value: &Value) -> Result<()> {
        let chain = key.path.relation_chain();

        builder.where_has(&chain, &mut |scope| {
            match &key.clause {
                // 관계 경로에서는 빈 연산자도 일반 검색
                Some(Clause::Blank) | None => self.where_normal(scope, &key.path.attribute, value),
                Some(clause) => self.where_clause(scope, key, clause, value),
            }
            Ok(())
        })
    }

    /// 연산자 조건
    fn where_clause(&self, builder: &mut dyn WhereBuilder, key: &ParsedKey, clause: &Clause, value: &Value) {
        let column = ColumnRef::qualified(builder.table_name(), key.path.attribute.as_str());

        if clause.takes_bounds() && !key.has_bounds() {
            let skipped = self.config.strict_range_bounds;
            self.diagnostics.report(Diagnostic::MissingBounds {
                key: key.raw.clone(),
                clause: clause.clone(),
                skipped,
            });
            if skipped {
                return;
            }
        }

        match clause {
            Clause::Between => {
                let (from, to) = key.bounds();
                builder.between(&column, from, to);
            }
            Clause::Date => {
                let (from, to) = key.bounds();
                builder.greater_or_equal(&column, &Value::String(format!("{} {}", from, DAY_START)));
                builder.less_or_equal(&column, &Value::String(format!("{} {}", to, DAY_END)));
            }
            Clause::In => {
                // 빈 값은 "조건 없음"
                if !is_truthy(value) {
                    return;
                }
                match value {
                    Value::Array(items) => builder.is_in(&column, items),
                    other => builder.is_in(&column, std::slice::from_ref(other)),
                }
            }
            Clause::Null => builder.is_null(&column),
            Clause::NotNull => builder.is_not_null(&column),
            Clause::MoreOrEqual => builder.greater_or_equal(&column, value),
            Clause::MoreThan => builder.greater_than(&column, value),
            Clause::LessOrEqual => builder.less_or_equal(&column, value),
            Clause::Like => builder.like(&column, &format!("%{}%", value_to_text(value))),
            Clause::Blank => self.diagnostics.report(Diagnostic::BlankClause {
                key: key.raw.clone(),
            }),
            Clause::Unknown(tag) => self.diagnostics.report(Diagnostic::UnknownClause {
                key: key.raw.clone(),
                clause: tag.clone(),
            }),
        }
    }

    /// 일반 검색: 비어 있지 않은 배열이면 IN, 그 외에는 equality
    ///
    /// 빈 배열은 바인딩할 값이 없으므로 `null` equality(`IS NULL`)로 취급합니다.
    fn where_normal(&self, builder: &mut dyn WhereBuilder, attribute: &str, value: &Value) {
        let column = ColumnRef::qualified(builder.table_name(), attribute);

        match value {
            Value::Array(items) if items.is_empty() => builder.equals(&column, &Value::Null),
            Value::Array(items) => builder.is_in(&column, items),
            _ => builder.equals(&column, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ScopeFn;
    use crate::diagnostics::CollectingSink;
    use serde_json::json;

    /// 호출된 빌더 API를 문자열로 기록
    struct RecordingBuilder {
        table: String,
        calls: Vec<String>,
    }

    impl RecordingBuilder {
        fn new(table: &str) -> Self {
            Self {
                table: table.to_string(),
                calls: Vec::new(),
            }
        }
    }

    impl WhereBuilder for RecordingBuilder {
        fn table_name(&self) -> &str {
            &self.table
        }

        fn equals(&mut self, column: &ColumnRef, value: &Value) {
            self.calls.push(format!("{} = {}", column, value));
        }

        fn is_in(&mut self, column: &ColumnRef, values: &[Value]) {
            self.calls.push(format!("{} IN {}", column, json!(values)));
        }

        fn between(&mut self, column: &ColumnRef, low: &str, high: &str) {
            self.calls.push(format!("{} BETWEEN '{}' AND '{}'", column, low, high));
        }

        fn is_null(&mut self, column: &ColumnRef) {
            self.calls.push(format!("{} IS NULL", column));
        }

        fn is_not_null(&mut self, column: &ColumnRef) {
            self.calls.push(format!("{} IS NOT NULL", column));
        }

        fn greater_or_equal(&mut self, column: &ColumnRef, value: &Value) {
            self.calls.push(format!("{} >= {}", column, value));
        }

        fn greater_than(&mut self, column: &ColumnRef, value: &Value) {
            self.calls.push(format!("{} > {}", column, value));
        }

        fn less_or_equal(&mut self, column: &ColumnRef, value: &Value) {
            self.calls.push(format!("{} <= {}", column, value));
        }

        fn like(&mut self, column: &ColumnRef, pattern: &str) {
            self.calls.push(format!("{} LIKE '{}'", column, pattern));
        }

        fn where_has(&mut self, chain: &str, scope: &mut ScopeFn<'_>) -> Result<()> {
            let target = chain.rsplit('.').next().unwrap_or(chain);
            let mut nested = RecordingBuilder::new(target);
            scope(&mut nested)?;
            self.calls
                .push(format!("HAS {} ({})", chain, nested.calls.join(" AND ")));
            Ok(())
        }

        fn where_group(&mut self, scope: &mut ScopeFn<'_>) -> Result<()> {
            let mut group = RecordingBuilder::new(&self.table);
            scope(&mut group)?;
            self.calls.extend(group.calls);
            Ok(())
        }
    }

    fn compile(descriptor: serde_json::Value) -> (Vec<String>, Vec<Diagnostic>) {
        let sink = Arc::new(CollectingSink::new());
        let compiler = QueryCompiler::default().with_diagnostics(sink.clone());
        let descriptor = SearchDescriptor::try_from(descriptor).unwrap();

        let mut builder = RecordingBuilder::new("posts");
        compiler.compile(&mut builder, &descriptor).unwrap();
        (builder.calls, sink.take())
    }

    #[test]
    fn test_normal_equality() {
        let (calls, _) = compile(json!({ "status": "active" }));
        assert_eq!(calls, vec![r#"posts.status = "active""#]);
    }

    #[test]
    fn test_normal_membership() {
        let (calls, _) = compile(json!({ "status": ["active", "pending"] }));
        assert_eq!(calls, vec![r#"posts.status IN ["active","pending"]"#]);
    }

    #[test]
    fn test_normal_falsy_values_still_filter() {
        let (calls, _) = compile(json!({ "deleted_at": null, "tags": [], "title": "" }));
        assert_eq!(
            calls,
            vec![
                "posts.deleted_at = null",
                "posts.tags = null",
                r#"posts.title = """#,
            ]
        );
    }

    #[test]
    fn test_comparison_clauses() {
        let (calls, _) = compile(json!({
            "age%moreOrEqual": 18,
            "rank%lessOrEqual": 10,
            "score%moreThan": 3.5,
        }));
        assert_eq!(
            calls,
            vec!["posts.age >= 18", "posts.rank <= 10", "posts.score > 3.5"]
        );
    }

    #[test]
    fn test_date_clause_widens_to_full_days() {
        let (calls, diagnostics) = compile(json!({ "created_at%date%2023-01-01%2023-01-31": null }));
        assert_eq!(
            calls,
            vec![
                r#"posts.created_at >= "2023-01-01 00:00:00""#,
                r#"posts.created_at <= "2023-01-31 23:59:59""#,
            ]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_between_with_missing_bounds() {
        let (calls, diagnostics) = compile(json!({ "price%between%10": null }));
        assert_eq!(calls, vec!["posts.price BETWEEN '10' AND ''"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MissingBounds {
                key: "price%between%10".to_string(),
                clause: Clause::Between,
                skipped: false,
            }]
        );
    }

    #[test]
    fn test_strict_bounds_skip_predicate() {
        let sink = Arc::new(CollectingSink::new());
        let compiler = QueryCompiler::new(CompilerConfig {
            strict_range_bounds: true,
        })
        .with_diagnostics(sink.clone());
        let descriptor = SearchDescriptor::empty().with("created_at%date", json!(null));

        let mut builder = RecordingBuilder::new("posts");
        compiler.compile(&mut builder, &descriptor).unwrap();

        assert!(builder.calls.is_empty());
        assert!(matches!(
            sink.take().as_slice(),
            [Diagnostic::MissingBounds { skipped: true, .. }]
        ));
    }

    #[test]
    fn test_in_clause() {
        let (calls, _) = compile(json!({ "tags%in": [] }));
        assert!(calls.is_empty());

        let (calls, _) = compile(json!({ "tags%in": "" }));
        assert!(calls.is_empty());

        let (calls, _) = compile(json!({ "tags%in": ["a", "b"] }));
        assert_eq!(calls, vec![r#"posts.tags IN ["a","b"]"#]);

        let (calls, _) = compile(json!({ "tags%in": "a" }));
        assert_eq!(calls, vec![r#"posts.tags IN ["a"]"#]);
    }

    #[test]
    fn test_null_clauses_ignore_value() {
        let (calls, _) = compile(json!({ "deleted_at%null": "x", "published_at%notNull": null }));
        assert_eq!(
            calls,
            vec!["posts.deleted_at IS NULL", "posts.published_at IS NOT NULL"]
        );
    }

    #[test]
    fn test_like_clause() {
        let (calls, _) = compile(json!({ "title%like": "rust" }));
        assert_eq!(calls, vec!["posts.title LIKE '%rust%'"]);
    }

    #[test]
    fn test_unknown_clause_is_reported_noop() {
        let (calls, diagnostics) = compile(json!({ "x%bogus": 1 }));
        assert!(calls.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnknownClause {
                key: "x%bogus".to_string(),
                clause: "bogus".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_clause_on_plain_column_is_noop() {
        let (calls, diagnostics) = compile(json!({ "name%": "Alice" }));
        assert!(calls.is_empty());
        assert_eq!(diagnostics[0].key(), "name%");
    }

    #[test]
    fn test_relation_normal() {
        let (calls, _) = compile(json!({ "author.name": "Alice" }));
        assert_eq!(calls, vec![r#"HAS author (author.name = "Alice")"#]);
    }

    #[test]
    fn test_relation_blank_clause_falls_back_to_normal() {
        let (calls, diagnostics) = compile(json!({ "author.name%": ["Alice", "Bob"] }));
        assert_eq!(calls, vec![r#"HAS author (author.name IN ["Alice","Bob"])"#]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_relation_chain_with_clause() {
        let (calls, _) = compile(json!({ "author:profile.bio%like": "engineer" }));
        assert_eq!(
            calls,
            vec!["HAS author.profile (profile.bio LIKE '%engineer%')"]
        );
    }

    #[test]
    fn test_relation_unknown_clause_keeps_empty_scope() {
        let (calls, diagnostics) = compile(json!({ "author.name%bogus": "x" }));
        assert_eq!(calls, vec!["HAS author ()"]);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_malformed_key_is_reported_noop() {
        let (calls, diagnostics) = compile(json!({ "author.": "x", "status": "active" }));
        assert_eq!(calls, vec![r#"posts.status = "active""#]);
        assert!(matches!(
            diagnostics.as_slice(),
            [Diagnostic::MalformedKey { .. }]
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let descriptor = json!({
            "status": ["active", "pending"],
            "author:profile.bio%like": "engineer",
            "created_at%date%2023-01-01%2023-01-31": null,
        });
        assert_eq!(compile(descriptor.clone()).0, compile(descriptor).0);
    }
}
