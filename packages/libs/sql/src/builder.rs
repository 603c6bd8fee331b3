//! WHERE 빌더
//!
//! 검색 컴파일러가 요구하는 조건 API(`WhereBuilder`)와
//! SeaQuery 기반 구현(`ConditionBuilder`)을 정의합니다.
//! SeaQuery를 사용하여 값은 항상 이스케이프되어 렌더링됩니다.

use std::fmt;

use sea_query::{Condition, Expr, Iden, IntoCondition, Query, SimpleExpr};
use serde_json::Value;

use sift_core::schema::{ResolvedRelation, SchemaIr, Table};

use crate::error::Result;

/// 동적 테이블/컬럼 식별자
#[derive(Debug, Clone)]
pub(crate) struct DynIden(pub(crate) String);

impl Iden for DynIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", self.0).unwrap();
    }
}

/// 테이블 이름으로 한정된 컬럼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    fn expr(&self) -> Expr {
        Expr::col((DynIden(self.table.clone()), DynIden(self.column.clone())))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// 관계/그룹 스코프 안에서 실행되는 조건 빌드 함수
pub type ScopeFn<'f> = dyn FnMut(&mut dyn WhereBuilder) -> Result<()> + 'f;

/// 검색 컴파일러가 사용하는 조건 빌더 API
///
/// 모든 조건은 AND로 결합됩니다.
pub trait WhereBuilder {
    /// 현재 스코프의 테이블 이름 (별칭이 있으면 별칭)
    fn table_name(&self) -> &str;

    /// `column = value` (`null`이면 `IS NULL`)
    fn equals(&mut self, column: &ColumnRef, value: &Value);

    /// `column IN (values)`
    fn is_in(&mut self, column: &ColumnRef, values: &[Value]);

    /// `column BETWEEN low AND high`
    fn between(&mut self, column: &ColumnRef, low: &str, high: &str);

    fn is_null(&mut self, column: &ColumnRef);

    fn is_not_null(&mut self, column: &ColumnRef);

    fn greater_or_equal(&mut self, column: &ColumnRef, value: &Value);

    fn greater_than(&mut self, column: &ColumnRef, value: &Value);

    fn less_or_equal(&mut self, column: &ColumnRef, value: &Value);

    /// `column LIKE pattern`
    fn like(&mut self, column: &ColumnRef, pattern: &str);

    /// 관계 체인(`author.profile`)에 조건을 만족하는 레코드가 존재
    ///
    /// `scope`는 체인 마지막 테이블의 스코프에서 실행됩니다.
    fn where_has(&mut self, chain: &str, scope: &mut ScopeFn<'_>) -> Result<()>;

    /// `scope`에서 추가된 조건들을 하나의 괄호 그룹으로 묶음
    fn where_group(&mut self, scope: &mut ScopeFn<'_>) -> Result<()>;
}

/// SeaQuery `Condition` 기반 WHERE 빌더
///
/// 관계는 Schema IR로 해석되며, JOIN이 아닌
/// `EXISTS (SELECT 1 FROM ...)` 서브쿼리로 렌더링됩니다.
/// 서브쿼리 테이블 이름이 바깥 스코프와 겹치면 (`users` → `manager`)
/// `users_1` 같은 별칭으로 구분합니다.
#[derive(Debug, Clone)]
pub struct ConditionBuilder<'s> {
    schema: &'s SchemaIr,
    table: &'s Table,
    /// 컬럼 한정에 쓰이는 이름 (테이블 이름 또는 별칭)
    alias: String,
    /// 바깥 스코프들의 이름
    outer: Vec<String>,
    condition: Condition,
}

impl<'s> ConditionBuilder<'s> {
    /// 새 빌더 생성
    pub fn new(schema: &'s SchemaIr, table: &str) -> Result<Self> {
        let table = schema.require_table(table)?;
        Ok(Self {
            schema,
            table,
            alias: table.name.clone(),
            outer: Vec::new(),
            condition: Condition::all(),
        })
    }

    /// 같은 스코프의 빈 빌더 (그룹용)
    fn sibling(&self) -> Self {
        Self {
            schema: self.schema,
            table: self.table,
            alias: self.alias.clone(),
            outer: self.outer.clone(),
            condition: Condition::all(),
        }
    }

    /// 관계 대상 테이블의 하위 스코프
    fn child(&self, target: &'s Table) -> Self {
        let mut outer = self.outer.clone();
        outer.push(self.alias.clone());

        let mut alias = target.name.clone();
        let mut n = outer.len();
        while outer.contains(&alias) {
            alias = format!("{}_{}", target.name, n);
            n += 1;
        }

        Self {
            schema: self.schema,
            table: target,
            alias,
            outer,
            condition: Condition::all(),
        }
    }

    /// 추가된 조건이 없는지
    pub fn is_empty(&self) -> bool {
        self.condition.is_empty()
    }

    /// 누적된 조건
    pub fn into_condition(self) -> Condition {
        self.condition
    }

    fn push(&mut self, condition: impl IntoCondition) {
        let current = std::mem::replace(&mut self.condition, Condition::all());
        self.condition = current.add(condition.into_condition());
    }

    /// 단일 관계 hop에 대한 EXISTS 조건 생성
    fn exists(&self, resolved: &ResolvedRelation<'_>, nested: ConditionBuilder<'s>) -> SimpleExpr {
        let target = DynIden(resolved.target.name.clone());
        let alias = DynIden(nested.alias.clone());

        let join = Expr::col((alias.clone(), DynIden(resolved.target_column.clone()))).equals((
            DynIden(self.alias.clone()),
            DynIden(resolved.parent_column.clone()),
        ));

        let aliased = nested.alias != resolved.target.name;
        let mut condition = Condition::all().add(join);
        if !nested.is_empty() {
            condition = condition.add(nested.into_condition());
        }

        let mut subquery = Query::select();
        subquery.expr(Expr::val(1));
        if aliased {
            subquery.from_as(target, alias);
        } else {
            subquery.from(target);
        }
        subquery.cond_where(condition);

        Expr::exists(subquery)
    }
}

impl WhereBuilder for ConditionBuilder<'_> {
    fn table_name(&self) -> &str {
        &self.alias
    }

    fn equals(&mut self, column: &ColumnRef, value: &Value) {
        let expr = match value {
            Value::Null => column.expr().is_null(),
            other => column.expr().eq(value_to_expr(other)),
        };
        self.push(expr);
    }

    fn is_in(&mut self, column: &ColumnRef, values: &[Value]) {
        self.push(column.expr().is_in(values.iter().map(value_to_expr)));
    }

    fn between(&mut self, column: &ColumnRef, low: &str, high: &str) {
        self.push(column.expr().between(low, high));
    }

    fn is_null(&mut self, column: &ColumnRef) {
        self.push(column.expr().is_null());
    }

    fn is_not_null(&mut self, column: &ColumnRef) {
        self.push(column.expr().is_not_null());
    }

    fn greater_or_equal(&mut self, column: &ColumnRef, value: &Value) {
        self.push(column.expr().gte(value_to_expr(value)));
    }

    fn greater_than(&mut self, column: &ColumnRef, value: &Value) {
        self.push(column.expr().gt(value_to_expr(value)));
    }

    fn less_or_equal(&mut self, column: &ColumnRef, value: &Value) {
        self.push(column.expr().lte(value_to_expr(value)));
    }

    fn like(&mut self, column: &ColumnRef, pattern: &str) {
        self.push(column.expr().like(pattern));
    }

    fn where_has(&mut self, chain: &str, scope: &mut ScopeFn<'_>) -> Result<()> {
        let (head, rest) = match chain.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (chain, None),
        };

        let schema = self.schema;
        let resolved = schema.resolve_relation(&self.table.name, head)?;
        let mut nested = self.child(resolved.target);
        match rest {
            Some(rest) => nested.where_has(rest, scope)?,
            None => scope(&mut nested)?,
        }

        let exists = self.exists(&resolved, nested);
        self.push(exists);
        Ok(())
    }

    fn where_group(&mut self, scope: &mut ScopeFn<'_>) -> Result<()> {
        let mut group = self.sibling();
        scope(&mut group)?;

        if !group.is_empty() {
            self.push(group.into_condition());
        }
        Ok(())
    }
}

/// serde_json::Value를 SeaQuery Expr로 변환
pub(crate) fn value_to_expr(value: &Value) -> SimpleExpr {
    match value {
        Value::Null => Expr::val(Option::<String>::None).into(),
        Value::Bool(b) => Expr::val(*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Expr::val(i).into()
            } else if let Some(f) = n.as_f64() {
                Expr::val(f).into()
            } else {
                Expr::val(n.to_string()).into()
            }
        }
        Value::String(s) => Expr::val(s.as_str()).into(),
        Value::Array(_) | Value::Object(_) => {
            // JSON 텍스트로 직렬화
            Expr::val(value.to_string()).into()
        }
    }
}
