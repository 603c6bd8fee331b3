//! SELECT 쿼리 빌더
//!
//! Schema IR의 테이블과 검색 파라미터를 받아 SELECT 문을 생성합니다.

use sea_query::{Asterisk, Order, PostgresQueryBuilder, Query, SelectStatement};

use sift_core::schema::{SchemaIr, Table};

use crate::builder::{ConditionBuilder, DynIden};
use crate::compiler::QueryCompiler;
use crate::error::Result;
use crate::params::{SearchDescriptor, SearchParams, SortOrder};

/// SELECT 쿼리
#[derive(Debug, Clone)]
pub struct SelectQuery<'s> {
    schema: &'s SchemaIr,
    table: &'s Table,
    statement: SelectStatement,
    compiler: QueryCompiler,
}

impl<'s> SelectQuery<'s> {
    /// `SELECT "table".* FROM "table"` 로 시작
    pub fn new(schema: &'s SchemaIr, table: &str) -> Result<Self> {
        let table = schema.require_table(table)?;
        let table_iden = DynIden(table.name.clone());

        let mut statement = Query::select();
        statement
            .column((table_iden.clone(), Asterisk))
            .from(table_iden);

        Ok(Self {
            schema,
            table,
            statement,
            compiler: QueryCompiler::default(),
        })
    }

    /// 컴파일러 교체 (설정/진단 수신자)
    pub fn with_compiler(mut self, compiler: QueryCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn table(&self) -> &Table {
        self.table
    }

    /// 검색 디스크립터 조건 추가
    ///
    /// 여러 번 호출하면 각 디스크립터 그룹이 AND로 결합됩니다.
    pub fn search(&mut self, descriptor: &SearchDescriptor) -> Result<&mut Self> {
        let mut conditions = ConditionBuilder::new(self.schema, &self.table.name)?;
        self.compiler.compile(&mut conditions, descriptor)?;

        if !conditions.is_empty() {
            self.statement.cond_where(conditions.into_condition());
        }
        Ok(self)
    }

    /// 정렬 추가
    pub fn order_by(&mut self, column: &str, order: SortOrder) -> &mut Self {
        let order = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        self.statement.order_by(
            (DynIden(self.table.name.clone()), DynIden(column.to_string())),
            order,
        );
        self
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.statement.limit(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.statement.offset(offset);
        self
    }

    /// 검색 파라미터 전체 적용
    pub fn apply(&mut self, params: &SearchParams) -> Result<&mut Self> {
        self.search(&params.filter)?;

        for (column, order) in &params.order_by {
            self.order_by(column, *order);
        }
        if let Some(limit) = params.limit {
            self.limit(limit);
        }
        if let Some(offset) = params.offset {
            self.offset(offset);
        }
        Ok(self)
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    /// SQL 생성 (Postgres)
    pub fn to_sql(&self) -> String {
        self.statement.to_string(PostgresQueryBuilder)
    }
}
