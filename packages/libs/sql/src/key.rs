//! 검색 키 파서
//!
//! 검색 키는 최대 세 부분으로 구성됩니다.
//!
//! ```text
//! <columnPath>[%<clause>[%<arg>...]]
//! columnPath := column | relation(:relation)*.attribute
//! ```
//!
//! # 예시
//!
//! - `status`                          → status 일반 검색
//! - `age%moreOrEqual`                 → age >= 값
//! - `created_at%date%2023-01-01%2023-01-31`
//! - `author:profile.bio%like`         → author.profile 관계의 bio LIKE

use std::fmt;

/// 키 구분자
const CLAUSE_DELIMITER: char = '%';
const ATTRIBUTE_DELIMITER: char = '.';
const HOP_DELIMITER: char = ':';

/// 파싱된 검색 키
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey {
    /// 원본 키
    pub raw: String,
    /// 컬럼 경로
    pub path: ColumnPath,
    /// 연산자 (`%`가 없으면 None → 일반 검색)
    pub clause: Option<Clause>,
    /// 연산자 인자 (세 번째 `%` 구간부터)
    pub args: Vec<String>,
}

/// 컬럼 경로
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPath {
    /// 관계 체인 (비어 있으면 현재 테이블의 컬럼)
    pub relations: Vec<String>,
    /// 대상 컬럼
    pub attribute: String,
}

impl ColumnPath {
    /// 관계를 거치는 경로인지
    pub fn is_relation(&self) -> bool {
        !self.relations.is_empty()
    }

    /// ORM 표기법의 관계 체인 (`author.profile`)
    pub fn relation_chain(&self) -> String {
        self.relations.join(".")
    }
}

/// 연산자 태그
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Between,
    Date,
    In,
    Null,
    NotNull,
    MoreOrEqual,
    MoreThan,
    LessOrEqual,
    Like,
    /// `%`는 있지만 태그가 비어 있음 (`name%`)
    Blank,
    /// 알 수 없는 태그
    Unknown(String),
}

impl Clause {
    /// 태그 문자열에서 파싱 (대소문자 구분)
    pub fn parse(tag: &str) -> Self {
        match tag {
            "between" => Clause::Between,
            "date" => Clause::Date,
            "in" => Clause::In,
            "null" => Clause::Null,
            "notNull" => Clause::NotNull,
            "moreOrEqual" => Clause::MoreOrEqual,
            "moreThan" => Clause::MoreThan,
            "lessOrEqual" => Clause::LessOrEqual,
            "like" => Clause::Like,
            "" => Clause::Blank,
            other => Clause::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Clause::Between => "between",
            Clause::Date => "date",
            Clause::In => "in",
            Clause::Null => "null",
            Clause::NotNull => "notNull",
            Clause::MoreOrEqual => "moreOrEqual",
            Clause::MoreThan => "moreThan",
            Clause::LessOrEqual => "lessOrEqual",
            Clause::Like => "like",
            Clause::Blank => "",
            Clause::Unknown(tag) => tag,
        }
    }

    /// 범위 인자(from, to)를 사용하는 연산자인지
    pub fn takes_bounds(&self) -> bool {
        matches!(self, Clause::Between | Clause::Date)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 키 파싱 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("empty column name")]
    EmptyColumn,

    #[error("empty relation name in '{0}'")]
    EmptyRelation(String),

    #[error("empty attribute after relation '{0}'")]
    EmptyAttribute(String),
}

impl ParsedKey {
    /// 검색 키 파싱
    pub fn parse(raw: &str) -> Result<Self, KeyError> {
        let mut segments = raw.split(CLAUSE_DELIMITER);
        // split은 항상 첫 구간을 반환
        let column_path = segments.next().unwrap_or_default();

        let clause = if raw.contains(CLAUSE_DELIMITER) {
            Some(Clause::parse(segments.next().unwrap_or_default()))
        } else {
            None
        };
        let args = segments.map(str::to_string).collect();

        Ok(Self {
            raw: raw.to_string(),
            path: parse_column_path(column_path)?,
            clause,
            args,
        })
    }

    /// 범위 인자 (누락 시 빈 문자열)
    pub fn bounds(&self) -> (&str, &str) {
        (self.arg(0), self.arg(1))
    }

    /// 범위 인자가 모두 있는지
    pub fn has_bounds(&self) -> bool {
        self.args.len() >= 2
    }

    fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(String::as_str).unwrap_or_default()
    }
}

fn parse_column_path(path: &str) -> Result<ColumnPath, KeyError> {
    let Some((relations, attribute)) = path.rsplit_once(ATTRIBUTE_DELIMITER) else {
        if path.is_empty() {
            return Err(KeyError::EmptyColumn);
        }
        return Ok(ColumnPath {
            relations: Vec::new(),
            attribute: path.to_string(),
        });
    };

    if attribute.is_empty() {
        return Err(KeyError::EmptyAttribute(relations.to_string()));
    }

    let relations = relations
        .split([HOP_DELIMITER, ATTRIBUTE_DELIMITER])
        .map(|hop| {
            if hop.is_empty() {
                Err(KeyError::EmptyRelation(relations.to_string()))
            } else {
                Ok(hop.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ColumnPath {
        relations,
        attribute: attribute.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_column() {
        let key = ParsedKey::parse("status").unwrap();
        assert!(!key.path.is_relation());
        assert_eq!(key.path.attribute, "status");
        assert_eq!(key.clause, None);
        assert!(key.args.is_empty());
    }

    #[test]
    fn test_clause_and_bounds() {
        let key = ParsedKey::parse("created_at%date%2023-01-01%2023-01-31").unwrap();
        assert_eq!(key.path.attribute, "created_at");
        assert_eq!(key.clause, Some(Clause::Date));
        assert_eq!(key.bounds(), ("2023-01-01", "2023-01-31"));
        assert!(key.has_bounds());
    }

    #[test]
    fn test_missing_bounds_default_to_empty() {
        let key = ParsedKey::parse("price%between%10").unwrap();
        assert_eq!(key.bounds(), ("10", ""));
        assert!(!key.has_bounds());
    }

    #[test]
    fn test_relation_chain() {
        let key = ParsedKey::parse("author:profile.bio%like").unwrap();
        assert_eq!(key.path.relations, vec!["author", "profile"]);
        assert_eq!(key.path.relation_chain(), "author.profile");
        assert_eq!(key.path.attribute, "bio");
        assert_eq!(key.clause, Some(Clause::Like));
    }

    #[test]
    fn test_dotted_chain_splits_on_last_dot() {
        let key = ParsedKey::parse("author.profile.bio").unwrap();
        assert_eq!(key.path.relations, vec!["author", "profile"]);
        assert_eq!(key.path.attribute, "bio");
    }

    #[test]
    fn test_blank_and_unknown_clause() {
        assert_eq!(ParsedKey::parse("name%").unwrap().clause, Some(Clause::Blank));
        assert_eq!(
            ParsedKey::parse("x%bogus").unwrap().clause,
            Some(Clause::Unknown("bogus".to_string()))
        );
    }

    #[test]
    fn test_malformed_keys() {
        assert_eq!(ParsedKey::parse(""), Err(KeyError::EmptyColumn));
        assert_eq!(ParsedKey::parse("%in"), Err(KeyError::EmptyColumn));
        assert!(matches!(
            ParsedKey::parse("author."),
            Err(KeyError::EmptyAttribute(_))
        ));
        assert!(matches!(
            ParsedKey::parse("author::profile.bio"),
            Err(KeyError::EmptyRelation(_))
        ));
        assert!(matches!(
            ParsedKey::parse(".name"),
            Err(KeyError::EmptyRelation(_))
        ));
    }
}
