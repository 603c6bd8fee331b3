//! 검색 파라미터
//!
//! HTTP 요청 파라미터 등에서 디코딩된 검색 디스크립터와
//! 정렬/페이지 정보를 정의합니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 검색 디스크립터
///
/// 인코딩된 검색 키 → 값 맵입니다. 키 문법은 [`crate::key`] 참고.
///
/// # 예시
///
/// ```json
/// { "status": "active" }                          // posts.status = 'active'
/// { "status": ["active", "pending"] }             // posts.status IN (...)
/// { "age%moreOrEqual": 18 }                       // posts.age >= 18
/// { "author.name": "Alice" }                      // EXISTS (author ...)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchDescriptor(pub Map<String, Value>);

impl SearchDescriptor {
    /// 빈 디스크립터
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// 디스크립터가 비어있는지
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 조건 추가
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for SearchDescriptor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for SearchDescriptor {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value)
    }
}

/// 정렬 순서
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// 검색 요청 파라미터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// 검색 디스크립터
    #[serde(default)]
    pub filter: SearchDescriptor,

    /// 정렬 (컬럼, 순서) 목록
    #[serde(default)]
    pub order_by: Vec<(String, SortOrder)>,

    /// 제한
    #[serde(default)]
    pub limit: Option<u64>,

    /// 오프셋
    #[serde(default)]
    pub offset: Option<u64>,
}

/// 값이 "참"으로 취급되는지
///
/// `null`, `false`, `0`, `""`, `"0"`, 빈 배열/객체는 거짓입니다.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// LIKE 패턴 등에 쓰이는 값의 문자열 표현
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("a"), json!("false"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("engineer")), "engineer");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(null)), "");
    }

    #[test]
    fn test_params_deserialization() {
        let json = r#"{
            "filter": { "status": "active", "age%moreOrEqual": 18 },
            "order_by": [["created_at", "desc"]],
            "limit": 10
        }"#;

        let params: SearchParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.filter.len(), 2);
        assert_eq!(params.order_by, vec![("created_at".to_string(), SortOrder::Desc)]);
        assert_eq!(params.limit, Some(10));
        assert_eq!(params.offset, None);
    }

    #[test]
    fn test_descriptor_from_value() {
        let descriptor = SearchDescriptor::try_from(json!({ "status": "active" })).unwrap();
        assert_eq!(descriptor, SearchDescriptor::empty().with("status", json!("active")));

        assert!(SearchDescriptor::try_from(json!(["status"])).is_err());
    }
}
