//! Filter syntax shared by the URL query string and the `/result` API.
//!
//! URL keys look like `field[op]` (a bare `field` means `eq`); the API
//! receives `field<symbol>value` strings, e.g. `run_id=123` or
//! `metadata.markers*accessibility`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    In,
    Exists,
    Regex,
}

impl FilterOp {
    pub const ALL: [FilterOp; 9] = [
        FilterOp::Eq,
        FilterOp::Ne,
        FilterOp::Gt,
        FilterOp::Lt,
        FilterOp::Gte,
        FilterOp::Lte,
        FilterOp::In,
        FilterOp::Exists,
        FilterOp::Regex,
    ];

    /// Name used inside the brackets of a URL key.
    pub fn name(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Lt => "lt",
            FilterOp::Gte => "gte",
            FilterOp::Lte => "lte",
            FilterOp::In => "in",
            FilterOp::Exists => "exists",
            FilterOp::Regex => "regex",
        }
    }

    /// Single-character symbol used by the API filter syntax.
    pub fn symbol(self) -> char {
        match self {
            FilterOp::Eq => '=',
            FilterOp::Ne => '!',
            FilterOp::Gt => '>',
            FilterOp::Lt => '<',
            FilterOp::Gte => ')',
            FilterOp::Lte => '(',
            FilterOp::In => '*',
            FilterOp::Exists => '@',
            FilterOp::Regex => '~',
        }
    }

    pub fn from_symbol(c: char) -> Option<FilterOp> {
        FilterOp::ALL.into_iter().find(|op| op.symbol() == c)
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterOp {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        FilterOp::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ViewError::InvalidFilter(s.to_string()))
    }
}

/// A field/operator/value constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Build a filter from a URL query pair such as `("run_id[eq]", "123")`.
    pub fn from_query_pair(key: &str, value: &str) -> Result<Self> {
        let (field, op) = parse_key(key)?;
        Ok(Self::new(field, op, value))
    }

    /// URL query key, e.g. `run_id[ne]`. `eq` filters use the bare field.
    pub fn query_key(&self) -> String {
        match self.op {
            FilterOp::Eq => self.field.clone(),
            op => format!("{}[{}]", self.field, op),
        }
    }

    /// API filter string, e.g. `run_id=123`.
    pub fn to_api(&self) -> String {
        format!("{}{}{}", self.field, self.op.symbol(), self.value)
    }

    /// Parse an API filter string. The field is everything before the
    /// first operator symbol.
    pub fn from_api(s: &str) -> Result<Self> {
        let (idx, op) = s
            .char_indices()
            .find_map(|(i, c)| FilterOp::from_symbol(c).map(|op| (i, op)))
            .ok_or_else(|| ViewError::InvalidFilter(s.to_string()))?;
        let field = &s[..idx];
        if field.is_empty() {
            return Err(ViewError::InvalidFilter(s.to_string()));
        }
        Ok(Self::new(field, op, &s[idx + op.symbol().len_utf8()..]))
    }
}

/// Split a URL key into field and operator: `field[op]` or bare `field`.
pub fn parse_key(key: &str) -> Result<(String, FilterOp)> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ViewError::InvalidFilter(key.to_string()));
    }
    match key.split_once('[') {
        Some((field, rest)) => {
            let op = rest
                .strip_suffix(']')
                .ok_or_else(|| ViewError::InvalidFilter(key.to_string()))?;
            if field.is_empty() {
                return Err(ViewError::InvalidFilter(key.to_string()));
            }
            Ok((field.to_string(), op.parse()?))
        }
        None => Ok((key.to_string(), FilterOp::Eq)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_with_operator() {
        assert_eq!(parse_key("run_id[ne]").unwrap(), ("run_id".to_string(), FilterOp::Ne));
        assert_eq!(parse_key("duration[gte]").unwrap(), ("duration".to_string(), FilterOp::Gte));
    }

    #[test]
    fn test_parse_key_bare_field_is_eq() {
        assert_eq!(parse_key("run_list").unwrap(), ("run_list".to_string(), FilterOp::Eq));
    }

    #[test]
    fn test_parse_key_rejects_garbage() {
        assert!(parse_key("run_id[bogus]").is_err());
        assert!(parse_key("run_id[eq").is_err());
        assert!(parse_key("[eq]").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn test_api_string_uses_symbols() {
        assert_eq!(Filter::new("run_id", FilterOp::Eq, "123").to_api(), "run_id=123");
        assert_eq!(
            Filter::new("metadata.markers", FilterOp::In, "accessibility").to_api(),
            "metadata.markers*accessibility"
        );
    }

    #[test]
    fn test_from_api_splits_on_first_symbol() {
        let f = Filter::from_api("metadata.title~a=b").unwrap();
        assert_eq!(f.field, "metadata.title");
        assert_eq!(f.op, FilterOp::Regex);
        assert_eq!(f.value, "a=b");
        assert!(Filter::from_api("no_operator").is_err());
        assert!(Filter::from_api("=value").is_err());
    }

    #[test]
    fn test_query_key_omits_eq() {
        assert_eq!(Filter::new("env", FilterOp::Eq, "ci").query_key(), "env");
        assert_eq!(Filter::new("env", FilterOp::Ne, "ci").query_key(), "env[ne]");
    }
}
