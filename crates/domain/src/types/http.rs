//! HTTP vocabulary used by the request pipeline

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Header name to value mapping.
///
/// Built fresh for every request; never shared between requests.
pub type HttpHeaders = BTreeMap<String, String>;

/// Case-insensitive access to [`HttpHeaders`].
///
/// Header names compare case-insensitively on the wire, so setting a header
/// replaces every entry whose name differs only by case.
pub trait HeadersExt {
    fn get_header(&self, name: &str) -> Option<&str>;
    fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>);
    fn remove_header(&mut self, name: &str);
}

impl HeadersExt for HttpHeaders {
    fn get_header(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| self.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v))
            .map(String::as_str)
    }

    fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove_header(&name);
        self.insert(name, value.into());
    }

    fn remove_header(&mut self, name: &str) {
        self.retain(|k, _| !k.eq_ignore_ascii_case(name));
    }
}

/// Query parameter name to value mapping.
pub type HttpParams = BTreeMap<String, ParamValue>;

/// HTTP methods supported by the endpoint client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// A single query parameter value.
///
/// A list expands into one `name=value` pair per element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Number(i64),
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// Flatten params into ordered `(name, value)` pairs for the query string.
pub fn query_pairs(params: &HttpParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (name, value) in params {
        match value {
            ParamValue::Single(v) => pairs.push((name.clone(), v.clone())),
            ParamValue::Number(n) => pairs.push((name.clone(), n.to_string())),
            ParamValue::List(values) => {
                pairs.extend(values.iter().map(|v| (name.clone(), v.clone())));
            }
        }
    }
    pairs
}
