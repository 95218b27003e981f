// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Kubernetes label selectors
//!
//! A selector is a conjunction of requirements evaluated against an object's
//! labels. The string form is the one accepted by `kubectl -l` and by the API
//! server's `labelSelector` parameter:
//!
//! - `app=mysql`, `app==mysql`, `tier!=cache`
//! - `env in (prod, staging)`, `env notin (dev)`
//! - `backup` (key exists), `!paused` (key does not exist)
//!
//! As on the API server, `!=` and `notin` also match objects that lack the key.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum length of a label name or value
const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a label key prefix (DNS subdomain)
const MAX_PREFIX_LEN: usize = 253;

/// Represents a label selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` or `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `in (..)`
    In,
    /// `notin (..)`
    NotIn,
    /// Bare key
    Exists,
    /// `!key`
    DoesNotExist,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorParseError {
    #[error("empty requirement in selector")]
    EmptyRequirement,

    #[error("invalid label key {0:?}")]
    InvalidKey(String),

    #[error("invalid label value {0:?}")]
    InvalidValue(String),

    #[error("unknown operator in requirement {0:?}")]
    UnknownOperator(String),

    #[error("expected a non-empty value set like \"(a, b)\" in requirement {0:?}")]
    InvalidValueSet(String),
}

/// A single `key <op> values` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(key, Operator::Equals, value)
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(key, Operator::NotEquals, value)
    }

    pub fn in_set<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::set(key, Operator::In, values)
    }

    pub fn not_in_set<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::set(key, Operator::NotIn, values)
    }

    pub fn exists(key: impl Into<String>) -> Self {
        Self::set(key, Operator::Exists, std::iter::empty::<String>())
    }

    pub fn does_not_exist(key: impl Into<String>) -> Self {
        Self::set(key, Operator::DoesNotExist, std::iter::empty::<String>())
    }

    fn single(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::set(key, operator, [value.into()])
    }

    fn set<I, V>(key: impl Into<String>, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            operator,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Equals | Operator::In => value.is_some_and(|v| self.values.contains(v)),
            Operator::NotEquals | Operator::NotIn => {
                value.is_none_or(|v| !self.values.contains(v))
            }
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
        }
    }

    /// Parse one comma-free clause (commas inside value sets are allowed)
    fn parse(clause: &str) -> Result<Self, SelectorParseError> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err(SelectorParseError::EmptyRequirement);
        }

        if let Some(key) = clause.strip_prefix('!') {
            let key = key.trim();
            validate_key(key)?;
            return Ok(Self::does_not_exist(key));
        }

        let key_end = clause
            .find(|c: char| c == '=' || c == '!' || c.is_whitespace() || c == '(')
            .unwrap_or(clause.len());
        let key = &clause[..key_end];
        validate_key(key)?;
        let rest = clause[key_end..].trim_start();

        if rest.is_empty() {
            return Ok(Self::exists(key));
        }

        if let Some(value) = rest
            .strip_prefix("==")
            .or_else(|| rest.strip_prefix('='))
        {
            let value = value.trim();
            validate_value(value)?;
            return Ok(Self::equals(key, value));
        }

        if let Some(value) = rest.strip_prefix("!=") {
            let value = value.trim();
            validate_value(value)?;
            return Ok(Self::not_equals(key, value));
        }

        if let Some(set) = strip_keyword(rest, "notin") {
            return Ok(Self::not_in_set(key, parse_value_set(clause, set)?));
        }

        if let Some(set) = strip_keyword(rest, "in") {
            return Ok(Self::in_set(key, parse_value_set(clause, set)?));
        }

        Err(SelectorParseError::UnknownOperator(clause.to_string()))
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = || self.values.iter().cloned().collect::<Vec<_>>().join(",");
        match self.operator {
            Operator::Equals => write!(f, "{}={}", self.key, joined()),
            Operator::NotEquals => write!(f, "{}!={}", self.key, joined()),
            Operator::In => write!(f, "{} in ({})", self.key, joined()),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, joined()),
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
        }
    }
}

/// Strip a set-operator keyword that must be followed by whitespace or `(`
fn strip_keyword<'a>(rest: &'a str, keyword: &str) -> Option<&'a str> {
    let after = rest.strip_prefix(keyword)?;
    match after.chars().next() {
        Some(c) if c.is_whitespace() || c == '(' => Some(after),
        _ => None,
    }
}

fn parse_value_set(clause: &str, set: &str) -> Result<Vec<String>, SelectorParseError> {
    let inner = set
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SelectorParseError::InvalidValueSet(clause.to_string()))?;

    let values: Vec<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    if values.is_empty() {
        return Err(SelectorParseError::InvalidValueSet(clause.to_string()));
    }
    for value in &values {
        validate_value(value)?;
    }
    Ok(values)
}

/// Name segment: alphanumeric at both ends, `-`, `_`, `.` inside
fn is_qualified_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_LABEL_LEN
        && bytes[0].is_ascii_alphanumeric()
        && bytes[bytes.len() - 1].is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

fn is_dns_subdomain(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.len() <= MAX_PREFIX_LEN
        && prefix.split('.').all(|part| {
            let bytes = part.as_bytes();
            !bytes.is_empty()
                && bytes[0].is_ascii_alphanumeric()
                && bytes[bytes.len() - 1].is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        })
}

fn validate_key(key: &str) -> Result<(), SelectorParseError> {
    let valid = match key.split_once('/') {
        Some((prefix, name)) => is_dns_subdomain(prefix) && is_qualified_name(name),
        None => is_qualified_name(key),
    };
    if valid {
        Ok(())
    } else {
        Err(SelectorParseError::InvalidKey(key.to_string()))
    }
}

fn validate_value(value: &str) -> Result<(), SelectorParseError> {
    if value.is_empty() || is_qualified_name(value) {
        Ok(())
    } else {
        Err(SelectorParseError::InvalidValue(value.to_string()))
    }
}

/// Split on commas that are not inside a `( .. )` value set
fn split_requirements(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// A conjunction of label requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// Selector that matches every label set
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, SelectorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::everything());
        }
        let requirements = split_requirements(input)
            .into_iter()
            .map(Requirement::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { requirements })
    }

    /// Add a requirement
    pub fn with(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, requirement) in self.requirements.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", requirement)?;
        }
        Ok(())
    }
}
