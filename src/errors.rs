// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the cache and the listers
//!
//! Callers only need to tell two situations apart: the object is absent
//! (`ListerError::NotFound`) or the cache itself failed (`ListerError::Cache`).

use std::fmt;

use thiserror::Error;

/// A resource name qualified by its API group (e.g. `mysqlbackupschedule.cr.mysqloperator.grtl.github.com`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Failures of the local indexed cache
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("object has no metadata.name and cannot be keyed")]
    MissingName,

    #[error("unexpected key format: {0:?}")]
    InvalidKey(String),
}

/// Errors returned by listers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListerError {
    #[error("{resource} {name:?} not found")]
    NotFound { resource: GroupResource, name: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ListerError {
    pub fn not_found(resource: GroupResource, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            name: name.into(),
        }
    }

    /// True when the error signals absence rather than a cache failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
