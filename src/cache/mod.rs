// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Local indexed cache of Kubernetes objects
//!
//! Objects are keyed by `<namespace>/<name>` (or `<name>` for cluster-scoped
//! objects). The kube-runtime reflector keeps a [`Store`] in step with the API
//! server; listers only ever see it through [`Indexer`].

mod store;

pub use kube::runtime::reflector::Store;
#[cfg(test)]
pub(crate) use store::store_with;

use std::collections::BTreeMap;
use std::sync::Arc;

use kube::Resource;

use crate::errors::CacheError;
use crate::labels::Selector;

/// Namespace value meaning "every namespace"
pub const NAMESPACE_ALL: &str = "";

static NO_LABELS: BTreeMap<String, String> = BTreeMap::new();

/// Read side of the cache
pub trait Indexer<K>: Send + Sync {
    /// Look up a single object; `Ok(None)` when the key is absent
    fn get_by_key(&self, key: &str) -> Result<Option<Arc<K>>, CacheError>;

    /// Every cached object
    fn list(&self) -> Result<Vec<Arc<K>>, CacheError>;

    /// Objects in one namespace
    fn by_namespace(&self, namespace: &str) -> Result<Vec<Arc<K>>, CacheError>;
}

/// Compute the cache key of an object
pub fn meta_namespace_key<K: Resource>(obj: &K) -> Result<String, CacheError> {
    let meta = obj.meta();
    let name = meta
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(CacheError::MissingName)?;
    Ok(match meta.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => format!("{}/{}", ns, name),
        _ => name.to_string(),
    })
}

/// Split a cache key into namespace and name
pub fn split_meta_namespace_key(key: &str) -> Result<(Option<&str>, &str), CacheError> {
    let mut parts = key.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, None) => Ok((None, name)),
        (Some(ns), Some(name), None) => Ok((Some(ns), name)),
        _ => Err(CacheError::InvalidKey(key.to_string())),
    }
}

fn labels_of<K: Resource>(obj: &K) -> &BTreeMap<String, String> {
    obj.meta().labels.as_ref().unwrap_or(&NO_LABELS)
}

/// Call `append` for every cached object whose labels satisfy `selector`
pub fn list_all<K, I, F>(indexer: &I, selector: &Selector, mut append: F) -> Result<(), CacheError>
where
    K: Resource,
    I: Indexer<K> + ?Sized,
    F: FnMut(Arc<K>),
{
    for obj in indexer.list()? {
        if selector.is_empty() || selector.matches(labels_of(obj.as_ref())) {
            append(obj);
        }
    }
    Ok(())
}

/// Like [`list_all`], restricted to one namespace ([`NAMESPACE_ALL`] scans everything)
pub fn list_all_by_namespace<K, I, F>(
    indexer: &I,
    namespace: &str,
    selector: &Selector,
    mut append: F,
) -> Result<(), CacheError>
where
    K: Resource,
    I: Indexer<K> + ?Sized,
    F: FnMut(Arc<K>),
{
    if namespace == NAMESPACE_ALL {
        return list_all(indexer, selector, append);
    }
    for obj in indexer.by_namespace(namespace)? {
        if selector.is_empty() || selector.matches(labels_of(obj.as_ref())) {
            append(obj);
        }
    }
    Ok(())
}
