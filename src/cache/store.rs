// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! [`Indexer`] over kube-runtime's reflector store
//!
//! The reflector's `Writer` owns all mutation (including the buffered
//! `Init`/`InitApply`/`InitDone` re-list swap); this side only reads.

use std::sync::Arc;

use kube::Resource;
use kube::runtime::reflector::{ObjectRef, Store};

use super::{Indexer, split_meta_namespace_key};
use crate::errors::CacheError;

impl<K> Indexer<K> for Store<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    fn get_by_key(&self, key: &str) -> Result<Option<Arc<K>>, CacheError> {
        let obj_ref = match split_meta_namespace_key(key)? {
            (Some(ns), name) => ObjectRef::new(name).within(ns),
            (None, name) => ObjectRef::new(name),
        };
        Ok(self.get(&obj_ref))
    }

    fn list(&self) -> Result<Vec<Arc<K>>, CacheError> {
        Ok(self.state())
    }

    fn by_namespace(&self, namespace: &str) -> Result<Vec<Arc<K>>, CacheError> {
        Ok(self
            .state()
            .into_iter()
            .filter(|obj| obj.meta().namespace.as_deref().unwrap_or_default() == namespace)
            .collect())
    }
}

/// Build a ready store holding `objs`, fed through a reflector writer
#[cfg(test)]
pub(crate) fn store_with<K>(objs: Vec<K>) -> Store<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    use kube::runtime::reflector::store::Writer;
    use kube::runtime::watcher::Event;

    let mut writer = Writer::default();
    writer.apply_watcher_event(&Event::Init);
    for obj in objs {
        writer.apply_watcher_event(&Event::InitApply(obj));
    }
    writer.apply_watcher_event(&Event::InitDone);
    writer.as_reader()
}
