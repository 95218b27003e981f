// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Watch-backed cache of `MySQLBackupSchedule`s with a lister on top

use std::sync::Arc;

use futures::StreamExt;
use kube::runtime::reflector::{self, store::Writer};
use kube::runtime::{WatchStreamExt, watcher};
use kube::{Api, Client};
use tracing::{debug, info, warn};

use crate::apis::cr::v1::MySQLBackupSchedule;
use crate::cache::Store;
use crate::listers::ScheduleLister;

/// Shared informer for `MySQLBackupSchedule`s
///
/// Hand out listers and the store first, then spawn [`run`](Self::run).
/// The store becomes ready once the first list has been applied.
pub struct MySQLBackupScheduleInformer {
    api: Api<MySQLBackupSchedule>,
    config: watcher::Config,
    store: Store<MySQLBackupSchedule>,
    writer: Writer<MySQLBackupSchedule>,
}

impl MySQLBackupScheduleInformer {
    pub fn new(api: Api<MySQLBackupSchedule>, config: watcher::Config) -> Self {
        let (store, writer) = reflector::store();
        Self {
            api,
            config,
            store,
            writer,
        }
    }

    /// Informer watching every namespace
    pub fn all_namespaces(client: Client, config: watcher::Config) -> Self {
        Self::new(Api::all(client), config)
    }

    /// Informer watching a single namespace
    pub fn namespaced(client: Client, namespace: &str, config: watcher::Config) -> Self {
        Self::new(Api::namespaced(client, namespace), config)
    }

    pub fn lister(&self) -> ScheduleLister {
        ScheduleLister::new(Arc::new(self.store.clone()))
    }

    /// Read handle on the cache, e.g. for `wait_until_ready`
    pub fn store(&self) -> Store<MySQLBackupSchedule> {
        self.store.clone()
    }

    /// Drive the watch until the stream ends
    ///
    /// Watch errors are retried with backoff; a re-list only becomes visible
    /// once it has completed.
    pub async fn run(self) {
        info!(
            label_selector = ?self.config.label_selector,
            "Starting MySQLBackupSchedule informer"
        );
        let stream = reflector::reflector(
            self.writer,
            watcher(self.api, self.config).default_backoff(),
        );
        futures::pin_mut!(stream);

        while let Some(event) = stream.next().await {
            match event {
                Ok(watcher::Event::InitDone) => debug!("MySQLBackupSchedule list applied"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "MySQLBackupSchedule watch failed, retrying"),
            }
        }
        debug!("MySQLBackupSchedule informer stopped");
    }
}
