// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Cached, read-only listers for `MySQLBackupSchedule` custom resources
//!
//! An informer watches the API server and keeps a local indexed cache; listers
//! answer `list`/`get` queries from that cache by namespace and label selector.

pub mod apis;
pub mod cache;
pub mod config;
pub mod errors;
pub mod informers;
pub mod labels;
pub mod listers;

pub use errors::{CacheError, GroupResource, ListerError};
pub use informers::MySQLBackupScheduleInformer;
pub use labels::Selector;
pub use listers::{
    MySQLBackupScheduleLister, MySQLBackupScheduleNamespaceLister, NamespacedScheduleLister,
    ScheduleLister,
};
