// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Hand-written extensions to the schedule listers

use std::sync::Arc;

use crate::apis::cr::v1::MySQLBackupSchedule;
use crate::errors::ListerError;

/// Extra queries on [`super::MySQLBackupScheduleLister`]
pub trait MySQLBackupScheduleListerExpansion {
    /// Schedules in any namespace that back up the MySQL cluster `cluster`
    fn list_for_cluster(&self, cluster: &str) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError>;
}

/// Extra queries on [`super::MySQLBackupScheduleNamespaceLister`]
pub trait MySQLBackupScheduleNamespaceListerExpansion {
    /// Schedules in this namespace that back up the MySQL cluster `cluster`
    fn list_for_cluster(&self, cluster: &str) -> Result<Vec<Arc<MySQLBackupSchedule>>, ListerError>;
}
