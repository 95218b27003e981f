// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod expansion;
mod mysqlbackupschedule;

pub use expansion::{
    MySQLBackupScheduleListerExpansion, MySQLBackupScheduleNamespaceListerExpansion,
};
pub use mysqlbackupschedule::{
    MySQLBackupScheduleLister, MySQLBackupScheduleNamespaceLister, NamespacedScheduleLister,
    ScheduleLister,
};
