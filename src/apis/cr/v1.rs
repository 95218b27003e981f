// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! `cr.mysqloperator.grtl.github.com/v1` custom resources

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::GroupResource;

/// API group of the MySQL operator custom resources
pub const GROUP_NAME: &str = "cr.mysqloperator.grtl.github.com";

/// Recurring backup of a MySQL cluster
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cr.mysqloperator.grtl.github.com",
    version = "v1",
    kind = "MySQLBackupSchedule",
    plural = "mysqlbackupschedules",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct MySQLBackupScheduleSpec {
    /// Name of the MySQL cluster to back up (same namespace)
    pub cluster: String,
    /// Cron expression, e.g. "0 3 * * *"
    pub time: String,
}

/// Qualify a resource name with this API group
pub fn resource(resource: &str) -> GroupResource {
    GroupResource::new(GROUP_NAME, resource)
}
