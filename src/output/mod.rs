mod json;
mod table;
mod yaml;

pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

use std::sync::Arc;

use mysqlbackup_lister::apis::cr::v1::MySQLBackupSchedule;

use crate::cli::OutputFormat;

/// Schedules to print: a single `get` result or a `list` result
#[derive(Debug)]
pub enum ScheduleView<'a> {
    One(&'a MySQLBackupSchedule),
    Many(Vec<&'a MySQLBackupSchedule>),
}

impl<'a> ScheduleView<'a> {
    pub fn one(schedule: &'a MySQLBackupSchedule) -> Self {
        Self::One(schedule)
    }

    /// List view, sorted by namespace then name
    pub fn many(schedules: &'a [Arc<MySQLBackupSchedule>]) -> Self {
        let mut items: Vec<&MySQLBackupSchedule> = schedules.iter().map(Arc::as_ref).collect();
        items.sort_by(|a, b| {
            (&a.metadata.namespace, &a.metadata.name).cmp(&(&b.metadata.namespace, &b.metadata.name))
        });
        Self::Many(items)
    }

    pub fn items(&self) -> &[&'a MySQLBackupSchedule] {
        match self {
            Self::One(schedule) => std::slice::from_ref(schedule),
            Self::Many(schedules) => schedules,
        }
    }

    pub fn format(&self, format: &OutputFormat, no_headers: bool) -> String {
        match format {
            OutputFormat::Table => TableFormatter::format(self, no_headers),
            OutputFormat::Json => JsonFormatter::format(self),
            OutputFormat::Yaml => YamlFormatter::format(self),
        }
    }
}
