use std::borrow::Cow;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};
use mysqlbackup_lister::apis::cr::v1::MySQLBackupSchedule;

use super::ScheduleView;

/// Maximum width for the labels column
const MAX_LABELS_WIDTH: usize = 60;

const COLUMNS: &[&str] = &["namespace", "name", "cluster", "time", "labels"];

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

/// `k=v,k2=v2` like kubectl's --show-labels
fn format_labels(schedule: &MySQLBackupSchedule) -> String {
    schedule
        .metadata
        .labels
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

fn row(schedule: &MySQLBackupSchedule) -> Vec<String> {
    let labels = format_labels(schedule);
    vec![
        schedule.metadata.namespace.clone().unwrap_or_default(),
        schedule.metadata.name.clone().unwrap_or_default(),
        schedule.spec.cluster.clone(),
        schedule.spec.time.clone(),
        truncate_value(&labels, MAX_LABELS_WIDTH).into_owned(),
    ]
}

pub struct TableFormatter;

impl TableFormatter {
    pub fn format(view: &ScheduleView<'_>, no_headers: bool) -> String {
        let items = view.items();
        if items.is_empty() {
            return "(0 rows)".to_string();
        }

        let mut table = Table::new();
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

        if !no_headers {
            table.set_header(COLUMNS);
        }

        for schedule in items {
            table.add_row(row(schedule));
        }

        format!("{}\n({} rows)", table, items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::super::tests::schedule;

    #[test]
    fn test_truncate_value_short() {
        let result = truncate_value("hello", 10);
        assert_eq!(result, "hello");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_value_too_long() {
        let long = "this is a very long string that needs truncation";
        let result = truncate_value(long, 20);
        assert!(result.ends_with("..."));
        assert!(result.chars().count() <= 20);
        assert!(matches!(result, Cow::Owned(_)));
    }

    #[test]
    fn test_truncate_value_unicode() {
        let unicode = "日本語テストです長い文字列";
        let result = truncate_value(unicode, 8);
        assert!(result.chars().count() <= 8);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_format_labels() {
        let mut daily = schedule("default", "daily");
        assert_eq!(format_labels(&daily), "");

        daily.metadata.labels = Some(BTreeMap::from([
            ("tier".to_string(), "gold".to_string()),
            ("app".to_string(), "mysql".to_string()),
        ]));
        assert_eq!(format_labels(&daily), "app=mysql,tier=gold");
    }

    #[test]
    fn test_empty_table() {
        let schedules: Vec<Arc<MySQLBackupSchedule>> = Vec::new();
        let output = TableFormatter::format(&ScheduleView::many(&schedules), false);
        assert_eq!(output, "(0 rows)");
    }

    #[test]
    fn test_table_rows_and_headers() {
        let schedules = vec![
            Arc::new(schedule("default", "daily")),
            Arc::new(schedule("ops", "weekly")),
        ];
        let output = TableFormatter::format(&ScheduleView::many(&schedules), false);
        assert!(output.contains("namespace"));
        assert!(output.contains("daily"));
        assert!(output.contains("weekly"));
        assert!(output.contains("0 3 * * *"));
        assert!(output.ends_with("(2 rows)"));

        let headless = TableFormatter::format(&ScheduleView::many(&schedules), true);
        assert!(!headless.contains("namespace"));
    }

    #[test]
    fn test_long_labels_truncated() {
        let mut daily = schedule("default", "daily");
        daily.metadata.labels = Some(BTreeMap::from([("note".to_string(), "a".repeat(80))]));
        let output = TableFormatter::format(&ScheduleView::one(&daily), false);
        assert!(!output.contains(&"a".repeat(80)));
        assert!(output.contains("..."));
    }
}
