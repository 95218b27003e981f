use super::ScheduleView;

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format(view: &ScheduleView<'_>) -> String {
        match view {
            ScheduleView::One(schedule) => serde_json::to_string_pretty(schedule),
            ScheduleView::Many(schedules) => serde_json::to_string_pretty(schedules),
        }
        .unwrap_or_else(|_| "[]".to_string())
    }
}
