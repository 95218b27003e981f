use super::ScheduleView;

pub struct YamlFormatter;

impl YamlFormatter {
    pub fn format(view: &ScheduleView<'_>) -> String {
        match view {
            ScheduleView::One(schedule) => serde_yaml::to_string(schedule),
            ScheduleView::Many(schedules) => serde_yaml::to_string(schedules),
        }
        .unwrap_or_else(|_| "[]".to_string())
    }
}
