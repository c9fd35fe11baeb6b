use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Canonical schedule record, independent of the backend's response shape.
///
/// Instances are produced by the normalizer and never edited afterwards;
/// changes go through the backend followed by a full re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntity {
    pub id: String,
    pub class_id: i64,
    pub room_id: i64,
    pub class_name: String,
    pub class_code: String,
    pub room_code: String,
    pub building: String,
    pub capacity: u32,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    pub is_recurring: bool,
    pub is_active: bool,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub subject_name: Option<String>,
}

impl ScheduleEntity {
    /// Fields searched by free text, optional ones as empty strings.
    pub fn search_fields(&self) -> [&str; 6] {
        [
            self.class_name.as_str(),
            self.class_code.as_str(),
            self.room_code.as_str(),
            self.building.as_str(),
            self.teacher_name.as_deref().unwrap_or(""),
            self.subject_name.as_deref().unwrap_or(""),
        ]
    }
}

pub fn parse_weekday(day: &str) -> Option<Weekday> {
    day.trim().parse::<Weekday>().ok()
}

/// Position in the school week, Monday = 0 through Sunday = 6.
/// Unrecognized names rank after Sunday.
pub fn weekday_rank(day: &str) -> u32 {
    parse_weekday(day)
        .map(|w| w.num_days_from_monday())
        .unwrap_or(7)
}
