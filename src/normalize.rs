//! Schedule record normalization.
//!
//! Turns whatever the backend sent for one schedule into a flat
//! [`ScheduleEntity`]. Missing relations become empty strings and a
//! broken time range falls back to [`FALLBACK_DURATION_MINUTES`], so the
//! lenient path never fails. [`normalize_strict`] reports the time range
//! instead of defaulting it.

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;
use tracing::warn;

use crate::api::dto::{Loose, RawSchedule};
use crate::error::AppError;
use crate::models::ScheduleEntity;
use crate::models::schedule::parse_weekday;

pub const FALLBACK_DURATION_MINUTES: u32 = 90;

pub fn normalize(raw: RawSchedule) -> ScheduleEntity {
    let duration = duration_minutes(
        raw.start_time.as_deref().unwrap_or(""),
        raw.end_time.as_deref().unwrap_or(""),
    )
    .unwrap_or(FALLBACK_DURATION_MINUTES);
    build(raw, duration)
}

pub fn normalize_strict(raw: RawSchedule) -> Result<ScheduleEntity, AppError> {
    let start = raw.start_time.clone().unwrap_or_default();
    let end = raw.end_time.clone().unwrap_or_default();
    let duration = duration_minutes(&start, &end).ok_or(AppError::Duration { start, end })?;
    Ok(build(raw, duration))
}

/// Decodes and normalizes a batch of backend records. Values that are not
/// schedule objects, and in strict mode records with a bad time range, are
/// skipped.
pub fn normalize_batch(records: Vec<Value>, strict: bool) -> Vec<ScheduleEntity> {
    let mut schedules = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let raw = match serde_json::from_value::<RawSchedule>(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping schedule record #{}: {}", index, e);
                continue;
            }
        };

        if strict {
            match normalize_strict(raw) {
                Ok(schedule) => schedules.push(schedule),
                Err(e) => warn!("Skipping schedule record #{}: {}", index, e),
            }
        } else {
            schedules.push(normalize(raw));
        }
    }

    schedules
}

/// Single-record variant used by the by-id fetch.
pub fn normalize_value(record: Value, strict: bool) -> Result<ScheduleEntity, AppError> {
    let raw = serde_json::from_value::<RawSchedule>(record)
        .map_err(|e| AppError::Decode(format!("Failed to parse schedule: {}", e)))?;
    if strict {
        normalize_strict(raw)
    } else {
        Ok(normalize(raw))
    }
}

/// Minutes between two wall-clock times on the same day, rounded to the
/// nearest minute. `None` when either side does not parse or `end <= start`.
pub fn duration_minutes(start: &str, end: &str) -> Option<u32> {
    let day = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let start = day.and_time(parse_time(start)?);
    let end = day.and_time(parse_time(end)?);

    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return None;
    }
    u32::try_from((seconds + 30) / 60).ok()
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn build(raw: RawSchedule, duration_minutes: u32) -> ScheduleEntity {
    let RawSchedule {
        id,
        class_id,
        room_id,
        class,
        room,
        teacher,
        subject,
        class_name,
        class_code,
        room_code,
        building,
        capacity,
        day_of_week,
        start_time,
        end_time,
        is_recurring,
        is_active,
    } = raw;

    let class = class.unwrap_or_default();
    let room = room.unwrap_or_default();

    let class_id = class_id
        .as_ref()
        .or(class.id.as_ref())
        .and_then(Loose::as_i64)
        .unwrap_or(0);
    let room_id = room_id
        .as_ref()
        .or(room.id.as_ref())
        .and_then(Loose::as_i64)
        .unwrap_or(0);
    let capacity = room
        .capacity
        .as_ref()
        .or(capacity.as_ref())
        .and_then(Loose::as_i64)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(0);

    let teacher = teacher.or(class.teacher);
    let teacher_name = teacher.as_ref().and_then(|t| non_empty(t.name.clone()));
    let teacher_email = teacher.and_then(|t| non_empty(t.email));
    let subject_name = subject
        .or(class.subject)
        .and_then(|s| non_empty(s.name));

    let day_of_week = day_of_week.unwrap_or_default().trim().to_string();
    if parse_weekday(&day_of_week).is_none() {
        warn!("Schedule {:?} has unrecognized day of week {:?}", id, day_of_week);
    }

    ScheduleEntity {
        id: id.map(Loose::into_id).unwrap_or_default(),
        class_id,
        room_id,
        class_name: class.name.or(class_name).unwrap_or_default(),
        class_code: class.code.or(class_code).unwrap_or_default(),
        room_code: room.code.or(room_code).unwrap_or_default(),
        building: room.building.or(building).unwrap_or_default(),
        capacity,
        day_of_week,
        start_time: start_time.unwrap_or_default(),
        end_time: end_time.unwrap_or_default(),
        duration_minutes,
        is_recurring: is_recurring.as_ref().and_then(Loose::as_bool).unwrap_or(false),
        is_active: is_active.as_ref().and_then(Loose::as_bool).unwrap_or(true),
        teacher_name,
        teacher_email,
        subject_name,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_from_wall_clock() {
        assert_eq!(duration_minutes("09:00", "10:30"), Some(90));
        assert_eq!(duration_minutes("09:00:00", "09:45:00"), Some(45));
        assert_eq!(duration_minutes("09:00:00", "09:00:30"), Some(1));
        assert_eq!(duration_minutes("09:00:00", "09:00:29"), Some(0));
    }

    #[test]
    fn duration_rejects_inverted_and_malformed() {
        assert_eq!(duration_minutes("10:00", "09:00"), None);
        assert_eq!(duration_minutes("10:00", "10:00"), None);
        assert_eq!(duration_minutes("ten", "11:00"), None);
    }

    #[test]
    fn missing_relations_become_empty() {
        let raw: RawSchedule = serde_json::from_value(json!({
            "id": 12,
            "classId": "3",
            "roomId": 4,
            "dayOfWeek": "tuesday",
            "startTime": "08:00",
            "endTime": "07:00"
        }))
        .unwrap();
        let schedule = normalize(raw);

        assert_eq!(schedule.id, "12");
        assert_eq!(schedule.class_id, 3);
        assert_eq!(schedule.class_name, "");
        assert_eq!(schedule.building, "");
        assert_eq!(schedule.day_of_week, "tuesday");
        assert_eq!(schedule.duration_minutes, FALLBACK_DURATION_MINUTES);
        assert!(schedule.is_active);
    }
}
