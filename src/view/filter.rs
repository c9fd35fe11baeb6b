use crate::models::{FilterSpec, ScheduleEntity};

/// Entities satisfying every filter set in `spec`, in input order.
pub fn filter(entities: &[ScheduleEntity], spec: &FilterSpec) -> Vec<ScheduleEntity> {
    let needle = spec
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    entities
        .iter()
        .filter(|e| matches_with(e, spec, needle.as_deref()))
        .cloned()
        .collect()
}

pub fn matches(entity: &ScheduleEntity, spec: &FilterSpec) -> bool {
    let needle = spec
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    matches_with(entity, spec, needle.as_deref())
}

fn matches_with(entity: &ScheduleEntity, spec: &FilterSpec, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        let hit = entity
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle));
        if !hit {
            return false;
        }
    }

    if spec.room_id.is_some_and(|id| entity.room_id != id) {
        return false;
    }

    if spec.class_id.is_some_and(|id| entity.class_id != id) {
        return false;
    }

    if let Some(day) = spec.day_of_week.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        if !entity.day_of_week.eq_ignore_ascii_case(day) {
            return false;
        }
    }

    true
}
