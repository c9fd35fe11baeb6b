use std::cmp::Ordering;

use crate::models::{ScheduleEntity, SortBy, SortOrder, weekday_rank};

pub fn compare(a: &ScheduleEntity, b: &ScheduleEntity, sort_by: SortBy, order: SortOrder) -> Ordering {
    let ordering = match sort_by {
        SortBy::DayOfWeek => weekday_rank(&a.day_of_week).cmp(&weekday_rank(&b.day_of_week)),
        // HH:MM[:SS] is zero padded, so byte order is time order.
        SortBy::StartTime => a.start_time.cmp(&b.start_time),
        SortBy::ClassName => locale_cmp(&a.class_name, &b.class_name),
        SortBy::RoomCode => locale_cmp(&a.room_code, &b.room_code),
    };

    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Stable in-place sort. Equal keys keep their input order in both
/// directions.
pub fn sort_schedules(schedules: &mut [ScheduleEntity], sort_by: SortBy, order: SortOrder) {
    schedules.sort_by(|a, b| compare(a, b, sort_by, order));
}

/// Case-insensitive first; among case variants lowercase sorts first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(locale_cmp("math", "Math"), Ordering::Less);
        assert_eq!(locale_cmp("Room A", "Room A"), Ordering::Equal);
    }
}
