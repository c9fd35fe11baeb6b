use crate::models::{SchedulePage, ScheduleEntity};

/// Slices `ordered` to the requested 1-based page. Pages past the end are
/// empty; `total` always counts the whole input.
pub fn paginate(ordered: Vec<ScheduleEntity>, page: u32, page_size: u32) -> SchedulePage {
    let total = ordered.len();
    let size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(size);

    let items = ordered.into_iter().skip(start).take(size).collect();

    SchedulePage { items, total }
}
