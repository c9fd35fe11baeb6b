//! Client-side derivation of the schedule list: filter, sort, paginate.

pub mod compare;
pub mod engine;
pub mod filter;
pub mod pager;

pub use compare::{compare, sort_schedules};
pub use engine::{EngineOptions, FetchOutcome, ScheduleViewEngine, StudentScheduleView};
pub use filter::{filter, matches};
pub use pager::paginate;

use crate::models::{FilterSpec, SchedulePage, ScheduleEntity};

/// The whole pipeline. Inputs are borrowed and left untouched.
pub fn derive(all: &[ScheduleEntity], spec: &FilterSpec) -> SchedulePage {
    let mut matching = filter(all, spec);
    sort_schedules(&mut matching, spec.sort_by, spec.sort_order);
    paginate(matching, spec.page, spec.page_size)
}
