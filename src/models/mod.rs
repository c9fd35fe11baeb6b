pub mod filter;
pub mod page;
pub mod request;
pub mod schedule;

pub use filter::{FilterChange, FilterSpec, SortBy, SortOrder};
pub use page::{BusyFlags, PageMeta, SchedulePage, ViewSnapshot};
pub use request::{NewScheduleRequest, UpdateScheduleRequest};
pub use schedule::{ScheduleEntity, weekday_rank};
