//! In-memory schedule view for the school administration dashboard.
//!
//! The full schedule collection is fetched once from the REST backend,
//! normalized into [`models::ScheduleEntity`] values and then searched,
//! sorted and paginated locally by [`view::ScheduleViewEngine`]. Create,
//! update and delete go to the backend and are followed by a re-fetch.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod view;

pub use error::AppError;
pub use view::{FetchOutcome, ScheduleViewEngine};
