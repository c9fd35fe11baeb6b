use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    DayOfWeek,
    StartTime,
    ClassName,
    RoomCode,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dayOfWeek" => Ok(SortBy::DayOfWeek),
            "startTime" => Ok(SortBy::StartTime),
            "className" => Ok(SortBy::ClassName),
            "roomCode" => Ok(SortBy::RoomCode),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filter, sort and pagination parameters selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub search: Option<String>,
    pub room_id: Option<i64>,
    pub class_id: Option<i64>,
    pub day_of_week: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl FilterSpec {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            search: None,
            room_id: None,
            class_id: None,
            day_of_week: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Applies a single field change. Every change except `Page` and
    /// `PageSize` sends the user back to the first page.
    pub fn apply(&mut self, change: FilterChange) {
        let resets_page = change.resets_page();
        match change {
            FilterChange::Search(value) => {
                self.search = value.filter(|s| !s.is_empty());
            }
            FilterChange::RoomId(value) => self.room_id = value,
            FilterChange::ClassId(value) => self.class_id = value,
            FilterChange::DayOfWeek(value) => {
                self.day_of_week = value.filter(|s| !s.trim().is_empty());
            }
            FilterChange::SortBy(value) => self.sort_by = value,
            FilterChange::SortOrder(value) => self.sort_order = value,
            FilterChange::Page(value) => self.page = value.max(1),
            FilterChange::PageSize(value) => self.page_size = value.max(1),
        }
        if resets_page {
            self.page = 1;
        }
    }
}

/// One field of [`FilterSpec`] being set. `None` clears an optional filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Search(Option<String>),
    RoomId(Option<i64>),
    ClassId(Option<i64>),
    DayOfWeek(Option<String>),
    SortBy(SortBy),
    SortOrder(SortOrder),
    Page(u32),
    PageSize(u32),
}

impl FilterChange {
    pub fn resets_page(&self) -> bool {
        !matches!(self, FilterChange::Page(_) | FilterChange::PageSize(_))
    }
}
