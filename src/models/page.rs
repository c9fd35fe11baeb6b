use serde::{Deserialize, Serialize};

use super::filter::FilterSpec;
use super::schedule::ScheduleEntity;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
}

impl PageMeta {
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit as usize)
    }

    pub fn has_next(&self) -> bool {
        (self.page as usize) * (self.limit as usize) < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Pager output: the requested slice plus the pre-slice count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePage {
    pub items: Vec<ScheduleEntity>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyFlags {
    pub is_loading: bool,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
}

impl BusyFlags {
    pub fn any(&self) -> bool {
        self.is_loading || self.is_creating || self.is_updating || self.is_deleting
    }
}

/// Everything a UI needs to render the schedule list, handed out by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub schedules: Vec<ScheduleEntity>,
    pub meta: PageMeta,
    pub filters: FilterSpec,
    pub busy: BusyFlags,
}
