use crate::model::{Importance, Status, TaskRecord};

/// Independent, optional constraints combined with logical AND. The default
/// value constrains nothing, so filtering with it is the identity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring over name OR description.
    pub search: Option<String>,
    pub importance: Option<Importance>,
    pub status: Option<Status>,
    /// Inclusive priority range `[lo, hi]`.
    pub priority: Option<(u8, u8)>,
    /// Case-insensitive substring over any of the record's tags.
    pub tag: Option<String>,
}

pub const PRIORITY_HIGH: (u8, u8) = (8, 10);
pub const PRIORITY_MEDIUM: (u8, u8) = (4, 7);
pub const PRIORITY_LOW: (u8, u8) = (1, 3);

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Pure subsequence selection: relative input order is preserved and nothing
/// is re-sorted.
pub fn filter(records: &[TaskRecord], criteria: &FilterCriteria) -> Vec<TaskRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

fn matches(record: &TaskRecord, criteria: &FilterCriteria) -> bool {
    let search_match = match criteria.search.as_deref() {
        None => true,
        Some(needle) if needle.is_empty() => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            record.name.to_lowercase().contains(&needle)
                || record.description.to_lowercase().contains(&needle)
        }
    };

    let importance_match = criteria
        .importance
        .is_none_or(|importance| importance == record.importance);

    let status_match = criteria.status.is_none_or(|status| status == record.status);

    let priority_match = criteria
        .priority
        .is_none_or(|(lo, hi)| (lo..=hi).contains(&record.priority));

    let tag_match = match criteria.tag.as_deref() {
        None => true,
        Some(needle) if needle.is_empty() => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            record
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
        }
    };

    search_match && importance_match && status_match && priority_match && tag_match
}
