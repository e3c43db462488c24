use crate::error::AppError;
use crate::model::{Status, TaskRecord};
use std::collections::BTreeSet;
use time::{Date, OffsetDateTime, UtcOffset};

/// Sole mutable authority over the record collection. Insertion order is the
/// canonical order for every query. Mutators report whether the store changed
/// so the caller can decide to re-persist or re-render.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskStore {
    records: Vec<TaskRecord>,
}

fn validate_dates(record: &TaskRecord) -> Result<(), AppError> {
    if record.start_date > record.end_date {
        return Err(AppError::validation(format!(
            "start date {} is after end date {}",
            record.start_date, record.end_date
        )));
    }
    Ok(())
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-decoded records, re-checking the date
    /// invariant on each so a hand-edited snapshot cannot smuggle in a
    /// torn record.
    pub fn from_records(records: Vec<TaskRecord>) -> Result<Self, AppError> {
        for record in &records {
            validate_dates(record)?;
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add(&mut self, record: TaskRecord) -> Result<(), AppError> {
        validate_dates(&record)?;
        self.records.push(record);
        Ok(())
    }

    /// Removes the record with that id. Absent ids are a no-op, not an error.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Wholesale replace keyed by `record.id`. Returns `Ok(false)` when no
    /// record has that id; the store is untouched when validation fails.
    pub fn update(&mut self, record: TaskRecord) -> Result<bool, AppError> {
        validate_dates(&record)?;
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Partial update that only changes status. Cannot violate the date
    /// invariant, so it never fails; unknown ids are a no-op.
    pub fn set_status(&mut self, id: &str, status: Status) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    pub fn all(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn open(&self) -> Vec<TaskRecord> {
        self.records
            .iter()
            .filter(|record| record.status != Status::Done)
            .cloned()
            .collect()
    }

    pub fn closed(&self) -> Vec<TaskRecord> {
        self.records
            .iter()
            .filter(|record| record.status == Status::Done)
            .cloned()
            .collect()
    }

    /// Records whose date range contains `date`, both boundaries inclusive.
    pub fn for_date(&self, date: Date) -> Vec<TaskRecord> {
        self.records
            .iter()
            .filter(|record| record.active_on(date))
            .cloned()
            .collect()
    }

    pub fn today(&self) -> Vec<TaskRecord> {
        self.for_date(local_today())
    }

    pub fn all_tags(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|record| record.tags.iter().cloned())
            .collect()
    }
}

pub fn local_today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}
