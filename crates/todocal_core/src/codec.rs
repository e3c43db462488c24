use crate::error::AppError;
use crate::model::{DEFAULT_PRIORITY, Importance, Status, TaskRecord, format_date, parse_date};
use crate::store::TaskStore;
use serde::{Deserialize, Serialize};
use time::Date;

pub const DOCUMENT_VERSION: &str = "1.0";

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

/// The portable document: export/import payload and backing-store snapshot
/// share this schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "exportDate", default)]
    pub export_date: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub todos: Vec<TaskRecordData>,
}

/// Raw wire form of a record. Enum fields stay strings here so decoding can
/// apply the status compatibility fallback instead of failing outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecordData {
    pub id: String,
    #[serde(rename = "taskName")]
    pub task_name: String,
    pub importance: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub status: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

impl TaskRecordData {
    pub fn from_record(record: &TaskRecord) -> Result<Self, AppError> {
        Ok(Self {
            id: record.id.clone(),
            task_name: record.name.clone(),
            importance: record.importance.wire_name().to_string(),
            tags: record.tags.iter().cloned().collect(),
            priority: record.priority,
            description: record.description.clone(),
            start_date: format_date(record.start_date)?,
            end_date: format_date(record.end_date)?,
            status: record.status.wire_name().to_string(),
            is_completed: record.is_completed(),
        })
    }

    /// Decodes one wire record. Unknown importance, a bad date or an
    /// out-of-range priority is a hard decode failure; an unknown status
    /// falls back based on the stored completion flag.
    pub fn into_record(self) -> Result<TaskRecord, AppError> {
        let importance = Importance::from_wire(&self.importance)?;
        let status = Status::from_wire(&self.status, self.is_completed);
        let start_date = parse_date(&self.start_date)?;
        let end_date = parse_date(&self.end_date)?;

        if !(1..=10).contains(&self.priority) {
            return Err(AppError::decode(format!(
                "priority {} is outside 1-10",
                self.priority
            )));
        }

        Ok(TaskRecord {
            id: self.id,
            name: self.task_name,
            importance,
            priority: self.priority,
            tags: self.tags.into_iter().collect(),
            description: self.description,
            start_date,
            end_date,
            status,
        })
    }
}

/// Pure read of the store: records in insertion order, `isCompleted` written
/// as the derived value.
pub fn export_document(store: &TaskStore, export_date: Date) -> Result<ExportDocument, AppError> {
    let todos = store
        .all()
        .iter()
        .map(TaskRecordData::from_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExportDocument {
        export_date: format_date(export_date)?,
        version: DOCUMENT_VERSION.to_string(),
        todos,
    })
}

pub fn export_json(store: &TaskStore, export_date: Date) -> Result<String, AppError> {
    let document = export_document(store, export_date)?;
    serde_json::to_string_pretty(&document).map_err(|err| AppError::decode(err.to_string()))
}

pub fn parse_document(json: &str) -> Result<ExportDocument, AppError> {
    serde_json::from_str(json).map_err(|err| AppError::decode(err.to_string()))
}

/// Merges a document into the store. The whole document is decoded and
/// validated before the store is touched, so any failure leaves it unchanged.
/// Records whose id already exists are skipped silently; returns the count
/// actually added.
pub fn import_json(store: &mut TaskStore, json: &str) -> Result<usize, AppError> {
    let document = parse_document(json)?;
    import_document(store, document)
}

pub fn import_document(store: &mut TaskStore, document: ExportDocument) -> Result<usize, AppError> {
    let records = document
        .todos
        .into_iter()
        .map(TaskRecordData::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    for record in &records {
        if record.start_date > record.end_date {
            return Err(AppError::validation(format!(
                "record '{}' has start date after end date",
                record.id
            )));
        }
    }

    let mut added = 0;
    for record in records {
        if store.get(&record.id).is_none() {
            store.add(record)?;
            added += 1;
        }
    }

    Ok(added)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Per distinct tag, the number of records carrying it, most used first.
/// Ties break alphabetically so the output is deterministic.
pub fn tag_statistics(store: &TaskStore) -> Vec<TagCount> {
    let mut stats: Vec<TagCount> = store
        .all_tags()
        .into_iter()
        .map(|tag| {
            let count = store
                .all()
                .iter()
                .filter(|record| record.tags.contains(&tag))
                .count();
            TagCount { tag, count }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    stats
}
