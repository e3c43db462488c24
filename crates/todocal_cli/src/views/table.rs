use tabled::settings::Style;
use tabled::{Table, Tabled};
use todocal_core::codec::TagCount;
use todocal_core::error::AppError;
use todocal_core::model::{TaskRecord, format_date};

#[derive(Tabled)]
pub struct TaskRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "importance")]
    importance: &'static str,
    #[tabled(rename = "prio")]
    priority: u8,
    #[tabled(rename = "tags")]
    tags: String,
    #[tabled(rename = "start")]
    start: String,
    #[tabled(rename = "end")]
    end: String,
    #[tabled(rename = "status")]
    status: &'static str,
}

impl TaskRow {
    fn from_record(record: &TaskRecord) -> Result<Self, AppError> {
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            importance: record.importance.label(),
            priority: record.priority,
            tags: record
                .tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
            start: format_date(record.start_date)?,
            end: format_date(record.end_date)?,
            status: record.status.label(),
        })
    }
}

pub fn render_tasks(records: &[TaskRecord]) -> Result<String, AppError> {
    let rows = records
        .iter()
        .map(TaskRow::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::new(rows).with(Style::sharp()).to_string())
}

#[derive(Tabled)]
pub struct TagRow {
    #[tabled(rename = "tag")]
    tag: String,
    #[tabled(rename = "tasks")]
    count: usize,
}

pub fn render_tag_stats(stats: &[TagCount]) -> String {
    let rows: Vec<TagRow> = stats
        .iter()
        .map(|stat| TagRow {
            tag: format!("#{}", stat.tag),
            count: stat.count,
        })
        .collect();
    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::{render_tag_stats, render_tasks};
    use todocal_core::codec::TagCount;
    use todocal_core::model::{Importance, TaskRecord};
    use time::macros::date;

    #[test]
    fn renders_task_fields() {
        let mut record = TaskRecord::new(
            "Fix login bug",
            Importance::High,
            date!(2025 - 06 - 01),
            date!(2025 - 06 - 03),
        );
        record.id = "a1".to_string();
        record.tags = ["backend"].map(String::from).into();

        let rendered = render_tasks(std::slice::from_ref(&record)).unwrap();
        assert!(rendered.contains("Fix login bug"));
        assert!(rendered.contains("high"));
        assert!(rendered.contains("#backend"));
        assert!(rendered.contains("2025-06-01"));
        assert!(rendered.contains("waiting"));
    }

    #[test]
    fn renders_tag_stats() {
        let stats = vec![
            TagCount {
                tag: "backend".to_string(),
                count: 2,
            },
            TagCount {
                tag: "docs".to_string(),
                count: 1,
            },
        ];

        let rendered = render_tag_stats(&stats);
        assert!(rendered.contains("#backend"));
        assert!(rendered.contains("2"));
    }
}
