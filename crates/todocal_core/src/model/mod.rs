mod task;

pub use task::{
    DEFAULT_PRIORITY, Importance, Status, TaskRecord, format_date, generate_id, parse_date,
};
