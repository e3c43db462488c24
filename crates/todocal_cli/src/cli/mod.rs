use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: todocal add "Fix login bug" --importance high --priority 9 --tag backend
    Add {
        name: Option<String>,
        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        importance: String,
        /// 1-10
        #[arg(long, default_value_t = 5)]
        priority: u8,
        /// Repeatable
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        start: Option<String>,
        /// YYYY-MM-DD, defaults to the start date
        #[arg(long)]
        end: Option<String>,
    },
    /// Edit fields of a task; omitted flags keep their current value
    ///
    /// Example: todocal edit task-17 --name "Fix login bug (again)" --end 2025-07-01
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        importance: Option<String>,
        #[arg(long)]
        priority: Option<u8>,
        /// Replaces the whole tag set when given
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: todocal delete task-17
    Delete {
        id: String,
    },
    /// Show details of a task
    ///
    /// Example: todocal show task-17
    Show {
        id: String,
    },
    /// Change a task's status
    ///
    /// Example: todocal status task-17 in-progress
    Status {
        id: String,
        /// waiting, in-progress or done
        status: String,
    },
    /// Mark a task as done
    ///
    /// Example: todocal done task-17
    Done {
        id: String,
    },
    /// List tasks
    ///
    /// Example: todocal list open --search login --priority 8..10
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Print a month calendar with per-day task counts
    ///
    /// Example: todocal calendar 2025 6
    Calendar {
        year: Option<i32>,
        /// 1-12
        month: Option<u8>,
    },
    /// Export all tasks to a JSON document
    ///
    /// Example: todocal export backup.json
    Export {
        path: String,
    },
    /// Import tasks from a JSON document, skipping ids that already exist
    ///
    /// Example: todocal import backup.json
    Import {
        path: String,
    },
    /// Show tag usage statistics
    ///
    /// Example: todocal tags
    Tags,
    /// Compose and deliver the reminder for today's open tasks
    ///
    /// Example: todocal remind
    Remind,
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// Tasks that are not done
    Open {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Tasks that are done
    Closed {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Every task in insertion order
    All {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Tasks active today
    Today {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Tasks active on a given date
    ///
    /// Example: todocal list date 2025-06-02
    Date {
        /// YYYY-MM-DD
        date: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Substring over name or description, case-insensitive
    #[arg(long)]
    pub search: Option<String>,
    /// low, medium, high or critical
    #[arg(long)]
    pub importance: Option<String>,
    /// waiting, in-progress or done
    #[arg(long)]
    pub status: Option<String>,
    /// Inclusive range LO..HI, or a single value
    #[arg(long, value_name = "LO..HI")]
    pub priority: Option<String>,
    /// Substring over any tag, case-insensitive
    #[arg(long)]
    pub tag: Option<String>,
}

/// Parses `8..10`, `8-10` or a bare `8` into an inclusive range.
pub fn parse_priority_range(raw: &str) -> Result<(u8, u8), String> {
    let trimmed = raw.trim();
    let (lo_raw, hi_raw) = if let Some((lo, hi)) = trimmed.split_once("..") {
        (lo, hi)
    } else if let Some((lo, hi)) = trimmed.split_once('-') {
        (lo, hi)
    } else {
        (trimmed, trimmed)
    };

    let lo: u8 = lo_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid priority '{lo_raw}'"))?;
    let hi: u8 = hi_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid priority '{hi_raw}'"))?;

    if !(1..=10).contains(&lo) || !(1..=10).contains(&hi) {
        return Err("priority must be between 1 and 10".to_string());
    }
    if lo > hi {
        return Err(format!("priority range {lo}..{hi} is inverted"));
    }

    Ok((lo, hi))
}
