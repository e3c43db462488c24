use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use time::Month;
use todocal_cli::cli::{Cli, Command, FilterArgs, ListCommand, parse_priority_range};
use todocal_cli::views::table;
use todocal_core::calendar::{self, MonthGrid};
use todocal_core::codec::{self, TaskRecordData};
use todocal_core::config::{self, Palette};
use todocal_core::error::AppError;
use todocal_core::filter::{self, FilterCriteria};
use todocal_core::model::{Importance, Status, TaskRecord, parse_date};
use todocal_core::notify;
use todocal_core::storage::json_store;
use todocal_core::store::{TaskStore, local_today};

fn parse_cli_date(value: &str) -> Result<time::Date, AppError> {
    parse_date(value).map_err(|err| AppError::invalid_input(err.message().to_string()))
}

fn print_record_json(record: &TaskRecord) -> Result<(), AppError> {
    let data = TaskRecordData::from_record(record)?;
    let json = serde_json::to_string(&data).map_err(|err| AppError::decode(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_records_json(records: &[TaskRecord]) -> Result<(), AppError> {
    let payload = records
        .iter()
        .map(TaskRecordData::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    let json = serde_json::to_string(&payload).map_err(|err| AppError::decode(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_records_plain(records: &[TaskRecord]) -> Result<(), AppError> {
    if records.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    println!("{}", table::render_tasks(records)?);
    Ok(())
}

fn criteria_from_args(args: &FilterArgs) -> Result<FilterCriteria, AppError> {
    let importance = args
        .importance
        .as_deref()
        .map(str::parse::<Importance>)
        .transpose()?;
    let status = args
        .status
        .as_deref()
        .map(str::parse::<Status>)
        .transpose()?;
    let priority = args
        .priority
        .as_deref()
        .map(parse_priority_range)
        .transpose()
        .map_err(AppError::invalid_input)?;

    Ok(FilterCriteria {
        search: args.search.clone(),
        importance,
        status,
        priority,
        tag: args.tag.clone(),
    })
}

fn render_calendar(
    grid: &MonthGrid,
    month: Month,
    store: &TaskStore,
    palette: &Palette,
) -> String {
    let mut out = String::new();
    out.push_str("Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");

    for row in grid {
        let mut line = String::new();
        for date in row {
            let count = store.for_date(*date).len();
            let cell = if count > 0 {
                format!("{:>2}({count})", date.day())
            } else {
                format!("{:>2}", date.day())
            };
            let cell = format!("{cell:<4}");
            let colored = if date.month() != month {
                palette.mutedize(&cell)
            } else if count > 0 {
                palette.accentize(&cell)
            } else {
                cell
            };
            line.push_str(&colored);
            line.push(' ');
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn calendar_json(grid: &MonthGrid, store: &TaskStore) -> Result<serde_json::Value, AppError> {
    let mut rows = Vec::with_capacity(grid.len());
    for row in grid {
        let mut cells = Vec::with_capacity(row.len());
        for date in row {
            cells.push(serde_json::json!({
                "date": todocal_core::model::format_date(*date)?,
                "tasks": store.for_date(*date).len(),
            }));
        }
        rows.push(serde_json::Value::Array(cells));
    }
    Ok(serde_json::Value::Array(rows))
}

fn load_store() -> Result<(std::path::PathBuf, TaskStore), AppError> {
    let path = json_store::store_path()?;
    let store = json_store::load_store(&path)?;
    Ok((path, store))
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let json = cli.json;
    match cli.command {
        Command::Add {
            name,
            importance,
            priority,
            tags,
            description,
            start,
            end,
        } => {
            let name = match name {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("name is required")),
            };
            if !(1..=10).contains(&priority) {
                return Err(AppError::invalid_input("priority must be between 1 and 10"));
            }

            let importance: Importance = importance.parse()?;
            let start_date = match start.as_deref() {
                Some(value) => parse_cli_date(value)?,
                None => local_today(),
            };
            let end_date = match end.as_deref() {
                Some(value) => parse_cli_date(value)?,
                None => start_date,
            };

            let mut record = TaskRecord::new(name.trim(), importance, start_date, end_date);
            record.priority = priority;
            record.tags = tags
                .iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
            record.description = description;

            let (path, mut store) = load_store()?;
            store.add(record.clone())?;
            json_store::save_store(&path, &store)?;

            if json {
                print_record_json(&record)?;
            } else {
                println!("Added task: {} ({})", record.name, record.id);
            }
        }
        Command::Edit {
            id,
            name,
            importance,
            priority,
            tags,
            description,
            start,
            end,
        } => {
            let (path, mut store) = load_store()?;
            let mut record = store
                .get(id.trim())
                .cloned()
                .ok_or_else(|| AppError::invalid_input("task not found"))?;

            if let Some(name) = name {
                record.name = name;
            }
            if let Some(importance) = importance.as_deref() {
                record.importance = importance.parse()?;
            }
            if let Some(priority) = priority {
                if !(1..=10).contains(&priority) {
                    return Err(AppError::invalid_input("priority must be between 1 and 10"));
                }
                record.priority = priority;
            }
            if !tags.is_empty() {
                record.tags = tags
                    .iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
            if let Some(description) = description {
                record.description = description;
            }
            if let Some(start) = start.as_deref() {
                record.start_date = parse_cli_date(start)?;
            }
            if let Some(end) = end.as_deref() {
                record.end_date = parse_cli_date(end)?;
            }

            store.update(record.clone())?;
            json_store::save_store(&path, &store)?;

            if json {
                print_record_json(&record)?;
            } else {
                println!("Updated task: {} ({})", record.name, record.id);
            }
        }
        Command::Delete { id } => {
            let (path, mut store) = load_store()?;
            let record = store
                .get(id.trim())
                .cloned()
                .ok_or_else(|| AppError::invalid_input("task not found"))?;

            store.remove(&record.id);
            json_store::save_store(&path, &store)?;

            if json {
                print_record_json(&record)?;
            } else {
                println!("Deleted task: {} ({})", record.name, record.id);
            }
        }
        Command::Show { id } => {
            let (_, store) = load_store()?;
            let record = store
                .get(id.trim())
                .ok_or_else(|| AppError::invalid_input("task not found"))?;

            if json {
                print_record_json(record)?;
            } else {
                print_records_plain(std::slice::from_ref(record))?;
                if !record.description.is_empty() {
                    println!("{}", record.description);
                }
            }
        }
        Command::Status { id, status } => {
            let status: Status = status.parse()?;
            set_status(json, &id, status)?;
        }
        Command::Done { id } => {
            set_status(json, &id, Status::Done)?;
        }
        Command::List { list } => {
            let (_, store) = load_store()?;
            let (records, filters) = match &list {
                ListCommand::Open { filters } => (store.open(), filters),
                ListCommand::Closed { filters } => (store.closed(), filters),
                ListCommand::All { filters } => (store.all().to_vec(), filters),
                ListCommand::Today { filters } => (store.today(), filters),
                ListCommand::Date { date, filters } => {
                    (store.for_date(parse_cli_date(date)?), filters)
                }
            };

            let criteria = criteria_from_args(filters)?;
            let filtered = filter::filter(&records, &criteria);

            if json {
                print_records_json(&filtered)?;
            } else {
                print_records_plain(&filtered)?;
            }
        }
        Command::Calendar { year, month } => {
            let today = local_today();
            let year = year.unwrap_or_else(|| today.year());
            let month = match month {
                Some(value) => Month::try_from(value)
                    .map_err(|_| AppError::invalid_input("month must be between 1 and 12"))?,
                None => today.month(),
            };

            let (_, store) = load_store()?;
            let grid = calendar::month_grid(year, month)?;

            if json {
                println!("{}", calendar_json(&grid, &store)?);
            } else {
                let load = config::load_config_with_fallback();
                if let Some(err) = load.error {
                    eprintln!("WARNING: {err}");
                }
                let palette = config::palette_for_theme(load.config.theme.as_deref());
                println!("{year}-{:02}", u8::from(month));
                print!("{}", render_calendar(&grid, month, &store, &palette));
            }
        }
        Command::Export { path } => {
            let (_, store) = load_store()?;
            let content = codec::export_json(&store, local_today())?;
            std::fs::write(&path, content).map_err(|err| AppError::io(err.to_string()))?;

            if json {
                println!("{}", serde_json::json!({ "exported": store.len(), "path": path }));
            } else {
                println!("Exported {} task(s) to {path}", store.len());
            }
        }
        Command::Import { path } => {
            let (store_path, mut store) = load_store()?;
            let content =
                std::fs::read_to_string(&path).map_err(|err| AppError::io(err.to_string()))?;
            let added = codec::import_json(&mut store, &content)?;
            if added > 0 {
                json_store::save_store(&store_path, &store)?;
            }

            if json {
                println!("{}", serde_json::json!({ "imported": added }));
            } else {
                println!("Imported {added} task(s) from {path}");
            }
        }
        Command::Tags => {
            let (_, store) = load_store()?;
            let stats = codec::tag_statistics(&store);

            if json {
                let payload: Vec<serde_json::Value> = stats
                    .iter()
                    .map(|stat| serde_json::json!({ "tag": stat.tag, "count": stat.count }))
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if stats.is_empty() {
                println!("No tags in use.");
            } else {
                println!("{}", table::render_tag_stats(&stats));
            }
        }
        Command::Remind => {
            let (_, store) = load_store()?;
            match notify::startup_reminder(&store, local_today()) {
                Some(reminder) => {
                    if json {
                        println!(
                            "{}",
                            serde_json::json!({ "title": reminder.title, "body": reminder.body })
                        );
                    } else {
                        println!("{}", reminder.title);
                        print!("{}", reminder.body);
                    }
                    let notifier = notify::notifier_from_env()?;
                    notifier.notify(&reminder)?;
                }
                None => {
                    if json {
                        println!("{}", serde_json::Value::Null);
                    } else {
                        println!("No open tasks today.");
                    }
                }
            }
        }
    }

    Ok(())
}

fn set_status(json: bool, id: &str, status: Status) -> Result<(), AppError> {
    let (path, mut store) = load_store()?;
    if !store.set_status(id.trim(), status) {
        return Err(AppError::invalid_input("task not found"));
    }
    json_store::save_store(&path, &store)?;

    let record = store
        .get(id.trim())
        .cloned()
        .ok_or_else(|| AppError::invalid_input("task not found"))?;

    if json {
        print_record_json(&record)?;
    } else {
        println!(
            "Task {} ({}) is now {}",
            record.name,
            record.id,
            record.status.label()
        );
    }
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// Exit gate for the interactive session: when tasks due today are still
/// open, show them and ask once. A broken store never traps the user inside
/// the session.
fn confirm_exit(stdin: &mut impl BufRead) -> Result<bool, AppError> {
    let store = match load_store() {
        Ok((_, store)) => store,
        Err(_) => return Ok(true),
    };

    let Some(message) = notify::close_confirmation(&store, local_today()) else {
        return Ok(true);
    };

    println!("{message} [y/N]");
    let mut answer = String::new();
    let bytes = stdin
        .read_line(&mut answer)
        .map_err(|err| AppError::io(err.to_string()))?;
    if bytes == 0 {
        return Ok(true);
    }

    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            if confirm_exit(&mut stdin_lock)? {
                break;
            }
            continue;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("todocal".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                if matches!(
                    err.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) {
                    let _ = err.print();
                } else {
                    eprintln!("ERROR: {}", normalize_parse_error(err));
                }
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
