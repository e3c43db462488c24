use crate::error::AppError;
use time::{Date, Duration, Month};

pub const GRID_ROWS: usize = 6;
pub const GRID_COLS: usize = 7;

/// A month view: 6 whole weeks of consecutive dates, columns Sunday..Saturday.
pub type MonthGrid = [[Date; GRID_COLS]; GRID_ROWS];

/// Builds the 6x7 date matrix for a month. Cell (0,0) is the first of the
/// month shifted back to the nearest Sunday, so leading and trailing cells
/// may belong to the adjacent months. Pure function of (year, month).
pub fn month_grid(year: i32, month: Month) -> Result<MonthGrid, AppError> {
    let first_of_month = Date::from_calendar_date(year, month, 1)
        .map_err(|err| AppError::invalid_input(err.to_string()))?;

    let back = i64::from(first_of_month.weekday().number_days_from_sunday());
    let start = first_of_month
        .checked_sub(Duration::days(back))
        .ok_or_else(|| AppError::invalid_input("month is out of the supported date range"))?;

    let mut grid = [[start; GRID_COLS]; GRID_ROWS];
    let mut date = start;
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = date;
            date = date
                .checked_add(Duration::days(1))
                .ok_or_else(|| AppError::invalid_input("month is out of the supported date range"))?;
        }
    }

    Ok(grid)
}
