use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;
pub mod chart;
pub mod error;
pub mod plot;
pub mod time;

pub use error::PlotError;
pub use time::{FormatMismatch, NormalizedTime, TimeColumn, TimeFormat, TIME_FORMATS};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const PLOT_TITLE: &str = "LoRa WM data feed";
pub const VALUE_DESC: &str = "WindSpeed(mph)";
pub const DEFAULT_SERIES: usize = 1;

/// The raw csv, row-major, every cell kept as read.
/// Row 0 holds the column labels in its cells, the first one being a placeholder
/// for the time column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads a csv without header line, all rows must have the same width
    pub fn from_csv<P: AsRef<Path>>(fin: P) -> Result<Table, PlotError> {
        let file = File::open(fin.as_ref())?;
        let table = Table::from_reader(file)?;
        log::debug!(
            "read {} rows from {}",
            table.row_count(),
            fin.as_ref().display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Table, PlotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b',')
            .from_reader(rdr);
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|c| c.to_owned()).collect());
        }
        Ok(Table { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// the cells of row 0; take them before `normalize_time_column` overwrites the first one
    pub fn column_labels(&self) -> Vec<String> {
        self.rows.first().cloned().unwrap_or_default()
    }

    /// Rows that end up on the chart: all but the first and the last.
    pub fn plotted_rows(&self) -> Range<usize> {
        1..self.row_count().saturating_sub(1).max(1)
    }

    /// Copies the row 1 timestamp over the row 0 placeholder, then parses the
    /// whole time column with the first format that fits every cell.
    pub fn normalize_time_column(&mut self) -> Result<NormalizedTime, PlotError> {
        if self.row_count() < 2 {
            return Err(PlotError::TooFewRows {
                found: self.row_count(),
                needed: 2,
            });
        }
        if self.column_count() == 0 {
            return Err(PlotError::ColumnOutOfRange { index: 0, width: 0 });
        }
        self.rows[0][0] = self.rows[1][0].clone();
        let cells: Vec<String> = self.rows.iter().map(|r| r[0].clone()).collect();
        Ok(time::normalize(cells, &TIME_FORMATS))
    }

    /// The values of column `index` over the plotted rows.
    /// Fails on the first cell that is not a number, nothing is replaced.
    pub fn select_series(&self, index: usize, labels: &[String]) -> Result<Vec<f64>, PlotError> {
        let width = self.column_count();
        if index == 0 || index >= width {
            return Err(PlotError::ColumnOutOfRange { index, width });
        }
        let label = labels.get(index).map(|l| l.as_str()).unwrap_or("");
        println!("Plotting column {} ({})", index, label);
        self.rows[self.plotted_rows()]
            .iter()
            .zip(self.plotted_rows())
            .map(|(r, row)| {
                let cell = r[index].as_str();
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| PlotError::NumericConversion {
                        row,
                        column: index,
                        value: cell.to_owned(),
                    })
            })
            .collect()
    }
}

/// The plotted slice of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct WindSeries {
    pub time: TimeColumn,
    pub value: Vec<f64>,
    pub label: String,
    /// rows in the whole table, first and last included
    pub total_rows: usize,
}

impl WindSeries {
    /// Runs the table through the pipeline: labels, time column, series.
    /// With `strict_time`, a time column that no format can parse is an error;
    /// otherwise the raw strings are carried to the chart.
    pub fn from_table(
        mut table: Table,
        series: usize,
        strict_time: bool,
    ) -> Result<WindSeries, PlotError> {
        let labels = table.column_labels();
        let normalized = table.normalize_time_column()?;
        if strict_time && !normalized.column.is_parsed() {
            return Err(PlotError::UnparsedTime);
        }
        let value = table.select_series(series, &labels)?;
        let time = normalized.column.slice(table.plotted_rows());
        log::info!(
            "{} of {} rows selected for plotting",
            value.len(),
            table.row_count()
        );
        Ok(WindSeries {
            time,
            value,
            label: labels.get(series).cloned().unwrap_or_default(),
            total_rows: table.row_count(),
        })
    }

    pub fn from_csv<P: AsRef<Path>>(
        fin: P,
        series: usize,
        strict_time: bool,
    ) -> Result<WindSeries, PlotError> {
        WindSeries::from_table(Table::from_csv(fin)?, series, strict_time)
    }
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

pub fn suitable_time_fmt(d: chrono::Duration) -> &'static str {
    if d > chrono::Duration::weeks(1) {
        "%y-%m-%d"
    } else if d > chrono::Duration::days(1) {
        "%m-%d %H"
    } else {
        "%d %H:%M"
    }
}
