use thiserror::Error;

/// Everything that can stop the csv -> chart pipeline.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("could not read the csv file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse the csv file: {0}")]
    Parse(#[from] csv::Error),

    #[error("the table has {found} rows, at least {needed} are needed")]
    TooFewRows { found: usize, needed: usize },

    #[error("column {index} cannot be plotted, valid series columns are 1..{width}")]
    ColumnOutOfRange { index: usize, width: usize },

    #[error("row {row}, column {column}: could not convert {value:?} to a number")]
    NumericConversion {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("no timestamp format matched the time column")]
    UnparsedTime,

    #[error("nothing to plot, the table has no rows between the first and the last")]
    NoData,

    #[error("could not draw the chart: {0}")]
    Chart(String),

    #[error("could not launch the chart viewer: {0}")]
    Viewer(std::io::Error),

    #[error("the chart viewer exited with {0}")]
    ViewerExit(std::process::ExitStatus),
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for PlotError
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        PlotError::Chart(e.to_string())
    }
}
