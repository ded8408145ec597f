use chrono::NaiveDateTime;
use std::fmt;
use std::io::Write;

/// The timestamp layouts found in the WM csv feeds, in the order they are tried.
pub const TIME_FORMATS: [TimeFormat; 2] = [TimeFormat::Compact, TimeFormat::Iso];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `YYYYMMDDHHMMSS`, 14 digits without separators
    Compact,
    /// `YYYY-MM-DDTHH:MM:SS.ffffffZ`
    Iso,
}

impl TimeFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::Compact => "%Y%m%d%H%M%S",
            TimeFormat::Iso => "%Y-%m-%dT%H:%M:%S%.fZ",
        }
    }

    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        if *self == TimeFormat::Compact && (s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()))
        {
            return None;
        }
        NaiveDateTime::parse_from_str(s, self.pattern()).ok()
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::Compact => write!(f, "compact ({})", self.pattern()),
            TimeFormat::Iso => write!(f, "iso ({})", self.pattern()),
        }
    }
}

/// The time column after normalization: either every cell parsed with one
/// format, or the raw cells when no format fits all of them.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeColumn {
    Parsed {
        format: TimeFormat,
        times: Vec<NaiveDateTime>,
    },
    Unparsed(Vec<String>),
}

impl TimeColumn {
    pub fn len(&self) -> usize {
        match self {
            TimeColumn::Parsed { times, .. } => times.len(),
            TimeColumn::Unparsed(raw) => raw.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, TimeColumn::Parsed { .. })
    }

    /// keeps only the rows in `range`
    pub fn slice(&self, range: std::ops::Range<usize>) -> TimeColumn {
        match self {
            TimeColumn::Parsed { format, times } => TimeColumn::Parsed {
                format: *format,
                times: times[range].to_vec(),
            },
            TimeColumn::Unparsed(raw) => TimeColumn::Unparsed(raw[range].to_vec()),
        }
    }
}

/// A format that did not fit the column, with the first cell that broke it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatMismatch {
    pub format: TimeFormat,
    pub row: usize,
    pub cell: String,
}

impl fmt::Display for FormatMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time column does not match the {} format, first mismatch at row {}: {:?}",
            self.format, self.row, self.cell
        )
    }
}

/// Result of normalizing the time column, with the formats that were rejected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTime {
    pub column: TimeColumn,
    pub mismatches: Vec<FormatMismatch>,
}

/// Parses all the cells with one format, stopping at the first cell that does not fit.
pub fn parse_all(cells: &[String], format: TimeFormat) -> Result<Vec<NaiveDateTime>, FormatMismatch> {
    cells
        .iter()
        .enumerate()
        .map(|(row, c)| {
            format.parse(c).ok_or_else(|| FormatMismatch {
                format,
                row,
                cell: c.clone(),
            })
        })
        .collect()
}

/// Tries the formats in order; the first that parses every cell wins.
/// If none does, the cells are returned untouched as `TimeColumn::Unparsed`.
/// Prints one line on stdout for each rejected format.
pub fn normalize(cells: Vec<String>, formats: &[TimeFormat]) -> NormalizedTime {
    normalize_with(cells, formats, &mut std::io::stdout())
}

/// Same as `normalize`, writing the rejected formats to `out`.
pub fn normalize_with<W: Write>(
    cells: Vec<String>,
    formats: &[TimeFormat],
    out: &mut W,
) -> NormalizedTime {
    let mut mismatches = Vec::with_capacity(formats.len());
    for &format in formats {
        match parse_all(&cells, format) {
            Ok(times) => {
                log::debug!("time column parsed with the {} format", format);
                return NormalizedTime {
                    column: TimeColumn::Parsed { format, times },
                    mismatches,
                };
            }
            Err(m) => {
                if let Err(e) = writeln!(out, "{}", m) {
                    log::debug!("could not print the time format diagnostic: {}", e);
                }
                log::warn!("{}", m);
                mismatches.push(m);
            }
        }
    }
    log::warn!("no timestamp format matched, keeping the raw time strings");
    NormalizedTime {
        column: TimeColumn::Unparsed(cells),
        mismatches,
    }
}
