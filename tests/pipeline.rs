use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use wm_plot::{PlotError, TimeColumn, TimeFormat, WindSeries};

fn csv_file(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

const WM_CSV: &str = "x,t0,v0\n\
    20200101000000,20200101000000,1.0\n\
    20200101000100,20200101000100,2.0\n\
    20200101000200,20200101000200,3.0\n";

#[test]
fn plots_rows_between_first_and_last() {
    let f = csv_file(WM_CSV);
    let ws = WindSeries::from_csv(f.path(), 2, false).unwrap();
    let at = |m: u32| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, m, 0)
            .unwrap()
    };
    assert_eq!(
        ws.time,
        TimeColumn::Parsed {
            format: TimeFormat::Compact,
            times: vec![at(0), at(1)]
        }
    );
    assert_eq!(ws.value, vec![1.0, 2.0]);
    assert_eq!(ws.value.len(), 4 - 2);
    assert_eq!(ws.label, "v0");
    assert_eq!(ws.title(), "LoRa WM data feed (4 datapoints)");
}

#[test]
fn point_count_is_rows_minus_two() {
    let mut csv = String::from("key,ws\n");
    for m in 0..10 {
        csv.push_str(&format!("2017-06-03T12:{:02}:00.000000Z,{}\n", m, m));
    }
    let f = csv_file(&csv);
    let ws = WindSeries::from_csv(f.path(), 1, true).unwrap();
    assert_eq!(ws.value.len(), 11 - 2);
    assert_eq!(ws.time.len(), 11 - 2);
    match ws.time {
        TimeColumn::Parsed { format, .. } => assert_eq!(format, TimeFormat::Iso),
        other => panic!("expected iso timestamps, got {:?}", other),
    }
}

#[test]
fn non_numeric_series_fails_before_plotting() {
    let f = csv_file(
        "x,t0,v0\n\
        20200101000000,20200101000000,1.0\n\
        20200101000100,20200101000100,calm\n\
        20200101000200,20200101000200,3.0\n",
    );
    let svg = f.path().with_extension("svg");
    let r = WindSeries::from_csv(f.path(), 2, false).and_then(|ws| ws.plot_svg(&svg));
    assert!(matches!(r, Err(PlotError::NumericConversion { row: 2, column: 2, .. })));
    assert!(!svg.exists());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let r = WindSeries::from_csv(dir.path().join("nope.csv"), 1, false);
    assert!(matches!(r, Err(PlotError::Io(_))));
}

#[test]
fn writes_the_svg_chart() {
    let dir = tempfile::tempdir().unwrap();
    let csvin = dir.path().join("feed.csv");
    std::fs::write(&csvin, WM_CSV).unwrap();
    let svgout = csvin.with_extension("svg");
    let ws = WindSeries::from_csv(&csvin, 2, false).unwrap();
    ws.plot_svg(&svgout).unwrap();
    let svg = std::fs::read_to_string(&svgout).unwrap();
    assert!(svg.contains("LoRa WM data feed (4 datapoints)"));
}
