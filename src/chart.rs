use super::time::TimeColumn;
use super::{min_and_max, suitable_time_fmt, PlotError, WindSeries, PLOT_TITLE, VALUE_DESC};
use chrono::prelude::*;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::BufRead;
use std::path::Path;
use std::process::Command;

impl WindSeries {
    /// "LoRa WM data feed (N datapoints)", N counting every row of the table
    pub fn title(&self) -> String {
        format!("{} ({} datapoints)", PLOT_TITLE, self.total_rows)
    }

    /// plots the series to svg
    pub fn plot_svg(&self, fout: &Path) -> Result<(), PlotError> {
        if self.value.is_empty() {
            return Err(PlotError::NoData);
        }
        let root = SVGBackend::new(fout, (1600, 800)).into_drawing_area();
        self.draw(&root)?;
        root.present()?;
        Ok(())
    }

    /// Draws the line chart on any plotters backend.
    /// The measurement goes on the horizontal axis and the time on the vertical one,
    /// while the vertical axis keeps the wind speed description.
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        if self.value.is_empty() {
            return Err(PlotError::NoData);
        }
        root.fill(&WHITE)?;
        let (xmin, xmax) = value_range(&self.value);
        match &self.time {
            TimeColumn::Parsed { times, .. } => self.draw_timed(root, times, xmin, xmax),
            TimeColumn::Unparsed(raw) => self.draw_indexed(root, raw, xmin, xmax),
        }
    }

    fn draw_timed<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        times: &[NaiveDateTime],
        xmin: f64,
        xmax: f64,
    ) -> Result<(), PlotError> {
        let (ymindt, ymaxdt) = min_and_max(times).ok_or(PlotError::NoData)?;
        let yspan: chrono::Duration = ymaxdt - ymindt;
        let ymargin = if yspan == chrono::Duration::zero() {
            chrono::Duration::minutes(1)
        } else {
            yspan / 20
        };
        let yminutc = TimeZone::from_utc_datetime(&Utc, &(ymindt - ymargin));
        let ymaxutc = TimeZone::from_utc_datetime(&Utc, &(ymaxdt + ymargin));
        let yfmt = suitable_time_fmt(yspan);
        let mut chart = ChartBuilder::on(root)
            .caption(self.title(), ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(160)
            .build_cartesian_2d(xmin..xmax, yminutc..ymaxutc)?;
        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 24))
            .y_desc(VALUE_DESC)
            .y_labels(14)
            .y_label_formatter(&|t: &DateTime<Utc>| t.format(yfmt).to_string())
            .x_label_formatter(&|x: &f64| format!("{:5}", x))
            .x_desc(self.label.as_str())
            .draw()?;
        let line = LineSeries::new(
            self.value
                .iter()
                .zip(times.iter())
                .map(|(v, t)| (*v, TimeZone::from_utc_datetime(&Utc, t))),
            RED.stroke_width(2),
        );
        chart.draw_series(line)?;
        Ok(())
    }

    /// Fallback when the time column could not be parsed: each row sits at its
    /// position on the vertical axis, labelled with the raw time string.
    fn draw_indexed<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        raw: &[String],
        xmin: f64,
        xmax: f64,
    ) -> Result<(), PlotError> {
        let ymax = raw.len() as f64 - 0.5;
        let mut chart = ChartBuilder::on(root)
            .caption(self.title(), ("sans-serif", 32))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(160)
            .build_cartesian_2d(xmin..xmax, -0.5f64..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
            .set_all_tick_mark_size(2)
            .label_style(("sans-serif", 24))
            .y_desc(VALUE_DESC)
            .y_labels(raw.len().min(14))
            .y_label_formatter(&|y: &f64| row_label(raw, *y))
            .x_label_formatter(&|x: &f64| format!("{:5}", x))
            .x_desc(self.label.as_str())
            .draw()?;
        let line = LineSeries::new(
            self.value
                .iter()
                .enumerate()
                .map(|(i, v)| (*v, i as f64)),
            RED.stroke_width(2),
        );
        chart.draw_series(line)?;
        Ok(())
    }
}

/// the raw time string of the row sitting exactly at `y`, empty between rows
fn row_label(raw: &[String], y: f64) -> String {
    let i = y.round();
    if (y - i).abs() > 1e-6 || i < 0. {
        return String::new();
    }
    raw.get(i as usize).cloned().unwrap_or_default()
}

/// min and max of the finite values, widened by a tenth of the span
fn value_range(values: &[f64]) -> (f64, f64) {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (vmin, vmax) = match min_and_max(&finite) {
        Some(mm) => mm,
        None => return (0., 1.),
    };
    let span = (vmax - vmin) / 10f64;
    if span == 0. {
        (vmin - 1., vmax + 1.)
    } else {
        (vmin - span, vmax + span)
    }
}

/// The platform launcher for `fout`, and whether it stays alive until the viewer is closed.
fn viewer_command(fout: &Path) -> (Command, bool) {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg("-W").arg(fout);
        (cmd, true)
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(&["/C", "start", "/WAIT", ""]).arg(fout);
        (cmd, true)
    } else {
        // xdg-open hands the file over to the desktop and returns at once
        let mut cmd = Command::new("xdg-open");
        cmd.arg(fout);
        (cmd, false)
    }
}

fn run_viewer(mut cmd: Command) -> Result<(), PlotError> {
    log::info!("opening the chart with {:?}", cmd);
    let status = cmd.status().map_err(PlotError::Viewer)?;
    if !status.success() {
        return Err(PlotError::ViewerExit(status));
    }
    Ok(())
}

/// Blocks until a line (or end of input) is read from `input`.
fn wait_for_close<R: BufRead>(mut input: R) -> Result<(), PlotError> {
    println!("close the chart and press Enter to exit");
    let mut line = String::new();
    input.read_line(&mut line).map_err(PlotError::Viewer)?;
    Ok(())
}

/// Opens the chart with the system viewer and returns once it is closed.
/// When the launcher does not wait for the window, waits for Enter on stdin instead.
pub fn show(fout: &Path) -> Result<(), PlotError> {
    let (cmd, waits) = viewer_command(fout);
    run_viewer(cmd)?;
    if !waits {
        let stdin = std::io::stdin();
        wait_for_close(stdin.lock())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(time: TimeColumn, value: Vec<f64>) -> WindSeries {
        WindSeries {
            time,
            value,
            label: "v0".to_string(),
            total_rows: 4,
        }
    }

    fn render(s: &WindSeries) -> Result<String, PlotError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (800, 400)).into_drawing_area();
            s.draw(&root)?;
            root.present()?;
        }
        Ok(svg)
    }

    fn minute(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, m, 0)
            .unwrap()
    }

    #[test]
    fn title_counts_all_rows() {
        let s = series(TimeColumn::Unparsed(vec!["a".to_string()]), vec![1.]);
        assert_eq!(s.title(), "LoRa WM data feed (4 datapoints)");
    }

    #[test]
    fn single_point_chart_has_title_and_axis() {
        let s = series(
            TimeColumn::Parsed {
                format: crate::time::TimeFormat::Compact,
                times: vec![minute(1)],
            },
            vec![2.0],
        );
        let svg = render(&s).unwrap();
        assert!(svg.contains("LoRa WM data feed (4 datapoints)"));
        assert!(svg.contains(VALUE_DESC));
    }

    #[test]
    fn unparsed_rows_still_render() {
        let s = series(
            TimeColumn::Unparsed(vec!["first".to_string(), "second".to_string()]),
            vec![1.0, 3.0],
        );
        let svg = render(&s).unwrap();
        assert!(svg.contains("LoRa WM data feed (4 datapoints)"));
    }

    #[test]
    fn row_labels_only_on_rows() {
        let raw = vec!["first".to_string(), "second".to_string()];
        assert_eq!(row_label(&raw, 0.0), "first");
        assert_eq!(row_label(&raw, 1.0), "second");
        assert_eq!(row_label(&raw, 0.5), "");
        assert_eq!(row_label(&raw, -1.0), "");
        assert_eq!(row_label(&raw, 2.0), "");
    }

    #[test]
    fn empty_series_is_not_drawn() {
        let s = series(TimeColumn::Unparsed(vec![]), vec![]);
        assert!(matches!(render(&s), Err(PlotError::NoData)));
    }

    #[test]
    fn value_range_handles_flat_and_non_finite() {
        assert_eq!(value_range(&[2.0, 2.0]), (1.0, 3.0));
        assert_eq!(value_range(&[f64::NAN]), (0.0, 1.0));
        assert_eq!(value_range(&[0.0, 10.0, f64::INFINITY]), (-1.0, 11.0));
    }

    #[test]
    fn launcher_blocks_or_falls_back_to_stdin() {
        let (cmd, waits) = viewer_command(Path::new("feed.svg"));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args.last().copied(), Some(std::ffi::OsStr::new("feed.svg")));
        assert_eq!(waits, cfg!(any(target_os = "macos", target_os = "windows")));
    }

    #[test]
    fn wait_for_close_returns_on_enter_or_eof() {
        assert!(wait_for_close(std::io::Cursor::new("\n")).is_ok());
        assert!(wait_for_close(std::io::Cursor::new("")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn viewer_failures_are_errors() {
        assert!(run_viewer(Command::new("true")).is_ok());
        assert!(matches!(
            run_viewer(Command::new("false")),
            Err(PlotError::ViewerExit(_))
        ));
        assert!(matches!(
            run_viewer(Command::new("wm-plot-no-such-viewer")),
            Err(PlotError::Viewer(_))
        ));
    }
}
