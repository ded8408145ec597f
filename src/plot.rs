use super::{DEFAULT_SERIES, VERSION};
use clap::{App, Arg, ErrorKind};
use std::ffi::OsString;
use std::path::PathBuf;

/// What the plot binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub csvin: PathBuf,
    pub svgout: PathBuf,
    pub series: usize,
    pub strict_time: bool,
    pub show: bool,
}

fn is_index(s: String) -> Result<(), String> {
    s.parse::<usize>()
        .map(|_| ())
        .map_err(|_| format!("{:?} is not a zero-based column index", s))
}

/// Parses the given arguments, the first one being the program name.
pub fn parse_cli_from<I, T>(args: I) -> Result<PlotConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the csv file with the WM data feed")
        .short("c")
        .long("csvFile")
        .takes_value(true)
        .required(true);
    let arg_series = Arg::with_name("series")
        .help("zero-based index of the column to plot, column 0 is the time")
        .short("s")
        .long("series")
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(is_index)
        .default_value("1");
    let arg_svgout = Arg::with_name("output_svgfile")
        .help("name of the output svg file, defaults to the csv name with svg extension")
        .short("o")
        .long("svgFile")
        .takes_value(true);
    let arg_strict = Arg::with_name("strict_time")
        .help("stop when no timestamp format matches the time column")
        .long("strict-time")
        .takes_value(false);
    let arg_no_show = Arg::with_name("no_show")
        .help("only write the svg, do not open the chart viewer")
        .long("no-show")
        .takes_value(false);
    let cli_args = App::new("wm_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Andy Maginnis")
        .about("cli app to plot one series of the LoRa WM csv data feed against time")
        .arg(arg_csvin)
        .arg(arg_series)
        .arg(arg_svgout)
        .arg(arg_strict)
        .arg(arg_no_show)
        .get_matches_from_safe(args)?;
    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let svgout = match cli_args.value_of("output_svgfile") {
        Some(p) => PathBuf::from(p),
        None => {
            let mut svgout = csvin.clone();
            svgout.set_extension("svg");
            svgout
        }
    };
    let series = cli_args
        .value_of("series")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_SERIES);
    Ok(PlotConfig {
        csvin,
        svgout,
        series,
        strict_time: cli_args.is_present("strict_time"),
        show: !cli_args.is_present("no_show"),
    })
}

/// Takes the CLI arguments that control the plotting of the WM series.
/// Help and version exit with 0, any other argument error prints the usage and exits with 2.
pub fn parse_cli() -> PlotConfig {
    match parse_cli_from(std::env::args_os()) {
        Ok(config) => config,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                println!("{}", e.message);
                std::process::exit(2);
            }
        },
    }
}
