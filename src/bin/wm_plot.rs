use wm_plot::chart::show;
use wm_plot::plot::parse_cli;
use wm_plot::{PlotError, WindSeries};

fn run() -> Result<(), PlotError> {
    let config = parse_cli();
    println!("Input file is {}", config.csvin.display());
    let ws = WindSeries::from_csv(&config.csvin, config.series, config.strict_time)?;
    println!(
        "read data from {} and plot to {}",
        config.csvin.display(),
        config.svgout.display()
    );
    ws.plot_svg(&config.svgout)?;
    if config.show {
        show(&config.svgout)?;
    }
    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
