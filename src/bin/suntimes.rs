use chrono::{Local, NaiveDate};
use homewidgets::{
    clock,
    location::FixedLocation,
    refresh_daylight,
    widget::{self, Render},
    Result,
};
use std::io;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "suntimes", about = "Sunrise, sunset and daylight duration")]
struct Opt {
    /// Latitude in degrees, north is positive
    #[structopt(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in degrees, east is positive
    #[structopt(long, allow_hyphen_values = true)]
    lon: f64,
    /// Day to compute, defaults to today
    #[structopt(long)]
    date: Option<NaiveDate>,
    /// Offset of local time from UTC in hours, defaults to the host's
    #[structopt(long, allow_hyphen_values = true)]
    utc_offset: Option<f64>,
    /// Output format: text or json
    #[structopt(long, default_value = "text")]
    format: widget::Format,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    log::debug!("{:?}", opt);

    let locator = FixedLocation::new(opt.lat, opt.lon)?;
    let date = opt.date.unwrap_or_else(|| Local::now().date_naive());
    let utc_offset = opt.utc_offset.unwrap_or_else(clock::host_utc_offset);

    let widget = refresh_daylight(&locator, date, utc_offset).await?;
    widget::renderer(opt.format, io::stdout().lock()).render(&widget)?;
    Ok(())
}
