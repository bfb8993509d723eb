use chrono::Utc;
use homewidgets::{
    clock,
    fuel::DEFAULT_PARAMS,
    refresh_fuel,
    store::{FileLog, JsonFileStore},
    widget::{self, Render},
    Result,
};
use std::{io, path::PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "fuelcalc", about = "Fuel consumption with a log of every change")]
struct Opt {
    /// Fill up as liter|km|price
    #[structopt(long, default_value = DEFAULT_PARAMS)]
    params: String,
    /// Directory holding the marker and the log file
    #[structopt(long, parse(from_os_str), default_value = ".")]
    dir: PathBuf,
    /// Offset of local time from UTC in hours, defaults to the host's
    #[structopt(long, allow_hyphen_values = true)]
    utc_offset: Option<f64>,
    /// Output format: text or json
    #[structopt(long, default_value = "text")]
    format: widget::Format,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    log::debug!("{:?}", opt);

    let mut store = JsonFileStore::in_dir(&opt.dir);
    let mut log = FileLog::in_dir(&opt.dir);
    let utc_offset = opt.utc_offset.unwrap_or_else(clock::host_utc_offset);

    let widget = refresh_fuel(&opt.params, &mut store, &mut log, Utc::now(), utc_offset)?;
    widget::renderer(opt.format, io::stdout().lock()).render(&widget)?;
    Ok(())
}
