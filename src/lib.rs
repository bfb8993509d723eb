pub mod clock;
pub mod fuel;
pub mod location;
pub mod store;
pub mod sun;
pub mod widget;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    clock::LocalSolarTimes,
    fuel::{detect_change, fixed_offset, format_timestamp, log_line, Change, FuelInput},
    location::Locate,
    store::{LogSink, MarkerStore},
    widget::Widget,
};

pub type Result<T> = anyhow::Result<T>;

/// Locates the device and describes the daylight widget for `date`.
pub async fn refresh_daylight<L: Locate>(
    locator: &L,
    date: NaiveDate,
    utc_offset: f64,
) -> Result<Widget> {
    let utc_offset = clock::check_offset(utc_offset)?;
    let position = locator.current().await?;
    let times = sun::compute_solar_times(date, position.latitude(), position.longitude());
    if times.is_absent() {
        match sun::polar_condition(date, position.latitude(), position.longitude()) {
            Some(condition) => log::info!("no sunrise or sunset on {}: {:?}", date, condition),
            None => log::info!("no sunrise or sunset on {}", date),
        }
    }
    let local = LocalSolarTimes::new(&times, utc_offset);
    log::debug!("utc {:?} local {:?}", times, local);
    Ok(widget::daylight_widget(&local, &position, utc_offset))
}

/// Computes consumption for `params`, records it when it changed since the
/// last run and describes the fuel widget.
pub fn refresh_fuel<S, L>(
    params: &str,
    store: &mut S,
    log: &mut L,
    now: DateTime<Utc>,
    utc_offset: f64,
) -> Result<Widget>
where
    S: MarkerStore,
    L: LogSink,
{
    let input = FuelInput::parse(params)?;
    let offset = fixed_offset(utc_offset)?;
    let previous = store.load()?;
    let detection = detect_change(&input, previous.as_ref(), now);

    if let Change::New(marker) = &detection.change {
        log::info!("fuel input changed: {:?}", input);
        // Log first so a failed append is retried on the next run.
        log.append(&log_line(&input, detection.timestamp, offset))?;
        store.save(marker)?;
    } else {
        log::debug!("fuel input unchanged since {}", detection.timestamp);
    }

    Ok(widget::fuel_widget(
        &input,
        &format_timestamp(detection.timestamp, offset),
    ))
}
