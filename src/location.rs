use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::fmt;

/// A position on earth in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(anyhow!("latitude {} is not within [-90, 90]", latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow!("longitude {} is not within [-180, 180]", longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.3} Lon: {:.3}", self.latitude, self.longitude)
    }
}

/// Source of the device position.
#[async_trait]
pub trait Locate: Send + Sync {
    async fn current(&self) -> Result<GeoCoordinate>;
}

/// A position known up front, e.g. from the command line.
#[derive(Debug, Clone)]
pub struct FixedLocation(GeoCoordinate);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self(GeoCoordinate::new(latitude, longitude)?))
    }
}

#[async_trait]
impl Locate for FixedLocation {
    async fn current(&self) -> Result<GeoCoordinate> {
        log::debug!("using fixed location {}", self.0);
        Ok(self.0)
    }
}
