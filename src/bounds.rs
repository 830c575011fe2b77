//! Per-body orbit bounding boxes, sampled once over one full period.

use crate::body::Body;
use crate::ephemeris::{julian_millennia, Ephemeris};
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Days walked by the sampler. Covers Neptune's ~164.8 year period.
pub const SAMPLE_HORIZON_DAYS: u32 = 60_142;

/// Axis-aligned box of a heliocentric orbit in the ecliptic x/y plane, AU.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl OrbitBounds {
    /// Identity for `include`: every real point tightens it.
    pub const EMPTY: OrbitBounds = OrbitBounds {
        min_x: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        min_y: f64::INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// True once at least one point has been included.
    pub fn is_populated(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn max_diameter(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Closest the box edges come to the origin along either axis. Stands in
    /// for perihelion when sizing the Sun.
    pub fn min_approach(&self) -> f64 {
        let x = self.min_x.abs().min(self.max_x.abs());
        let y = self.min_y.abs().min(self.max_y.abs());
        x.min(y)
    }
}

/// Sampled bounds for every planet. Built once, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundsTable {
    orbits: BTreeMap<Body, OrbitBounds>,
}

impl BoundsTable {
    pub fn get(&self, body: Body) -> Result<&OrbitBounds> {
        self.orbits.get(&body).ok_or(Error::MissingBounds(body))
    }

    pub fn max_orbit_diameter(&self, body: Body) -> Result<f64> {
        self.get(body).map(OrbitBounds::max_diameter)
    }

    pub fn min_orbit_approach(&self, body: Body) -> Result<f64> {
        self.get(body).map(OrbitBounds::min_approach)
    }

    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Body, &OrbitBounds)> {
        self.orbits.iter().map(|(b, o)| (*b, o))
    }
}

impl FromIterator<(Body, OrbitBounds)> for BoundsTable {
    fn from_iter<I: IntoIterator<Item = (Body, OrbitBounds)>>(iter: I) -> Self {
        Self {
            orbits: iter.into_iter().collect(),
        }
    }
}

/// Walks whole days from `start`, evaluating each planet on the days its
/// [`Cadence`](crate::body::Cadence) selects.
#[derive(Clone, Copy, Debug)]
pub struct OrbitBoundsSampler {
    start: DateTime<Utc>,
    horizon_days: u32,
}

impl OrbitBoundsSampler {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            horizon_days: SAMPLE_HORIZON_DAYS,
        }
    }

    pub fn with_horizon(mut self, horizon_days: u32) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    pub fn sample<E: Ephemeris + ?Sized>(&self, oracle: &E) -> Result<BoundsTable> {
        info!(start = %self.start, horizon_days = self.horizon_days, "sampling orbit bounds");

        let cadences: Vec<_> = Body::PLANETS
            .iter()
            .filter_map(|b| b.cadence().map(|c| (*b, c)))
            .collect();
        let mut running: BTreeMap<Body, (OrbitBounds, u32)> = BTreeMap::new();

        for day in 0..self.horizon_days {
            let due: Vec<Body> = cadences
                .iter()
                .filter(|(_, c)| c.samples_on(day))
                .map(|(b, _)| *b)
                .collect();
            if due.is_empty() {
                continue;
            }

            let t = julian_millennia(self.start + Duration::days(i64::from(day)));
            for body in due {
                let [x, y, z] = oracle.position(body, t);
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    return Err(Error::NonFinitePosition { body, t });
                }
                let entry = running.entry(body).or_insert((OrbitBounds::EMPTY, 0));
                entry.0.include(x, y);
                entry.1 += 1;
            }
        }

        for (body, (bounds, samples)) in &running {
            debug!(
                %body,
                samples,
                diameter_au = bounds.max_diameter(),
                "orbit bounds"
            );
        }
        info!(bodies = running.len(), "orbit bounds ready");

        Ok(running
            .into_iter()
            .map(|(body, (bounds, _))| (body, bounds))
            .collect())
    }
}
