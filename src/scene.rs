//! Viewport scale selection and draw command emission.

use crate::body::Body;
use crate::bounds::BoundsTable;
use crate::draw::{DrawCommand, Rgb};
use crate::ephemeris::{julian_millennia, Ephemeris};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::cell::Cell;
use tracing::debug;

/// Outer bodies tried for the whole-system view, outermost first.
pub const SCALE_CANDIDATES: [Body; 4] = [Body::Neptune, Body::Uranus, Body::Saturn, Body::Jupiter];
pub const FALLBACK_SCALE_BODY: Body = Body::Mars;
/// A candidate must resolve to more than this many pixels per AU.
pub const MIN_PIXELS_PER_AU: f64 = 20.0;
/// Shrinks the chosen scale so the fitted orbit keeps some room.
pub const MARGIN: f64 = 0.9;

pub const BACKGROUND: Rgb = Rgb::from_hex(0x717378);
pub const INK: Rgb = Rgb::BLACK;
pub const LABEL_POS: (f32, f32) = (5.0, 25.0);
const SUN_DESIRED_RADIUS: f32 = 25.0;
const SUN_MIN_RADIUS: f32 = 2.0;
const INNER_DISK_FACTOR: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }
}

/// Chosen pixels-per-AU, margin already applied, and the body it fits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub body: Body,
    pub pixels_per_au: f64,
}

impl Scale {
    pub fn au_to_pixels(&self, au: f64) -> f32 {
        (self.pixels_per_au * au) as f32
    }
}

pub struct SceneRenderer<E> {
    bounds: BoundsTable,
    oracle: E,
    display_offset: FixedOffset,
    last_scale_body: Cell<Option<Body>>,
}

impl<E: Ephemeris> SceneRenderer<E> {
    pub fn new(bounds: BoundsTable, oracle: E) -> Self {
        Self {
            bounds,
            oracle,
            display_offset: Utc.fix(),
            last_scale_body: Cell::new(None),
        }
    }

    /// Offset used for the date in the readout. UTC by default.
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }

    pub fn bounds(&self) -> &BoundsTable {
        &self.bounds
    }

    /// `None` when the body is missing or its orbit has no usable diameter.
    fn pixel_scale(&self, body: Body, min_side: f64) -> Option<f64> {
        let diameter = self.bounds.max_orbit_diameter(body).ok()?;
        if !(diameter > 0.0 && diameter.is_finite()) {
            return None;
        }
        let scale = min_side / diameter;
        scale.is_finite().then_some(scale)
    }

    pub fn select_scale(&self, viewport: Viewport, only_inner: bool) -> Result<Scale> {
        let d = f64::from(viewport.min_side());

        let outer = if only_inner {
            None
        } else {
            SCALE_CANDIDATES.iter().find_map(|&body| {
                self.pixel_scale(body, d)
                    .filter(|s| *s > MIN_PIXELS_PER_AU)
                    .map(|s| (body, s))
            })
        };

        let (body, scale) = match outer {
            Some(found) => found,
            None => {
                self.bounds.get(FALLBACK_SCALE_BODY)?;
                let s = self
                    .pixel_scale(FALLBACK_SCALE_BODY, d)
                    .ok_or(Error::DegenerateOrbit(FALLBACK_SCALE_BODY))?;
                (FALLBACK_SCALE_BODY, s)
            }
        };

        if self.last_scale_body.replace(Some(body)) != Some(body) {
            debug!(%body, pixels_per_au = scale * MARGIN, "viewport scale body");
        }
        Ok(Scale {
            body,
            pixels_per_au: scale * MARGIN,
        })
    }

    /// Sun disc radius, shrunk so it never covers Mercury's closest approach.
    /// Always within `[2, 25]` pixels.
    pub fn sun_radius(&self, scale: Scale, only_inner: bool) -> Result<f32> {
        let min_distance = SUN_DESIRED_RADIUS / 5.0 * disk_factor(only_inner);
        let approach = scale.au_to_pixels(self.bounds.min_orbit_approach(Body::Mercury)?);
        Ok(SUN_DESIRED_RADIUS.min(SUN_MIN_RADIUS.max(approach - min_distance)))
    }

    fn position(&self, body: Body, t: f64) -> Result<(f64, f64)> {
        let [x, y, _] = self.oracle.position(body, t);
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::NonFinitePosition { body, t });
        }
        Ok((x, y))
    }

    /// Full frame, back to front: background, readout, orbits, markers.
    pub fn draw(
        &self,
        time: DateTime<Utc>,
        speed_label: &str,
        viewport: Viewport,
        only_inner: bool,
    ) -> Result<Vec<DrawCommand>> {
        let scale = self.select_scale(viewport, only_inner)?;
        let factor = disk_factor(only_inner);
        let (cx, cy) = viewport.center();
        let mut out = Vec::with_capacity(2 + Body::PLANETS.len() + Body::ALL.len());

        out.push(DrawCommand::FillRect {
            x: 0.0,
            y: 0.0,
            width: viewport.width,
            height: viewport.height,
            color: BACKGROUND,
        });

        let local = time.with_timezone(&self.display_offset);
        out.push(DrawCommand::DrawText {
            x: LABEL_POS.0,
            y: LABEL_POS.1,
            text: format!("{} {}/s", local.format("%d/%m/%Y %H:%M:%S"), speed_label),
            color: INK,
        });

        for body in Body::PLANETS {
            let b = self.bounds.get(body)?;
            out.push(DrawCommand::DrawEllipse {
                x: scale.au_to_pixels(b.min_x) + cx,
                y: scale.au_to_pixels(b.min_y) + cy,
                width: scale.au_to_pixels(b.width()),
                height: scale.au_to_pixels(b.height()),
                color: INK,
            });
        }

        let t = julian_millennia(time);
        for body in Body::ALL {
            let (x, y) = self.position(body, t)?;
            let radius = match body {
                Body::Sun => self.sun_radius(scale, only_inner)?,
                _ => body.marker_radius() * factor,
            };
            out.push(DrawCommand::FillCircle {
                cx: scale.au_to_pixels(x) + cx,
                cy: scale.au_to_pixels(y) + cy,
                radius,
                color: body.color(),
            });
        }

        Ok(out)
    }
}

fn disk_factor(only_inner: bool) -> f32 {
    if only_inner {
        INNER_DISK_FACTOR
    } else {
        1.0
    }
}
