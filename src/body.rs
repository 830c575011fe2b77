use crate::draw::Rgb;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// How often a body is sampled while walking the bounds horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    /// Day index (exclusive) after which the body is no longer sampled.
    /// `None` samples across the whole horizon.
    pub cutoff_day: Option<u32>,
    /// Sample only on days where `day % stride == 0`.
    pub stride: u32,
}

impl Cadence {
    pub const fn new(cutoff_day: Option<u32>, stride: u32) -> Self {
        Self { cutoff_day, stride }
    }

    pub fn samples_on(&self, day: u32) -> bool {
        let in_window = self.cutoff_day.map_or(true, |cutoff| day < cutoff);
        in_window && day % self.stride.max(1) == 0
    }
}

impl Body {
    /// Sun first, then the planets outward. Also the marker draw order.
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// The eight planets, Mercury outward. Also the orbit draw order.
    pub const PLANETS: [Body; 8] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Body::Sun => Rgb::from_hex(0xFCE570),
            Body::Mercury => Rgb::from_hex(0xB7B8B9),
            Body::Venus => Rgb::from_hex(0x968396),
            Body::Earth => Rgb::from_hex(0x287AB8),
            Body::Mars => Rgb::from_hex(0x9C2E35),
            Body::Jupiter => Rgb::from_hex(0xBCAFB2),
            Body::Saturn => Rgb::from_hex(0xAB604A),
            Body::Uranus => Rgb::from_hex(0xB2D6DB),
            Body::Neptune => Rgb::from_hex(0x2990B5),
        }
    }

    /// Marker radius in pixels before the inner-view disk factor.
    /// The Sun is sized separately from Mercury's orbit.
    pub fn marker_radius(self) -> f32 {
        match self {
            Body::Sun => 0.0,
            Body::Mercury | Body::Mars => 1.0,
            Body::Venus | Body::Earth | Body::Uranus | Body::Neptune => 2.0,
            Body::Saturn => 3.0,
            Body::Jupiter => 4.0,
        }
    }

    /// Orbit sampling cadence, roughly proportional to the orbital period.
    pub fn cadence(self) -> Option<Cadence> {
        match self {
            Body::Sun => None,
            Body::Mercury => Some(Cadence::new(Some(88), 1)),
            Body::Venus => Some(Cadence::new(Some(225), 2)),
            Body::Earth => Some(Cadence::new(Some(365), 2)),
            Body::Mars => Some(Cadence::new(Some(687), 3)),
            Body::Jupiter => Some(Cadence::new(Some(4320), 4)),
            Body::Saturn => Some(Cadence::new(Some(10767), 5)),
            Body::Uranus => Some(Cadence::new(Some(30646), 15)),
            Body::Neptune => Some(Cadence::new(None, 24)),
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
