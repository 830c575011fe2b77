//! Heliocentric position oracle.
//!
//! Time is expressed in Julian millennia of TT since J2000.0, the parameter
//! analytical series such as VSOP87 take. Positions are ecliptic J2000
//! coordinates in AU.

use crate::body::Body;
use chrono::{DateTime, Utc};

pub const J2000_JD: f64 = 2_451_545.0;
pub const DAYS_PER_MILLENNIUM: f64 = 365_250.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// TT - UTC since 2017 (32.184 s + 37 leap seconds).
const TT_MINUS_UTC_SECS: f64 = 69.184;

pub trait Ephemeris {
    /// Heliocentric `[x, y, z]` of `body` in AU at `t` Julian millennia
    /// since J2000.0.
    fn position(&self, body: Body, t: f64) -> [f64; 3];
}

impl<F> Ephemeris for F
where
    F: Fn(Body, f64) -> [f64; 3],
{
    fn position(&self, body: Body, t: f64) -> [f64; 3] {
        self(body, t)
    }
}

/// Julian Date (TT) of a UTC instant.
pub fn julian_date_tt(time: DateTime<Utc>) -> f64 {
    let secs = time.timestamp() as f64 + time.timestamp_subsec_nanos() as f64 * 1e-9;
    (secs + TT_MINUS_UTC_SECS) / 86_400.0 + UNIX_EPOCH_JD
}

/// Julian millennia (TT) since J2000.0.
pub fn julian_millennia(time: DateTime<Utc>) -> f64 {
    (julian_date_tt(time) - J2000_JD) / DAYS_PER_MILLENNIUM
}

/// Keplerian elements at J2000 with rates per Julian century.
/// Angles in degrees.
#[derive(Clone, Copy, Debug)]
struct Elements {
    a: (f64, f64),
    e: (f64, f64),
    incl: (f64, f64),
    mean_long: (f64, f64),
    long_peri: (f64, f64),
    long_node: (f64, f64),
    /// Extra mean anomaly terms `b*T^2 + c*cos(f*T) + s*sin(f*T)` for the
    /// giant planets, in degrees.
    correction: Option<Correction>,
}

#[derive(Clone, Copy, Debug)]
struct Correction {
    b: f64,
    c: f64,
    s: f64,
    f: f64,
}

/// JPL approximate positions of the major planets (Standish), the long
/// 3000 BC to 3000 AD fit. Earth uses the Earth-Moon barycenter.
fn elements(body: Body) -> Option<Elements> {
    let el = match body {
        Body::Sun => return None,
        Body::Mercury => Elements {
            a: (0.387_098_43, 0.0),
            e: (0.205_636_61, 0.000_021_23),
            incl: (7.005_594_32, -0.005_901_58),
            mean_long: (252.251_667_24, 149_472.674_866_23),
            long_peri: (77.457_718_95, 0.159_400_13),
            long_node: (48.339_618_19, -0.122_141_82),
            correction: None,
        },
        Body::Venus => Elements {
            a: (0.723_321_02, -0.000_000_26),
            e: (0.006_763_99, -0.000_051_07),
            incl: (3.397_775_45, 0.000_434_94),
            mean_long: (181.979_708_50, 58_517.815_602_60),
            long_peri: (131.767_557_13, 0.056_796_48),
            long_node: (76.672_614_96, -0.272_741_74),
            correction: None,
        },
        Body::Earth => Elements {
            a: (1.000_000_18, -0.000_000_03),
            e: (0.016_731_63, -0.000_036_61),
            incl: (-0.000_543_46, -0.013_371_78),
            mean_long: (100.466_915_72, 35_999.373_063_29),
            long_peri: (102.930_058_85, 0.317_952_60),
            long_node: (-5.112_603_89, -0.241_238_56),
            correction: None,
        },
        Body::Mars => Elements {
            a: (1.523_712_43, 0.000_000_97),
            e: (0.093_365_11, 0.000_091_49),
            incl: (1.851_818_69, -0.007_247_57),
            mean_long: (-4.568_131_64, 19_140.299_342_43),
            long_peri: (-23.917_447_84, 0.452_236_25),
            long_node: (49.713_209_84, -0.268_524_31),
            correction: None,
        },
        Body::Jupiter => Elements {
            a: (5.202_480_19, -0.000_028_64),
            e: (0.048_535_90, 0.000_180_26),
            incl: (1.298_614_16, -0.003_226_99),
            mean_long: (34.334_791_52, 3_034.903_717_57),
            long_peri: (14.274_952_44, 0.181_991_96),
            long_node: (100.292_826_54, 0.130_246_19),
            correction: Some(Correction {
                b: -0.000_124_52,
                c: 0.060_640_60,
                s: -0.356_354_38,
                f: 38.351_250_00,
            }),
        },
        Body::Saturn => Elements {
            a: (9.541_498_83, -0.000_030_65),
            e: (0.055_508_25, -0.000_320_44),
            incl: (2.494_241_02, 0.004_519_69),
            mean_long: (50.075_713_29, 1_222.114_947_24),
            long_peri: (92.861_360_63, 0.541_794_78),
            long_node: (113.639_987_02, -0.250_150_02),
            correction: Some(Correction {
                b: 0.000_258_99,
                c: -0.134_344_69,
                s: 0.873_201_47,
                f: 38.351_250_00,
            }),
        },
        Body::Uranus => Elements {
            a: (19.187_979_48, -0.000_204_55),
            e: (0.046_857_40, -0.000_015_50),
            incl: (0.772_981_27, -0.001_801_55),
            mean_long: (314.202_766_25, 428.495_125_95),
            long_peri: (172.434_044_41, 0.092_669_85),
            long_node: (73.962_502_15, 0.057_396_99),
            correction: Some(Correction {
                b: 0.000_583_31,
                c: -0.977_318_48,
                s: 0.176_892_45,
                f: 7.670_250_00,
            }),
        },
        Body::Neptune => Elements {
            a: (30.069_527_52, 0.000_064_47),
            e: (0.008_954_39, 0.000_008_18),
            incl: (1.770_055_20, 0.000_224_00),
            mean_long: (304.222_892_87, 218.465_153_14),
            long_peri: (46.681_587_24, 0.010_099_38),
            long_node: (131.786_358_53, -0.006_063_02),
            correction: Some(Correction {
                b: -0.000_413_48,
                c: 0.683_463_18,
                s: -0.101_625_47,
                f: 7.670_250_00,
            }),
        },
    };
    Some(el)
}

/// Mean anomaly in degrees, wrapped to (-180, 180], `centuries` since J2000.
fn mean_anomaly(el: &Elements, centuries: f64) -> f64 {
    let at = |(v0, rate): (f64, f64)| v0 + rate * centuries;
    let mut m = at(el.mean_long) - at(el.long_peri);
    if let Some(k) = el.correction {
        let ft = (k.f * centuries).to_radians();
        m += k.b * centuries * centuries + k.c * ft.cos() + k.s * ft.sin();
    }
    wrap_degrees(m)
}

fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ea = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..15 {
        let delta = (ea - e * ea.sin() - mean_anomaly) / (1.0 - e * ea.cos());
        ea -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

fn wrap_degrees(mut a: f64) -> f64 {
    a = a.rem_euclid(360.0);
    if a > 180.0 {
        a -= 360.0;
    }
    a
}

/// Two-body Keplerian oracle. Good to a few tens of arc minutes between
/// 3000 BC and 3000 AD, which is ample for a scene whose smallest marker is
/// one pixel.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeplerEphemeris;

impl Ephemeris for KeplerEphemeris {
    fn position(&self, body: Body, t: f64) -> [f64; 3] {
        let Some(el) = elements(body) else {
            return [0.0, 0.0, 0.0];
        };
        let centuries = t * 10.0;
        let at = |(v0, rate): (f64, f64)| v0 + rate * centuries;

        let a = at(el.a);
        let e = at(el.e);
        let incl = at(el.incl).to_radians();
        let long_peri = at(el.long_peri);
        let long_node = at(el.long_node);

        let arg_peri = (long_peri - long_node).to_radians();
        let node = long_node.to_radians();
        let m = mean_anomaly(&el, centuries).to_radians();
        let ea = solve_kepler(m, e);

        let x_op = a * (ea.cos() - e);
        let y_op = a * (1.0 - e * e).sqrt() * ea.sin();

        let (sin_w, cos_w) = arg_peri.sin_cos();
        let (sin_o, cos_o) = node.sin_cos();
        let (sin_i, cos_i) = incl.sin_cos();

        let x = (cos_w * cos_o - sin_w * sin_o * cos_i) * x_op
            + (-sin_w * cos_o - cos_w * sin_o * cos_i) * y_op;
        let y = (cos_w * sin_o + sin_w * cos_o * cos_i) * x_op
            + (-sin_w * sin_o + cos_w * cos_o * cos_i) * y_op;
        let z = (sin_w * sin_i) * x_op + (cos_w * sin_i) * y_op;
        [x, y, z]
    }
}
