//! Heliocentric planet scene: orbit bounds sampling, adaptive viewport scale
//! and a signed power-of-two playback clock.
//!
//! The crate never touches pixels. `Planetarium::render` returns a list of
//! [`DrawCommand`]s that a host replays onto whatever surface it owns.

pub mod body;
pub mod bounds;
pub mod draw;
pub mod ephemeris;
pub mod planetarium;
pub mod playback;
pub mod scene;

pub use body::Body;
pub use bounds::{BoundsTable, OrbitBounds, OrbitBoundsSampler};
pub use draw::{replay_all, Canvas, DrawCommand, Rgb};
pub use ephemeris::{Ephemeris, KeplerEphemeris};
pub use planetarium::Planetarium;
pub use playback::{format_speed, PlaybackClock, FRAMES_PER_SECOND, NORMAL_SPEED};
pub use scene::{SceneRenderer, Viewport};

/// Errors raised by the core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The ephemeris returned NaN or an infinite coordinate.
    #[error("ephemeris returned a non-finite position for {body} at t={t}")]
    NonFinitePosition { body: Body, t: f64 },

    /// A body was looked up in a bounds table that does not hold it.
    #[error("no orbit bounds sampled for {0}")]
    MissingBounds(Body),

    /// The fallback scale body has a zero or non-finite orbit diameter.
    #[error("orbit of {0} is degenerate, cannot derive a viewport scale")]
    DegenerateOrbit(Body),
}

pub type Result<T> = std::result::Result<T, Error>;
