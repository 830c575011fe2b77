//! Host-facing facade: one clock, one sampled scene, one view toggle.

use crate::bounds::{BoundsTable, OrbitBoundsSampler};
use crate::draw::DrawCommand;
use crate::ephemeris::Ephemeris;
use crate::playback::PlaybackClock;
use crate::scene::{SceneRenderer, Viewport};
use crate::Result;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::debug;

pub struct Planetarium<E> {
    clock: PlaybackClock,
    scene: SceneRenderer<E>,
    only_inner: bool,
}

impl<E: Ephemeris> Planetarium<E> {
    /// Samples orbit bounds from `start` and parks the clock there, paused.
    pub fn new(start: DateTime<Utc>, oracle: E) -> Result<Self> {
        let bounds = OrbitBoundsSampler::new(start).sample(&oracle)?;
        Ok(Self::with_bounds(start, bounds, oracle))
    }

    pub fn with_bounds(start: DateTime<Utc>, bounds: BoundsTable, oracle: E) -> Self {
        Self {
            clock: PlaybackClock::new(start),
            scene: SceneRenderer::new(bounds, oracle),
            only_inner: false,
        }
    }

    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.scene = self.scene.with_display_offset(offset);
        self
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn scene(&self) -> &SceneRenderer<E> {
        &self.scene
    }

    pub fn only_inner(&self) -> bool {
        self.only_inner
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    pub fn tick(&mut self) -> bool {
        self.clock.tick()
    }

    pub fn fast_forward(&mut self) {
        self.clock.fast_forward();
    }

    pub fn rewind(&mut self) {
        self.clock.rewind();
    }

    pub fn toggle_play_pause(&mut self) -> bool {
        self.clock.toggle_play_pause()
    }

    pub fn toggle_only_inner(&mut self) -> bool {
        self.only_inner = !self.only_inner;
        debug!(only_inner = self.only_inner, "view toggled");
        self.only_inner
    }

    pub fn render(&self, viewport: Viewport) -> Result<Vec<DrawCommand>> {
        self.scene.draw(
            self.clock.time(),
            self.clock.speed_label(),
            viewport,
            self.only_inner,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::ephemeris::KeplerEphemeris;
    use crate::scene::SCALE_CANDIDATES;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn real_ephemeris_scene_renders() {
        let mut p = Planetarium::new(start(), KeplerEphemeris).unwrap();
        assert_eq!(p.scene().bounds().len(), 8);

        let neptune = p.scene().bounds().max_orbit_diameter(Body::Neptune).unwrap();
        assert!(neptune > 59.0 && neptune < 61.5, "neptune diameter {neptune}");
        let mercury = p.scene().bounds().min_orbit_approach(Body::Mercury).unwrap();
        assert!(mercury > 0.2 && mercury < 0.47, "mercury approach {mercury}");

        let big = Viewport::new(3000.0, 2000.0);
        let scale = p.scene().select_scale(big, false).unwrap();
        assert_eq!(scale.body, SCALE_CANDIDATES[0]);

        p.toggle_only_inner();
        let scale = p.scene().select_scale(big, p.only_inner()).unwrap();
        assert_eq!(scale.body, Body::Mars);

        let cmds = p.render(Viewport::new(160.0, 96.0)).unwrap();
        assert_eq!(cmds.len(), 19);
    }

    #[test]
    fn intents_drive_the_clock() {
        let bounds: BoundsTable = Body::PLANETS
            .iter()
            .map(|b| {
                let mut o = crate::bounds::OrbitBounds::EMPTY;
                o.include(-1.0, -1.0);
                o.include(1.0, 1.0);
                (*b, o)
            })
            .collect();
        let mut p = Planetarium::with_bounds(start(), bounds, |_: Body, _: f64| [0.0, 0.0, 0.0]);

        assert!(!p.tick());
        assert!(p.toggle_play_pause());
        assert!(p.tick());
        assert!(p.clock().time() > start());

        p.rewind();
        assert!(!p.clock().is_running());
        p.rewind();
        assert!(p.clock().is_running());
        let before = p.clock().time();
        p.tick();
        assert!(p.clock().time() < before);

        p.advance(Duration::days(1));
        assert!(p.clock().speed_label().ends_with(" d"));
        assert!(p.render(Viewport::new(200.0, 200.0)).is_ok());
    }
}
