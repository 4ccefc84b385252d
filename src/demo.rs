//! Headless scripted sessions
//!
//! A seeded pointer wanders over the grid at varying speeds and clicks at a
//! fixed cadence, driving a [`DotGrid`] against the CPU [`Raster`]. Same seed,
//! same session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::GridConfig;
use crate::grid::{DotGrid, StaticHost, SurfaceSize};
use crate::renderer::{FrameReport, Raster};

/// One synthetic input event, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptEvent {
    Move(Vec2),
    Click(Vec2),
}

/// Seeded wandering pointer
#[derive(Debug, Clone)]
pub struct PointerScript {
    rng: Pcg32,
    size: SurfaceSize,
    position: Vec2,
    heading: f32,
    /// px/s
    speed: f32,
    click_every_ms: f64,
    next_click: f64,
}

impl PointerScript {
    pub fn new(seed: u64, size: SurfaceSize, click_every_ms: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let position = Vec2::new(
            rng.random_range(0.0..size.width.max(1.0)),
            rng.random_range(0.0..size.height.max(1.0)),
        );
        let heading = rng.random_range(0.0..std::f32::consts::TAU);
        Self {
            rng,
            size,
            position,
            heading,
            speed: 600.0,
            click_every_ms,
            next_click: click_every_ms,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Advance the pointer by `dt_ms` and emit the events for time `now`
    pub fn step(&mut self, now: f64, dt_ms: f64, out: &mut Vec<ScriptEvent>) {
        if self.rng.random_bool(0.05) {
            self.speed = self.rng.random_range(20.0..3000.0);
        }
        self.heading += self.rng.random_range(-0.4..0.4);

        let dt = (dt_ms / 1000.0) as f32;
        let mut next = self.position + Vec2::from_angle(self.heading) * self.speed * dt;

        // Bounce off the edges
        if next.x < 0.0 || next.x > self.size.width {
            self.heading = std::f32::consts::PI - self.heading;
            next.x = next.x.clamp(0.0, self.size.width);
        }
        if next.y < 0.0 || next.y > self.size.height {
            self.heading = -self.heading;
            next.y = next.y.clamp(0.0, self.size.height);
        }
        self.position = next;
        out.push(ScriptEvent::Move(next));

        if self.click_every_ms > 0.0 && now >= self.next_click {
            self.next_click += self.click_every_ms;
            out.push(ScriptEvent::Click(next));
        }
    }
}

/// Aggregates over a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub frames: u32,
    pub skipped: u32,
    pub dots: usize,
    pub pushes: usize,
    pub clicks: u32,
    pub peak_displaced: usize,
    pub peak_highlighted: usize,
    /// Dots still animating at the end
    pub displaced_at_end: usize,
    pub coverage_at_end: usize,
}

/// Session parameters
#[derive(Debug, Clone)]
pub struct Session {
    pub config: GridConfig,
    pub host: StaticHost,
    pub seed: u64,
    /// Simulated seconds of scripted input
    pub seconds: f32,
    /// Extra simulated seconds with no input, to let dots settle
    pub settle_seconds: f32,
    pub fps: f32,
    pub click_every_ms: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            config: GridConfig::default(),
            host: StaticHost::new(800.0, 400.0),
            seed: 42,
            seconds: 5.0,
            settle_seconds: 0.0,
            fps: 60.0,
            click_every_ms: 1200.0,
        }
    }
}

impl Session {
    pub fn run(&self) -> SessionStats {
        let mut grid = DotGrid::new(self.config.clone());
        let mut raster = Raster::new();
        let mut script = PointerScript::new(self.seed, self.host.size, self.click_every_ms);
        let mut events = Vec::new();
        let mut stats = SessionStats::default();

        let dt_ms = 1000.0 / self.fps.max(1.0) as f64;
        let scripted = (self.seconds * self.fps).ceil() as u32;
        let total = scripted + (self.settle_seconds * self.fps).ceil() as u32;
        let origin = Vec2::ZERO;

        grid.mount(0.0);
        for i in 0..total {
            let now = i as f64 * dt_ms;
            if i < scripted {
                events.clear();
                script.step(now, dt_ms, &mut events);
                for event in &events {
                    match *event {
                        ScriptEvent::Move(client) => stats.pushes += grid.pointer_moved(client, origin, now),
                        ScriptEvent::Click(client) => {
                            stats.clicks += 1;
                            stats.pushes += grid.clicked(client, origin);
                        }
                    }
                }
            }

            match grid.frame(now, &self.host, &mut raster) {
                FrameReport::Skipped => stats.skipped += 1,
                FrameReport::Painted { dots, highlighted } => {
                    stats.dots = dots;
                    stats.peak_highlighted = stats.peak_highlighted.max(highlighted);
                }
            }
            stats.peak_displaced = stats.peak_displaced.max(grid.displaced());
            stats.frames += 1;

            if i > 0 && i % (self.fps as u32).max(1) == 0 {
                log::debug!(
                    "t={:.1}s displaced={} pointer={:?}",
                    now / 1000.0,
                    grid.displaced(),
                    grid.pointer()
                );
            }
        }

        stats.displaced_at_end = grid.displaced();
        stats.coverage_at_end = raster.coverage();
        grid.unmount();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_deterministic() {
        let size = SurfaceSize::new(800.0, 400.0);
        let mut a = PointerScript::new(7, size, 500.0);
        let mut b = PointerScript::new(7, size, 500.0);
        let (mut ea, mut eb) = (Vec::new(), Vec::new());
        for i in 0..120 {
            a.step(i as f64 * 16.0, 16.0, &mut ea);
            b.step(i as f64 * 16.0, 16.0, &mut eb);
        }
        assert_eq!(ea, eb);
        assert!(ea.iter().any(|e| matches!(e, ScriptEvent::Click(_))));
    }

    #[test]
    fn test_script_stays_on_surface() {
        let size = SurfaceSize::new(300.0, 200.0);
        let mut script = PointerScript::new(3, size, 0.0);
        let mut events = Vec::new();
        for i in 0..2000 {
            script.step(i as f64 * 16.0, 16.0, &mut events);
        }
        for event in events {
            let ScriptEvent::Move(p) = event else {
                panic!("clicks disabled");
            };
            assert!(p.x >= 0.0 && p.x <= 300.0 && p.y >= 0.0 && p.y <= 200.0);
        }
    }

    #[test]
    fn test_session_pushes_and_settles() {
        let session = Session {
            seconds: 4.0,
            settle_seconds: 4.0,
            ..Default::default()
        };
        let stats = session.run();
        assert_eq!(stats.dots, 153);
        assert_eq!(stats.skipped, 0);
        assert!(stats.clicks >= 3);
        assert!(stats.pushes > 0);
        assert!(stats.peak_displaced > 0);
        assert_eq!(stats.displaced_at_end, 0);
        assert!(stats.coverage_at_end > 0);
    }
}
