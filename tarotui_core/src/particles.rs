//! Disperse effect: a burst of dots flung out from the popup as it closes.
//!
//! Positions are in abstract pixels; the renderer decides how those map onto
//! its own grid. All bursts share a single driver, [`ParticleField::advance`].

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use rand::Rng;

pub const PARTICLE_COUNT: usize = 50;
pub const MIN_SPEED: f32 = 2.0;
pub const MAX_SPEED: f32 = 6.0;
pub const MIN_LIFETIME_MS: u64 = 1000;
pub const MAX_LIFETIME_MS: u64 = 2000;
/// Pixels per (speed unit × millisecond)
const DISTANCE_FACTOR: f32 = 0.1;
/// Downward drift at the end of a particle's life
const GRAVITY_PX: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Gold and violet palette the burst draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleColor {
    Gold,
    BrightGold,
    PaleGold,
    Purple,
    Orchid,
    Plum,
}

impl ParticleColor {
    pub const ALL: [ParticleColor; 6] = [
        ParticleColor::Gold,
        ParticleColor::BrightGold,
        ParticleColor::PaleGold,
        ParticleColor::Purple,
        ParticleColor::Orchid,
        ParticleColor::Plum,
    ];

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ParticleColor::Gold => (0xd4, 0xaf, 0x37),
            ParticleColor::BrightGold => (0xff, 0xd7, 0x00),
            ParticleColor::PaleGold => (0xff, 0xed, 0x4e),
            ParticleColor::Purple => (0x93, 0x70, 0xdb),
            ParticleColor::Orchid => (0xba, 0x55, 0xd3),
            ParticleColor::Plum => (0xdd, 0xa0, 0xdd),
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub origin: Point,
    pub angle: f32,
    pub speed: f32,
    pub spawned_at: Instant,
    pub lifetime: Duration,
    pub fill: ParticleColor,
    pub glow: ParticleColor,
    pub position: Point,
    pub opacity: f32,
    pub scale: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(origin: Point, now: Instant, rng: &mut R) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(MIN_SPEED..=MAX_SPEED);
        let lifetime = Duration::from_millis(rng.gen_range(MIN_LIFETIME_MS..=MAX_LIFETIME_MS));
        // Fill and glow are sampled independently
        let fill = ParticleColor::random(rng);
        let glow = ParticleColor::random(rng);

        Self {
            origin,
            angle,
            speed,
            spawned_at: now,
            lifetime,
            fill,
            glow,
            position: origin,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    /// Fraction of the lifetime used up at `now`, unclamped
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.spawned_at);
        elapsed.as_secs_f32() / self.lifetime.as_secs_f32()
    }

    /// Step to `now`. Returns false once the particle has run its course.
    pub fn advance(&mut self, now: Instant) -> bool {
        let progress = self.progress(now);
        if progress >= 1.0 {
            self.opacity = 0.0;
            return false;
        }

        let elapsed_ms = now.saturating_duration_since(self.spawned_at).as_secs_f32() * 1000.0;
        let distance = self.speed * elapsed_ms * DISTANCE_FACTOR;
        self.position = Point::new(
            self.origin.x + self.angle.cos() * distance,
            self.origin.y + self.angle.sin() * distance + progress * progress * GRAVITY_PX,
        );
        self.opacity = 1.0 - progress;
        self.scale = 1.0 + progress * 0.5;
        true
    }
}

/// One disperse effect: the container the particles live in
#[derive(Debug, Clone)]
pub struct Burst {
    pub created_at: Instant,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    bursts: Vec<Burst>,
    cleanup_after: Duration,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new(Duration::from_millis(MAX_LIFETIME_MS))
    }
}

impl ParticleField {
    pub fn new(cleanup_after: Duration) -> Self {
        Self {
            bursts: Vec::new(),
            cleanup_after,
        }
    }

    pub fn spawn_burst<R: Rng>(
        &mut self,
        origin: Point,
        count: usize,
        now: Instant,
        rng: &mut R,
    ) {
        let particles = (0..count)
            .map(|_| Particle::spawn(origin, now, &mut *rng))
            .collect();
        self.bursts.push(Burst {
            created_at: now,
            particles,
        });
    }

    /// Advance every live particle, drop finished ones, and remove bursts
    /// past their cleanup time regardless of what is left in them.
    pub fn advance(&mut self, now: Instant) {
        let cleanup_after = self.cleanup_after;
        self.bursts
            .retain(|burst| now.saturating_duration_since(burst.created_at) < cleanup_after);
        for burst in &mut self.bursts {
            burst.particles.retain_mut(|p| p.advance(now));
        }
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.bursts.iter().flat_map(|b| b.particles.iter())
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn len(&self) -> usize {
        self.bursts.iter().map(|b| b.particles.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.particles().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Instant::now();
        for _ in 0..500 {
            let p = Particle::spawn(Point::new(10.0, 20.0), now, &mut rng);
            assert!((0.0..TAU).contains(&p.angle));
            assert!((MIN_SPEED..=MAX_SPEED).contains(&p.speed));
            assert!(p.lifetime >= ms(MIN_LIFETIME_MS) && p.lifetime <= ms(MAX_LIFETIME_MS));
            assert_eq!(p.position, Point::new(10.0, 20.0));
        }
    }

    #[test]
    fn test_advance_follows_motion_formula() {
        let now = Instant::now();
        let mut p = Particle {
            origin: Point::new(100.0, 100.0),
            angle: 0.0,
            speed: 4.0,
            spawned_at: now,
            lifetime: ms(1000),
            fill: ParticleColor::Gold,
            glow: ParticleColor::Plum,
            position: Point::new(100.0, 100.0),
            opacity: 1.0,
            scale: 1.0,
        };

        assert!(p.advance(now + ms(500)));
        // distance = 4 * 500 * 0.1 = 200, gravity = 0.25 * 50
        assert!((p.position.x - 300.0).abs() < 0.01);
        assert!((p.position.y - 112.5).abs() < 0.01);
        assert!((p.opacity - 0.5).abs() < 0.001);
        assert!((p.scale - 1.25).abs() < 0.001);

        assert!(!p.advance(now + ms(1000)));
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn test_finished_particles_leave_live_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Instant::now();
        let mut field = ParticleField::default();
        field.spawn_burst(Point::default(), PARTICLE_COUNT, start, &mut rng);
        assert_eq!(field.len(), PARTICLE_COUNT);

        field.advance(start + ms(999));
        assert_eq!(field.len(), PARTICLE_COUNT);

        field.advance(start + ms(1500));
        assert!(field.particles().all(|p| p.progress(start + ms(1500)) < 1.0));
    }

    #[test]
    fn test_burst_removed_after_cleanup() {
        let mut rng = StdRng::seed_from_u64(9);
        let start = Instant::now();
        let mut field = ParticleField::new(ms(2000));
        field.spawn_burst(Point::default(), PARTICLE_COUNT, start, &mut rng);
        field.advance(start + ms(1999));
        assert_eq!(field.bursts().len(), 1);
        field.advance(start + ms(2000));
        assert!(field.is_empty());
        assert_eq!(field.len(), 0);
    }

    #[test]
    fn test_bursts_are_independent() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Instant::now();
        let mut field = ParticleField::default();
        field.spawn_burst(Point::default(), 10, start, &mut rng);
        field.spawn_burst(Point::new(5.0, 5.0), 10, start + ms(1500), &mut rng);
        field.advance(start + ms(2100));
        assert_eq!(field.bursts().len(), 1);
        assert_eq!(field.len(), 10);
    }
}
