//! Cosmetic particle bursts driven by simulation events
//!
//! Particles never feed back into gameplay. They draw from the session's
//! cosmetic RNG stream so spawning them cannot change a level layout.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, ParticleColor};
use crate::direction_from_angle;

/// Shape of a burst
#[derive(Debug, Clone, Copy)]
pub struct Burst {
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Life lost per second
    pub decay: f32,
    pub radius: f32,
    pub color: ParticleColor,
}

impl Burst {
    pub const COLLECT: Burst = Burst {
        count: 8,
        min_speed: 40.0,
        max_speed: 110.0,
        decay: 2.5,
        radius: 2.5,
        color: ParticleColor::Ball,
    };

    pub const BONUS: Burst = Burst {
        count: 14,
        min_speed: 60.0,
        max_speed: 150.0,
        decay: 1.8,
        radius: 3.0,
        color: ParticleColor::Bonus,
    };

    pub const DEPOSIT: Burst = Burst {
        count: 20,
        min_speed: 50.0,
        max_speed: 160.0,
        decay: 1.5,
        radius: 3.5,
        color: ParticleColor::Basket,
    };

    pub const HIT: Burst = Burst {
        count: 16,
        min_speed: 90.0,
        max_speed: 220.0,
        decay: 2.2,
        radius: 3.0,
        color: ParticleColor::Impact,
    };
}

/// Emit a radial burst at `origin`, never growing the pool past `max`
pub fn emit<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    origin: Vec2,
    burst: &Burst,
    max: usize,
) {
    let room = max.saturating_sub(particles.len());
    for _ in 0..burst.count.min(room) {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = burst.min_speed + rng.random::<f32>() * (burst.max_speed - burst.min_speed);
        particles.push(Particle {
            pos: origin,
            vel: direction_from_angle(angle) * speed,
            life: 1.0,
            decay: burst.decay,
            radius: burst.radius,
            color: burst.color,
        });
    }
}

/// Advance particles by `dt` seconds and drop the dead ones
pub fn update(particles: &mut Vec<Particle>, dt: f32) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.96;
        particle.life -= particle.decay * dt;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_emit_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        emit(&mut particles, &mut rng, Vec2::ZERO, &Burst::DEPOSIT, 12);
        assert_eq!(particles.len(), 12);
        emit(&mut particles, &mut rng, Vec2::ZERO, &Burst::HIT, 12);
        assert_eq!(particles.len(), 12);
    }

    #[test]
    fn test_emit_speeds_in_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Vec::new();
        emit(&mut particles, &mut rng, Vec2::new(5.0, 5.0), &Burst::HIT, 100);
        assert_eq!(particles.len(), Burst::HIT.count);
        for p in &particles {
            let speed = p.vel.length();
            assert!(speed >= Burst::HIT.min_speed - 0.01);
            assert!(speed <= Burst::HIT.max_speed + 0.01);
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn test_update_moves_and_expires() {
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: 1.0,
            decay: 2.0,
            radius: 1.0,
            color: ParticleColor::Ball,
        }];
        update(&mut particles, 0.25);
        assert_eq!(particles.len(), 1);
        assert!((particles[0].pos.x - 25.0).abs() < 1e-4);
        assert!((particles[0].life - 0.5).abs() < 1e-6);

        update(&mut particles, 0.3);
        assert!(particles.is_empty());
    }
}
