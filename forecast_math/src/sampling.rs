//! Random draws used by the stochastic models
//!
//! The random source is always passed in. Production callers hand over an
//! entropy-seeded generator; tests hand over `StdRng::seed_from_u64`.

use rand::Rng;
use std::f64::consts::PI;

/// Standard normal draw via the Box–Muller transform.
pub fn normal_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u = nonzero_unit(rng);
    let v = nonzero_unit(rng);
    (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
}

/// Uniform draw in `[-0.5, 0.5)`.
pub fn centered_uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() - 0.5
}

fn nonzero_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let draw: f64 = rng.gen();
        if draw > 0.0 {
            return draw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normal_sample_moments() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws: Vec<f64> = (0..20_000).map(|_| normal_sample(&mut rng)).collect();

        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let variance =
            draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;

        assert!(mean.abs() < 0.05, "mean was {}", mean);
        assert!((variance - 1.0).abs() < 0.05, "variance was {}", variance);
        assert!(draws.iter().all(|d| d.is_finite()));
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);

        for _ in 0..10 {
            assert_eq!(normal_sample(&mut a), normal_sample(&mut b));
        }
    }

    #[test]
    fn test_centered_uniform_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let draw = centered_uniform(&mut rng);
            assert!((-0.5..0.5).contains(&draw));
        }
    }
}
