use cgmath::Point2;

/// Deterministic scalar hash of a 2-D coordinate and an integer seed,
/// mapped into `[0, 1)`. Classic sin-based dot-product scramble; computed
/// in f64 so the fractional part survives the large multiplier.
pub fn white_noise(p: Point2<f32>, seed: i32) -> f64 {
    let dot = p.x as f64 * 12.9898 + p.y as f64 * 78.233 + seed as f64;
    ((dot.sin() + 1.0) * 43758.5453).rem_euclid(1.0)
}

/// Coherent noise over an infinite lattice of `grid_size` cells: samples
/// `white_noise` at the four corners of the cell containing `p` and
/// bilinearly interpolates by the fractional position inside the cell.
/// Result in `[0, 1)`.
///
/// The fractional divisor is `grid_size` (one historical revision divided
/// by `grid_size - 1`, which jumps at cell edges); with `grid_size` the
/// field is continuous across cell boundaries. `grid_size` must be
/// positive.
pub fn value_noise(p: Point2<f32>, grid_size: f32, seed: i32) -> f64 {
    debug_assert!(grid_size > 0.0);
    let corner = Point2::new(round_down(p.x, grid_size), round_down(p.y, grid_size));

    let tl = white_noise(corner, seed);
    let tr = white_noise(Point2::new(corner.x + grid_size, corner.y), seed);
    let bl = white_noise(Point2::new(corner.x, corner.y + grid_size), seed);
    let br = white_noise(Point2::new(corner.x + grid_size, corner.y + grid_size), seed);

    let x_frac = ((p.x - corner.x) / grid_size) as f64;
    let z_frac = ((p.y - corner.y) / grid_size) as f64;

    let top = tl * (1.0 - x_frac) + tr * x_frac;
    let bottom = bl * (1.0 - x_frac) + br * x_frac;
    top * (1.0 - z_frac) + bottom * z_frac
}

/// Largest multiple of `n` at or below `x`. Well-defined for negative `x`,
/// which plain truncation is not.
pub fn round_down(x: f32, n: f32) -> f32 {
    x - x.rem_euclid(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_noise_is_deterministic_and_bounded() {
        for (x, z) in [(0.0, 0.0), (-130.5, 77.25), (4096.0, -4096.0)] {
            let p = Point2::new(x, z);
            let a = white_noise(p, 7);
            let b = white_noise(p, 7);
            assert_eq!(a, b);
            assert!((0.0..1.0).contains(&a), "out of range at ({x}, {z}): {a}");
        }
    }

    #[test]
    fn white_noise_varies_with_seed_and_position() {
        let p = Point2::new(12.0, -3.0);
        assert_ne!(white_noise(p, 1), white_noise(p, 2));
        assert_ne!(white_noise(p, 1), white_noise(Point2::new(13.0, -3.0), 1));
    }

    #[test]
    fn value_noise_matches_white_noise_on_lattice_points() {
        let grid = 8.0;
        for (x, z) in [(0.0, 0.0), (-16.0, 24.0), (64.0, -8.0)] {
            let p = Point2::new(x, z);
            let expected = white_noise(p, 5);
            assert!((value_noise(p, grid, 5) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn value_noise_stays_in_unit_interval() {
        for i in -40..40 {
            for j in -40..40 {
                let p = Point2::new(i as f32 * 1.7, j as f32 * 2.3);
                let v = value_noise(p, 8.0, 7);
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn round_down_handles_negative_coordinates() {
        assert_eq!(round_down(17.0, 8.0), 16.0);
        assert_eq!(round_down(-1.0, 8.0), -8.0);
        assert_eq!(round_down(-8.0, 8.0), -8.0);
        assert_eq!(round_down(-8.5, 8.0), -16.0);
    }
}
