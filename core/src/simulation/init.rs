//! Initial concentration patterns.
//!
//! All patterns write both grids in full; the grids must share a shape.

use rand::{Rng, RngCore};

use crate::stream::grid::Grid;

/// Background levels used by [`random_rectangles`].
pub const RECT_BACKGROUND_A: f64 = 0.4201;
pub const RECT_BACKGROUND_B: f64 = 0.2878;
pub const RECT_COUNT: usize = 100;

/// A disc of radius `width / 8` at the centre set to `(ca, cb)`, zero elsewhere.
pub fn central_circle(a: &mut Grid, b: &mut Grid, ca: f64, cb: f64) {
    let (rows, cols) = a.shape();
    a.fill(0.0);
    b.fill(0.0);

    let r = cols as f64 / 8.0;
    let r2 = r * r;
    for i in 0..rows {
        for j in 0..cols {
            let dx = cols as f64 / 2.0 - j as f64;
            let dy = rows as f64 / 2.0 - i as f64;
            if dx * dx + dy * dy < r2 {
                a[(i, j)] = ca;
                b[(i, j)] = cb;
            }
        }
    }
}

/// Uniform background with `RECT_COUNT` random rectangles of random level.
/// Rectangles that cross an edge wrap around (the domain is periodic).
pub fn random_rectangles(a: &mut Grid, b: &mut Grid, rng: &mut dyn RngCore) {
    let (rows, cols) = a.shape();
    a.fill(RECT_BACKGROUND_A);
    b.fill(RECT_BACKGROUND_B);

    let (h, w) = (rows as f64, cols as f64);
    for _ in 0..RECT_COUNT {
        let f = (h / 2.0 + (rng.gen::<f64>() - 0.5) * h * 0.9) as i64;
        let g = (w / 2.0 + (rng.gen::<f64>() - 0.5) * w * 0.9) as i64;
        let val1 = rng.gen::<f64>();
        let val2 = rng.gen::<f64>();
        let imax = (rng.gen::<f64>() * 0.1 * h) as i64;
        let jmax = (rng.gen::<f64>() * 0.1 * h) as i64;

        for i in -imax / 2..imax / 2 {
            for j in -jmax / 2..jmax / 2 {
                let r = (f + i).rem_euclid(rows as i64) as usize;
                let c = (g + j).rem_euclid(cols as i64) as usize;
                a[(r, c)] = val1;
                b[(r, c)] = val2;
            }
        }
    }
}

/// Left half of A at `ca`, top half of B at `cb`, zero elsewhere.
/// The crossing fronts seed a spiral in excitable media.
pub fn half_screen(a: &mut Grid, b: &mut Grid, ca: f64, cb: f64) {
    let (rows, cols) = a.shape();
    a.fill(0.0);
    b.fill(0.0);

    for i in 0..rows {
        for j in 0..cols {
            if j < cols / 2 {
                a[(i, j)] = ca;
            }
            if i < rows / 2 {
                b[(i, j)] = cb;
            }
        }
    }
}

/// Steady state `(ca, cb)` plus uniform noise in `[-amplitude, amplitude)`.
pub fn random_around(a: &mut Grid, b: &mut Grid, ca: f64, cb: f64, amplitude: f64, rng: &mut dyn RngCore) {
    for v in a.as_mut_slice() {
        *v = ca + amplitude * (2.0 * rng.gen::<f64>() - 1.0);
    }
    for v in b.as_mut_slice() {
        *v = cb + amplitude * (2.0 * rng.gen::<f64>() - 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn central_circle_marks_centre_only() {
        let (mut a, mut b) = (Grid::zeros(32, 32), Grid::zeros(32, 32));
        central_circle(&mut a, &mut b, 1.0, 0.5);
        assert_eq!(a[(16, 16)], 1.0);
        assert_eq!(b[(16, 16)], 0.5);
        assert_eq!(a[(0, 0)], 0.0);
    }

    #[test]
    fn half_screen_splits_fields() {
        let (mut a, mut b) = (Grid::zeros(4, 4), Grid::zeros(4, 4));
        half_screen(&mut a, &mut b, 1.0, 0.2);
        assert_eq!(a.row(0), &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(b.row(0), &[0.2; 4]);
        assert_eq!(b.row(3), &[0.0; 4]);
    }

    #[test]
    fn random_rectangles_is_seeded_and_in_range() {
        let run = |seed| {
            let (mut a, mut b) = (Grid::zeros(20, 30), Grid::zeros(20, 30));
            random_rectangles(&mut a, &mut b, &mut StdRng::seed_from_u64(seed));
            (a, b)
        };
        let (a1, b1) = run(7);
        let (a2, b2) = run(7);
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
        assert!(a1.as_slice().iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn random_rectangles_handles_tiny_grids() {
        let (mut a, mut b) = (Grid::zeros(1, 1), Grid::zeros(1, 1));
        random_rectangles(&mut a, &mut b, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn random_around_stays_within_amplitude() {
        let (mut a, mut b) = (Grid::zeros(8, 8), Grid::zeros(8, 8));
        random_around(&mut a, &mut b, 2.0, 1.5, 0.3, &mut StdRng::seed_from_u64(3));
        assert!(a.as_slice().iter().all(|v| (1.7..2.3).contains(v)));
        assert!(b.as_slice().iter().all(|v| (1.2..1.8).contains(v)));
    }
}
