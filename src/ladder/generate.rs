// Grid generation: independent left-to-right draws per row.
use super::RungGrid;
use crate::config::LadderConfig;
use crate::rng::RandomSource;

/// Random grid with `8 * complexity + 8` rows and `lines - 1` slots per row.
///
/// Not guaranteed to touch every line; run
/// [`ensure_each_line_connected`](super::ensure_each_line_connected) afterwards.
pub fn generate_grid<R: RandomSource + ?Sized>(
    lines: usize,
    complexity: u32,
    config: &LadderConfig,
    rng: &mut R,
) -> RungGrid {
    let probability = config.probability_for(complexity);
    let row_count = LadderConfig::rows_for(complexity);
    let mut grid = RungGrid::empty(lines, 0);
    for _ in 0..row_count {
        grid.push_row(generate_row(grid.gaps(), probability, rng));
    }
    grid
}

/// One row of `gaps` slots. A slot directly after a placed rung is never drawn.
pub fn generate_row<R: RandomSource + ?Sized>(
    gaps: usize,
    probability: f64,
    rng: &mut R,
) -> Vec<bool> {
    let mut row = Vec::with_capacity(gaps);
    let mut previous_connected = false;
    for _ in 0..gaps {
        let connected = !previous_connected && rng.next_f64() < probability;
        row.push(connected);
        previous_connected = connected;
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    struct Always(f64);

    impl RandomSource for Always {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn certain_probability_alternates() {
        let row = generate_row(5, 1.0, &mut Always(0.0));
        assert_eq!(row, vec![true, false, true, false, true]);
    }

    #[test]
    fn draw_above_probability_places_nothing() {
        let row = generate_row(4, 0.2, &mut Always(0.5));
        assert_eq!(row, vec![false; 4]);
    }

    #[test]
    fn zero_gaps_yields_empty_rows() {
        let cfg = LadderConfig::default();
        let grid = generate_grid(1, 0, &cfg, &mut SeededRng::new(1));
        assert_eq!(grid.row_count(), 8);
        assert_eq!(grid.rung_count(), 0);
    }

    #[test]
    fn dimensions_follow_complexity() {
        let cfg = LadderConfig::default();
        let grid = generate_grid(5, 3, &cfg, &mut SeededRng::new(11));
        assert_eq!(grid.row_count(), 32);
        assert!(grid.rows().iter().all(|r| r.len() == 4));
        assert!(grid.adjacent_rungs().is_none());
    }
}
