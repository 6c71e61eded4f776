//! Ladder core: rung grid, generation, connectivity repair and path resolution.
//!
//! A ladder has `lines` vertical lines and a stack of rows. Each row holds
//! `lines - 1` slots; slot `i` set means a rung joins line `i` and line `i + 1`
//! at that row's height. No row ever sets two neighbouring slots, so every row
//! is a matching of lines and tracing all rows yields a permutation.

mod generate;
mod repair;
mod resolve;

pub use generate::{generate_grid, generate_row};
pub use repair::{RepairReport, ensure_each_line_connected};
pub use resolve::{next_line, resolve, trace};

use crate::config::LadderConfig;
use crate::error::LadderError;
use crate::rng::RandomSource;

/// Rows of rung slots, top to bottom.
///
/// Deserializing goes through [`RungGrid::from_rows`], so a decoded grid obeys
/// the same width and adjacency rules as a built one.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridRows"))]
pub struct RungGrid {
    lines: usize,
    rows: Vec<Vec<bool>>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridRows {
    lines: usize,
    rows: Vec<Vec<bool>>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridRows> for RungGrid {
    type Error = LadderError;

    fn try_from(raw: GridRows) -> Result<Self, Self::Error> {
        Self::from_rows(raw.lines, raw.rows)
    }
}

impl RungGrid {
    /// Grid of `row_count` rows with no rungs.
    pub fn empty(lines: usize, row_count: usize) -> Self {
        Self {
            lines,
            rows: vec![vec![false; lines.saturating_sub(1)]; row_count],
        }
    }

    /// Build from explicit rows, rejecting wrong widths and adjacent rungs.
    pub fn from_rows(lines: usize, rows: Vec<Vec<bool>>) -> Result<Self, LadderError> {
        let expected = lines.saturating_sub(1);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(LadderError::RaggedRow {
                    row: r,
                    expected,
                    found: row.len(),
                });
            }
        }
        let grid = Self { lines, rows };
        if let Some((row, slot)) = grid.adjacent_rungs() {
            return Err(LadderError::AdjacentRungs { row, slot });
        }
        Ok(grid)
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Slots per row (`lines - 1`, or 0 for a single line).
    pub fn gaps(&self) -> usize {
        self.lines.saturating_sub(1)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn is_set(&self, row: usize, slot: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(slot))
            .copied()
            .unwrap_or(false)
    }

    pub fn rung_count(&self) -> usize {
        self.rows.iter().flatten().filter(|c| **c).count()
    }

    /// Rungs touching each line, summed over all rows.
    pub fn usage(&self) -> Vec<u32> {
        let mut usage = vec![0u32; self.lines];
        for row in &self.rows {
            for (i, &connected) in row.iter().enumerate() {
                if connected {
                    usage[i] += 1;
                    usage[i + 1] += 1;
                }
            }
        }
        usage
    }

    /// First `(row, slot)` where `slot` and `slot + 1` are both set.
    pub fn adjacent_rungs(&self) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.windows(2)
                .position(|w| w[0] && w[1])
                .map(|slot| (r, slot))
        })
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut Vec<bool> {
        &mut self.rows[row]
    }

    pub(crate) fn push_row(&mut self, row: Vec<bool>) {
        debug_assert_eq!(row.len(), self.gaps());
        self.rows.push(row);
    }
}

/// `mapping[top] = bottom` for every line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Mapping(Vec<usize>);

impl Mapping {
    /// Resolve every start line through `grid`.
    pub fn from_grid(grid: &RungGrid) -> Self {
        Mapping(
            (0..grid.lines())
                .map(|start| trace(grid, start).last().copied().unwrap_or(start))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Outcome index reached from `top`.
    pub fn destination(&self, top: usize) -> Option<usize> {
        self.0.get(top).copied()
    }

    /// Start index that lands on `bottom` (reverse lookup).
    pub fn origin(&self, bottom: usize) -> Option<usize> {
        self.0.iter().position(|&b| b == bottom)
    }

    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.0.len()];
        for &b in &self.0 {
            match seen.get_mut(b) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

/// A generated, repaired ladder together with its resolved mapping.
///
/// Serialize-only: the mapping is always derived from the grid, never read back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ladder {
    pub complexity: u32,
    pub grid: RungGrid,
    pub mapping: Mapping,
}

impl Ladder {
    /// Generate → repair → resolve.
    pub fn generate<R: RandomSource + ?Sized>(
        lines: usize,
        complexity: u32,
        config: &LadderConfig,
        rng: &mut R,
    ) -> Self {
        let mut grid = generate_grid(lines, complexity, config, rng);
        let report = ensure_each_line_connected(&mut grid, rng);
        if !report.forced.is_empty() {
            crate::log(&format!(
                "ladder repair forced rungs for lines {:?}",
                report.forced
            ));
        }
        if !report.unresolved.is_empty() {
            crate::log(&format!(
                "ladder repair left lines {:?} without a rung",
                report.unresolved
            ));
        }
        Self::from_grid(complexity, grid)
    }

    pub fn from_grid(complexity: u32, grid: RungGrid) -> Self {
        let mapping = Mapping::from_grid(&grid);
        Self {
            complexity,
            grid,
            mapping,
        }
    }

    pub fn lines(&self) -> usize {
        self.grid.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = RungGrid::from_rows(4, vec![vec![true, false, false], vec![false]]).unwrap_err();
        assert_eq!(
            err,
            LadderError::RaggedRow {
                row: 1,
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn from_rows_rejects_adjacent_rungs() {
        let err = RungGrid::from_rows(4, vec![vec![false, true, true]]).unwrap_err();
        assert_eq!(err, LadderError::AdjacentRungs { row: 0, slot: 1 });
    }

    #[test]
    fn usage_counts_both_endpoints() {
        let grid =
            RungGrid::from_rows(4, vec![vec![true, false, true], vec![true, false, false]]).unwrap();
        assert_eq!(grid.usage(), vec![2, 2, 1, 1]);
        assert_eq!(grid.rung_count(), 3);
    }

    #[test]
    fn single_line_grid_has_no_slots() {
        let grid = RungGrid::empty(1, 8);
        assert_eq!(grid.gaps(), 0);
        assert!(grid.rows().iter().all(|r| r.is_empty()));
        assert_eq!(Mapping::from_grid(&grid).as_slice(), &[0]);
    }

    #[test]
    fn mapping_reverse_lookup() {
        let grid = RungGrid::from_rows(3, vec![vec![true, false], vec![false, true]]).unwrap();
        let m = Mapping::from_grid(&grid);
        assert_eq!(m.as_slice(), &[2, 0, 1]);
        assert_eq!(m.origin(0), Some(1));
        assert_eq!(m.origin(2), Some(0));
        assert_eq!(m.origin(3), None);
        assert_eq!(m.destination(2), Some(1));
    }

    #[test]
    fn is_bijection_detects_collisions() {
        assert!(Mapping(vec![1, 0, 2]).is_bijection());
        assert!(!Mapping(vec![1, 1, 2]).is_bijection());
        assert!(!Mapping(vec![0, 3]).is_bijection());
    }

    #[test]
    fn generated_ladder_is_consistent() {
        let cfg = LadderConfig::default();
        let mut rng = SeededRng::new(2024);
        let ladder = Ladder::generate(6, 2, &cfg, &mut rng);
        assert_eq!(ladder.lines(), 6);
        assert_eq!(ladder.grid.row_count(), 24);
        assert!(ladder.grid.adjacent_rungs().is_none());
        assert!(ladder.grid.usage().iter().all(|u| *u > 0));
        assert!(ladder.mapping.is_bijection());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn decoding_a_grid_applies_the_row_checks() {
        let ragged = r#"{"lines": 4, "rows": [[true, false, false], [false]]}"#;
        let err = serde_json::from_str::<RungGrid>(ragged).unwrap_err();
        assert!(err.to_string().contains("row 1 has 1 slots, expected 3"));

        let adjacent = r#"{"lines": 4, "rows": [[false, true, true]]}"#;
        assert!(serde_json::from_str::<RungGrid>(adjacent).is_err());

        let grid = RungGrid::from_rows(3, vec![vec![true, false], vec![false, true]]).unwrap();
        let text = serde_json::to_string(&grid).unwrap();
        let decoded: RungGrid = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, grid);
        assert_eq!(decoded.usage(), vec![1, 2, 1]);
    }
}
