// Connectivity repair: give every line at least one rung.
use std::collections::VecDeque;

use super::RungGrid;
use crate::rng::RandomSource;

/// What [`ensure_each_line_connected`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// `(row, slot)` rungs added without touching neighbours.
    pub placed: Vec<(usize, usize)>,
    /// Lines that could only be connected by forcing a rung into a random row.
    pub forced: Vec<usize>,
    /// Lines still unused afterwards. Only a single-row grid too narrow to
    /// hold a rung for every line ends up here.
    pub unresolved: Vec<usize>,
}

impl RepairReport {
    pub fn is_noop(&self) -> bool {
        self.placed.is_empty() && self.forced.is_empty() && self.unresolved.is_empty()
    }
}

/// Add rungs until every line has usage >= 1.
///
/// Lines are visited in ascending order. For an unused line the slot on its left
/// is tried before the slot on its right, each scanning rows top to bottom for
/// the first row where the slot and both neighbouring slots are clear.
///
/// When no such row exists, the left-most candidate slot is forced into a
/// random row and any rung adjacent to it in that row is removed, so rows never
/// connect a line both ways. Rows where the removal leaves every line in use
/// are preferred. A line orphaned by a removal is queued again but may only
/// take a free slot or a row where forcing orphans nobody; if neither exists it
/// is reported in [`RepairReport::unresolved`].
///
/// A grid that already touches every line is left untouched.
pub fn ensure_each_line_connected<R: RandomSource + ?Sized>(
    grid: &mut RungGrid,
    rng: &mut R,
) -> RepairReport {
    let mut report = RepairReport::default();
    let gaps = grid.gaps();
    if gaps == 0 || grid.row_count() == 0 {
        return report;
    }

    let mut usage = grid.usage();
    let mut queue: VecDeque<(usize, bool)> = (0..grid.lines())
        .filter(|&line| usage[line] == 0)
        .map(|line| (line, true))
        .collect();

    while let Some((line, first_visit)) = queue.pop_front() {
        if usage[line] > 0 {
            continue;
        }

        let candidates: Vec<usize> = [line.checked_sub(1), (line < gaps).then_some(line)]
            .into_iter()
            .flatten()
            .collect();

        let free = candidates.iter().find_map(|&slot| {
            grid.rows()
                .iter()
                .position(|row| slot_is_free(row, slot))
                .map(|r| (r, slot))
        });
        if let Some((r, slot)) = free {
            grid.row_mut(r)[slot] = true;
            usage[slot] += 1;
            usage[slot + 1] += 1;
            report.placed.push((r, slot));
            continue;
        }

        let slot = candidates[0];
        let safe: Vec<usize> = (0..grid.row_count())
            .filter(|&r| forcing_orphans_nobody(&grid.rows()[r], slot, &usage))
            .collect();
        let r = if !safe.is_empty() {
            safe[rng.index(safe.len())]
        } else if first_visit {
            rng.index(grid.row_count())
        } else {
            report.unresolved.push(line);
            continue;
        };

        let row = grid.row_mut(r);
        if slot > 0 && row[slot - 1] {
            row[slot - 1] = false;
            usage[slot - 1] -= 1;
            usage[slot] -= 1;
            if usage[slot - 1] == 0 {
                queue.push_back((slot - 1, false));
            }
        }
        if slot + 1 < gaps && row[slot + 1] {
            row[slot + 1] = false;
            usage[slot + 1] -= 1;
            usage[slot + 2] -= 1;
            if usage[slot + 2] == 0 {
                queue.push_back((slot + 2, false));
            }
        }
        row[slot] = true;
        usage[slot] += 1;
        usage[slot + 1] += 1;
        report.forced.push(line);
    }
    report
}

fn slot_is_free(row: &[bool], slot: usize) -> bool {
    let left = slot > 0 && row[slot - 1];
    let right = row.get(slot + 1).copied().unwrap_or(false);
    !row[slot] && !left && !right
}

// The forced rung itself covers `slot` and `slot + 1`, so only the far ends of
// a cleared neighbour can be orphaned.
fn forcing_orphans_nobody(row: &[bool], slot: usize, usage: &[u32]) -> bool {
    let left_ok = slot == 0 || !row[slot - 1] || usage[slot - 1] > 1;
    let right_ok = !row.get(slot + 1).copied().unwrap_or(false) || usage[slot + 2] > 1;
    left_ok && right_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::Mapping;
    use crate::rng::SeededRng;

    fn grid(lines: usize, rows: &[&[bool]]) -> RungGrid {
        RungGrid::from_rows(lines, rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn empty_grid_gets_connected_in_order() {
        let mut g = RungGrid::empty(4, 3);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(1));
        // line 0 -> row 0 slot 0; line 2 -> slot 1 is blocked in row 0, so row 1;
        // line 3 -> slot 2 is clear in row 0.
        assert_eq!(report.placed, vec![(0, 0), (1, 1), (0, 2)]);
        assert!(report.forced.is_empty());
        assert!(g.usage().iter().all(|u| *u > 0));
        assert!(g.adjacent_rungs().is_none());
    }

    #[test]
    fn prefers_left_slot_for_unused_line() {
        // line 2 unused: slot 1 is blocked in row 0 but clear in row 1.
        let mut g = grid(4, &[&[true, false, false], &[false, false, false]]);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(1));
        assert_eq!(report.placed[0], (1, 1));
        assert!(g.is_set(1, 1));
        assert!(g.usage().iter().all(|u| *u > 0));
    }

    #[test]
    fn connected_grid_is_untouched() {
        let mut g = grid(3, &[&[true, false], &[false, true]]);
        let before = g.clone();
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(5));
        assert!(report.is_noop());
        assert_eq!(g, before);
    }

    #[test]
    fn repair_twice_is_a_noop_the_second_time() {
        let mut g = RungGrid::empty(7, 8);
        ensure_each_line_connected(&mut g, &mut SeededRng::new(3));
        let usage = g.usage();
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(4));
        assert!(report.is_noop());
        assert_eq!(g.usage(), usage);
    }

    #[test]
    fn blocked_line_uses_forced_fallback_without_adjacent_rungs() {
        // Every row blocks both candidate slots of line 2.
        let mut g = grid(5, &[&[true, false, false, true], &[true, false, false, true]]);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(9));
        assert_eq!(report.forced, vec![2]);
        assert!(report.placed.is_empty());
        assert!(g.usage()[2] >= 1);
        assert!(g.adjacent_rungs().is_none());
        // The neighbouring lines still keep their rung in the other row.
        assert!(g.usage().iter().all(|u| *u > 0));
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn single_row_connects_the_blocked_line_and_reports_the_orphan() {
        // One row of four slots holds at most two rungs, so five lines can never
        // all be covered. Line 2 still gets its rung and the row stays a matching.
        let mut g = grid(5, &[&[true, false, false, true]]);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(9));
        assert_eq!(report.forced, vec![2]);
        assert_eq!(report.unresolved, vec![0]);
        assert!(!report.is_noop());
        assert_eq!(g.rows()[0], vec![false, true, false, true]);
        assert_eq!(g.usage(), vec![0, 1, 1, 1, 1]);
        assert!(g.adjacent_rungs().is_none());
        assert!(Mapping::from_grid(&g).is_bijection());
    }

    #[test]
    fn first_line_is_forced_onto_its_only_slot() {
        // Line 0 can only use slot 0, and slot 1 blocks it in every row.
        let mut g = grid(4, &[&[false, true, false], &[false, true, false]]);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(11));
        assert_eq!(report.forced, vec![0]);
        assert_eq!(report.placed.len(), 1);
        assert!(report.unresolved.is_empty());
        assert!(g.usage().iter().all(|u| *u > 0));
        assert!(g.adjacent_rungs().is_none());
        assert!(Mapping::from_grid(&g).is_bijection());
    }

    #[test]
    fn line_orphaned_by_forcing_is_picked_up_again() {
        // Forcing slot 0 clears slot 1 and leaves line 2 bare until slot 2 is placed.
        let mut g = grid(4, &[&[false, true, false]]);
        let report = ensure_each_line_connected(&mut g, &mut SeededRng::new(3));
        assert_eq!(report.forced, vec![0]);
        assert_eq!(report.placed, vec![(0, 2)]);
        assert!(report.unresolved.is_empty());
        assert_eq!(g.rows()[0], vec![true, false, true]);
        assert_eq!(g.usage(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn two_line_ladder_gets_its_single_slot() {
        let mut g = RungGrid::empty(2, 8);
        ensure_each_line_connected(&mut g, &mut SeededRng::new(2));
        assert_eq!(g.usage(), vec![1, 1]);
        assert!(g.is_set(0, 0));
    }

    #[test]
    fn degenerate_grids_are_left_alone() {
        let mut single = RungGrid::empty(1, 8);
        assert!(ensure_each_line_connected(&mut single, &mut SeededRng::new(1)).is_noop());
        let mut rowless = RungGrid::empty(4, 0);
        assert!(ensure_each_line_connected(&mut rowless, &mut SeededRng::new(1)).is_noop());
    }
}
