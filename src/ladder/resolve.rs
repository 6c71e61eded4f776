// Path resolution: follow a line down through every row.
use super::RungGrid;
use crate::error::LadderError;

/// Line reached after crossing one row from `pos`.
pub fn next_line(pos: usize, row: &[bool]) -> usize {
    if pos > 0 && row.get(pos - 1).copied().unwrap_or(false) {
        pos - 1
    } else if row.get(pos).copied().unwrap_or(false) {
        pos + 1
    } else {
        pos
    }
}

/// Line index at the start and after each row: `rows + 1` entries.
pub fn trace(grid: &RungGrid, start: usize) -> Vec<usize> {
    let mut path = Vec::with_capacity(grid.row_count() + 1);
    let mut pos = start;
    path.push(pos);
    for row in grid.rows() {
        pos = next_line(pos, row);
        path.push(pos);
    }
    path
}

/// Bottom line reached from `start`.
pub fn resolve(grid: &RungGrid, start: usize) -> Result<usize, LadderError> {
    if start >= grid.lines() {
        return Err(LadderError::IndexOutOfRange {
            index: start,
            lines: grid.lines(),
        });
    }
    Ok(grid.rows().iter().fold(start, |pos, row| next_line(pos, row)))
}
