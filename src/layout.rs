//! Pixel geometry for a ladder: line columns, row heights and traced paths.

use crate::config::LadderConfig;
use crate::ladder::{RungGrid, trace};

/// Straight piece of a traced path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Copy of this segment cut off at `ratio` (0..=1) of its length.
    pub fn clipped(&self, ratio: f64) -> Segment {
        Segment {
            x1: self.x1,
            y1: self.y1,
            x2: self.x1 + (self.x2 - self.x1) * ratio,
            y2: self.y1 + (self.y2 - self.y1) * ratio,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LadderLayout {
    pub width: f64,
    pub height: f64,
    pub padding_x: f64,
    pub line_margin: f64,
    /// Canvas x of each vertical line.
    pub line_x: Vec<f64>,
    /// Canvas y of each rung row.
    pub row_y: Vec<f64>,
}

impl LadderLayout {
    /// Canvas width that keeps at least `min_spacing` between lines.
    pub fn canvas_width(lines: usize, config: &LadderConfig) -> f64 {
        let spread = config.board_padding_x * 2.0
            + lines.saturating_sub(1) as f64 * config.min_spacing;
        config.min_width.max(spread)
    }

    pub fn new(lines: usize, rows: usize, config: &LadderConfig) -> Self {
        let width = Self::canvas_width(lines, config);
        let height = config.canvas_height;
        let padding_x = config.board_padding_x;

        let line_x = if lines < 2 {
            vec![width / 2.0; lines]
        } else {
            let spacing = (width - padding_x * 2.0) / (lines - 1) as f64;
            (0..lines).map(|i| padding_x + i as f64 * spacing).collect()
        };

        let usable = height - config.top_padding - config.bottom_padding;
        let row_gap = if rows == 0 { 0.0 } else { usable / rows as f64 };
        let row_y = (0..rows)
            .map(|i| config.top_padding + i as f64 * row_gap)
            .collect();

        Self {
            width,
            height,
            padding_x,
            line_margin: config.line_margin,
            line_x,
            row_y,
        }
    }

    pub fn top_y(&self) -> f64 {
        self.line_margin
    }

    pub fn bottom_y(&self) -> f64 {
        self.height - self.line_margin
    }

    /// CSS `grid-template-columns` for the label rows so chips sit over their lines.
    pub fn label_tracks(&self) -> String {
        let count = self.line_x.len();
        if count <= 1 {
            return "1fr".to_string();
        }
        let left_pad = (self.line_x[0] - self.padding_x).max(0.0);
        let right_pad = (self.width - self.line_x[count - 1] - self.padding_x).max(0.0);

        let mut tracks = Vec::with_capacity(count + 1);
        tracks.push(format!("{}px", left_pad + self.padding_x));
        for pair in self.line_x.windows(2) {
            tracks.push(format!("{}px", pair[1] - pair[0]));
        }
        tracks.push(format!("{}px", right_pad + self.padding_x));
        tracks.join(" ")
    }

    /// Path from the top of line `start` to the bottom, one vertical run per row
    /// plus a horizontal hop wherever a rung is crossed.
    pub fn path_segments(&self, grid: &RungGrid, start: usize) -> Vec<Segment> {
        let mut segments = Vec::new();
        let Some(&start_x) = self.line_x.get(start) else {
            return segments;
        };
        let positions = trace(grid, start);
        let mut current_x = start_x;
        let mut current_y = self.top_y();

        for (row, &y) in self.row_y.iter().enumerate() {
            segments.push(Segment {
                x1: current_x,
                y1: current_y,
                x2: current_x,
                y2: y,
            });
            if let Some(&next) = positions.get(row + 1) {
                let next_x = self.line_x.get(next).copied().unwrap_or(current_x);
                if next_x != current_x {
                    segments.push(Segment {
                        x1: current_x,
                        y1: y,
                        x2: next_x,
                        y2: y,
                    });
                    current_x = next_x;
                }
            }
            current_y = y;
        }

        segments.push(Segment {
            x1: current_x,
            y1: current_y,
            x2: current_x,
            y2: self.bottom_y(),
        });
        segments
    }

    /// Index of the line closest to canvas x, for hit-testing clicks.
    pub fn nearest_line(&self, x: f64) -> Option<usize> {
        self.line_x
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
            .map(|(i, _)| i)
    }
}

pub fn total_length(segments: &[Segment]) -> f64 {
    segments.iter().map(Segment::length).sum()
}

/// Leading part of a path covering `progress` pixels of its length.
pub fn partial_path(segments: &[Segment], progress: f64) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut remaining = progress;
    for segment in segments {
        if remaining <= 0.0 {
            break;
        }
        let len = segment.length();
        let ratio = if len > 0.0 { (remaining / len).min(1.0) } else { 1.0 };
        out.push(segment.clipped(ratio));
        remaining -= len;
    }
    out
}
