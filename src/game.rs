//! The ladder controller: owns the roster, the current ladder and the trace clock.
//!
//! Every operation the page offers goes through [`LadderGame`]. It never touches
//! the DOM, so the whole game flow runs (and is tested) natively.

use crate::animation::{AnimationClock, Frame, PathAnimation};
use crate::config::LadderConfig;
use crate::error::LadderError;
use crate::ladder::{Ladder, Mapping, RungGrid};
use crate::layout::LadderLayout;
use crate::rng::{RandomSource, SeededRng};
use crate::roster::{join_list, normalize_list, sync_counts};

pub struct LadderGame<R: RandomSource = SeededRng> {
    config: LadderConfig,
    rng: R,
    names: Vec<String>,
    results: Vec<String>,
    complexity: u32,
    speed: u32,
    ladder: Ladder,
    layout: LadderLayout,
    clock: AnimationClock,
    status: String,
    // (top, bottom) of the trace being shown
    highlight: Option<(usize, usize)>,
}

impl<R: RandomSource> LadderGame<R> {
    /// Validate `config` and draw the first ladder from its default roster.
    pub fn new(config: LadderConfig, mut rng: R) -> Result<Self, LadderError> {
        config.validate()?;
        let mut names = config.default_names.clone();
        let mut results = config.default_results.clone();
        sync_counts(&mut names, &mut results, &config);
        let complexity = config.default_complexity;
        let ladder = Ladder::generate(names.len(), complexity, &config, &mut rng);
        let layout = LadderLayout::new(names.len(), ladder.grid.row_count(), &config);
        let speed = config.default_speed;
        Ok(Self {
            config,
            rng,
            names,
            results,
            complexity,
            speed,
            ladder,
            layout,
            clock: AnimationClock::default(),
            status: "Ladder generated.".to_string(),
            highlight: None,
        })
    }

    /// Throw away the current ladder and build a new one for the current roster.
    pub fn regenerate(&mut self, message: &str) {
        self.clock.cancel();
        sync_counts(&mut self.names, &mut self.results, &self.config);
        let lines = self.names.len();
        self.ladder = Ladder::generate(lines, self.complexity, &self.config, &mut self.rng);
        self.layout = LadderLayout::new(lines, self.ladder.grid.row_count(), &self.config);
        self.highlight = None;
        self.status = message.to_string();
        crate::log(&format!(
            "ladder regenerated: {} lines, {} rows, {} rungs",
            lines,
            self.ladder.grid.row_count(),
            self.ladder.grid.rung_count()
        ));
    }

    /// Replace the participant list. Fewer than two entries leaves everything as is.
    pub fn apply_names(&mut self, text: &str) -> Result<(), LadderError> {
        let names = normalize_list(text, &self.config.name_prefix);
        if names.len() < 2 {
            return Err(self.reject(LadderError::TooFewNames { found: names.len() }));
        }
        self.names = names;
        self.regenerate("Names applied and a new ladder was drawn.");
        Ok(())
    }

    /// Replace the outcome list. Fewer than two entries leaves everything as is.
    pub fn apply_results(&mut self, text: &str) -> Result<(), LadderError> {
        let results = normalize_list(text, &self.config.result_prefix);
        if results.len() < 2 {
            return Err(self.reject(LadderError::TooFewResults {
                found: results.len(),
            }));
        }
        self.results = results;
        self.regenerate("Results applied and a new ladder was drawn.");
        Ok(())
    }

    pub fn add_person(&mut self) {
        self.names
            .push(format!("{}{}", self.config.name_prefix, self.names.len() + 1));
        self.results
            .push(format!("{}{}", self.config.result_prefix, self.results.len() + 1));
        self.regenerate("Added one more participant.");
    }

    /// Takes effect on the next regeneration. Returns the clamped value.
    pub fn set_complexity(&mut self, complexity: u32) -> u32 {
        self.complexity = self.config.clamp_complexity(complexity);
        self.complexity
    }

    pub fn set_speed(&mut self, speed: u32) -> u32 {
        self.speed = self.config.clamp_speed(speed);
        self.speed
    }

    /// Start tracing from a top label. Any running trace is cancelled.
    pub fn begin_trace(&mut self, top: usize) -> Result<PathAnimation, LadderError> {
        let bottom = self
            .ladder
            .mapping
            .destination(top)
            .ok_or(LadderError::IndexOutOfRange {
                index: top,
                lines: self.lines(),
            })?;
        let token = self.clock.begin();
        let segments = self.layout.path_segments(&self.ladder.grid, top);
        self.highlight = Some((top, bottom));
        self.status = format!("{} is tracing the path...", self.names[top]);
        Ok(PathAnimation::new(
            token,
            top,
            bottom,
            segments,
            self.effective_speed(),
        ))
    }

    /// Start tracing toward a bottom label, from whichever top reaches it.
    pub fn begin_trace_to(&mut self, bottom: usize) -> Result<PathAnimation, LadderError> {
        let top = self
            .ladder
            .mapping
            .origin(bottom)
            .ok_or(LadderError::IndexOutOfRange {
                index: bottom,
                lines: self.lines(),
            })?;
        self.begin_trace(top)
    }

    pub fn advance(&self, animation: &mut PathAnimation) -> Frame {
        animation.advance(&self.clock)
    }

    /// Announce the outcome of a completed trace. Stale traces change nothing.
    pub fn finish_trace(&mut self, animation: &PathAnimation) -> bool {
        if !self.clock.is_current(animation.token()) {
            return false;
        }
        self.status = format!(
            "{} → {}",
            self.names[animation.top], self.results[animation.bottom]
        );
        true
    }

    pub fn skip_animation(&mut self) {
        self.clock.cancel();
        self.highlight = None;
        self.status = "Animation skipped.".to_string();
        crate::log("path animation skipped");
    }

    fn reject(&mut self, err: LadderError) -> LadderError {
        crate::log(&format!("rejected input: {}", err));
        self.status = err.to_string();
        err
    }

    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn names_text(&self) -> String {
        join_list(&self.names)
    }

    pub fn results_text(&self) -> String {
        join_list(&self.results)
    }

    pub fn lines(&self) -> usize {
        self.ladder.lines()
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn grid(&self) -> &RungGrid {
        &self.ladder.grid
    }

    pub fn mapping(&self) -> &Mapping {
        &self.ladder.mapping
    }

    pub fn layout(&self) -> &LadderLayout {
        &self.layout
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn complexity(&self) -> u32 {
        self.complexity
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Speed used for tracing; fixed when the speed control is disabled.
    pub fn effective_speed(&self) -> u32 {
        if self.config.speed_control {
            self.speed
        } else {
            self.config.default_speed
        }
    }

    pub fn highlight(&self) -> Option<(usize, usize)> {
        self.highlight
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(seed: u64) -> LadderGame {
        LadderGame::new(LadderConfig::default(), SeededRng::new(seed)).unwrap()
    }

    #[test]
    fn starts_with_default_roster() {
        let g = game(1);
        assert_eq!(g.names().len(), 4);
        assert_eq!(g.results().len(), 4);
        assert_eq!(g.grid().row_count(), LadderConfig::rows_for(2));
        assert!(g.mapping().is_bijection());
        assert_eq!(g.status(), "Ladder generated.");
    }

    #[test]
    fn invalid_config_is_refused() {
        let cfg = LadderConfig {
            complexity_max: 0,
            ..LadderConfig::default()
        };
        assert!(LadderGame::new(cfg, SeededRng::new(1)).is_err());
    }

    #[test]
    fn one_name_is_rejected_without_changes() {
        let mut g = game(2);
        let names = g.names().to_vec();
        let grid = g.grid().clone();
        let err = g.apply_names("solo").unwrap_err();
        assert_eq!(err, LadderError::TooFewNames { found: 1 });
        assert_eq!(g.names(), names.as_slice());
        assert_eq!(g.grid(), &grid);
        assert_eq!(g.status(), "Please enter at least 2 names.");
    }

    #[test]
    fn one_result_is_rejected_without_changes() {
        let mut g = game(2);
        let results = g.results().to_vec();
        assert!(g.apply_results(" , ").is_err());
        assert_eq!(g.results(), results.as_slice());
    }

    #[test]
    fn more_names_pad_results() {
        let mut g = game(3);
        g.apply_names("a,b,c,d,e,f").unwrap();
        assert_eq!(g.lines(), 6);
        assert_eq!(g.results().len(), 6);
        assert_eq!(g.results()[5], "Result6");
        assert_eq!(g.names_text(), "a,b,c,d,e,f");
        assert_eq!(g.layout().line_x.len(), 6);
    }

    #[test]
    fn fewer_results_keep_line_count() {
        let mut g = game(3);
        g.apply_results("win,lose").unwrap();
        assert_eq!(g.lines(), 4);
        assert_eq!(g.results_text(), "win,lose,Result3,Result4");
    }

    #[test]
    fn add_person_grows_both_lists() {
        let mut g = game(4);
        g.add_person();
        assert_eq!(g.names()[4], "Player5");
        assert_eq!(g.results()[4], "Result5");
        assert_eq!(g.lines(), 5);
        assert!(g.mapping().is_bijection());
    }

    #[test]
    fn complexity_applies_on_regenerate() {
        let mut g = game(5);
        assert_eq!(g.set_complexity(4), 4);
        assert_eq!(g.grid().row_count(), 24);
        g.regenerate("Ladder regenerated.");
        assert_eq!(g.grid().row_count(), 40);
        assert_eq!(g.set_complexity(50), 5);
    }

    #[test]
    fn trace_reports_outcome() {
        let mut g = game(6);
        let mut anim = g.begin_trace(1).unwrap();
        assert_eq!(anim.bottom, g.mapping().destination(1).unwrap());
        assert_eq!(g.highlight(), Some((1, anim.bottom)));
        assert!(g.status().contains("tracing"));
        let mut frames = 0;
        while g.advance(&mut anim) != Frame::Finished {
            frames += 1;
            assert!(frames < 10_000);
        }
        assert!(g.finish_trace(&anim));
        let expected = format!("{} → {}", g.names()[1], g.results()[anim.bottom]);
        assert_eq!(g.status(), expected);
    }

    #[test]
    fn trace_from_result_uses_reverse_mapping() {
        let mut g = game(7);
        let anim = g.begin_trace_to(2).unwrap();
        assert_eq!(anim.bottom, 2);
        assert_eq!(g.mapping().destination(anim.top), Some(2));
        assert!(g.begin_trace_to(99).is_err());
    }

    #[test]
    fn regenerate_cancels_running_trace() {
        let mut g = game(8);
        let mut anim = g.begin_trace(0).unwrap();
        g.regenerate("Ladder regenerated.");
        assert_eq!(g.advance(&mut anim), Frame::Cancelled);
        assert!(!g.finish_trace(&anim));
        assert_eq!(g.status(), "Ladder regenerated.");
        assert_eq!(g.highlight(), None);
    }

    #[test]
    fn skip_cancels_and_clears_highlight() {
        let mut g = game(9);
        let mut anim = g.begin_trace(0).unwrap();
        g.skip_animation();
        assert_eq!(g.advance(&mut anim), Frame::Cancelled);
        assert_eq!(g.highlight(), None);
        assert_eq!(g.status(), "Animation skipped.");
    }

    #[test]
    fn classic_preset_ignores_speed_slider() {
        let mut g = LadderGame::new(LadderConfig::classic(), SeededRng::new(1)).unwrap();
        g.set_speed(10);
        assert_eq!(g.speed(), 10);
        assert_eq!(g.effective_speed(), g.config().default_speed);
    }
}
