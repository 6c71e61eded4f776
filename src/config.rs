//! Tunables for ladder generation, layout and the page controls.
//!
//! Two presets mirror the shipped page variants: [`LadderConfig::default`] with
//! the animation speed slider, and [`LadderConfig::classic`] with slightly denser
//! rungs and a fixed tracing speed.

use crate::error::LadderError;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LadderConfig {
    /// Rung probability at complexity 0.
    pub base_probability: f64,
    /// Added to the rung probability per complexity step.
    pub probability_step: f64,
    pub complexity_min: u32,
    pub complexity_max: u32,
    pub default_complexity: u32,
    /// Whether the page exposes the speed slider; when false `default_speed` is used.
    pub speed_control: bool,
    pub speed_min: u32,
    pub speed_max: u32,
    pub default_speed: u32,
    // --- Layout (canvas pixels) ---
    pub board_padding_x: f64,
    pub top_padding: f64,
    pub bottom_padding: f64,
    /// Vertical lines start/end this far from the canvas edge.
    pub line_margin: f64,
    pub min_spacing: f64,
    pub min_width: f64,
    pub canvas_height: f64,
    // --- Roster ---
    pub name_prefix: String,
    pub result_prefix: String,
    pub default_names: Vec<String>,
    pub default_results: Vec<String>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            base_probability: 0.08,
            probability_step: 0.05,
            complexity_min: 0,
            complexity_max: 5,
            default_complexity: 2,
            speed_control: true,
            speed_min: 1,
            speed_max: 10,
            default_speed: 5,
            board_padding_x: 40.0,
            top_padding: 42.0,
            bottom_padding: 42.0,
            line_margin: 24.0,
            min_spacing: 120.0,
            min_width: 940.0,
            canvas_height: 520.0,
            name_prefix: "Player".to_string(),
            result_prefix: "Result".to_string(),
            default_names: ["Minsu", "Jiyeon", "Haneul", "Doyun"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_results: ["Coffee", "Miss", "Lunch", "Winner"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl LadderConfig {
    /// Variant without the speed slider and a slightly higher base rung chance.
    pub fn classic() -> Self {
        Self {
            base_probability: 0.09,
            speed_control: false,
            ..Self::default()
        }
    }

    /// Number of rows for a complexity level.
    pub fn rows_for(complexity: u32) -> usize {
        complexity as usize * 8 + 8
    }

    /// Per-slot rung probability for a complexity level.
    pub fn probability_for(&self, complexity: u32) -> f64 {
        self.base_probability + complexity as f64 * self.probability_step
    }

    pub fn clamp_complexity(&self, complexity: u32) -> u32 {
        complexity.clamp(self.complexity_min, self.complexity_max)
    }

    pub fn clamp_speed(&self, speed: u32) -> u32 {
        speed.clamp(self.speed_min, self.speed_max)
    }

    pub fn validate(&self) -> Result<(), LadderError> {
        if !(0.0..=1.0).contains(&self.base_probability) {
            return Err(LadderError::Config(format!(
                "base_probability {} outside 0..=1",
                self.base_probability
            )));
        }
        if self.probability_step < 0.0 || !self.probability_step.is_finite() {
            return Err(LadderError::Config(format!(
                "probability_step {} must be a non-negative number",
                self.probability_step
            )));
        }
        if self.complexity_min > self.complexity_max {
            return Err(LadderError::Config("complexity_min exceeds complexity_max".into()));
        }
        if !(self.complexity_min..=self.complexity_max).contains(&self.default_complexity) {
            return Err(LadderError::Config("default_complexity outside its range".into()));
        }
        if self.speed_min > self.speed_max
            || !(self.speed_min..=self.speed_max).contains(&self.default_speed)
        {
            return Err(LadderError::Config("speed range is inconsistent".into()));
        }
        let usable = self.canvas_height - self.top_padding - self.bottom_padding;
        if usable <= 0.0 {
            return Err(LadderError::Config(format!(
                "canvas_height {} leaves no room between paddings",
                self.canvas_height
            )));
        }
        if self.min_spacing <= 0.0 || self.board_padding_x < 0.0 {
            return Err(LadderError::Config("layout metrics must be positive".into()));
        }
        if self.default_names.len() < 2 {
            return Err(LadderError::TooFewNames {
                found: self.default_names.len(),
            });
        }
        if self.default_results.len() < 2 {
            return Err(LadderError::TooFewResults {
                found: self.default_results.len(),
            });
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config; missing fields fall back to the defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, LadderError> {
        let cfg: LadderConfig =
            serde_json::from_str(text).map_err(|e| LadderError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_grow_by_eight_per_level() {
        assert_eq!(LadderConfig::rows_for(0), 8);
        assert_eq!(LadderConfig::rows_for(1), 16);
        assert_eq!(LadderConfig::rows_for(5), 48);
    }

    #[test]
    fn presets_differ_in_base_probability() {
        let d = LadderConfig::default();
        let c = LadderConfig::classic();
        assert!((d.probability_for(2) - 0.18).abs() < 1e-9);
        assert!((c.probability_for(2) - 0.19).abs() < 1e-9);
        assert!(d.speed_control);
        assert!(!c.speed_control);
    }

    #[test]
    fn presets_validate() {
        assert!(LadderConfig::default().validate().is_ok());
        assert!(LadderConfig::classic().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_probability_and_geometry() {
        let cfg = LadderConfig {
            base_probability: 1.5,
            ..LadderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LadderError::Config(_))));

        let cfg = LadderConfig {
            canvas_height: 60.0,
            ..LadderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LadderError::Config(_))));

        let cfg = LadderConfig {
            default_results: vec!["only".into()],
            ..LadderConfig::default()
        };
        assert_eq!(cfg.validate(), Err(LadderError::TooFewResults { found: 1 }));
    }

    #[test]
    fn clamps_stay_in_range() {
        let cfg = LadderConfig::default();
        assert_eq!(cfg.clamp_complexity(99), cfg.complexity_max);
        assert_eq!(cfg.clamp_speed(0), cfg.speed_min);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LadderConfig::from_json(r#"{"base_probability": 0.09, "speed_control": false}"#)
            .unwrap();
        assert_eq!(cfg, LadderConfig::classic());
        assert!(LadderConfig::from_json(r#"{"complexity_min": 9}"#).is_err());
        assert!(LadderConfig::from_json("not json").is_err());
    }
}
