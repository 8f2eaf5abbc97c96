use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Difficulty, GameMode};

/// Weights of the end-of-game scoring rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub easy_points: u32,
    pub medium_points: u32,
    pub hard_points: u32,
    pub pvp_multiplier: f64,
    pub pvb_multiplier: f64,
    /// Points per bead the winner has over the loser.
    pub bead_bonus: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            easy_points: 10,
            medium_points: 25,
            hard_points: 50,
            pvp_multiplier: 1.5,
            pvb_multiplier: 1.0,
            bead_bonus: 5,
        }
    }
}

impl ScoringConfig {
    pub fn base_points(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy_points,
            Difficulty::Medium => self.medium_points,
            Difficulty::Hard => self.hard_points,
        }
    }

    pub fn mode_multiplier(&self, mode: GameMode) -> f64 {
        match mode {
            GameMode::PlayerVsPlayer => self.pvp_multiplier,
            GameMode::PlayerVsBot => self.pvb_multiplier,
        }
    }

    pub fn margin_bonus(&self, winner_beads: u32, loser_beads: u32) -> u32 {
        self.bead_bonus * winner_beads.saturating_sub(loser_beads)
    }

    /// `round(base × multiplier + margin)`, halves rounded away from zero.
    pub fn score(
        &self,
        difficulty: Difficulty,
        mode: GameMode,
        winner_beads: u32,
        loser_beads: u32,
    ) -> u32 {
        let raw = self.base_points(difficulty) as f64 * self.mode_multiplier(mode)
            + self.margin_bonus(winner_beads, loser_beads) as f64;
        raw.round().max(0.0) as u32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("scoring.pvp_multiplier", self.pvp_multiplier),
            ("scoring.pvb_multiplier", self.pvb_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a finite number > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Scores a win with the default weights.
pub fn score(difficulty: Difficulty, mode: GameMode, winner_beads: u32, loser_beads: u32) -> u32 {
    ScoringConfig::default().score(difficulty, mode, winner_beads, loser_beads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_pvp_with_four_bead_margin_scores_95() {
        let config = ScoringConfig::default();

        assert_eq!(config.base_points(Difficulty::Hard), 50);
        assert_eq!(config.mode_multiplier(GameMode::PlayerVsPlayer), 1.5);
        assert_eq!(config.margin_bonus(6, 2), 20);
        assert_eq!(score(Difficulty::Hard, GameMode::PlayerVsPlayer, 6, 2), 95);
    }

    #[test]
    fn loser_ahead_on_beads_gives_no_negative_bonus() {
        assert_eq!(score(Difficulty::Easy, GameMode::PlayerVsBot, 3, 5), 10);
    }

    #[test]
    fn halves_round_up() {
        // 25 * 1.5 + 5 = 42.5
        assert_eq!(score(Difficulty::Medium, GameMode::PlayerVsPlayer, 4, 3), 43);
    }

    #[test]
    fn custom_weights_apply() {
        let config = ScoringConfig {
            hard_points: 100,
            pvb_multiplier: 2.0,
            bead_bonus: 1,
            ..ScoringConfig::default()
        };

        assert_eq!(config.score(Difficulty::Hard, GameMode::PlayerVsBot, 10, 4), 206);
    }

    #[test]
    fn validate_rejects_non_positive_multiplier() {
        let config = ScoringConfig {
            pvb_multiplier: 0.0,
            ..ScoringConfig::default()
        };

        assert!(config.validate().is_err());
        assert!(ScoringConfig::default().validate().is_ok());
    }
}
