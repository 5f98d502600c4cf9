//! Per-role feature vectors
//!
//! Field order here is the order the scaler and regressor see. It must match
//! `Role::feature_names` and the order recorded in the artifacts.

use serde::{Deserialize, Serialize};

use super::input::FeatureInput;
use crate::{Result, Role};

/// Batsman features for one innings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatsmanFeatures {
    pub balls_faced: f64,
    pub strike_rate: f64,
    /// Percentage of balls faced that were dot balls (0-100)
    pub dot_ball_pct: f64,
}

impl BatsmanFeatures {
    pub const DIM: usize = 3;

    pub fn new(balls_faced: f64, strike_rate: f64, dot_ball_pct: f64) -> Self {
        BatsmanFeatures {
            balls_faced,
            strike_rate,
            dot_ball_pct,
        }
    }

    /// Coerce raw inputs, failing on the first value that is not a number
    pub fn from_inputs(
        balls_faced: impl FeatureInput,
        strike_rate: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<Self> {
        Ok(BatsmanFeatures {
            balls_faced: balls_faced.to_feature("balls_faced")?,
            strike_rate: strike_rate.to_feature("strike_rate")?,
            dot_ball_pct: dot_ball_pct.to_feature("dot_ball_pct")?,
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.balls_faced, self.strike_rate, self.dot_ball_pct]
    }
}

/// Bowler features for one spell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BowlerFeatures {
    pub overs: f64,
    /// Runs conceded per over
    pub economy: f64,
    /// Percentage of deliveries that were dot balls (0-100)
    pub dot_ball_pct: f64,
}

impl BowlerFeatures {
    pub const DIM: usize = 3;

    pub fn new(overs: f64, economy: f64, dot_ball_pct: f64) -> Self {
        BowlerFeatures {
            overs,
            economy,
            dot_ball_pct,
        }
    }

    pub fn from_inputs(
        overs: impl FeatureInput,
        economy: impl FeatureInput,
        dot_ball_pct: impl FeatureInput,
    ) -> Result<Self> {
        Ok(BowlerFeatures {
            overs: overs.to_feature("overs")?,
            economy: economy.to_feature("economy")?,
            dot_ball_pct: dot_ball_pct.to_feature("dot_ball_pct")?,
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.overs, self.economy, self.dot_ball_pct]
    }
}

/// Features for either role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerFeatures {
    Batsman(BatsmanFeatures),
    Bowler(BowlerFeatures),
}

impl PlayerFeatures {
    pub fn role(&self) -> Role {
        match self {
            PlayerFeatures::Batsman(_) => Role::Batsman,
            PlayerFeatures::Bowler(_) => Role::Bowler,
        }
    }

    /// Single feature row in declared field order
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            PlayerFeatures::Batsman(f) => f.to_vec(),
            PlayerFeatures::Bowler(f) => f.to_vec(),
        }
    }
}

impl From<BatsmanFeatures> for PlayerFeatures {
    fn from(f: BatsmanFeatures) -> Self {
        PlayerFeatures::Batsman(f)
    }
}

impl From<BowlerFeatures> for PlayerFeatures {
    fn from(f: BowlerFeatures) -> Self {
        PlayerFeatures::Bowler(f)
    }
}

/// Uncoerced feature row as it appears in a batch file
///
/// Values may be numbers or numeric strings. Fields that do not belong to the
/// row's role are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeatures {
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default)]
    pub balls_faced: Option<serde_json::Value>,
    #[serde(default)]
    pub strike_rate: Option<serde_json::Value>,
    #[serde(default)]
    pub overs: Option<serde_json::Value>,
    #[serde(default)]
    pub economy: Option<serde_json::Value>,
    #[serde(default)]
    pub dot_ball_pct: Option<serde_json::Value>,
}

impl RawFeatures {
    /// Parse one row; an unknown `type` fails this row only
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn coerce(&self) -> Result<PlayerFeatures> {
        match self.role {
            Role::Batsman => BatsmanFeatures::from_inputs(
                &self.balls_faced,
                &self.strike_rate,
                &self.dot_ball_pct,
            )
            .map(PlayerFeatures::from),
            Role::Bowler => {
                BowlerFeatures::from_inputs(&self.overs, &self.economy, &self.dot_ball_pct)
                    .map(PlayerFeatures::from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CricketError;

    #[test]
    fn test_row_matches_declared_order() {
        let bat = PlayerFeatures::from(BatsmanFeatures::new(30.0, 150.0, 25.0));
        assert_eq!(bat.to_vec(), vec![30.0, 150.0, 25.0]);
        assert_eq!(bat.to_vec().len(), Role::Batsman.feature_names().len());

        let bowl = PlayerFeatures::from(BowlerFeatures::new(4.0, 7.5, 40.0));
        assert_eq!(bowl.to_vec(), vec![4.0, 7.5, 40.0]);
        assert_eq!(bowl.role(), Role::Bowler);
    }

    #[test]
    fn test_from_inputs_mixed_types() {
        let f = BatsmanFeatures::from_inputs(30, "150", 25.0).unwrap();
        assert_eq!(f, BatsmanFeatures::new(30.0, 150.0, 25.0));
    }

    #[test]
    fn test_from_inputs_reports_bad_field() {
        let err = BowlerFeatures::from_inputs(4, "tight", 40).unwrap_err();
        match err {
            CricketError::InvalidInput { field, value } => {
                assert_eq!(field, "economy");
                assert_eq!(value, "tight");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_raw_features_from_json() {
        let raw: RawFeatures = serde_json::from_str(
            r#"{"type": "bowler", "overs": 4, "economy": "7.5", "dot_ball_pct": 40}"#,
        )
        .unwrap();
        let features = raw.coerce().unwrap();
        assert_eq!(
            features,
            PlayerFeatures::Bowler(BowlerFeatures::new(4.0, 7.5, 40.0))
        );
    }

    #[test]
    fn test_raw_features_unknown_type() {
        let value = serde_json::json!({"type": "keeper", "balls_faced": 10});
        let err = RawFeatures::from_value(value).unwrap_err();
        assert!(matches!(err, CricketError::Json(_)));
    }

    #[test]
    fn test_raw_features_missing_field() {
        let raw: RawFeatures =
            serde_json::from_str(r#"{"type": "batsman", "balls_faced": 30, "dot_ball_pct": 25}"#)
                .unwrap();
        let err = raw.coerce().unwrap_err();
        assert!(matches!(
            err,
            CricketError::InvalidInput {
                field: "strike_rate",
                ..
            }
        ));
    }
}
