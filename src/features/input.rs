//! Numeric coercion of raw feature inputs
//!
//! Callers hand the service whatever they have (numbers from a form, strings
//! from a CLI or CSV, JSON values from a batch file). Everything is coerced to
//! a finite `f64` up front; anything else is an `InvalidInput` error.

use crate::{CricketError, Result};

/// A raw value that can be coerced into a feature
pub trait FeatureInput {
    fn to_feature(&self, field: &'static str) -> Result<f64>;
}

fn finite(field: &'static str, value: f64, raw: impl ToString) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CricketError::InvalidInput {
            field,
            value: raw.to_string(),
        })
    }
}

impl FeatureInput for f64 {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        finite(field, *self, self)
    }
}

impl FeatureInput for f32 {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        finite(field, *self as f64, self)
    }
}

macro_rules! integer_input {
    ($($t:ty),*) => {
        $(
            impl FeatureInput for $t {
                fn to_feature(&self, _field: &'static str) -> Result<f64> {
                    Ok(*self as f64)
                }
            }
        )*
    };
}

integer_input!(i32, i64, u32, u64, usize);

impl FeatureInput for str {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        let parsed = self
            .trim()
            .parse::<f64>()
            .map_err(|_| CricketError::InvalidInput {
                field,
                value: self.to_string(),
            })?;
        finite(field, parsed, self)
    }
}

impl FeatureInput for String {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        self.as_str().to_feature(field)
    }
}

impl<T: FeatureInput> FeatureInput for Option<T> {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        match self {
            Some(v) => v.to_feature(field),
            None => Err(CricketError::InvalidInput {
                field,
                value: "missing".to_string(),
            }),
        }
    }
}

impl FeatureInput for serde_json::Value {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        match self {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => finite(field, v, n),
                None => Err(CricketError::InvalidInput {
                    field,
                    value: n.to_string(),
                }),
            },
            serde_json::Value::String(s) => s.to_feature(field),
            other => Err(CricketError::InvalidInput {
                field,
                value: other.to_string(),
            }),
        }
    }
}

impl<T: FeatureInput + ?Sized> FeatureInput for &T {
    fn to_feature(&self, field: &'static str) -> Result<f64> {
        (**self).to_feature(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(err: CricketError) -> &'static str {
        match err {
            CricketError::InvalidInput { field, .. } => field,
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_inputs() {
        assert_eq!(30.5f64.to_feature("x").unwrap(), 30.5);
        assert_eq!(2.5f32.to_feature("x").unwrap(), 2.5);
        assert_eq!(30i32.to_feature("x").unwrap(), 30.0);
        assert_eq!(7usize.to_feature("x").unwrap(), 7.0);
    }

    #[test]
    fn test_string_inputs() {
        assert_eq!("150".to_feature("x").unwrap(), 150.0);
        assert_eq!(" 7.5 ".to_feature("x").unwrap(), 7.5);
        assert_eq!(String::from("-3").to_feature("x").unwrap(), -3.0);
    }

    #[test]
    fn test_non_numeric_string() {
        let err = "fast".to_feature("strike_rate").unwrap_err();
        assert_eq!(field_of(err), "strike_rate");
        assert!("".to_feature("x").is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(f64::NAN.to_feature("x").is_err());
        assert!(f64::INFINITY.to_feature("x").is_err());
        assert!("inf".to_feature("x").is_err());
        assert!("NaN".to_feature("x").is_err());
    }

    #[test]
    fn test_missing_value() {
        let missing: Option<f64> = None;
        let err = missing.to_feature("overs").unwrap_err();
        assert_eq!(field_of(err), "overs");
        assert_eq!(Some(4.0).to_feature("overs").unwrap(), 4.0);
    }

    #[test]
    fn test_json_inputs() {
        assert_eq!(json!(4).to_feature("x").unwrap(), 4.0);
        assert_eq!(json!(7.5).to_feature("x").unwrap(), 7.5);
        assert_eq!(json!("25").to_feature("x").unwrap(), 25.0);
        assert!(json!(null).to_feature("x").is_err());
        assert!(json!(true).to_feature("x").is_err());
        assert!(json!([1, 2]).to_feature("x").is_err());
    }
}
