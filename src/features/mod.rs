//! Feature vectors and input coercion
//!
//! Turns raw user input into the fixed-order rows the models were fit on.

pub mod input;
pub mod vector;

pub use input::FeatureInput;
pub use vector::{BatsmanFeatures, BowlerFeatures, PlayerFeatures, RawFeatures};
