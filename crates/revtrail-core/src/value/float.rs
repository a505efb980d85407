use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// Float64
///
/// A finite f64 with total equality and ordering, so float-typed properties
/// can live inside set elements and map keys. NaN and infinities are
/// rejected at construction.
///

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Float64(f64);

impl Float64 {
    /// Fails on NaN and infinite inputs.
    pub fn try_new(value: f64) -> Result<Self, FloatError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(FloatError::NotFinite { value })
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Float64 {}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

///
/// FloatError
///

#[derive(Clone, Copy, Debug, PartialEq, ThisError)]
pub enum FloatError {
    #[error("float value is not finite: {value}")]
    NotFinite { value: f64 },
}
