use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrendError};

/// An ordered run of (x, y) observations, e.g. (decimal year, ppm).
///
/// Fields are private so a constructed series can't change underneath a
/// window or an outlier copy derived from it. Derivations build new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct Series {
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl TryFrom<RawSeries> for Series {
    type Error = TrendError;

    fn try_from(raw: RawSeries) -> Result<Self> {
        Series::new(raw.x, raw.y)
    }
}

impl Series {
    /// Fails on unequal lengths or on any NaN or infinite value.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(TrendError::MismatchedLengths {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if let Some(index) = x.iter().zip(&y).position(|(a, b)| !a.is_finite() || !b.is_finite()) {
            return Err(TrendError::NonFiniteValue { index });
        }
        Ok(Self { x, y })
    }

    pub fn empty() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Unchecked constructor for pairs drawn from an already valid series or
    /// filtered to finite values by the caller.
    pub(crate) fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (x, y) = pairs.into_iter().unzip();
        Self { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Smallest and largest x, or `None` for an empty series.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if self.x.is_empty() {
            return None;
        }
        let min = self.x.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

impl Default for Series {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let err = Series::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert_eq!(err, TrendError::MismatchedLengths { x_len: 2, y_len: 1 });
    }

    #[test]
    fn test_new_rejects_non_finite_values() {
        let err = Series::new(vec![1.0, 2.0, 3.0], vec![1.0, f64::NAN, 3.0]).unwrap_err();
        assert_eq!(err, TrendError::NonFiniteValue { index: 1 });
        let err = Series::new(vec![1.0, f64::INFINITY], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, TrendError::NonFiniteValue { index: 1 });
    }

    #[test]
    fn test_x_range() {
        let series = Series::new(vec![1958.2, 1960.0, 2020.5], vec![315.0, 317.0, 412.0]).unwrap();
        assert_eq!(series.x_range(), Some((1958.2, 2020.5)));
        assert_eq!(Series::empty().x_range(), None);
    }

    #[test]
    fn test_from_pairs_preserves_order() {
        let series = Series::from_pairs(vec![(3.0, 30.0), (1.0, 10.0)]);
        assert_eq!(series.x(), &[3.0, 1.0]);
        assert_eq!(series.y(), &[30.0, 10.0]);
    }

    #[test]
    fn test_deserialize_validates_lengths() {
        let ok: Series = serde_json::from_str(r#"{"x":[1.0,2.0],"y":[3.0,4.0]}"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<Series>(r#"{"x":[1.0],"y":[3.0,4.0]}"#);
        assert!(bad.is_err());
        let unbounded = serde_json::from_str::<Series>(r#"{"x":[1.0,2.0],"y":[3.0,1e400]}"#);
        assert!(unbounded.is_err());
    }
}
