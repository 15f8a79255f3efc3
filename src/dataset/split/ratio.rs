use super::SplitError;

/// Decimal places kept when checking that the ratio sums to one.
const SUM_PRECISION: f64 = 1e5;

/// Validated train/valid(/test) ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatio {
    pub train: f64,
    pub valid: f64,
    /// `None` for a two-way split, where validation takes every remaining folder.
    pub test: Option<f64>,
}

impl SplitRatio {
    /// Validate a `(train, valid)` or `(train, valid, test)` ratio.
    ///
    /// The sum must equal 1 after rounding to five decimals.
    pub fn new(values: &[f64]) -> Result<Self, SplitError> {
        let sum: f64 = values.iter().sum();
        if (sum * SUM_PRECISION).round() != SUM_PRECISION {
            return Err(SplitError::InvalidRatio(format!(
                "ratio values {values:?} sum to {sum}, expected 1"
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(SplitError::InvalidRatio(format!(
                "ratio value {bad} is negative or not finite"
            )));
        }
        match *values {
            [train, valid] => Ok(Self {
                train,
                valid,
                test: None,
            }),
            [train, valid, test] => Ok(Self {
                train,
                valid,
                test: Some(test),
            }),
            _ => Err(SplitError::InvalidRatio(format!(
                "expected (train, valid) or (train, valid, test), got {} values",
                values.len()
            ))),
        }
    }

    pub fn has_test(&self) -> bool {
        self.test.is_some()
    }

    /// Partition boundaries `(train_end, valid_end)` for `total` folders.
    ///
    /// For a two-way split `valid_end == total`.
    pub fn boundaries(&self, total: usize) -> (usize, usize) {
        let train_end = ((self.train * total as f64).floor() as usize).min(total);
        if !self.has_test() {
            return (train_end, total);
        }
        let valid_len = (self.valid * total as f64).floor() as usize;
        (train_end, (train_end + valid_len).min(total))
    }
}
