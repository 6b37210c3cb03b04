use crate::error::CoreError;

/// A validated course rating in the 1 to 5 range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingValue(i16);

impl RatingValue {
    pub const MIN: i16 = 1;
    pub const MAX: i16 = 5;

    pub fn new(value: i16) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation(format!(
                "rating must be between {} and {}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

/// Whether a rating submission created a new record or replaced an
/// existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOutcome {
    Created,
    Updated,
}

/// Arithmetic mean of the given rating values, 0.0 when there are none
pub fn average(values: &[i16]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sum: i64 = values.iter().map(|value| i64::from(*value)).sum();
    sum as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_in_range() {
        for value in 1..=5 {
            let rating = RatingValue::new(value).expect("value in range");
            assert_eq!(rating.get(), value);
        }
    }

    #[test]
    fn rejects_values_out_of_range() {
        for value in [-1, 0, 6, 100] {
            assert!(matches!(
                RatingValue::new(value),
                Err(CoreError::Validation(_))
            ));
        }
    }

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn average_of_values() {
        assert_eq!(average(&[4, 5]), 4.5);
        assert_eq!(average(&[4]), 4.0);
        assert_eq!(average(&[1, 2, 3, 4, 5]), 3.0);
    }
}
