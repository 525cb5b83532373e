//! Numeric keyword validators, one per numeric domain.
use super::{keyword_location, Validate};
use crate::error::SchemaError;
use crate::output::{ErrorReporter, Patch, ValidationOutput};
use crate::paths::JsonPointer;
use crate::uri::UriWrapper;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// The numeric domain a validator operates in: `i64` when the schema says
/// `"integer"`, `f64` when it says `"number"` or says nothing.
pub(crate) trait NumericType: Copy + PartialOrd + PartialEq + fmt::Display + Send + Sync {
    /// Convert an instance losslessly, or refuse it.
    fn from_instance(instance: &Value) -> Option<Self>;
    /// Convert a schema-side limit, truncating doubles the way the
    /// original does.
    fn from_limit(value: &Value) -> Option<Self>;
    fn as_f64(self) -> f64;
    fn is_zero(self) -> bool;
}

impl NumericType for i64 {
    fn from_instance(instance: &Value) -> Option<i64> {
        if let Some(value) = instance.as_i64() {
            return Some(value);
        }
        if let Some(value) = instance.as_u64() {
            return i64::try_from(value).ok();
        }
        // Doubles are accepted under "integer" when they round-trip.
        let value = instance.as_f64()?;
        let converted = value as i64;
        (converted as f64 == value).then_some(converted)
    }

    fn from_limit(value: &Value) -> Option<i64> {
        value
            .as_i64()
            .or_else(|| value.as_u64().map(|unsigned| unsigned.min(i64::MAX as u64) as i64))
            .or_else(|| value.as_f64().map(|double| double as i64))
    }

    fn as_f64(self) -> f64 {
        self as f64
    }

    fn is_zero(self) -> bool {
        self == 0
    }
}

impl NumericType for f64 {
    fn from_instance(instance: &Value) -> Option<f64> {
        instance.as_f64()
    }

    fn from_limit(value: &Value) -> Option<f64> {
        value.as_f64()
    }

    fn as_f64(self) -> f64 {
        self
    }

    fn is_zero(self) -> bool {
        self == 0.0
    }
}

pub(crate) struct NumericValidator<T: NumericType> {
    location: String,
    maximum: Option<T>,
    minimum: Option<T>,
    exclusive_maximum: bool,
    exclusive_minimum: bool,
    multiple_of: Option<f64>,
}

impl<T: NumericType> NumericValidator<T> {
    pub(crate) fn compile(
        schema: &Map<String, Value>,
        uris: &[UriWrapper],
    ) -> Result<Arc<NumericValidator<T>>, SchemaError> {
        let mut validator = NumericValidator {
            location: keyword_location(uris),
            maximum: None,
            minimum: None,
            exclusive_maximum: false,
            exclusive_minimum: false,
            multiple_of: None,
        };
        if let Some(value) = schema.get("maximum") {
            validator.maximum = Some(limit::<T>(value, "maximum")?);
        }
        if let Some(value) = schema.get("minimum") {
            validator.minimum = Some(limit::<T>(value, "minimum")?);
        }
        // Draft-07 exclusive bounds are numbers, not booleans.
        if let Some(value) = schema.get("exclusiveMaximum") {
            validator.maximum = Some(limit::<T>(value, "exclusiveMaximum")?);
            validator.exclusive_maximum = true;
        }
        if let Some(value) = schema.get("exclusiveMinimum") {
            validator.minimum = Some(limit::<T>(value, "exclusiveMinimum")?);
            validator.exclusive_minimum = true;
        }
        if let Some(value) = schema.get("multipleOf") {
            validator.multiple_of = Some(limit::<f64>(value, "multipleOf")?);
        }
        Ok(Arc::new(validator))
    }
}

fn limit<T: NumericType>(value: &Value, keyword: &str) -> Result<T, SchemaError> {
    T::from_limit(value)
        .ok_or_else(|| SchemaError::Schema(format!("\"{}\" must be a number", keyword)))
}

impl<T: NumericType> Validate for NumericValidator<T> {
    fn absolute_keyword_location(&self) -> &str {
        &self.location
    }

    fn validate(
        &self,
        instance: &Value,
        location: &JsonPointer,
        reporter: &mut dyn ErrorReporter,
        _: &mut Patch,
    ) {
        let Some(value) = T::from_instance(instance) else {
            reporter.report(ValidationOutput::new(
                location,
                "Instance is not a number",
                "number",
                &self.location,
            ));
            return;
        };

        if let Some(multiple_of) = self.multiple_of {
            // Zero is a multiple of everything.
            if !value.is_zero() && violates_multiple_of(value.as_f64(), multiple_of) {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("{} is not a multiple of {}", instance, multiple_of),
                    "multipleOf",
                    &self.location,
                ));
            }
        }

        if let Some(maximum) = self.maximum {
            if (self.exclusive_maximum && value >= maximum) || value > maximum {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("{} exceeds maximum of {}", instance, maximum),
                    "maximum",
                    &self.location,
                ));
            }
        }

        if let Some(minimum) = self.minimum {
            if (self.exclusive_minimum && value <= minimum) || value < minimum {
                reporter.report(ValidationOutput::new(
                    location,
                    format!("{} is below minimum of {}", instance, minimum),
                    "minimum",
                    &self.location,
                ));
            }
        }
    }
}

// multipleOf tolerates one ULP of the value; schemas in the wild depend on
// this rather than a fixed epsilon.
fn violates_multiple_of(value: f64, multiple_of: f64) -> bool {
    let quotient = (value / multiple_of).round();
    let remainder = value - quotient * multiple_of;
    let eps = next_toward_zero(value) - value;
    remainder.abs() > eps.abs()
}

fn next_toward_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        f64::from_bits(value.to_bits() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{next_toward_zero, violates_multiple_of, NumericType};
    use serde_json::json;

    #[test]
    fn integer_conversion_is_lossless() {
        assert_eq!(i64::from_instance(&json!(3)), Some(3));
        assert_eq!(i64::from_instance(&json!(2.0)), Some(2));
        assert_eq!(i64::from_instance(&json!(2.5)), None);
        assert_eq!(i64::from_instance(&json!(u64::MAX)), None);
    }

    #[test]
    fn next_toward_zero_shrinks_magnitude() {
        assert!(next_toward_zero(1.0) < 1.0);
        assert!(next_toward_zero(-1.0) > -1.0);
        assert_eq!(next_toward_zero(0.0), 0.0);
    }

    #[test]
    fn multiple_of_tolerates_one_ulp() {
        assert!(!violates_multiple_of(9.0, 3.0));
        assert!(violates_multiple_of(10.0, 3.0));
        // 0.1 * 3 accumulates representation error below one ULP.
        assert!(!violates_multiple_of(0.30000000000000004, 0.1));
    }
}
