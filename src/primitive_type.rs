use serde_json::Value;
use std::fmt;

/// Tag for the JSON kind of an instance, used to index the `type`
/// dispatcher's table. Signed/unsigned integers and doubles are separate
/// kinds so that `"integer"` and `"number"` can map them independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InstanceKind {
    Null,
    Boolean,
    Int64,
    Uint64,
    Double,
    String,
    Array,
    Object,
}

pub(crate) const KIND_COUNT: usize = 8;

impl InstanceKind {
    pub(crate) fn of(instance: &Value) -> InstanceKind {
        match instance {
            Value::Null => InstanceKind::Null,
            Value::Bool(_) => InstanceKind::Boolean,
            Value::Number(number) => {
                if number.is_u64() {
                    InstanceKind::Uint64
                } else if number.is_i64() {
                    InstanceKind::Int64
                } else {
                    InstanceKind::Double
                }
            }
            Value::String(_) => InstanceKind::String,
            Value::Array(_) => InstanceKind::Array,
            Value::Object(_) => InstanceKind::Object,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceKind::Null => f.write_str("null"),
            InstanceKind::Boolean => f.write_str("boolean"),
            InstanceKind::Int64 | InstanceKind::Uint64 => f.write_str("integer"),
            InstanceKind::Double => f.write_str("number"),
            InstanceKind::String => f.write_str("string"),
            InstanceKind::Array => f.write_str("array"),
            InstanceKind::Object => f.write_str("object"),
        }
    }
}
