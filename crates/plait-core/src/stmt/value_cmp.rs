//! Comparisons between values.
//!
//! `PartialEq` with Rust primitives keeps test assertions short; the scalar
//! ordering backs explicit collection ordering rules.

use super::{Key, Value};

use std::cmp::Ordering;

macro_rules! impl_value_eq {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    matches!(self, Value::$variant(val) if val == other)
                }
            }

            impl PartialEq<Value> for $ty {
                fn eq(&self, other: &Value) -> bool {
                    other.eq(self)
                }
            }
        )*
    };
}

impl_value_eq! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    String => String,
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::String(val) if val == other)
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other.eq(self)
    }
}

impl Value {
    /// Total order over scalar values used for sorting collections.
    ///
    /// `Null` sorts first. Values of different scalar kinds compare by kind so
    /// the order stays total; non-scalar values compare equal, which leaves a
    /// stable sort untouched.
    pub fn cmp_scalar(&self, other: &Value) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        match (Key::from_value(self), Key::from_value(other)) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => Ordering::Equal,
        }
    }
}
