use super::Error;

/// Error when a record is constructed with the wrong number of values.
#[derive(Debug)]
pub(super) struct ArityMismatch {
    model: Box<str>,
    kind: ArityMismatchKind,
}

#[derive(Debug)]
enum ArityMismatchKind {
    /// Positional construction with the wrong tuple length
    Count { expected: usize, actual: usize },

    /// Named construction left a declared field without a value
    Missing(Box<str>),

    /// Named construction supplied the same field twice
    Duplicate(Box<str>),
}

impl std::error::Error for ArityMismatch {}

impl core::fmt::Display for ArityMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "arity mismatch for `{}`: ", self.model)?;
        match &self.kind {
            ArityMismatchKind::Count { expected, actual } => {
                write!(f, "expected {} values, got {}", expected, actual)
            }
            ArityMismatchKind::Missing(field) => write!(f, "no value for field `{}`", field),
            ArityMismatchKind::Duplicate(field) => {
                write!(f, "field `{}` supplied more than once", field)
            }
        }
    }
}

impl Error {
    /// Creates an arity mismatch error for a positional tuple of the wrong
    /// length.
    pub fn arity_mismatch(model: &str, expected: usize, actual: usize) -> Error {
        Error::from(super::ErrorKind::ArityMismatch(ArityMismatch {
            model: model.into(),
            kind: ArityMismatchKind::Count { expected, actual },
        }))
    }

    /// Creates an arity mismatch error for a declared field that received no
    /// value.
    pub fn missing_field(model: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::ArityMismatch(ArityMismatch {
            model: model.into(),
            kind: ArityMismatchKind::Missing(field.into()),
        }))
    }

    /// Creates an arity mismatch error for a field that received more than
    /// one value.
    pub fn duplicate_field(model: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::ArityMismatch(ArityMismatch {
            model: model.into(),
            kind: ArityMismatchKind::Duplicate(field.into()),
        }))
    }

    pub fn is_arity_mismatch(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::ArityMismatch(_)))
    }
}
