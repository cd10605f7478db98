use super::Key;
use crate::schema::ModelId;

use std::fmt;

/// An identifier reference to an instance of a composite type.
///
/// Fields typed [`Type::Id`](super::Type::Id) resolve to an `Id` instead of
/// the nested record. They are never expanded, which is what allows two
/// types to refer to each other without an infinite nesting.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Id {
    model: ModelId,
    key: Key,
}

impl Id {
    pub fn new(model: ModelId, key: Key) -> Self {
        Self { model, key }
    }

    /// The type this identifier refers to.
    pub fn model_id(&self) -> ModelId {
        self.model
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Id({}/{})", self.model.0, self.key)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, fmt)
    }
}
