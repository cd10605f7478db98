mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::{HasMany, Link, OrderBy, Via};

mod has_one;
pub use has_one::HasOne;

use super::{FieldTy, Model, ModelId, Schema};
