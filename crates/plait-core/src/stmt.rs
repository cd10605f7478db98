mod direction;
pub use direction::Direction;

mod id;
pub use id::Id;

mod key;
pub use key::Key;

mod record;
pub use record::{Record, RecordBuilder};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_cmp;

mod value_record;
pub use value_record::ValueRecord;
