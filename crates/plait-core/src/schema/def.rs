use super::{Link, OrderBy, Via};
use crate::stmt::Direction;

/// Declaration of a composite type, before registration.
///
/// Relation targets and identifier references name other types by their
/// registered name, so types can be declared in any order.
///
/// ```
/// use plait_core::schema::{FieldDef, Link, ModelDef, ScalarTy};
///
/// let class = ModelDef::new("class")
///     .field(FieldDef::key("id", ScalarTy::I64))
///     .field(FieldDef::scalar("subject", ScalarTy::String))
///     .field(FieldDef::belongs_to("teacher", "teacher", "teacher_id"))
///     .field(FieldDef::has_many_through(
///         "students",
///         "student",
///         Link::new("enrollment", "class_id", "student_id"),
///     ));
/// # let _ = class;
/// ```
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub(crate) name: String,
    pub(crate) table: Option<String>,
    pub(crate) fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: String,
    pub(crate) column: Option<String>,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    pub(crate) ty: FieldDefTy,

    /// Set when a modifier was applied to a field kind it does not fit
    pub(crate) misuse: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub(crate) enum FieldDefTy {
    Scalar(ScalarTy),
    BelongsTo {
        target: String,
        foreign_key: String,
    },
    HasOne {
        target: String,
        pair: String,
    },
    HasMany {
        target: String,
        via: Via,
        order_by: Option<OrderBy>,
    },
}

/// Scalar field types as declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarTy {
    Bool,
    I32,
    I64,
    String,

    /// Identifier reference to the named type
    Id(String),
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: vec![],
        }
    }

    /// Storage table of the type. Defaults to the snake-case type name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Appends a field. Declaration order is the order of the assembled
    /// record.
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the types this declaration nests through relation fields.
    pub(crate) fn relation_targets(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().filter_map(|field| match &field.ty {
            FieldDefTy::Scalar(_) => None,
            FieldDefTy::BelongsTo { target, .. }
            | FieldDefTy::HasOne { target, .. }
            | FieldDefTy::HasMany { target, .. } => Some(&target[..]),
        })
    }
}

impl FieldDef {
    fn new(name: impl Into<String>, ty: FieldDefTy) -> Self {
        Self {
            name: name.into(),
            column: None,
            nullable: false,
            primary_key: false,
            ty,
            misuse: None,
        }
    }

    /// The key field, matched against root identifiers.
    pub fn key(name: impl Into<String>, ty: ScalarTy) -> Self {
        let mut field = Self::new(name, FieldDefTy::Scalar(ty));
        field.primary_key = true;
        field
    }

    pub fn scalar(name: impl Into<String>, ty: ScalarTy) -> Self {
        Self::new(name, FieldDefTy::Scalar(ty))
    }

    /// Single relation whose key is stored in the source table's
    /// `foreign_key` column.
    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldDefTy::BelongsTo {
                target: target.into(),
                foreign_key: foreign_key.into(),
            },
        )
    }

    /// Single relation found through the target table's `pair` column.
    pub fn has_one(
        name: impl Into<String>,
        target: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldDefTy::HasOne {
                target: target.into(),
                pair: pair.into(),
            },
        )
    }

    /// Collection relation found through the target table's `pair` column.
    pub fn has_many(
        name: impl Into<String>,
        target: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldDefTy::HasMany {
                target: target.into(),
                via: Via::Column(pair.into()),
                order_by: None,
            },
        )
    }

    /// Collection relation found through a link table.
    pub fn has_many_through(
        name: impl Into<String>,
        target: impl Into<String>,
        link: Link,
    ) -> Self {
        Self::new(
            name,
            FieldDefTy::HasMany {
                target: target.into(),
                via: Via::Link(link),
                order_by: None,
            },
        )
    }

    /// Allows a scalar field to hold `Null`.
    pub fn nullable(mut self) -> Self {
        match self.ty {
            FieldDefTy::Scalar(_) if self.primary_key => {
                self.misuse = Some("key fields cannot be nullable");
            }
            FieldDefTy::Scalar(_) => self.nullable = true,
            _ => self.misuse = Some("only scalar fields can be nullable"),
        }
        self
    }

    /// Storage column of a scalar field. Defaults to the field name.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        match self.ty {
            FieldDefTy::Scalar(_) => self.column = Some(column.into()),
            _ => self.misuse = Some("only scalar fields map to a column"),
        }
        self
    }

    /// Declares an explicit ordering rule for a collection, applied as a
    /// stable sort on the target table's `column`.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        match &mut self.ty {
            FieldDefTy::HasMany { order_by, .. } => {
                *order_by = Some(OrderBy {
                    column: column.into(),
                    direction,
                });
            }
            _ => self.misuse = Some("only collection fields can declare an ordering"),
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ScalarTy {
    pub fn id(target: impl Into<String>) -> Self {
        Self::Id(target.into())
    }
}
