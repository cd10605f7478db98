use super::{BelongsTo, HasMany, HasOne, ModelId};
use crate::{stmt, Error, Result};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Field {
    /// Uniquely identifies the field within the containing model.
    pub id: FieldId,

    /// The field name
    pub name: FieldName,

    /// Scalar or relation
    pub ty: FieldTy,

    /// True if a scalar field may hold `Null`.
    pub nullable: bool,

    /// True if the field is the model's key
    pub primary_key: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FieldId {
    pub model: ModelId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

impl FieldName {
    pub fn storage_name(&self) -> &str {
        self.storage_name.as_ref().unwrap_or(&self.app_name)
    }
}

#[derive(Debug, Clone)]
pub struct FieldPrimitive {
    /// The field's value type
    pub ty: stmt::Type,

    /// For identifier references, the key type of the referenced type
    pub key_ty: Option<stmt::Type>,
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Primitive(FieldPrimitive),
    BelongsTo(BelongsTo),
    HasOne(HasOne),
    HasMany(HasMany),
}

/// How a field is resolved: from the row itself, as at most one nested
/// record, or as a collection of nested records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    SingleRelation,
    CollectionRelation,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name.app_name
    }

    pub fn kind(&self) -> FieldKind {
        match &self.ty {
            FieldTy::Primitive(_) => FieldKind::Scalar,
            FieldTy::BelongsTo(_) | FieldTy::HasOne(_) => FieldKind::SingleRelation,
            FieldTy::HasMany(_) => FieldKind::CollectionRelation,
        }
    }

    /// The type of the value this field resolves to.
    pub fn expr_ty(&self) -> stmt::Type {
        match &self.ty {
            FieldTy::Primitive(primitive) => primitive.ty.clone(),
            FieldTy::BelongsTo(rel) => stmt::Type::Model(rel.target),
            FieldTy::HasOne(rel) => stmt::Type::Model(rel.target),
            FieldTy::HasMany(rel) => stmt::Type::list(rel.target),
        }
    }

    /// Validates a value supplied for this field.
    ///
    /// `Null` is only accepted by nullable scalars and `Absent` only by
    /// single relations. A collection always needs a list, possibly empty.
    pub fn check(&self, value: stmt::Value) -> Result<stmt::Value> {
        match (self.kind(), value) {
            (FieldKind::Scalar, stmt::Value::Null) if self.nullable => Ok(stmt::Value::Null),
            (FieldKind::SingleRelation, stmt::Value::Absent) => Ok(stmt::Value::Absent),
            (_, value) => match &self.ty {
                FieldTy::Primitive(primitive) => primitive.cast(value),
                _ => self.expr_ty().cast(value),
            },
        }
    }
}

impl FieldPrimitive {
    pub fn plain(ty: stmt::Type) -> Self {
        Self { ty, key_ty: None }
    }

    /// Casts `value` to the field type. An identifier reference only accepts
    /// keys of the referenced type's key type.
    pub fn cast(&self, value: stmt::Value) -> Result<stmt::Value> {
        let (stmt::Type::Id(_), Some(key_ty)) = (&self.ty, &self.key_ty) else {
            return self.ty.cast(value);
        };

        match value {
            stmt::Value::Id(id) if key_fits(key_ty, id.key()) => self.ty.cast(stmt::Value::Id(id)),
            value @ stmt::Value::Id(_) => Err(Error::type_mismatch(&self.ty, &value)),
            value => self.ty.cast(key_ty.cast(value)?),
        }
    }
}

fn key_fits(ty: &stmt::Type, key: &stmt::Key) -> bool {
    match (ty, key) {
        (stmt::Type::Bool, stmt::Key::Bool(_)) => true,
        (stmt::Type::I32, stmt::Key::Int(v)) => i32::try_from(*v).is_ok(),
        (stmt::Type::I64, stmt::Key::Int(_)) => true,
        (stmt::Type::String, stmt::Key::String(_)) => true,
        _ => false,
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn as_primitive(&self) -> Option<&FieldPrimitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    pub fn as_belongs_to(&self) -> Option<&BelongsTo> {
        match self {
            Self::BelongsTo(belongs_to) => Some(belongs_to),
            _ => None,
        }
    }

    pub fn as_has_one(&self) -> Option<&HasOne> {
        match self {
            Self::HasOne(has_one) => Some(has_one),
            _ => None,
        }
    }

    pub fn as_has_many(&self) -> Option<&HasMany> {
        match self {
            Self::HasMany(has_many) => Some(has_many),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "FieldId({}/{})", self.model.0, self.index)
    }
}
