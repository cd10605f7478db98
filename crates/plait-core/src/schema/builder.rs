use super::def::FieldDefTy;
use super::{
    BelongsTo, Field, FieldDef, FieldName, FieldPrimitive, FieldTy, HasMany, HasOne, Model,
    ModelDef, ModelId, ScalarTy, Schema,
};
use crate::{stmt, Error, Result};

use heck::ToSnakeCase;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Collects type declarations and builds the immutable [`Schema`].
///
/// Registration must finish before any record is assembled; the built
/// schema is never modified afterwards.
#[derive(Debug, Default)]
pub struct Builder {
    defs: IndexMap<String, ModelDef>,
}

impl Builder {
    /// Registers a type declaration.
    ///
    /// Fails with `DuplicateType` if the name is taken and with `CyclicType`
    /// if the declaration would close a relation cycle with the types
    /// registered so far. Targets that are not registered yet are checked
    /// when the schema is built.
    pub fn register(&mut self, def: ModelDef) -> Result<&mut Self> {
        if self.defs.contains_key(&def.name) {
            return Err(Error::duplicate_type(&def.name));
        }

        if let Some(path) = CycleSearch::new(&self.defs, &def).find() {
            return Err(Error::cyclic_type(path));
        }

        tracing::debug!(ty = %def.name, fields = def.fields.len(), "registered type");
        self.defs.insert(def.name.clone(), def);
        Ok(self)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn build(&self) -> Result<Schema> {
        let ids: IndexMap<&str, ModelId> = self
            .defs
            .keys()
            .enumerate()
            .map(|(index, name)| (&name[..], ModelId(index)))
            .collect();

        // Identifier references check values against the referenced key type
        let key_tys: IndexMap<&str, stmt::Type> = self
            .defs
            .values()
            .filter_map(|def| Some((&def.name[..], key_ty(def)?)))
            .collect();

        let mut models = IndexMap::with_capacity(self.defs.len());

        for (index, def) in self.defs.values().enumerate() {
            let model = resolve_model(def, ModelId(index), &ids, &key_tys)?;
            models.insert(model.id, model);
        }

        let schema = Schema {
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            models,
        };

        schema.verify()?;

        tracing::debug!(
            version = schema.version,
            types = schema.models.len(),
            "built schema"
        );
        Ok(schema)
    }
}

fn resolve_model(
    def: &ModelDef,
    id: ModelId,
    ids: &IndexMap<&str, ModelId>,
    key_tys: &IndexMap<&str, stmt::Type>,
) -> Result<Model> {
    let mut seen = HashSet::new();
    let mut primary_key = None;

    for (index, field) in def.fields.iter().enumerate() {
        if !seen.insert(&field.name[..]) {
            return Err(Error::invalid_schema(format!(
                "type `{}` declares field `{}` more than once",
                def.name, field.name
            )));
        }

        if let Some(misuse) = field.misuse {
            return Err(Error::invalid_schema(format!(
                "field `{}.{}`: {}",
                def.name, field.name, misuse
            )));
        }

        if field.primary_key {
            if primary_key.is_some() {
                return Err(Error::invalid_schema(format!(
                    "type `{}` declares more than one key field",
                    def.name
                )));
            }
            primary_key = Some(id.field(index));
        }
    }

    let Some(primary_key) = primary_key else {
        return Err(Error::invalid_schema(format!(
            "type `{}` declares no key field",
            def.name
        )));
    };

    let fields = def
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            resolve_field(field, id.field(index), ids, key_tys)
                .map_err(|err| err.context(err!("field `{}.{}`", def.name, field.name)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Model {
        id,
        name: def.name.clone(),
        table: def
            .table
            .clone()
            .unwrap_or_else(|| def.name.to_snake_case()),
        fields,
        primary_key,
    })
}

fn resolve_field(
    field: &FieldDef,
    id: super::FieldId,
    ids: &IndexMap<&str, ModelId>,
    key_tys: &IndexMap<&str, stmt::Type>,
) -> Result<Field> {
    let target = |name: &str| {
        ids.get(name)
            .copied()
            .ok_or_else(|| Error::unknown_type(name))
    };

    let ty = match &field.ty {
        FieldDefTy::Scalar(scalar) => FieldTy::Primitive(match scalar {
            ScalarTy::Bool => FieldPrimitive::plain(stmt::Type::Bool),
            ScalarTy::I32 => FieldPrimitive::plain(stmt::Type::I32),
            ScalarTy::I64 => FieldPrimitive::plain(stmt::Type::I64),
            ScalarTy::String => FieldPrimitive::plain(stmt::Type::String),
            ScalarTy::Id(name) => FieldPrimitive {
                ty: stmt::Type::Id(target(name)?),
                key_ty: key_tys.get(&name[..]).cloned(),
            },
        }),
        FieldDefTy::BelongsTo {
            target: name,
            foreign_key,
        } => BelongsTo {
            target: target(name)?,
            foreign_key: foreign_key.clone(),
        }
        .into(),
        FieldDefTy::HasOne { target: name, pair } => HasOne {
            target: target(name)?,
            pair: pair.clone(),
        }
        .into(),
        FieldDefTy::HasMany {
            target: name,
            via,
            order_by,
        } => HasMany {
            target: target(name)?,
            via: via.clone(),
            order_by: order_by.clone(),
        }
        .into(),
    };

    Ok(Field {
        id,
        name: FieldName {
            app_name: field.name.clone(),
            storage_name: field.column.clone(),
        },
        ty,
        nullable: field.nullable,
        primary_key: field.primary_key,
    })
}

/// The declared key type, when it is a plain scalar.
fn key_ty(def: &ModelDef) -> Option<stmt::Type> {
    let key = def.fields.iter().find(|field| field.primary_key)?;

    match &key.ty {
        FieldDefTy::Scalar(ScalarTy::Bool) => Some(stmt::Type::Bool),
        FieldDefTy::Scalar(ScalarTy::I32) => Some(stmt::Type::I32),
        FieldDefTy::Scalar(ScalarTy::I64) => Some(stmt::Type::I64),
        FieldDefTy::Scalar(ScalarTy::String) => Some(stmt::Type::String),
        _ => None,
    }
}

/// Depth-first search for a relation path leading from a new declaration
/// back to itself.
struct CycleSearch<'a> {
    defs: &'a IndexMap<String, ModelDef>,
    new: &'a ModelDef,
    visited: HashSet<&'a str>,
    path: Vec<&'a str>,
}

impl<'a> CycleSearch<'a> {
    fn new(defs: &'a IndexMap<String, ModelDef>, new: &'a ModelDef) -> Self {
        Self {
            defs,
            new,
            visited: HashSet::new(),
            path: vec![&new.name[..]],
        }
    }

    fn find(mut self) -> Option<Vec<&'a str>> {
        self.visit(self.new).then_some(self.path)
    }

    fn visit(&mut self, def: &'a ModelDef) -> bool {
        for target in def.relation_targets() {
            if target == self.new.name {
                self.path.push(target);
                return true;
            }

            if !self.visited.insert(target) {
                continue;
            }

            // Unregistered targets cannot close a cycle yet
            let Some(next) = self.defs.get(target) else {
                continue;
            };

            self.path.push(target);
            if self.visit(next) {
                return true;
            }
            self.path.pop();
        }

        false
    }
}
