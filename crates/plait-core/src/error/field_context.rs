use super::Error;

/// Context attached to any error raised while resolving one field of a
/// record.
#[derive(Debug)]
pub(super) struct FieldContext {
    path: Box<str>,
}

impl std::error::Error for FieldContext {}

impl core::fmt::Display for FieldContext {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "resolving field `{}`", self.path)
    }
}

impl Error {
    /// Creates the context error naming `model.field`.
    ///
    /// Used with [`Error::context`] to wrap failures with the field being
    /// resolved.
    pub fn field_context(model: &str, field: &str) -> Error {
        Error::from(super::ErrorKind::FieldContext(FieldContext {
            path: format!("{model}.{field}").into(),
        }))
    }

    /// The `type.field` path of the innermost field whose resolution failed.
    pub fn field_path(&self) -> Option<&str> {
        self.chain()
            .filter_map(|err| match err.kind() {
                super::ErrorKind::FieldContext(ctx) => Some(&*ctx.path),
                _ => None,
            })
            .last()
    }
}
