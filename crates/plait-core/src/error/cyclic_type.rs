use super::Error;

/// Error when relation fields form a cycle that is not broken by an
/// identifier reference.
///
/// The path lists the type names along the cycle, starting and ending with
/// the same type.
#[derive(Debug)]
pub(super) struct CyclicType {
    path: Vec<Box<str>>,
}

impl std::error::Error for CyclicType {}

impl core::fmt::Display for CyclicType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("cyclic type: ")?;
        for (i, name) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl Error {
    pub fn cyclic_type<I, S>(path: I) -> Error
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Error::from(super::ErrorKind::CyclicType(CyclicType {
            path: path.into_iter().map(|name| name.as_ref().into()).collect(),
        }))
    }

    pub fn is_cyclic_type(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::CyclicType(_)))
    }
}
