use super::Error;

/// Error when the underlying storage fails to serve a read.
///
/// Wraps the storage library's error verbatim. This layer does not retry;
/// callers decide whether the failure is transient.
#[derive(Debug)]
pub(super) struct StorageUnavailable {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for StorageUnavailable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for StorageUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("storage unavailable: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a storage read failure.
    ///
    /// Drivers convert their library errors (rusqlite, I/O, ...) through this
    /// constructor.
    pub fn storage_unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::StorageUnavailable(StorageUnavailable {
            inner: Box::new(err),
        }))
    }

    pub fn is_storage_unavailable(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::StorageUnavailable(_)))
    }
}
