use crate::RugoResult;

/// Extension trait for RugoResult
pub trait ResultExt<T>: private::Sealed {
    /// Flatten a nested [`RugoResult`]. Helper function until <https://github.com/rust-lang/rust/issues/70142> is stabilized.
    fn flatten(self) -> RugoResult<T>;
}

mod private {
    use crate::RugoResult;

    pub trait Sealed {}

    impl<T> Sealed for RugoResult<RugoResult<T>> {}
}

impl<T> ResultExt<T> for RugoResult<RugoResult<T>> {
    fn flatten(self) -> RugoResult<T> {
        match self {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) | Err(e) => Err(e),
        }
    }
}
