#![deny(missing_docs)]

//! Error types and helper macros shared by every Rugo crate.
//!
//! Each leaf variant of [`RugoError`] carries a captured [`ErrBacktrace`], which is only
//! populated when `RUST_BACKTRACE` is set.

mod ext;

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::num::TryFromIntError;
use std::ops::Deref;
use std::{fmt, io};

pub use ext::*;

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        Self(msg.into())
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// A backtrace captured where an error was created.
///
/// Only populated when `RUST_BACKTRACE` is set.
pub struct ErrBacktrace(Backtrace);

impl ErrBacktrace {
    /// Capture the current backtrace.
    #[inline]
    pub fn capture() -> Self {
        Self(Backtrace::capture())
    }

    /// The captured backtrace.
    pub fn backtrace(&self) -> &Backtrace {
        &self.0
    }
}

impl Debug for ErrBacktrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for ErrBacktrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for Rugo.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum RugoError {
    /// The file could not be opened for reading.
    #[error("cannot open file {0}: {1}\nBacktrace:\n{2}")]
    CannotOpenFile(ErrString, #[source] io::Error, ErrBacktrace),
    /// The trailing magic marker does not identify a supported file.
    #[error("{0}\nBacktrace:\n{1}")]
    NotThisFormat(ErrString, ErrBacktrace),
    /// The input ended before a value could be fully decoded.
    #[error("{0}\nBacktrace:\n{1}")]
    UnexpectedEndOfInput(ErrString, ErrBacktrace),
    /// A declared length points past the end of the available bytes.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidLength(ErrString, ErrBacktrace),
    /// Nested containers exceed the configured recursion limit.
    #[error("nesting depth exceeds limit of {0}\nBacktrace:\n{1}")]
    NestingTooDeep(usize, ErrBacktrace),
    /// An argument or option was invalid.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, ErrBacktrace),
    /// Wraps another error with additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<RugoError>),
    /// A read failed after the file was opened.
    #[error("{0}\nBacktrace:\n{1}")]
    IOError(#[source] io::Error, ErrBacktrace),
}

impl RugoError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        RugoError::Context(msg.into(), Box::new(self))
    }

    /// Returns the innermost error, looking through any [`RugoError::Context`] wrappers.
    pub fn root_cause(&self) -> &RugoError {
        match self {
            RugoError::Context(_, inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl Debug for RugoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<io::Error> for RugoError {
    fn from(value: io::Error) -> Self {
        RugoError::IOError(value, ErrBacktrace::capture())
    }
}

impl From<TryFromIntError> for RugoError {
    fn from(value: TryFromIntError) -> Self {
        RugoError::InvalidLength(value.to_string().into(), ErrBacktrace::capture())
    }
}

/// A type alias for Results that return RugoErrors as their error type.
pub type RugoResult<T> = Result<T, RugoError>;

/// A trait for unwrapping a value, panicking with a [`RugoError`] on failure.
pub trait RugoUnwrap {
    /// The type of the value being unwrapped.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn rugo_unwrap(self) -> Self::Output;
}

impl<T, E> RugoUnwrap for Result<T, E>
where
    E: Into<RugoError>,
{
    type Output = T;

    #[inline(always)]
    fn rugo_unwrap(self) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|err| rugo_panic!(err))
    }
}

/// A trait for expect-ing a value, panicking with a [`RugoError`] on failure.
pub trait RugoExpect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn rugo_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> RugoExpect for Result<T, E>
where
    E: Into<RugoError>,
{
    type Output = T;

    #[inline(always)]
    fn rugo_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| rugo_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> RugoExpect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn rugo_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = RugoError::InvalidArgument(msg.to_string().into(), ErrBacktrace::capture());
            rugo_panic!(err)
        })
    }
}

/// A convenient macro for creating a [`RugoError`].
#[macro_export]
macro_rules! rugo_err {
    (NotThisFormat: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::__private::must_use(
            $crate::RugoError::NotThisFormat(format!($fmt, $($arg),*).into(), $crate::ErrBacktrace::capture())
        )
    }};
    (UnexpectedEndOfInput: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::__private::must_use(
            $crate::RugoError::UnexpectedEndOfInput(format!($fmt, $($arg),*).into(), $crate::ErrBacktrace::capture())
        )
    }};
    (InvalidLength: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::__private::must_use(
            $crate::RugoError::InvalidLength(format!($fmt, $($arg),*).into(), $crate::ErrBacktrace::capture())
        )
    }};
    (InvalidArgument: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::__private::must_use(
            $crate::RugoError::InvalidArgument(format!($fmt, $($arg),*).into(), $crate::ErrBacktrace::capture())
        )
    }};
    (NestingTooDeep: $limit:expr) => {{
        $crate::__private::must_use(
            $crate::RugoError::NestingTooDeep($limit, $crate::ErrBacktrace::capture())
        )
    }};
    (CannotOpenFile: $path:expr, $source:expr) => {{
        $crate::__private::must_use(
            $crate::RugoError::CannotOpenFile($path.to_string().into(), $source, $crate::ErrBacktrace::capture())
        )
    }};
    (Context: $msg:literal, $err:expr) => {{
        $crate::__private::must_use(
            $crate::RugoError::Context($msg.into(), Box::new($err))
        )
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::rugo_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenience macro for returning a [`RugoError`] from a function.
#[macro_export]
macro_rules! rugo_bail {
    ($($tt:tt)+) => {
        return Err($crate::rugo_err!($($tt)+))
    };
}

/// A convenience macro for panicking with a [`RugoError`].
#[macro_export]
macro_rules! rugo_panic {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::rugo_panic!($crate::rugo_err!($fmt, $($arg),*))
    };
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err: $crate::RugoError = $err;
        panic!("{}", err.with_context(format!($fmt, $($arg),*)))
    }};
    ($err:expr) => {{
        let err: $crate::RugoError = $err;
        panic!("{}", err)
    }};
}

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn must_use(x: crate::RugoError) -> crate::RugoError {
        x
    }
}
