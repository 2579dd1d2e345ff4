// src/exec/argv.rs

//! Argument vectors handed to the exec step.
//!
//! An [`ArgumentVector`] is validated once, when it is built: it is never
//! empty and none of its elements contain a NUL byte. The C strings are
//! prepared up front so the launcher can hand them to `execv` in the child
//! without allocating after `fork`.

use std::ffi::{CStr, CString};
use std::fmt;

use thiserror::Error;

/// Why a sequence of strings could not become an [`ArgumentVector`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("argument vector must contain at least the program path")]
    Empty,

    #[error("argument {index} contains an interior NUL byte")]
    InteriorNul { index: usize },
}

/// Program path followed by its positional arguments.
///
/// Element 0 is used verbatim as the executable path: there is no `PATH`
/// search and no shell expansion.
#[derive(Clone, PartialEq, Eq)]
pub struct ArgumentVector {
    args: Vec<CString>,
}

impl ArgumentVector {
    /// Build from a program path and its arguments.
    pub fn new<P, I, S>(program: P, args: I) -> Result<Self, ArgumentError>
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let all = std::iter::once(program.into()).chain(args.into_iter().map(Into::into));
        Self::from_strings(all)
    }

    /// Build from an ordered sequence whose first element is the program.
    pub fn from_strings<I, S>(items: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = items
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                CString::new(s.into()).map_err(|_| ArgumentError::InteriorNul { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if args.is_empty() {
            return Err(ArgumentError::Empty);
        }

        Ok(Self { args })
    }

    /// The executable path (element 0).
    pub fn program(&self) -> &CStr {
        &self.args[0]
    }

    /// Positional arguments after the program path.
    pub fn args(&self) -> &[CString] {
        &self.args[1..]
    }

    /// Number of elements, program included. Always at least 1.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All elements in order, program first.
    pub fn as_slice(&self) -> &[CString] {
        &self.args
    }

    /// Lossy UTF-8 rendering of the program path, for diagnostics.
    pub fn program_display(&self) -> String {
        self.program().to_string_lossy().into_owned()
    }

    /// Null-terminated pointer array suitable for `execv`.
    ///
    /// The pointers borrow from `self`, which must outlive the returned
    /// vector's use.
    pub(crate) fn exec_pointers(&self) -> Vec<*const libc::c_char> {
        self.args
            .iter()
            .map(|s| s.as_ptr())
            .chain(std::iter::once(std::ptr::null()))
            .collect()
    }
}

impl TryFrom<Vec<String>> for ArgumentVector {
    type Error = ArgumentError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_strings(items)
    }
}

impl TryFrom<&[&str]> for ArgumentVector {
    type Error = ArgumentError;

    fn try_from(items: &[&str]) -> Result<Self, Self::Error> {
        Self::from_strings(items.iter().copied())
    }
}

impl fmt::Debug for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.args.iter().map(|a| a.to_string_lossy()))
            .finish()
    }
}

impl fmt::Display for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&arg.to_string_lossy())?;
        }
        Ok(())
    }
}
