// Copyright 2026 The Fishbone Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,         // will never be produced
    InvalidScheme,   // scheme id not in the catalog
    InvalidCategory, // category not part of the active scheme
    Validation,      // out-of-range priority, unknown status, wrong-length whys
    NotFound,        // the named cause doesn't exist
    IndexOutOfRange, // why index outside [0, 5)
    CorruptData,     // imported or restored document is malformed
    Io,
    Serialization,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            InvalidScheme => "invalid_scheme",
            InvalidCategory => "invalid_category",
            Validation => "validation",
            NotFound => "not_found",
            IndexOutOfRange => "index_out_of_range",
            CorruptData => "corrupt_data",
            Io => "io",
            Serialization => "serialization",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected mutation of the analysis document.
    Store,
    /// Malformed analysis file or session record.
    Import,
    /// Session storage or file system failure.
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }

    /// Short human-readable message suitable for surfacing in a UI.
    pub fn user_message(&self) -> String {
        let summary = match self.code {
            ErrorCode::NoError => "no error",
            ErrorCode::InvalidScheme => "Unknown categorization scheme",
            ErrorCode::InvalidCategory => "Category is not part of the current scheme",
            ErrorCode::Validation => "Invalid value",
            ErrorCode::NotFound => "Cause not found",
            ErrorCode::IndexOutOfRange => "Why index out of range",
            ErrorCode::CorruptData => "Error loading file: Invalid format",
            ErrorCode::Io => "Could not access storage",
            ErrorCode::Serialization => "Could not encode analysis",
        };
        match self.details {
            Some(ref details) => format!("{summary}: {details}"),
            None => summary.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Store => "StoreError",
            ErrorKind::Import => "ImportError",
            ErrorKind::Storage => "StorageError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Storage,
            code: ErrorCode::Io,
            details: Some(err.to_string()),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! store_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Store, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Store, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! import_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Import, ErrorCode::$code, Some($str)))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Store,
        ErrorCode::NotFound,
        Some("cause-9".to_string()),
    );
    assert_eq!("StoreError{not_found: cause-9}", format!("{err}"));

    let err = Error::new(ErrorKind::Import, ErrorCode::CorruptData, None);
    assert_eq!("ImportError{corrupt_data}", format!("{err}"));
}

#[test]
fn test_error_macros() {
    let r: Result<()> = store_err!(InvalidScheme, "5S".to_string());
    let err = r.unwrap_err();
    assert_eq!(ErrorKind::Store, err.kind);
    assert_eq!(ErrorCode::InvalidScheme, err.code);
    assert_eq!(Some("5S".to_string()), err.get_details());

    let r: Result<()> = store_err!(NotFound);
    assert_eq!(None, r.unwrap_err().details);

    let r: Result<()> = import_err!(CorruptData, "missing state".to_string());
    assert_eq!(ErrorKind::Import, r.unwrap_err().kind);
}

#[test]
fn test_io_error_maps_to_storage() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: Error = io.into();
    assert_eq!(ErrorKind::Storage, err.kind);
    assert_eq!(ErrorCode::Io, err.code);
    assert!(err.user_message().starts_with("Could not access storage"));
}
