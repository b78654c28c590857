// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

/// Error type for bitmask codec and polygon extraction operations.
///
/// Every failure is surfaced to the caller immediately; none of these
/// conditions can be healed by retrying the same call.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading or writing mask data.
    IoError(std::io::Error),
    /// Configuration parsing or loading error.
    ConfigError(config::ConfigError),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// Run lengths describe more pixels than the destination buffer holds.
    BufferOverflow {
        /// Total number of pixels described by the run lengths.
        required: u64,
        /// Size of the destination buffer.
        size: usize,
    },
    /// A COCO RLE string decoded to something that is not a run length.
    MalformedRle(String),
    /// Buffer length does not agree with the declared shape.
    ShapeMismatch {
        /// `rows * cols` of the declared shape.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// An optional capability was requested but is not compiled in.
    MissingCapability(String),
    /// Invalid parameters provided to an operation.
    InvalidParameters(String),
    /// Mask content or dimensions are unusable.
    InvalidMask(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::BufferOverflow { required, size } => write!(
                f,
                "RLE describes {} pixels but the mask buffer holds {}",
                required, size
            ),
            Error::MalformedRle(s) => write!(f, "Malformed RLE: {}", s),
            Error::ShapeMismatch { expected, actual } => write!(
                f,
                "Buffer length {} does not match shape size {}",
                actual, expected
            ),
            Error::MissingCapability(s) => write!(f, "Missing capability: {}", s),
            Error::InvalidParameters(s) => write!(f, "Invalid parameters: {}", s),
            Error::InvalidMask(s) => write!(f, "Invalid mask: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            _ => None,
        }
    }
}
