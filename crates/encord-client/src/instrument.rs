// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies. All Rights Reserved.

//! Conditional instrumentation support.
//!
//! With the `profiling` feature enabled the codec entry points emit tracing
//! spans; without it the attributes and macros compile away.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, fields(len = mask.len())))]
//! pub fn mask_to_rle(mask: &[u8]) -> Vec<u64> {
//!     // ...
//! }
//! ```
//!
//! For manual spans inside a function:
//!
//! ```rust,ignore
//! #[cfg(feature = "profiling")]
//! let _span = crate::instrument::trace_span!("merge_runs", chunks = n).entered();
//! ```

#[cfg(feature = "profiling")]
pub use tracing::{Level, Span, debug_span, info_span, instrument, trace_span};
