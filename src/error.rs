// src/error.rs
//
// Unified error handling for graymill
// Uses thiserror for simple, type-safe error handling
//
// Error Taxonomy:
// - UserError: Invalid input, recoverable
// - CodecError: Format/encoding issues
// - ResourceLimit: Memory/thread/dimension limits
// - InternalBug: Library bugs (should not happen)

use std::borrow::Cow;
use thiserror::Error;

/// Error taxonomy for proper error handling at the CLI boundary
///
/// This 4-tier taxonomy enables proper error handling:
/// - UserError: Invalid input, recoverable by user
/// - CodecError: Format/encoding issues
/// - ResourceLimit: Memory/thread/dimension limits
/// - InternalBug: Library bugs (should not happen)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid input, recoverable by user
    UserError,
    /// Format/encoding issues
    CodecError,
    /// Memory/thread/dimension limits
    ResourceLimit,
    /// Library bugs (should not happen)
    InternalBug,
}

/// graymill error types
///
/// All errors are type-safe and provide clear, actionable messages.
/// No numeric error codes - just clear error variants.
#[derive(Debug, Error)]
pub enum GraymillError {
    // File I/O Errors
    #[error("File not found: {path}")]
    FileNotFound { path: Cow<'static, str> },

    #[error("Failed to read file '{path}': {source}")]
    FileReadFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to memory-map file '{path}': {source}")]
    MmapFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWriteFailed {
        path: Cow<'static, str>,
        #[source]
        source: std::io::Error,
    },

    // Decode Errors
    #[error("Failed to decode PPM header: {detail}")]
    InvalidHeader { detail: Cow<'static, str> },

    #[error("Unsupported max color value: {value}. Only 1..=255 (8-bit samples) is supported")]
    UnsupportedMaxValue { value: u32 },

    #[error("Truncated pixel data: expected {expected} bytes, found {actual}")]
    TruncatedPixelData { expected: usize, actual: usize },

    #[error("Pixel buffer length {len} is not a multiple of 3")]
    MisalignedBuffer { len: usize },

    // Size Limit Errors
    #[error("Image dimension {dimension} exceeds maximum {max}")]
    DimensionExceedsLimit { dimension: u32, max: u32 },

    #[error("Image pixel count {pixels} exceeds maximum {max}")]
    PixelCountExceedsLimit { pixels: u64, max: u64 },

    // Configuration Errors
    #[error("Invalid value for {name}: {value}. {reason}")]
    InvalidConfiguration {
        name: Cow<'static, str>,
        value: Cow<'static, str>,
        reason: Cow<'static, str>,
    },

    // Engine Errors
    #[error("Admission gate is closed")]
    GateClosed,

    #[error("Worker run of {len} bytes is not aligned to whole pixels")]
    MisalignedRun { len: usize },

    #[error("Segment plan does not tile the buffer: expected offset {expected}, found {found}")]
    SegmentPlanMismatch { expected: usize, found: usize },

    #[error("Failed to build worker thread pool: {detail}")]
    PoolBuildFailed { detail: Cow<'static, str> },
}

impl Clone for GraymillError {
    fn clone(&self) -> Self {
        match self {
            Self::FileNotFound { path } => Self::FileNotFound { path: path.clone() },
            Self::FileReadFailed { path, source } => Self::FileReadFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::MmapFailed { path, source } => Self::MmapFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::FileWriteFailed { path, source } => Self::FileWriteFailed {
                path: path.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            },
            Self::InvalidHeader { detail } => Self::InvalidHeader {
                detail: detail.clone(),
            },
            Self::UnsupportedMaxValue { value } => Self::UnsupportedMaxValue { value: *value },
            Self::TruncatedPixelData { expected, actual } => Self::TruncatedPixelData {
                expected: *expected,
                actual: *actual,
            },
            Self::MisalignedBuffer { len } => Self::MisalignedBuffer { len: *len },
            Self::DimensionExceedsLimit { dimension, max } => Self::DimensionExceedsLimit {
                dimension: *dimension,
                max: *max,
            },
            Self::PixelCountExceedsLimit { pixels, max } => Self::PixelCountExceedsLimit {
                pixels: *pixels,
                max: *max,
            },
            Self::InvalidConfiguration {
                name,
                value,
                reason,
            } => Self::InvalidConfiguration {
                name: name.clone(),
                value: value.clone(),
                reason: reason.clone(),
            },
            Self::GateClosed => Self::GateClosed,
            Self::MisalignedRun { len } => Self::MisalignedRun { len: *len },
            Self::SegmentPlanMismatch { expected, found } => Self::SegmentPlanMismatch {
                expected: *expected,
                found: *found,
            },
            Self::PoolBuildFailed { detail } => Self::PoolBuildFailed {
                detail: detail.clone(),
            },
        }
    }
}

// Constructor Helpers
impl GraymillError {
    pub fn file_not_found(path: impl Into<Cow<'static, str>>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn file_read_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn mmap_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::MmapFailed {
            path: path.into(),
            source,
        }
    }

    pub fn file_write_failed(path: impl Into<Cow<'static, str>>, source: std::io::Error) -> Self {
        Self::FileWriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_header(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidHeader {
            detail: detail.into(),
        }
    }

    pub fn unsupported_max_value(value: u32) -> Self {
        Self::UnsupportedMaxValue { value }
    }

    pub fn truncated_pixel_data(expected: usize, actual: usize) -> Self {
        Self::TruncatedPixelData { expected, actual }
    }

    pub fn misaligned_buffer(len: usize) -> Self {
        Self::MisalignedBuffer { len }
    }

    pub fn dimension_exceeds_limit(dimension: u32, max: u32) -> Self {
        Self::DimensionExceedsLimit { dimension, max }
    }

    pub fn pixel_count_exceeds_limit(pixels: u64, max: u64) -> Self {
        Self::PixelCountExceedsLimit { pixels, max }
    }

    pub fn invalid_configuration(
        name: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::InvalidConfiguration {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn gate_closed() -> Self {
        Self::GateClosed
    }

    pub fn misaligned_run(len: usize) -> Self {
        Self::MisalignedRun { len }
    }

    pub fn segment_plan_mismatch(expected: usize, found: usize) -> Self {
        Self::SegmentPlanMismatch { expected, found }
    }

    pub fn pool_build_failed(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::PoolBuildFailed {
            detail: detail.into(),
        }
    }

    /// Check if this error is recoverable (user can fix it)
    ///
    /// This method is consistent with category():
    /// - UserError errors are always recoverable
    /// - ResourceLimit errors are recoverable (user can free resources, shrink the image, etc.)
    /// - CodecError and InternalBug errors are not recoverable
    pub fn is_recoverable(&self) -> bool {
        match self.category() {
            ErrorCategory::UserError | ErrorCategory::ResourceLimit => true,
            ErrorCategory::CodecError | ErrorCategory::InternalBug => false,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            // UserError: Invalid input, recoverable
            Self::FileNotFound { .. } | Self::InvalidConfiguration { .. } => {
                ErrorCategory::UserError
            }

            // CodecError: Format/encoding issues
            Self::InvalidHeader { .. }
            | Self::UnsupportedMaxValue { .. }
            | Self::TruncatedPixelData { .. }
            | Self::MisalignedBuffer { .. } => ErrorCategory::CodecError,

            // ResourceLimit: Memory/thread/dimension limits
            // Note: FileReadFailed/MmapFailed/FileWriteFailed are classified as ResourceLimit
            // because they often indicate resource constraints (disk full, memory pressure,
            // file system limits). However, they can also represent I/O errors (permissions,
            // file locks, etc.). These errors are recoverable by the user (fixing permissions,
            // freeing disk space, etc.), which is consistent with is_recoverable() returning true.
            Self::DimensionExceedsLimit { .. }
            | Self::PixelCountExceedsLimit { .. }
            | Self::FileReadFailed { .. }
            | Self::MmapFailed { .. }
            | Self::FileWriteFailed { .. }
            | Self::PoolBuildFailed { .. } => ErrorCategory::ResourceLimit,

            // InternalBug: Library bugs (should not happen)
            // GateClosed means a caller raced acquire against teardown; the worker
            // modules never do that themselves, so reaching it is a lifecycle bug.
            Self::GateClosed | Self::MisalignedRun { .. } | Self::SegmentPlanMismatch { .. } => {
                ErrorCategory::InternalBug
            }
        }
    }
}

impl ErrorCategory {
    /// Get string representation of error category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "UserError",
            ErrorCategory::CodecError => "CodecError",
            ErrorCategory::ResourceLimit => "ResourceLimit",
            ErrorCategory::InternalBug => "InternalBug",
        }
    }

    /// Get the GRAYMILL_* error code string for this category
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::UserError => "GRAYMILL_USER_ERROR",
            ErrorCategory::CodecError => "GRAYMILL_CODEC_ERROR",
            ErrorCategory::ResourceLimit => "GRAYMILL_RESOURCE_LIMIT",
            ErrorCategory::InternalBug => "GRAYMILL_INTERNAL_BUG",
        }
    }
}

// Result type alias
pub type Result<T> = std::result::Result<T, GraymillError>;
