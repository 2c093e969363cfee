//! Error type definitions.
//!
//! This module defines the extraction error taxonomy plus the error, warning,
//! and info categories counted in [`super::ProcessingStats`].

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::HTTP_STATUS_TOO_MANY_REQUESTS;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The selector or pattern tables are invalid.
    #[error("Extraction rules error: {0}")]
    RulesError(#[from] ConfigError),
}

/// Error types for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A bounded setting is outside its range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Setting name as it appears in the settings JSON
        field: &'static str,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
        /// Offending value
        value: f64,
    },

    /// A configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON for its type.
    #[error("Invalid configuration file {path}: {source}")]
    Parse {
        /// File path
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A pattern table entry is not a valid regex.
    #[error("Invalid regex in pattern table {table}: {source}")]
    InvalidPattern {
        /// Pattern list name
        table: &'static str,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}

/// Failure of a single field extractor.
///
/// Never escapes the record assembler: the field falls back to its empty value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The field's markup was found but could not be interpreted.
    #[error("malformed value: {0}")]
    Malformed(String),

    /// The extractor panicked.
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// HTTP fetch failure (non-2xx status or transport error).
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// The request failed before a response was received, or the body could not be read.
    #[error("Request to {url} failed: {source}")]
    Transport {
        /// Requested URL
        url: String,
        /// Underlying reqwest error
        #[source]
        source: ReqwestError,
    },
}

impl FetchError {
    /// Whether a re-fetch might succeed.
    ///
    /// 429 and 5xx responses and network-level failures are transient; other
    /// statuses (404, 403, ...) and request-building problems are permanent.
    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => {
                *status == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(status)
            }
            FetchError::Transport { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request() || source.is_body()
            }
        }
    }
}

/// Document- and record-level extraction failures.
///
/// Field-level failures are represented by [`FieldError`] and are absorbed by
/// the assembler; everything here escapes to the crawl or batch loop.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A field extractor failed (reported in assembly logs, never returned by the assembler).
    #[error("Field '{field}' extraction failed: {source}")]
    FieldExtraction {
        /// Field name
        field: &'static str,
        /// Extractor failure
        #[source]
        source: FieldError,
    },

    /// Whole-document assembly exceeded its budget.
    #[error("Page assembly exceeded the {0:?} budget")]
    PageLoadTimeout(Duration),

    /// Network or HTTP failure while fetching a page.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A batch item failed on every attempt.
    #[error("Gave up on {url} after {attempts} attempt(s): {last_error}")]
    ExhaustedRetries {
        /// Item URL
        url: String,
        /// Attempts made, including the first
        attempts: u32,
        /// Text of the final error
        last_error: String,
    },

    /// The document is not of the expected page type.
    #[error("{url} is not a {expected} page")]
    NotApplicablePage {
        /// Expected page type
        expected: &'static str,
        /// Document URL
        url: String,
    },

    /// No identifier could be found or re-derived for the record.
    #[error("No product identifier found for {url}")]
    MissingIdentifier {
        /// Document URL
        url: String,
    },

    /// A target URL could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// Input text
        url: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The blocking parse task died.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl ExtractionError {
    /// Whether retrying the same URL could help.
    ///
    /// Structural mismatches (wrong page type, no identifier) are permanent;
    /// timeouts and transient fetch failures are not.
    pub fn is_retriable(&self) -> bool {
        match self {
            ExtractionError::Fetch(e) => e.is_retriable(),
            ExtractionError::PageLoadTimeout(_) => true,
            ExtractionError::FieldExtraction { .. }
            | ExtractionError::ExhaustedRetries { .. }
            | ExtractionError::NotApplicablePage { .. }
            | ExtractionError::MissingIdentifier { .. }
            | ExtractionError::InvalidUrl { .. }
            | ExtractionError::Task(_) => false,
        }
    }

    /// Statistics category for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ExtractionError::Fetch(FetchError::Status { status, .. }) => {
                super::categorization::categorize_status(*status)
            }
            ExtractionError::Fetch(FetchError::Transport { source, .. }) => {
                super::categorization::categorize_reqwest_error(source)
            }
            ExtractionError::FieldExtraction { .. } => ErrorType::FieldExtractionError,
            ExtractionError::PageLoadTimeout(_) => ErrorType::PageLoadTimeout,
            ExtractionError::ExhaustedRetries { .. } => ErrorType::ExhaustedRetries,
            ExtractionError::NotApplicablePage { .. } => ErrorType::NotApplicablePage,
            ExtractionError::MissingIdentifier { .. } => ErrorType::MissingIdentifier,
            ExtractionError::InvalidUrl { .. } => ErrorType::InvalidUrl,
            ExtractionError::Task(_) => ErrorType::TaskFailure,
        }
    }
}

/// Types of errors that can occur while fetching or extracting a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    /// Request could not be built
    HttpRequestBuilderError,
    /// Redirect loop or redirect limit
    HttpRequestRedirectError,
    /// Request timed out
    HttpRequestTimeoutError,
    /// Connection failed
    HttpRequestConnectError,
    /// Response body could not be read
    HttpRequestBodyError,
    /// Response body could not be decoded
    HttpRequestDecodeError,
    /// Any other transport failure
    HttpRequestOtherError,
    /// 429 Too Many Requests
    HttpRequestTooManyRequests,
    /// 403 Forbidden, typically bot detection
    HttpRequestBotDetectionError,
    /// 404 Not Found
    HttpRequestNotFound,
    /// Other 4xx
    HttpRequestClientError,
    /// 5xx
    HttpRequestServerError,
    // Document/record errors
    /// A field extractor failed
    FieldExtractionError,
    /// A page did not load and parse within its budget
    PageLoadTimeout,
    /// A batch item failed on every attempt
    ExhaustedRetries,
    /// The document was not the expected kind of page
    NotApplicablePage,
    /// No identifier on the page or in its URL
    MissingIdentifier,
    /// A target URL could not be parsed
    InvalidUrl,
    /// A blocking parse task died
    TaskFailure,
}

/// Types of warnings that can occur during extraction.
///
/// Warnings indicate degraded records that are still kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// A field extractor failed and the empty value was used
    FieldFellBackToDefault,
    /// Record has no title
    MissingTitle,
    /// Record has neither a price nor a price range
    MissingPrice,
    /// Record has no rating
    MissingRating,
    /// A listing page had no product containers
    EmptyResultPage,
}

/// Types of informational metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// A page was fetched successfully
    PageFetched,
    /// A batch item was retried
    RetryAttempt,
    /// Identifier recovered from the URL after the schema ran
    IdentifierRederived,
    /// A later record replaced an earlier one with the same identifier
    DuplicateIdentifier,
    /// Pagination ended because no next control was present
    LastPageReached,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable string representation of the error type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests (429)",
            ErrorType::HttpRequestBotDetectionError => "Bot detection (403 Forbidden)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestClientError => "Client error (4xx)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::FieldExtractionError => "Field extraction error",
            ErrorType::PageLoadTimeout => "Page load timeout",
            ErrorType::ExhaustedRetries => "Retries exhausted",
            ErrorType::NotApplicablePage => "Not applicable page",
            ErrorType::MissingIdentifier => "Missing product identifier",
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::TaskFailure => "Extraction task failure",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::FieldFellBackToDefault => "Field fell back to default",
            WarningType::MissingTitle => "Missing title",
            WarningType::MissingPrice => "Missing price",
            WarningType::MissingRating => "Missing rating",
            WarningType::EmptyResultPage => "Result page without products",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::PageFetched => "Page fetched",
            InfoType::RetryAttempt => "Retry attempt",
            InfoType::IdentifierRederived => "Identifier re-derived from URL",
            InfoType::DuplicateIdentifier => "Duplicate identifier replaced",
            InfoType::LastPageReached => "Last result page reached",
        }
    }
}
