//! Query vocabulary
//!
//! Closed sets of parameter names and enumerated values accepted by the
//! CDX server, plus the scalar value type stored for each parameter.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Timestamp layout used by `from`, `to` and the `timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Check that a value belongs to a closed vocabulary.
///
/// Empty values always pass: they mean "not set".
pub fn validate(name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if value.is_empty() || allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_parameter(name, value, allowed))
    }
}

// ============================================================================
// Parameter Names
// ============================================================================

/// Optional CDX query parameters.
///
/// Declaration order is the render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryParam {
    /// `matchType`
    MatchType,
    /// `output`
    Output,
    /// `fl`
    Fields,
    /// `from`
    From,
    /// `to`
    To,
    /// `limit`
    Limit,
    /// `fastLatest`
    FastLatest,
    /// `offset`
    Offset,
    /// `showResumeKey`
    ShowResumeKey,
    /// `resumeKey`
    ResumeKey,
}

impl QueryParam {
    /// All parameters in render order
    pub const ALL: [QueryParam; 10] = [
        QueryParam::MatchType,
        QueryParam::Output,
        QueryParam::Fields,
        QueryParam::From,
        QueryParam::To,
        QueryParam::Limit,
        QueryParam::FastLatest,
        QueryParam::Offset,
        QueryParam::ShowResumeKey,
        QueryParam::ResumeKey,
    ];

    /// Name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryParam::MatchType => "matchType",
            QueryParam::Output => "output",
            QueryParam::Fields => "fl",
            QueryParam::From => "from",
            QueryParam::To => "to",
            QueryParam::Limit => "limit",
            QueryParam::FastLatest => "fastLatest",
            QueryParam::Offset => "offset",
            QueryParam::ShowResumeKey => "showResumeKey",
            QueryParam::ResumeKey => "resumeKey",
        }
    }
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Match Scope
// ============================================================================

/// Granularity at which the target URL is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchType {
    /// Only the exact URL
    #[default]
    Exact,
    /// Every URL starting with the target
    Prefix,
    /// Every URL on the same host
    Host,
    /// Every URL on the host and its subdomains
    Domain,
}

impl MatchType {
    /// Accepted wire values
    pub const NAMES: [&'static str; 4] = ["exact", "prefix", "host", "domain"];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Prefix => "prefix",
            MatchType::Host => "host",
            MatchType::Domain => "domain",
        }
    }
}

impl FromStr for MatchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(MatchType::Exact),
            "prefix" => Ok(MatchType::Prefix),
            "host" => Ok(MatchType::Host),
            "domain" => Ok(MatchType::Domain),
            _ => Err(Error::invalid_parameter(
                QueryParam::MatchType.as_str(),
                s,
                &Self::NAMES,
            )),
        }
    }
}

// ============================================================================
// Output Format
// ============================================================================

/// Response encoding requested from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// List of lists, header first
    #[default]
    Json,
}

impl OutputFormat {
    /// Accepted wire values
    pub const NAMES: [&'static str; 1] = ["json"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::invalid_parameter(
                QueryParam::Output.as_str(),
                s,
                &Self::NAMES,
            )),
        }
    }
}

// ============================================================================
// Field Projection
// ============================================================================

/// Column that can be requested through `fl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdxField {
    UrlKey,
    Timestamp,
    Original,
    MimeType,
    StatusCode,
    Digest,
    Length,
}

impl CdxField {
    /// Accepted wire values, in the server's default column order
    pub const NAMES: [&'static str; 7] = [
        "urlkey",
        "timestamp",
        "original",
        "mimetype",
        "statuscode",
        "digest",
        "length",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CdxField::UrlKey => "urlkey",
            CdxField::Timestamp => "timestamp",
            CdxField::Original => "original",
            CdxField::MimeType => "mimetype",
            CdxField::StatusCode => "statuscode",
            CdxField::Digest => "digest",
            CdxField::Length => "length",
        }
    }

    /// Render a projection list as the `fl` value
    pub fn join(fields: &[CdxField]) -> String {
        fields
            .iter()
            .map(CdxField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for CdxField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "urlkey" => Ok(CdxField::UrlKey),
            "timestamp" => Ok(CdxField::Timestamp),
            "original" => Ok(CdxField::Original),
            "mimetype" => Ok(CdxField::MimeType),
            "statuscode" => Ok(CdxField::StatusCode),
            "digest" => Ok(CdxField::Digest),
            "length" => Ok(CdxField::Length),
            _ => Err(Error::invalid_parameter(
                QueryParam::Fields.as_str(),
                s,
                &Self::NAMES,
            )),
        }
    }
}

impl fmt::Display for CdxField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Parameter Values
// ============================================================================

/// Scalar value of a query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(u64),
    Bool(bool),
    Timestamp(NaiveDateTime),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::Timestamp(value)
    }
}

/// Parse a CDX timestamp.
///
/// Accepts the 14-digit `YYYYMMDDHHMMSS` form, `YYYY-MM-DD` and
/// `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::config(format!("Invalid timestamp '{value}'")))
}
