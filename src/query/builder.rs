//! CDX query construction
//!
//! `CdxQuery` holds the target URL and a validated parameter set and renders
//! them into a request URL on demand.

use super::types::{validate, CdxField, MatchType, OutputFormat, ParamValue, QueryParam};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Public Wayback Machine CDX endpoint (without the trailing `/cdx`)
pub const DEFAULT_BASE_URL: &str = "http://web.archive.org/cdx/search";

/// Set parameters, kept in render order
pub type QueryParams = BTreeMap<QueryParam, ParamValue>;

/// Render `<base>/cdx?url=<url>&name=value...` with values inserted verbatim.
pub fn construct(base: &str, url: &str, params: &QueryParams) -> String {
    render_parts(base, url, params, |s| s.to_string())
}

fn render_parts(
    base: &str,
    url: &str,
    params: &QueryParams,
    encode: impl Fn(&str) -> String,
) -> String {
    let mut result = format!("{}/cdx?url={}", base.trim_end_matches('/'), encode(url));
    for (param, value) in params {
        result.push('&');
        result.push_str(param.as_str());
        result.push('=');
        // Resume keys arrive already encoded by the server
        if *param == QueryParam::ResumeKey {
            result.push_str(&value.to_string());
        } else {
            result.push_str(&encode(&value.to_string()));
        }
    }
    result
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

// ============================================================================
// CdxQuery
// ============================================================================

/// A CDX query: target URL plus optional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdxQuery {
    base: String,
    url: String,
    params: QueryParams,
    percent_encode: bool,
}

impl CdxQuery {
    /// Create a query against the public endpoint with no optional parameters
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
            url: url.into(),
            params: QueryParams::new(),
            percent_encode: false,
        }
    }

    /// Start a builder that accepts unvalidated string values
    pub fn builder(url: impl Into<String>) -> CdxQueryBuilder {
        CdxQueryBuilder::new(url)
    }

    /// Point the query at another CDX server
    pub fn with_base(mut self, base: impl Into<String>) -> Result<Self> {
        let base = base.into();
        url::Url::parse(&base)?;
        self.base = base.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Form-encode the target URL and parameter values when rendering.
    ///
    /// `resumeKey` is always sent as the server issued it.
    #[must_use]
    pub fn with_percent_encoding(mut self, enabled: bool) -> Self {
        self.percent_encode = enabled;
        self
    }

    #[must_use]
    pub fn with_match_type(mut self, scope: MatchType) -> Self {
        self.set_match_type(Some(scope));
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.set_output(Some(output));
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: &[CdxField]) -> Self {
        self.set_fields(Some(fields));
        self
    }

    #[must_use]
    pub fn with_from(mut self, from: NaiveDateTime) -> Self {
        self.set_time_range(Some(from), None);
        self
    }

    #[must_use]
    pub fn with_to(mut self, to: NaiveDateTime) -> Self {
        self.set_time_range(None, Some(to));
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.set_limit(Some(limit));
        self
    }

    #[must_use]
    pub fn with_fast_latest(mut self, fast_latest: bool) -> Self {
        self.set(QueryParam::FastLatest, Some(fast_latest.into()));
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.set(QueryParam::Offset, Some(offset.into()));
        self
    }

    /// Target URL looked up in the index
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Endpoint base, without the trailing `/cdx`
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn get(&self, param: QueryParam) -> Option<&ParamValue> {
        self.params.get(&param)
    }

    /// Set or clear (`None`) a single parameter
    pub fn set(&mut self, param: QueryParam, value: Option<ParamValue>) {
        match value {
            Some(value) => {
                self.params.insert(param, value);
            }
            None => {
                self.params.remove(&param);
            }
        }
    }

    pub fn set_match_type(&mut self, scope: Option<MatchType>) {
        self.set(
            QueryParam::MatchType,
            scope.map(|s| ParamValue::from(s.as_str())),
        );
    }

    pub fn set_output(&mut self, output: Option<OutputFormat>) {
        self.set(
            QueryParam::Output,
            output.map(|o| ParamValue::from(o.as_str())),
        );
    }

    /// Set the column projection. An empty list clears it.
    pub fn set_fields(&mut self, fields: Option<&[CdxField]>) {
        let value = fields
            .filter(|f| !f.is_empty())
            .map(|f| ParamValue::Str(CdxField::join(f)));
        self.set(QueryParam::Fields, value);
    }

    /// Set the time range bounds. A `None` bound is left unchanged.
    pub fn set_time_range(&mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) {
        if let Some(from) = from {
            self.set(QueryParam::From, Some(from.into()));
        }
        if let Some(to) = to {
            self.set(QueryParam::To, Some(to.into()));
        }
    }

    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.set(QueryParam::Limit, limit.map(ParamValue::from));
    }

    /// Replace `limit`, `fastLatest` and `offset` together
    pub fn set_limits(&mut self, limit: Option<u64>, fast_latest: Option<bool>, offset: Option<u64>) {
        self.set(QueryParam::Limit, limit.map(ParamValue::from));
        self.set(QueryParam::FastLatest, fast_latest.map(ParamValue::from));
        self.set(QueryParam::Offset, offset.map(ParamValue::from));
    }

    /// Replace `showResumeKey` and `resumeKey` together
    pub fn set_resume_key(&mut self, show: Option<bool>, key: Option<String>) {
        self.set(QueryParam::ShowResumeKey, show.map(ParamValue::from));
        self.set(QueryParam::ResumeKey, key.map(ParamValue::from));
    }

    /// Current resume key, if any
    pub fn resume_key(&self) -> Option<&str> {
        match self.get(QueryParam::ResumeKey) {
            Some(ParamValue::Str(key)) => Some(key.as_str()),
            _ => None,
        }
    }

    /// Render the request URL for the current parameters
    pub fn render(&self) -> String {
        self.render_with(&self.params)
    }

    /// Render the request URL for another parameter set against this target
    pub fn render_with(&self, params: &QueryParams) -> String {
        if self.percent_encode {
            render_parts(&self.base, &self.url, params, form_encode)
        } else {
            construct(&self.base, &self.url, params)
        }
    }

    /// Check that the query is accepted by the server.
    ///
    /// Issues one GET with `limit=1`. Any status other than 200 is reported
    /// as `Ok(false)`; only transport failures are errors.
    pub async fn probe(&self, client: &HttpClient) -> Result<bool> {
        let mut params = self.params.clone();
        params.insert(QueryParam::Limit, ParamValue::Int(1));

        let request_url = self.render_with(&params);
        let response = client.send(&request_url).await?;
        let status = response.status();

        debug!("Probe {} returned {}", request_url, status.as_u16());
        Ok(status == StatusCode::OK)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder taking raw string values, validated in [`CdxQueryBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct CdxQueryBuilder {
    url: String,
    base: Option<String>,
    match_type: Option<String>,
    output: Option<String>,
    fields: Option<Vec<String>>,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    limit: Option<u64>,
    fast_latest: Option<bool>,
    offset: Option<u64>,
    show_resume_key: Option<bool>,
    resume_key: Option<String>,
    percent_encode: bool,
}

impl CdxQueryBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn match_type(mut self, scope: impl Into<String>) -> Self {
        self.match_type = Some(scope.into());
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn from_timestamp(mut self, from: NaiveDateTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to_timestamp(mut self, to: NaiveDateTime) -> Self {
        self.to = Some(to);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn fast_latest(mut self, fast_latest: bool) -> Self {
        self.fast_latest = Some(fast_latest);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn show_resume_key(mut self, show: bool) -> Self {
        self.show_resume_key = Some(show);
        self
    }

    pub fn resume_key(mut self, key: impl Into<String>) -> Self {
        self.resume_key = Some(key.into());
        self
    }

    pub fn percent_encode(mut self, enabled: bool) -> Self {
        self.percent_encode = enabled;
        self
    }

    /// Validate every enumerated value and build the query
    pub fn build(self) -> Result<CdxQuery> {
        if self.url.trim().is_empty() {
            return Err(Error::config("CDX query needs a target url"));
        }

        let match_type = parse_enumerated::<MatchType>(
            QueryParam::MatchType,
            self.match_type.as_deref(),
            &MatchType::NAMES,
        )?;
        let output = parse_enumerated::<OutputFormat>(
            QueryParam::Output,
            self.output.as_deref(),
            &OutputFormat::NAMES,
        )?;
        let fields = match &self.fields {
            Some(names) => {
                let mut fields = Vec::with_capacity(names.len());
                for name in names {
                    if let Some(field) = parse_enumerated::<CdxField>(
                        QueryParam::Fields,
                        Some(name.as_str()),
                        &CdxField::NAMES,
                    )? {
                        fields.push(field);
                    }
                }
                Some(fields)
            }
            None => None,
        };

        let mut query = CdxQuery::new(self.url).with_percent_encoding(self.percent_encode);
        if let Some(base) = self.base {
            query = query.with_base(base)?;
        }

        query.set_match_type(match_type);
        query.set_output(output);
        query.set_fields(fields.as_deref());
        query.set_time_range(self.from, self.to);
        query.set_limits(self.limit, self.fast_latest, self.offset);
        query.set_resume_key(self.show_resume_key, self.resume_key);

        Ok(query)
    }
}

/// Validate against the vocabulary, then parse. Empty strings mean unset.
fn parse_enumerated<T>(param: QueryParam, value: Option<&str>, allowed: &[&str]) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    match value {
        None => Ok(None),
        Some(value) => {
            validate(param.as_str(), value, allowed)?;
            if value.is_empty() {
                Ok(None)
            } else {
                value.parse().map(Some)
            }
        }
    }
}
