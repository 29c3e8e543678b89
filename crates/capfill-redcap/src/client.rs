//! HTTP client for the REDCap API.
//!
//! REDCap speaks form-encoded POST for everything. A successful export
//! returns a JSON list; a failed one returns a JSON object with an
//! `error` key, often still under HTTP 200, so both the status and the
//! payload shape are checked.

use capfill_core::{FieldMetadata, ProjectMetadata, RawRecord};
use tracing::info;

use crate::{ApiCredentials, RedcapError};

pub struct RedcapClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl RedcapClient {
    pub fn new(credentials: &ApiCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: credentials.url.clone(),
            token: credentials.api_key.clone(),
        }
    }

    /// Fetch the project's field metadata.
    pub async fn fetch_metadata(&self) -> Result<ProjectMetadata, RedcapError> {
        let form = [
            ("token", self.token.as_str()),
            ("content", "metadata"),
            ("format", "json"),
        ];

        info!(url = %self.url, "fetching project metadata");
        let body = self.post(&form).await?;
        let fields = parse_metadata_response(&body)?;
        info!(fields = fields.len(), "fetched project metadata");
        Ok(ProjectMetadata::new(fields))
    }

    /// Fetch the single record whose `id_field` value equals `record_id`.
    ///
    /// The API's filter returns a list even for one match; zero or
    /// multiple matches are lookup failures naming the filter used.
    pub async fn fetch_record(
        &self,
        id_field: &str,
        record_id: &str,
    ) -> Result<RawRecord, RedcapError> {
        let filter = format!("[{id_field}] = '{record_id}'");
        let form = [
            ("token", self.token.as_str()),
            ("content", "record"),
            ("format", "json"),
            ("type", "flat"),
            ("filterLogic", filter.as_str()),
        ];

        info!(url = %self.url, filter = %filter, "fetching record");
        let body = self.post(&form).await?;
        parse_record_response(&body, id_field, record_id)
    }

    async fn post(&self, form: &[(&str, &str)]) -> Result<String, RedcapError> {
        let resp = self.client.post(&self.url).form(form).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RedcapError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Parse a metadata response body: a list of field entries, or an error
/// payload.
fn parse_metadata_response(body: &str) -> Result<Vec<FieldMetadata>, RedcapError> {
    if let Some(message) = api_error(body) {
        return Err(RedcapError::Api(message));
    }
    Ok(serde_json::from_str(body)?)
}

/// Parse a record response body into exactly one record.
fn parse_record_response(
    body: &str,
    field: &str,
    value: &str,
) -> Result<RawRecord, RedcapError> {
    if let Some(message) = api_error(body) {
        return Err(RedcapError::Api(message));
    }
    let mut records: Vec<RawRecord> = serde_json::from_str(body)?;
    match records.len() {
        // An over-strict or misspelled filter yields `[]` under HTTP 200.
        0 => Err(RedcapError::NoMatch {
            field: field.to_string(),
            value: value.to_string(),
        }),
        1 => Ok(records.remove(0)),
        count => Err(RedcapError::MultipleMatches {
            field: field.to_string(),
            value: value.to_string(),
            count,
        }),
    }
}

/// The message of an `{"error": "..."}` payload, if that is what the body
/// holds.
fn api_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .as_object()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
