//! HTTP client for the budget service
//!
//! JSON over HTTPS. Successful responses carry a human-readable message which is
//! returned untouched.

use std::sync::Arc;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::domain::{AllocationRequest, AllocationUpdate};
use crate::infrastructure::traits::{AllocationApi, ApiClientFactory, HttpSession};
use crate::infrastructure::{InfraError, InfraResult};

/// Default budget service endpoint.
pub const DEFAULT_API_URL: &str = "https://api.jujucharms.com/omnibus/v2";

#[derive(Debug, Serialize)]
struct CreateAllocationBody<'a> {
    limit: &'a str,
    model: &'a str,
    services: &'a [String],
}

#[derive(Debug, Serialize)]
struct UpdateAllocationBody<'a> {
    update: LimitUpdate<'a>,
}

#[derive(Debug, Serialize)]
struct LimitUpdate<'a> {
    limit: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message", alias = "Message")]
    error: Option<String>,
    #[serde(default, rename = "Code")]
    code: Option<String>,
    #[serde(default, rename = "Info")]
    info: Option<ErrorInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorInfo {
    #[serde(default, rename = "VisitURL")]
    visit_url: Option<String>,
}

/// Budget service client bound to one authenticated session.
pub struct BudgetApiClient {
    http: Client,
    base: Url,
}

impl BudgetApiClient {
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    fn endpoint(&self, segments: &[&str]) -> InfraResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| InfraError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl AllocationApi for BudgetApiClient {
    #[instrument(skip_all, fields(budget = %request.budget, model = %request.model))]
    fn create_allocation(&self, request: &AllocationRequest) -> InfraResult<String> {
        let url = self.endpoint(&["budget", &request.budget, "allocation"])?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .json(&CreateAllocationBody {
                limit: &request.limit,
                model: &request.model,
                services: &request.services,
            })
            .send()?;
        read_message(response)
    }

    #[instrument(skip_all, fields(service = %update.service, model = %update.model))]
    fn update_allocation(&self, update: &AllocationUpdate) -> InfraResult<String> {
        let url = self.endpoint(&[
            "model",
            &update.model,
            "service",
            &update.service,
            "allocation",
        ])?;
        debug!("PATCH {}", url);
        let response = self
            .http
            .patch(url)
            .json(&UpdateAllocationBody {
                update: LimitUpdate {
                    limit: &update.value,
                },
            })
            .send()?;
        read_message(response)
    }
}

/// Return the message of a successful response, or the remote error.
fn read_message(response: Response) -> InfraResult<String> {
    let status = response.status();
    let body = response.text()?;
    debug!("response status={}", status);
    if status.is_success() {
        // the service answers with a JSON string; tolerate plain text
        return Ok(serde_json::from_str::<String>(&body).unwrap_or(body));
    }
    Err(remote_error(status.as_u16(), &body))
}

fn remote_error(status: u16, body: &str) -> InfraError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if status == 401 {
        if let Some(visit_url) = parsed.info.and_then(|info| info.visit_url) {
            return InfraError::InteractionRequired { visit_url };
        }
    }
    let message = parsed
        .error
        .or(parsed.code)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match body.trim() {
            "" => format!("request failed with status {status}"),
            text => text.to_string(),
        });
    InfraError::Remote { status, message }
}

/// Creates [`BudgetApiClient`]s against a fixed service URL.
pub struct BudgetApiClientFactory {
    api_url: String,
}

impl BudgetApiClientFactory {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

impl ApiClientFactory for BudgetApiClientFactory {
    fn new_client(&self, session: &dyn HttpSession) -> InfraResult<Arc<dyn AllocationApi>> {
        let base = Url::parse(&self.api_url)?;
        if base.cannot_be_a_base() {
            return Err(InfraError::Url(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Arc::new(BudgetApiClient::new(session.http().clone(), base)))
    }
}
