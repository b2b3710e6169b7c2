use crate::api::{ApiClient, ApiRequest, Page, RequestBody, Transport, endpoints};
use crate::error::ApiError;
use crate::models::{PollRecord, SheetInfo, VoteSubmission};
use crate::normalize::POLLS;
use crate::summary::{AdminPollSummary, summarize_admin_polls};
use log::warn;
use serde_json::Value;

/// A respondent's view of one page of a sheet.
#[derive(Debug, Clone)]
pub struct SheetPolls {
    pub polls: Page<PollRecord>,
    pub sheet: Option<SheetInfo>,
}

/// Admin listing of a sheet's polls: the records plus their tallies.
#[derive(Debug, Clone)]
pub struct AdminPolls {
    pub polls: Page<PollRecord>,
    pub summaries: Vec<AdminPollSummary>,
}

fn embedded_sheet(body: &Value) -> Option<SheetInfo> {
    let sheet = body.get("sheet").filter(|s| s.is_object())?;
    match serde_json::from_value(sheet.clone()) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!("Ignoring unreadable sheet info: {}", e);
            None
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub async fn fetch_polls(
        &self,
        sheet_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SheetPolls, ApiError> {
        let request = ApiRequest::get(endpoints::POLL_FETCH)
            .query("id", sheet_id)
            .paged(page, page_size);
        let (polls, body) = self.fetch_page(request, POLLS, None).await?;

        Ok(SheetPolls {
            polls,
            sheet: embedded_sheet(&body),
        })
    }

    pub async fn fetch_admin_polls(
        &self,
        sheet_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<AdminPolls, ApiError> {
        let request = ApiRequest::get(endpoints::POLL_ADMIN_FETCH)
            .query("id", sheet_id)
            .paged(page, page_size);
        let (polls, body) = self.fetch_page(request, POLLS, None).await?;

        Ok(AdminPolls {
            polls,
            summaries: summarize_admin_polls(&body),
        })
    }

    pub async fn submit_poll_votes(&self, submission: &VoteSubmission) -> Result<Value, ApiError> {
        let body = serde_json::to_value(submission)?;
        self.call(ApiRequest::post(endpoints::POLL_SUBMIT, RequestBody::Json(body)))
            .await
    }
}
