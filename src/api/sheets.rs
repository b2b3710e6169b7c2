use crate::api::{ApiClient, ApiRequest, Page, RequestBody, Transport, endpoints};
use crate::error::ApiError;
use crate::models::{CreateSheet, CreateSheetPoll, RecordId, SheetPollRecord, SheetRecord};
use crate::normalize::SHEETS;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// What the backend answers to sheet and poll creation.
#[derive(Debug, Clone, Default)]
pub struct SheetMutation {
    pub message: Option<String>,
    pub sheet: Option<SheetRecord>,
    pub polls: Vec<SheetPollRecord>,
}

impl SheetMutation {
    fn from_body(body: &Value) -> Self {
        let sheet = extract_sheet_from_response(body);
        let polls = match body.get("polls") {
            Some(_) => extract_sheet_polls(body),
            None => sheet.as_ref().map(|s| s.polls.clone()).unwrap_or_default(),
        };

        Self {
            message: body.get("message").and_then(Value::as_str).map(String::from),
            sheet,
            polls,
        }
    }
}

fn parse_lenient<T: DeserializeOwned>(raw: &Value, what: &str) -> Option<T> {
    match T::deserialize(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", what, e);
            None
        }
    }
}

/// The `sheet` object of a mutation response, when there is one.
pub fn extract_sheet_from_response(body: &Value) -> Option<SheetRecord> {
    let sheet = body.as_object()?.get("sheet").filter(|s| s.is_object())?;
    parse_lenient(sheet, "sheet")
}

/// Polls from a bare array or from the `polls` key of an object.
pub fn extract_sheet_polls(body: &Value) -> Vec<SheetPollRecord> {
    let list = match body {
        Value::Array(list) => list,
        Value::Object(map) => match map.get("polls") {
            Some(Value::Array(list)) => list,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    list.iter()
        .filter_map(|raw| parse_lenient(raw, "sheet poll"))
        .collect()
}

impl<T: Transport> ApiClient<T> {
    /// Sheets of the logged-in user. `page_size` also stands in for a page
    /// size the backend leaves out.
    pub async fn fetch_sheets(&self, page: u32, page_size: u32) -> Result<Page<SheetRecord>, ApiError> {
        let request = ApiRequest::get(endpoints::SHEET_FETCH).paged(page, page_size);
        let (sheets, _) = self.fetch_page(request, SHEETS, Some(page_size)).await?;
        Ok(sheets)
    }

    pub async fn create_sheet(&self, sheet: CreateSheet) -> Result<SheetMutation, ApiError> {
        let sheet = CreateSheet {
            polls: sheet
                .polls
                .map(|drafts| drafts.into_iter().map(|d| d.normalized()).collect()),
            ..sheet
        };
        let body = serde_json::to_value(&sheet)?;

        let response = self
            .call(ApiRequest::post(endpoints::SHEET_CREATE, RequestBody::Json(body)))
            .await?;
        info!("Created sheet {:?}", sheet.title);
        Ok(SheetMutation::from_body(&response))
    }

    pub async fn create_sheet_poll(&self, poll: &CreateSheetPoll) -> Result<SheetMutation, ApiError> {
        let mut fields = vec![
            ("sheet_id".to_string(), poll.sheet_id.to_string()),
            ("title".to_string(), poll.title.clone()),
            ("poll_type".to_string(), poll.poll_type.clone()),
            ("category".to_string(), poll.category.clone()),
        ];
        if let Some(description) = &poll.description {
            fields.push(("description".to_string(), description.clone()));
        }
        fields.extend(poll.options.iter().map(|o| ("options".to_string(), o.clone())));

        let response = self
            .call(ApiRequest::post(endpoints::POLL_CREATE, RequestBody::Form(fields)))
            .await?;
        Ok(SheetMutation::from_body(&response))
    }

    pub async fn delete_sheet(&self, id: &RecordId) -> Result<(), ApiError> {
        self.call(ApiRequest::put(endpoints::SHEET_DELETE).query("id", id))
            .await?;
        info!("Deleted sheet {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::api::fake::FakeTransport;
    use crate::models::SheetPollDraft;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_sheets_falls_back_to_requested_page_size() {
        let client = ApiClient::new(FakeTransport::new().respond(
            "/sheet/fetch",
            200,
            json!({"sheets": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}], "total": 5}),
        ));

        let page = client.fetch_sheets(1, 2).await.unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.pagination.page_size, Some(2));
        assert_eq!(page.pagination.total_pages, Some(3));
    }

    #[tokio::test]
    async fn create_sheet_rewrites_text_poll_options() {
        let client = ApiClient::new(FakeTransport::new().respond(
            "/sheet/create",
            201,
            json!({"message": "ok", "sheet": {"id": 4, "title": "Menu", "polls": [{"id": 9}]}}),
        ));

        let created = client
            .create_sheet(CreateSheet {
                title: "Menu".into(),
                venue: None,
                is_phone_required: false,
                polls: Some(vec![SheetPollDraft {
                    title: "Comments".into(),
                    poll_type: "opinion".into(),
                    options: vec![],
                    category: "general".into(),
                    description: None,
                }]),
            })
            .await
            .unwrap();

        assert_eq!(created.message.as_deref(), Some("ok"));
        assert_eq!(created.sheet.unwrap().id, Some(RecordId::Number(4)));
        assert_eq!(created.polls.len(), 1);

        let sent = client.transport().requests();
        let RequestBody::Json(body) = &sent[0].body else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["polls"][0]["options"], json!(["opinion"]));
        assert!(body.get("venue").is_none());
    }

    #[tokio::test]
    async fn create_sheet_poll_repeats_options() {
        let client = ApiClient::new(FakeTransport::new().respond("/create", 200, json!({})));
        client
            .create_sheet_poll(&CreateSheetPoll {
                sheet_id: RecordId::Number(4),
                title: "Drink".into(),
                poll_type: "multi_choice".into(),
                options: vec!["Tea".into(), "Coffee".into()],
                category: "food".into(),
                description: None,
            })
            .await
            .unwrap();

        let RequestBody::Form(fields) = &client.transport().requests()[0].body else {
            panic!("expected a form body");
        };
        let options: Vec<&str> = fields
            .iter()
            .filter(|(k, _)| k == "options")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(options, vec!["Tea", "Coffee"]);
        assert!(fields.iter().all(|(k, _)| k != "description"));
    }

    #[tokio::test]
    async fn delete_is_a_put_with_query_id() {
        let client = ApiClient::new(FakeTransport::new().respond("/sheet/delete", 200, json!(null)));
        client.delete_sheet(&RecordId::from("s-1")).await.unwrap();

        let sent = &client.transport().requests()[0];
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.query, vec![("id".to_string(), "s-1".to_string())]);
    }

    #[test]
    fn extractors_tolerate_odd_payloads() {
        assert!(extract_sheet_from_response(&json!([{"sheet": {}}])).is_none());
        assert!(extract_sheet_from_response(&json!({"sheet": "nope"})).is_none());
        assert_eq!(extract_sheet_polls(&json!([{"title": "a"}, 3])).len(), 1);
        assert_eq!(extract_sheet_polls(&json!({"polls": [{}, {}]})).len(), 2);
        assert!(extract_sheet_polls(&json!(null)).is_empty());
    }
}
