use crate::api::{ApiClient, ApiRequest, Page, RequestBody, Transport, endpoints};
use crate::error::ApiError;
use crate::models::{NotificationRecord, RecordId};
use crate::normalize::NOTIFICATIONS;
use log::{debug, info};

const FIRST_PAGE: u32 = 1;

/// Notifications as the inbox shows them.
#[derive(Debug, Clone)]
pub struct NotificationPage {
    pub items: Vec<NotificationRecord>,
    /// The page `items` came from, which is 1 after a fallback.
    pub page: u32,
    pub reached_end: bool,
}

impl<T: Transport> ApiClient<T> {
    pub async fn list_notifications(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<NotificationRecord>, ApiError> {
        let request = ApiRequest::get(endpoints::NOTIFICATIONS).paged(page, page_size);
        let (notifications, _) = self.fetch_page(request, NOTIFICATIONS, Some(page_size)).await?;
        Ok(notifications)
    }

    /// Like [`list_notifications`](Self::list_notifications), but an empty
    /// page past the first sends the reader back to page 1.
    pub async fn load_notifications(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<NotificationPage, ApiError> {
        let page = page.max(FIRST_PAGE);
        let items = self.list_notifications(page, page_size).await?.records;

        if page != FIRST_PAGE && items.is_empty() {
            debug!("Notification page {} is empty, going back to page 1", page);
            let items = self.list_notifications(FIRST_PAGE, page_size).await?.records;
            return Ok(NotificationPage {
                items,
                page: FIRST_PAGE,
                reached_end: true,
            });
        }

        let reached_end = items.len() < page_size as usize;
        Ok(NotificationPage {
            items,
            page,
            reached_end,
        })
    }

    pub async fn approve_notification(&self, id: &RecordId) -> Result<(), ApiError> {
        let path = endpoints::approve_notification(&id.to_string());
        self.call(ApiRequest::post(path, RequestBody::Empty)).await?;
        info!("Approved notification {}", id);
        Ok(())
    }

    pub async fn reject_notification(&self, id: &RecordId) -> Result<(), ApiError> {
        let path = endpoints::reject_notification(&id.to_string());
        self.call(ApiRequest::post(path, RequestBody::Empty)).await?;
        info!("Rejected notification {}", id);
        Ok(())
    }
}
