use crate::api::{ApiClient, ApiRequest, Page, Transport, endpoints};
use crate::error::ApiError;
use crate::models::AdminUserRecord;
use crate::normalize::ADMIN_USERS;

impl<T: Transport> ApiClient<T> {
    pub async fn list_admin_users(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<AdminUserRecord>, ApiError> {
        let request = ApiRequest::get(endpoints::ADMIN_USERS).paged(page, page_size);
        let (users, _) = self.fetch_page(request, ADMIN_USERS, Some(page_size)).await?;
        Ok(users)
    }
}
