use crate::api::{ApiClient, Transport};
use crate::commands::CommandResult;
use crate::models::AdminUserRecord;

pub async fn list<T: Transport>(client: &ApiClient<T>, page: u32, page_size: u32) -> CommandResult {
    let users = client.list_admin_users(page, page_size).await?;
    let state = users.state(page, page_size);

    for user in &users.records {
        println!("{}", render_user(user));
    }
    println!("Page {} of {}", state.page, state.total_pages);
    Ok(())
}

pub fn render_user(user: &AdminUserRecord) -> String {
    let id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    let verified = match user.is_verified() {
        Some(true) => "verified",
        Some(false) => "unverified",
        None => "-",
    };

    format!(
        "#{} {} <{}> {} | {} | {}",
        id,
        user.name.as_deref().unwrap_or("-"),
        user.phone.as_deref().or(user.email.as_deref()).unwrap_or("-"),
        user.organization.as_deref().unwrap_or("-"),
        user.role_label(),
        verified
    )
}
