use crate::api::{ApiClient, Transport};
use crate::commands::{CommandResult, NotificationsCommand, record_id};

pub async fn run<T: Transport>(client: &ApiClient<T>, command: NotificationsCommand, page_size: u32) -> CommandResult {
    match command {
        NotificationsCommand::List { page } => {
            let inbox = client.load_notifications(page, page_size).await?;
            if inbox.items.is_empty() {
                println!("No notifications.");
                return Ok(());
            }
            for note in &inbox.items {
                println!("#{} {}", note.id, note.describe());
                if let Some(at) = &note.created_at {
                    println!("    {}", at);
                }
            }
            let end = if inbox.reached_end { " (last)" } else { "" };
            println!("Page {}{}", inbox.page, end);
        }
        NotificationsCommand::Approve { id } => {
            client.approve_notification(&record_id(&id)).await?;
            println!("Approved {}.", id);
        }
        NotificationsCommand::Reject { id } => {
            client.reject_notification(&record_id(&id)).await?;
            println!("Rejected {}.", id);
        }
    }
    Ok(())
}
