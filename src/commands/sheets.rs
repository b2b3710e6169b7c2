use crate::api::{ApiClient, SheetMutation, Transport};
use crate::commands::{CommandResult, SheetsCommand, record_id};
use crate::models::{CreateSheet, CreateSheetPoll, SheetPollDraft, SheetRecord};

pub async fn run<T: Transport>(client: &ApiClient<T>, command: SheetsCommand, page_size: u32) -> CommandResult {
    match command {
        SheetsCommand::List { page } => {
            let sheets = client.fetch_sheets(page, page_size).await?;
            let state = sheets.state(page, page_size);
            for sheet in &sheets.records {
                println!("{}", render_sheet(sheet));
            }
            println!("Page {} of {}", state.page, state.total_pages);
        }
        SheetsCommand::Create {
            title,
            venue,
            phone_required,
        } => {
            let created = client
                .create_sheet(CreateSheet {
                    title,
                    venue,
                    is_phone_required: phone_required,
                    polls: None,
                })
                .await?;
            println!("{}", render_mutation(&created, "Sheet created."));
        }
        SheetsCommand::Delete { id } => {
            client.delete_sheet(&record_id(&id)).await?;
            println!("Sheet {} deleted.", id);
        }
        SheetsCommand::AddPoll {
            sheet_id,
            title,
            poll_type,
            options,
            category,
            description,
        } => {
            let draft = SheetPollDraft {
                title,
                poll_type,
                options,
                category,
                description,
            }
            .normalized();
            let created = client
                .create_sheet_poll(&CreateSheetPoll {
                    sheet_id: record_id(&sheet_id),
                    title: draft.title,
                    poll_type: draft.poll_type,
                    options: draft.options,
                    category: draft.category,
                    description: draft.description,
                })
                .await?;
            println!("{}", render_mutation(&created, "Poll added."));
        }
    }
    Ok(())
}

pub fn render_sheet(sheet: &SheetRecord) -> String {
    let id = sheet.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    let mut out = format!("#{} {}", id, sheet.title.as_deref().unwrap_or("(untitled)"));

    let details: Vec<String> = [
        sheet.venue.clone(),
        sheet.status.clone(),
        sheet.author().map(|a| format!("by {}", a)),
        Some(format!("{} polls", sheet.polls.len())),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.trim().is_empty())
    .collect();
    out.push_str(&format!(" ({})", details.join(", ")));

    if sheet.is_phone_required == Some(true) {
        out.push_str(" [phone required]");
    }
    out
}

fn render_mutation(mutation: &SheetMutation, fallback: &str) -> String {
    let mut out = mutation.message.clone().unwrap_or_else(|| fallback.to_string());
    if let Some(sheet) = &mutation.sheet {
        out.push('\n');
        out.push_str(&render_sheet(sheet));
    }
    out
}
