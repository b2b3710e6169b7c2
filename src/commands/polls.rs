use crate::api::{ApiClient, Transport};
use crate::commands::{Answer, CommandError, CommandResult};
use crate::error::ApiError;
use crate::models::{PollRecord, SheetInfo};
use crate::submit::{VoteBook, respondent_phone_ok};
use crate::summary::AdminPollSummary;
use crate::voting::{build_votes_by_type, infer_poll_type};
use log::{info, warn};

// Guards against backends that ignore `page` and keep sending full pages
const MAX_PAGES: u32 = 50;

/// Every poll of a sheet, walking the pages until the backend runs out.
pub async fn fetch_all_polls<T: Transport>(
    client: &ApiClient<T>,
    sheet_id: &str,
    page_size: u32,
) -> Result<(Vec<PollRecord>, Option<SheetInfo>), ApiError> {
    let mut polls = Vec::new();
    let mut sheet = None;
    let mut page = 1;

    loop {
        let fetched = client.fetch_polls(sheet_id, page, page_size).await?;
        let state = fetched.polls.state(page, page_size);
        let empty = fetched.polls.records.is_empty();

        sheet = sheet.or(fetched.sheet);
        polls.extend(fetched.polls.records);

        if empty || page >= state.total_pages {
            break;
        }
        if page >= MAX_PAGES {
            warn!("Stopped reading sheet {} after {} pages", sheet_id, MAX_PAGES);
            break;
        }
        page += 1;
    }

    info!("Sheet {} has {} polls", sheet_id, polls.len());
    Ok((polls, sheet))
}

/// Encodes the answers against the sheet's polls. A later answer for the
/// same poll replaces an earlier one.
pub fn build_vote_book(polls: &[PollRecord], answers: &[Answer]) -> Result<VoteBook, CommandError> {
    let mut book = VoteBook::new();

    for answer in answers {
        let poll = polls
            .iter()
            .find(|p| p.id.as_ref().is_some_and(|id| id.to_string() == answer.poll_id))
            .ok_or_else(|| CommandError::UnknownPoll(answer.poll_id.clone()))?;

        let actual = infer_poll_type(poll).ok_or_else(|| CommandError::UnsupportedPoll(answer.poll_id.clone()))?;
        let given = answer.selection.poll_type();
        if actual != given {
            return Err(CommandError::TypeMismatch {
                poll: answer.poll_id.clone(),
                actual: actual.to_string(),
                given: given.to_string(),
            });
        }

        let votes = build_votes_by_type(&answer.selection, poll.options.len());
        book.record(&answer.poll_id, votes, &answer.selection.inputs());
    }

    Ok(book)
}

pub fn render_poll(poll: &PollRecord) -> String {
    let id = poll.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    let title = poll.title.as_deref().unwrap_or("(untitled)");
    let kind = poll.poll_type.as_deref().unwrap_or("unknown");

    let mut out = format!("#{} {} [{}]", id, title, kind);
    if let Some(description) = poll.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("\n    {}", description.trim()));
    }
    if infer_poll_type(poll).is_some_and(|t| t != crate::models::PollType::Opinion) {
        for (idx, option) in poll.options.iter().enumerate() {
            out.push_str(&format!("\n    {}. {}", idx, option));
        }
    }
    out
}

pub fn render_summary(summary: &AdminPollSummary) -> String {
    let mut out = format!(
        "#{} {} [{} / {}] {} participants",
        summary.id, summary.title, summary.kind, summary.category, summary.participants
    );
    for ((option, votes), share) in summary
        .options
        .iter()
        .zip(&summary.votes)
        .zip(summary.percentages())
    {
        out.push_str(&format!("\n    {:<24} {:>6} {:>5.1}%", option, votes, share));
    }
    for response in &summary.responses {
        out.push_str(&format!("\n    > {}", response));
    }
    out
}

pub async fn list<T: Transport>(client: &ApiClient<T>, sheet_id: &str, page: u32, page_size: u32) -> CommandResult {
    let fetched = client.fetch_polls(sheet_id, page, page_size).await?;
    let state = fetched.polls.state(page, page_size);

    if let Some(sheet) = &fetched.sheet {
        let phone = if sheet.phone_required() { " (phone required)" } else { "" };
        println!("{}{}", sheet.title.as_deref().unwrap_or(sheet_id), phone);
    }
    for poll in &fetched.polls.records {
        println!("{}", render_poll(poll));
    }
    let more = if state.total_pages_guessed { "+" } else { "" };
    println!("Page {} of {}{}", state.page, state.total_pages, more);
    Ok(())
}

pub async fn vote<T: Transport + 'static>(
    client: &ApiClient<T>,
    sheet_id: &str,
    answers: &[Answer],
    phone: Option<&str>,
    page_size: u32,
) -> CommandResult {
    let (polls, sheet) = fetch_all_polls(client, sheet_id, page_size).await?;

    let phone_required = sheet.as_ref().is_some_and(SheetInfo::phone_required);
    if !respondent_phone_ok(phone_required, phone.unwrap_or("")) {
        return Err(CommandError::PhoneRequired.into());
    }

    let book = build_vote_book(&polls, answers)?;
    if !book.has_any_vote() {
        return Err(CommandError::NothingToSubmit.into());
    }

    let report = book.submit_all(client).await;
    for (poll_id, reason) in report.failed() {
        println!("Poll {}: not accepted ({})", poll_id, reason);
    }
    if !report.all_accepted() {
        return Err(CommandError::PartialSubmit {
            failed: report.failed().count(),
            total: report.outcomes.len(),
        }
        .into());
    }

    println!("Thanks! {} answers submitted.", report.outcomes.len());
    Ok(())
}

pub async fn results<T: Transport>(client: &ApiClient<T>, sheet_id: &str, page: u32, page_size: u32) -> CommandResult {
    let admin = client.fetch_admin_polls(sheet_id, page, page_size).await?;
    let state = admin.polls.state(page, page_size);

    for summary in &admin.summaries {
        println!("{}\n", render_summary(summary));
    }
    println!("Page {} of {}", state.page, state.total_pages);
    Ok(())
}
