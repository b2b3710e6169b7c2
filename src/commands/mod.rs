pub mod admins;
pub mod auth;
pub mod notifications;
pub mod polls;
pub mod sheets;

use crate::api::{ApiClient, HttpTransport};
use crate::config::Config;
use crate::error::{ApiError, SessionError};
use crate::models::RecordId;
use crate::session::{TokenStore, jwt};
use crate::voting::VoteSelection;
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::warn;
use thiserror::Error;

pub type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Answer and manage sheet polls from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session token
    Login {
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account; the backend logs it in right away
    Signup {
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        organization: String,
    },
    Logout,
    /// Trade the stored token for a fresh one
    Refresh,
    /// Show what the stored token says about you
    Whoami,
    /// List the polls of a sheet
    Polls {
        sheet: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Answer polls of a sheet, e.g. `--answer 12=multi:0,2`
    Vote {
        sheet: String,
        #[arg(long = "answer", required = true, value_parser = parse_answer)]
        answers: Vec<Answer>,
        #[arg(long)]
        phone: Option<String>,
    },
    Sheets {
        #[command(subcommand)]
        command: SheetsCommand,
    },
    /// Tallies of a sheet's polls
    Results {
        sheet: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
    Admins {
        #[command(subcommand)]
        command: AdminsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SheetsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Create {
        title: String,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        phone_required: bool,
    },
    Delete {
        id: String,
    },
    /// Add a poll to an existing sheet
    AddPoll {
        sheet_id: String,
        #[arg(long)]
        title: String,
        #[arg(long = "type")]
        poll_type: String,
        #[arg(long = "option")]
        options: Vec<String>,
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminsCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

/// One `--answer <poll>=<kind>:<value>` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub poll_id: String,
    pub selection: VoteSelection,
}

pub fn parse_answer(raw: &str) -> Result<Answer, String> {
    let (poll_id, selection) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <poll>=<kind>:<value>, got '{}'", raw))?;
    let poll_id = poll_id.trim();
    if poll_id.is_empty() {
        return Err(format!("missing poll id in '{}'", raw));
    }

    Ok(Answer {
        poll_id: poll_id.to_string(),
        selection: selection.parse().map_err(|e| format!("{}", e))?,
    })
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("'{0}' is not a phone number we can use")]
    InvalidPhone(String),

    #[error("The backend did not return a session token")]
    MissingToken,

    #[error("This sheet requires a valid phone number (--phone)")]
    PhoneRequired,

    #[error("Sheet has no poll '{0}'")]
    UnknownPoll(String),

    #[error("Poll '{poll}' is a {actual} poll, not {given}")]
    TypeMismatch {
        poll: String,
        actual: String,
        given: String,
    },

    #[error("Poll '{0}' has a type this client cannot answer")]
    UnsupportedPoll(String),

    #[error("Nothing to submit, every answer was empty")]
    NothingToSubmit,

    #[error("{failed} of {total} answers were not accepted")]
    PartialSubmit { failed: usize, total: usize },
}

/// Shared state for one invocation.
pub struct Session {
    pub config: Config,
    pub store: TokenStore,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let store = TokenStore::new(config.token_path.clone());
        Self { config, store }
    }

    pub fn client(&self, token: Option<String>) -> Result<ApiClient<HttpTransport>, ApiError> {
        let base_url = self.config.api_base_url.as_deref().ok_or_else(|| {
            ApiError::InvalidBaseUrl("SHEETPOLL_API_BASE_URL is not set".to_string())
        })?;
        Ok(ApiClient::new(HttpTransport::new(base_url)?.with_token(token)))
    }

    /// The stored token if there is a usable one. A broken token file only
    /// costs the session.
    pub fn stored_token(&self) -> Option<String> {
        match self.store.load(Utc::now()) {
            Ok(token) => token,
            Err(e) => {
                warn!("Ignoring stored session: {}", e);
                None
            }
        }
    }

    /// Client for admin commands. The role check only decides whether to
    /// warn; the backend has the last word.
    pub fn admin_client(&self) -> Result<ApiClient<HttpTransport>, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.store.require_fresh(Utc::now())?;
        let claims = jwt::decode_payload(&token).ok_or(SessionError::Expired)?;
        if !jwt::is_super_admin(&claims) {
            warn!("Stored session is not a super admin, the backend may refuse this");
        }
        Ok(self.client(Some(token))?)
    }
}

pub async fn run(cli: Cli, config: Config) -> CommandResult {
    let session = Session::new(config);
    let page_size = session.config.page_size;
    match cli.command {
        Command::Login { phone, password } => auth::login(&session, &phone, &password).await,
        Command::Signup {
            phone,
            password,
            name,
            organization,
        } => auth::signup(&session, &phone, password, name, organization).await,
        Command::Logout => auth::logout(&session).await,
        Command::Refresh => auth::refresh(&session).await,
        Command::Whoami => auth::whoami(&session),
        Command::Polls { sheet, page } => {
            let client = session.client(session.stored_token())?;
            polls::list(&client, &sheet, page, page_size).await
        }
        Command::Vote {
            sheet,
            answers,
            phone,
        } => {
            let client = session.client(session.stored_token())?;
            polls::vote(&client, &sheet, &answers, phone.as_deref(), page_size).await
        }
        Command::Results { sheet, page } => {
            polls::results(&session.admin_client()?, &sheet, page, page_size).await
        }
        Command::Sheets { command } => {
            let client = session.client(Some(session.store.require_fresh(Utc::now())?))?;
            sheets::run(&client, command, page_size).await
        }
        Command::Notifications { command } => {
            notifications::run(&session.admin_client()?, command, page_size).await
        }
        Command::Admins {
            command: AdminsCommand::List { page },
        } => admins::list(&session.admin_client()?, page, page_size).await,
    }
}

pub(crate) fn record_id(raw: &str) -> RecordId {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(RecordId::Number)
        .unwrap_or_else(|_| RecordId::from(raw))
}
