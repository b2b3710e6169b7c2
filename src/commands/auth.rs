use crate::commands::{CommandError, CommandResult, Session};
use crate::models::{LoginCredentials, SignupPayload, admin_role_label};
use crate::phone::{Region, normalize_phone};
use crate::session::{extract_token, jwt};
use chrono::Utc;
use log::{info, warn};
use serde_json::Value;

fn normalized_phone(raw: &str) -> Result<String, CommandError> {
    normalize_phone(raw, Region::detect(raw)).ok_or_else(|| CommandError::InvalidPhone(raw.to_string()))
}

fn store_token(session: &Session, body: &Value) -> CommandResult {
    let token = extract_token(body).ok_or(CommandError::MissingToken)?;
    session.store.save(&token, Utc::now())?;
    Ok(())
}

pub async fn login(session: &Session, phone: &str, password: &str) -> CommandResult {
    let credentials = LoginCredentials {
        phone: normalized_phone(phone)?,
        password: password.to_string(),
    };

    let body = session.client(None)?.login(&credentials).await?;
    store_token(session, &body)?;
    info!("Logged in as {}", credentials.phone);
    println!("Logged in.");
    Ok(())
}

pub async fn signup(
    session: &Session,
    phone: &str,
    password: String,
    name: String,
    organization: String,
) -> CommandResult {
    let payload = SignupPayload {
        phone: normalized_phone(phone)?,
        password,
        name,
        organization,
    };

    let body = session.client(None)?.signup(&payload).await?;
    match extract_token(&body) {
        Some(_) => {
            store_token(session, &body)?;
            println!("Signed up and logged in.");
        }
        None => println!("Signed up. An admin has to approve the account before you can log in."),
    }
    Ok(())
}

pub async fn refresh(session: &Session) -> CommandResult {
    let token = session.store.require_fresh(Utc::now())?;
    let body = session.client(Some(token))?.refresh().await?;
    store_token(session, &body)?;
    info!("Session token refreshed");
    println!("Session refreshed.");
    Ok(())
}

pub async fn logout(session: &Session) -> CommandResult {
    if let Some(token) = session.stored_token() {
        // The local session goes away even if the backend cannot be told
        if let Err(e) = session.client(Some(token))?.logout().await {
            warn!("Backend logout failed: {}", e);
        }
    }
    session.store.clear()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(session: &Session) -> CommandResult {
    let token = session.store.require_fresh(Utc::now())?;
    let Some(claims) = jwt::decode_payload(&token) else {
        println!("Logged in, but the token carries no readable claims.");
        return Ok(());
    };

    println!("{}", describe_claims(&claims));
    Ok(())
}

pub(crate) fn describe_claims(claims: &jwt::JwtClaims) -> String {
    let name = claims
        .get("name")
        .or_else(|| claims.get("user").and_then(|u| u.get("name")))
        .and_then(Value::as_str)
        .unwrap_or("(unnamed)");
    let role = admin_role_label(jwt::role(claims).as_deref());

    match jwt::expires_at(claims) {
        Some(exp) => format!("{} [{}], session valid until {}", name, role, exp.to_rfc3339()),
        None => format!("{} [{}]", name, role),
    }
}
