mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// Backend ids show up both as numbers and as strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollType {
    SingleChoice,
    MultiChoice,
    Slide,
    Opinion,
}

impl PollType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollType::SingleChoice => "single_choice",
            PollType::MultiChoice => "multi_choice",
            PollType::Slide => "slide",
            PollType::Opinion => "opinion",
        }
    }

    /// Exact match only: no case folding, no prefixes.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "single_choice" => Some(PollType::SingleChoice),
            "multi_choice" => Some(PollType::MultiChoice),
            "slide" => Some(PollType::Slide),
            "opinion" => Some(PollType::Opinion),
            _ => None,
        }
    }
}

impl fmt::Display for PollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollRecord {
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub poll_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sheet details the backend embeds next to a client poll listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetInfo {
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean", skip_serializing_if = "Option::is_none")]
    pub is_phone_required: Option<bool>,
    #[serde(
        default,
        rename = "isPhoneRequired",
        deserialize_with = "lenient::boolean",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_phone_required_camel: Option<bool>,
}

impl SheetInfo {
    /// The snake_case flag when it is a boolean, otherwise the camelCase one.
    pub fn phone_required(&self) -> bool {
        self.is_phone_required
            .or(self.is_phone_required_camel)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetPollRecord {
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub poll_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub options: Vec<String>,
    #[serde(default, deserialize_with = "lenient::value_list")]
    pub votes: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::value")]
    pub participant: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetRecord {
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_phone_required: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub approved_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    created_at: Option<String>,
    #[serde(default, rename = "createdAt", deserialize_with = "lenient::string")]
    created_at_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    updated_at: Option<String>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient::string")]
    updated_at_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    created_by: Option<String>,
    #[serde(default, rename = "createdBy", deserialize_with = "lenient::string")]
    created_by_camel: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub polls: Vec<SheetPollRecord>,
}

impl SheetRecord {
    pub fn created_at(&self) -> Option<&str> {
        lenient::either(&self.created_at, &self.created_at_camel)
    }

    pub fn updated_at(&self) -> Option<&str> {
        lenient::either(&self.updated_at, &self.updated_at_camel)
    }

    pub fn created_by(&self) -> Option<&str> {
        lenient::either(&self.created_by, &self.created_by_camel)
    }

    pub fn author(&self) -> Option<&str> {
        lenient::either(&self.owner, &self.user_name).or_else(|| self.created_by())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUserRecord {
    #[serde(default, deserialize_with = "lenient::record_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub admin: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    is_verified: Option<bool>,
    #[serde(default, rename = "isVerified", deserialize_with = "lenient::boolean")]
    is_verified_camel: Option<bool>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
}

impl AdminUserRecord {
    pub fn is_verified(&self) -> Option<bool> {
        self.is_verified.or(self.is_verified_camel)
    }

    pub fn role_label(&self) -> String {
        admin_role_label(lenient::either(&self.admin, &self.role))
    }
}

pub fn admin_role_label(role: Option<&str>) -> String {
    let Some(raw) = role.filter(|r| !r.is_empty()) else {
        return "-".to_string();
    };

    match raw.to_lowercase().as_str() {
        "super_admin" => "Super Admin".to_string(),
        "verified_admin" => "Verified Admin".to_string(),
        "new_user" => "New User".to_string(),
        "canceled_user" => "Canceled User".to_string(),
        _ => raw
            .replace('_', " ")
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: RecordId,
    #[serde(default, rename = "type", deserialize_with = "lenient::string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_organization: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sheet_title: Option<String>,
}

impl NotificationRecord {
    pub fn describe(&self) -> String {
        let who = self.user_name.as_deref().unwrap_or("Unknown user");
        let (scope, action) = match self.kind.as_deref() {
            Some("user_signup") => ("Access", "requests permission to have access"),
            Some("sheet_approval") => ("Sheet", "request permission to publish the sheet"),
            _ => ("Notification", "sent a notification"),
        };
        let context = [self.user_organization.as_deref(), self.sheet_title.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if context.is_empty() {
            format!("[{}] {} {}", scope, who, action)
        } else {
            format!("[{}] {} {} ({})", scope, who, action, context)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupPayload {
    pub phone: String,
    pub password: String,
    pub name: String,
    pub organization: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetPollDraft {
    pub title: String,
    pub poll_type: String,
    pub options: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SheetPollDraft {
    pub fn is_text_poll(&self) -> bool {
        let kind = self.poll_type.to_lowercase();
        kind == "text" || kind == "opinion"
    }

    // Text polls carry one synthetic option so they fit the vote vector contract
    pub fn normalized(mut self) -> Self {
        if self.is_text_poll() {
            self.options = vec!["opinion".to_string()];
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSheet {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub is_phone_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polls: Option<Vec<SheetPollDraft>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSheetPoll {
    pub sheet_id: RecordId,
    pub title: String,
    pub poll_type: String,
    pub options: Vec<String>,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteSubmission {
    pub id: String,
    pub votes: Vec<u32>,
    #[serde(default)]
    pub inputs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let num: RecordId = serde_json::from_value(json!(7)).unwrap();
        let text: RecordId = serde_json::from_value(json!(" abc ")).unwrap();
        assert_eq!(num.to_string(), "7");
        assert_eq!(text.to_string(), "abc");
    }

    #[test]
    fn sheet_info_reads_camel_case_phone_flag() {
        let info: SheetInfo =
            serde_json::from_value(json!({"id": "s1", "title": "Lunch", "isPhoneRequired": true}))
                .unwrap();
        assert!(info.phone_required());
        assert_eq!(info.title.as_deref(), Some("Lunch"));
    }

    #[test]
    fn phone_flag_prefers_a_boolean_snake_case_value() {
        let read = |body: Value| serde_json::from_value::<SheetInfo>(body).unwrap().phone_required();

        assert!(read(json!({"is_phone_required": null, "isPhoneRequired": true})));
        assert!(read(json!({"is_phone_required": "yes", "isPhoneRequired": true})));
        assert!(!read(json!({"is_phone_required": false, "isPhoneRequired": true})));
        assert!(!read(json!({"is_phone_required": null})));
        assert!(!read(json!({})));
    }

    #[test]
    fn poll_records_tolerate_loose_field_types() {
        let poll: PollRecord = serde_json::from_value(json!({
            "id": 1,
            "title": 2024,
            "description": null,
            "poll_type": "opinion",
            "options": null
        }))
        .unwrap();
        assert_eq!(poll.title.as_deref(), Some("2024"));
        assert!(poll.options.is_empty());
        assert!(poll.description.is_none());

        let mixed: PollRecord =
            serde_json::from_value(json!({"id": "7", "options": ["a", 3, null, {"x": 1}]})).unwrap();
        assert_eq!(mixed.id, Some(RecordId::Text("7".into())));
        assert_eq!(mixed.options, vec!["a".to_string(), "3".to_string()]);
    }

    #[test]
    fn sheet_records_accept_both_spellings_at_once() {
        let sheet: SheetRecord = serde_json::from_value(json!({
            "id": 1,
            "title": "A",
            "created_at": "",
            "createdAt": "2024-05-01",
            "updated_at": "x",
            "updatedAt": "y",
            "created_by": null,
            "createdBy": "Sam",
            "is_phone_required": null,
            "polls": [{"id": 1, "options": null, "votes": null}, "junk"]
        }))
        .unwrap();
        assert_eq!(sheet.created_at(), Some("2024-05-01"));
        assert_eq!(sheet.updated_at(), Some("x"));
        assert_eq!(sheet.created_by(), Some("Sam"));
        assert_eq!(sheet.author(), Some("Sam"));
        assert_eq!(sheet.is_phone_required, None);
        assert_eq!(sheet.polls.len(), 1);
        assert!(sheet.polls[0].votes.is_empty());
    }

    #[test]
    fn admin_users_accept_both_verified_spellings() {
        let user: AdminUserRecord = serde_json::from_value(json!({
            "id": 2,
            "role": "verified_admin",
            "is_verified": null,
            "isVerified": true
        }))
        .unwrap();
        assert_eq!(user.is_verified(), Some(true));
        assert_eq!(user.role_label(), "Verified Admin");
    }

    #[test]
    fn role_labels() {
        assert_eq!(admin_role_label(Some("super_admin")), "Super Admin");
        assert_eq!(admin_role_label(Some("VERIFIED_ADMIN")), "Verified Admin");
        assert_eq!(admin_role_label(Some("user_admin")), "User Admin");
        assert_eq!(admin_role_label(None), "-");
    }

    #[test]
    fn text_poll_drafts_get_the_synthetic_option() {
        let draft = SheetPollDraft {
            title: "Thoughts?".into(),
            poll_type: "Text".into(),
            options: vec!["a".into(), "b".into()],
            category: "general".into(),
            description: None,
        };
        assert_eq!(draft.normalized().options, vec!["opinion".to_string()]);
    }

    #[test]
    fn notification_description_mentions_scope() {
        let note: NotificationRecord = serde_json::from_value(json!({
            "id": 3,
            "type": "sheet_approval",
            "user_name": "Sam",
            "sheet_title": "Menu"
        }))
        .unwrap();
        assert_eq!(
            note.describe(),
            "[Sheet] Sam request permission to publish the sheet (Menu)"
        );
    }

    #[test]
    fn submission_always_carries_inputs() {
        let body = serde_json::to_value(VoteSubmission {
            id: "9".into(),
            votes: vec![1],
            inputs: Vec::new(),
        })
        .unwrap();
        assert_eq!(body, json!({"id": "9", "votes": [1], "inputs": []}));
    }
}
