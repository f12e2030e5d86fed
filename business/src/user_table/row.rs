//! Row contract consumed by [`super::TableState`] and the user row of the admin screen.

use serde::{Deserialize, Deserializer, Serialize};
use ustr::Ustr;

/// A comparable field value.
///
/// Values of different kinds order as `Bool < Number < Text`, so mixed columns
/// still sort deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue<'a> {
    Bool(bool),
    Number(i64),
    Text(&'a str),
}

/// A record the table controller can filter, sort and select.
///
/// `field` returns `None` for unknown keys; absent values sort before every
/// present value.
pub trait Row {
    /// Unique, stable identifier used for selection.
    fn id(&self) -> Ustr;

    /// Display name, matched by the filter text.
    fn name(&self) -> &str;

    fn field(&self, key: &str) -> Option<FieldValue<'_>>;
}

/// One line of the user list, as served by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Ustr,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserRow {
    pub fn new(id: impl AsRef<str>, name: impl Into<String>) -> Self {
        Self {
            id: Ustr::from(id.as_ref()),
            name: name.into(),
            company: String::new(),
            role: String::new(),
            status: String::new(),
            is_verified: false,
            avatar_url: None,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.status == "banned"
    }

    /// Status rendered in sentence case, e.g. `"not_active"` -> `"Not active"`.
    pub fn status_label(&self) -> String {
        sentence_case(&self.status)
    }

    pub fn verified_label(&self) -> &'static str {
        if self.is_verified { "Yes" } else { "No" }
    }
}

impl Row for UserRow {
    fn id(&self) -> Ustr {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "id" => Some(FieldValue::Text(self.id.as_str())),
            "name" => Some(FieldValue::Text(&self.name)),
            "company" => Some(FieldValue::Text(&self.company)),
            "role" => Some(FieldValue::Text(&self.role)),
            "status" => Some(FieldValue::Text(&self.status)),
            "isVerified" | "is_verified" => Some(FieldValue::Bool(self.is_verified)),
            "avatarUrl" | "avatar_url" => self.avatar_url.as_deref().map(FieldValue::Text),
            _ => None,
        }
    }
}

/// Ids arrive as strings or numbers depending on the backend.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Ustr, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => Ustr::from(id.as_str()),
        RawId::Number(id) => Ustr::from(id.to_string().as_str()),
    })
}

fn sentence_case(raw: &str) -> String {
    let words: Vec<String> = raw
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    let joined = words.join(" ");

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
