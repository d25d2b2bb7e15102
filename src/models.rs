use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier as sent by the portal API. Records carry either text or numeric ids,
/// both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Id(text),
            Raw::Number(number) => Id(number.to_string()),
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementScope {
    #[default]
    Subject,
    School,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(alias = "_id")]
    pub id: Id,
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default)]
    pub scope: AnnouncementScope,
    #[serde(default, alias = "date", alias = "createdAt")]
    pub created_at: Option<String>,
}

impl Announcement {
    /// Field lookup used by list views that are configured with a label field name.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" | "_id" => Some(self.id.to_string()),
            "title" => Some(self.title.clone()),
            "body" | "content" => Some(self.body.clone()),
            "date" | "created_at" | "createdAt" => self.created_at.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    #[serde(alias = "_id")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<Id>,
    #[serde(default)]
    pub subjects: Vec<SubjectSummary>,
}

/// Credentials handed to the portal by the sign-in screen. Authentication itself happens
/// upstream; the key is passed through to the API untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub first_name: String,
    pub grade_id: String,
    pub access_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_record_accepts_numeric_and_mongo_ids() {
        let json = r#"{
            "_id": "g7",
            "subjects": [
                {"_id": 1, "name": "Math", "announcements": [{"id": "a1", "title": "Quiz"}]},
                {"id": "bio", "name": "Biology"}
            ]
        }"#;

        let record: GradeRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, Some(Id::new("g7")));
        assert_eq!(record.subjects[0].id.as_str(), "1");
        assert_eq!(record.subjects[0].announcements[0].title, "Quiz");
        assert_eq!(record.subjects[0].announcements[0].scope, AnnouncementScope::Subject);
        assert!(record.subjects[1].announcements.is_empty());
    }

    #[test]
    fn announcement_reads_content_and_date_aliases() {
        let json = r#"{"_id": "s1", "title": "Holiday", "content": "No school", "date": "2024-05-01T08:00:00Z"}"#;

        let announcement: Announcement = serde_json::from_str(json).unwrap();

        assert_eq!(announcement.body, "No school");
        assert_eq!(announcement.field("title").as_deref(), Some("Holiday"));
        assert_eq!(announcement.field("date").as_deref(), Some("2024-05-01T08:00:00Z"));
        assert_eq!(announcement.field("colour"), None);
    }
}
