use chrono::{DateTime, NaiveDate, Utc};
use common::{Actor, RecordId};
use entity_store::Record;
use serde::{Deserialize, Serialize};

use crate::error::{Result, require};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriminalStatus {
    Wanted,
    Arrested,
    Convicted,
    Released,
    #[default]
    Unknown,
}

impl CriminalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriminalStatus::Wanted => "WANTED",
            CriminalStatus::Arrested => "ARRESTED",
            CriminalStatus::Convicted => "CONVICTED",
            CriminalStatus::Released => "RELEASED",
            CriminalStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for CriminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criminal {
    pub id: RecordId,
    pub name: String,
    pub alias: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub nationality: String,
    pub address: String,
    pub phone: String,
    pub photo: Option<String>,
    pub identification_marks: Vec<String>,
    pub criminal_history: String,
    pub status: CriminalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: RecordId,
    pub updated_by: RecordId,
}

impl Criminal {
    pub(crate) fn from_new(new: NewCriminal, actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            name: new.name,
            alias: new.alias,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            nationality: new.nationality,
            address: new.address,
            phone: new.phone,
            photo: new.photo,
            identification_marks: new.identification_marks,
            criminal_history: new.criminal_history,
            status: new.status,
            created_at: now,
            updated_at: now,
            created_by: actor.user_id,
            updated_by: actor.user_id,
        }
    }

    pub(crate) fn apply(&mut self, changes: CriminalChanges, actor: &Actor, now: DateTime<Utc>) {
        self.name = changes.name;
        self.alias = changes.alias;
        self.date_of_birth = changes.date_of_birth;
        self.gender = changes.gender;
        self.nationality = changes.nationality;
        self.address = changes.address;
        self.phone = changes.phone;
        self.photo = changes.photo;
        self.identification_marks = changes.identification_marks;
        self.criminal_history = changes.criminal_history;
        self.status = changes.status;
        self.touch(actor, now);
    }

    pub(crate) fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.updated_at = now;
        self.updated_by = actor.user_id;
    }
}

impl Record for Criminal {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCriminal {
    pub name: String,
    pub alias: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub nationality: String,
    pub address: String,
    pub phone: String,
    pub photo: Option<String>,
    pub identification_marks: Vec<String>,
    pub criminal_history: String,
    pub status: CriminalStatus,
}

impl NewCriminal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn status(mut self, status: CriminalStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// The editable fields of a criminal record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CriminalChanges {
    pub name: String,
    pub alias: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub nationality: String,
    pub address: String,
    pub phone: String,
    pub photo: Option<String>,
    pub identification_marks: Vec<String>,
    pub criminal_history: String,
    pub status: CriminalStatus,
}

impl CriminalChanges {
    pub(crate) fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

impl From<&Criminal> for CriminalChanges {
    fn from(criminal: &Criminal) -> Self {
        Self {
            name: criminal.name.clone(),
            alias: criminal.alias.clone(),
            date_of_birth: criminal.date_of_birth,
            gender: criminal.gender.clone(),
            nationality: criminal.nationality.clone(),
            address: criminal.address.clone(),
            phone: criminal.phone.clone(),
            photo: criminal.photo.clone(),
            identification_marks: criminal.identification_marks.clone(),
            criminal_history: criminal.criminal_history.clone(),
            status: criminal.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_new_stamps_creator() {
        let actor = Actor::new("officer1", RecordId::new(2), "10.0.0.1");
        let criminal = Criminal::from_new(NewCriminal::new("Rahul Kumar"), &actor, Utc::now());

        assert_eq!(criminal.created_by, RecordId::new(2));
        assert_eq!(criminal.updated_by, RecordId::new(2));
        assert_eq!(criminal.status, CriminalStatus::Unknown);
    }

    #[test]
    fn apply_keeps_creation_metadata() {
        let creator = Actor::new("officer1", RecordId::new(2), "10.0.0.1");
        let editor = Actor::new("admin", RecordId::new(1), "10.0.0.2");
        let mut criminal = Criminal::from_new(NewCriminal::new("Rahul"), &creator, Utc::now());
        let created_at = criminal.created_at;

        let mut changes = CriminalChanges::from(&criminal);
        changes.alias = "Rocky".into();
        criminal.apply(changes, &editor, Utc::now());

        assert_eq!(criminal.alias, "Rocky");
        assert_eq!(criminal.created_by, RecordId::new(2));
        assert_eq!(criminal.created_at, created_at);
        assert_eq!(criminal.updated_by, RecordId::new(1));
    }

    #[test]
    fn date_of_birth_parses_from_iso_date() {
        let new: NewCriminal =
            serde_json::from_str(r#"{"name":"Priya Singh","date_of_birth":"1990-05-15"}"#).unwrap();

        assert_eq!(new.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 15));
    }
}
