use chrono::{DateTime, Utc};
use common::RecordId;
use entity_store::Record;
use serde::{Deserialize, Serialize};

use crate::error::{Result, require};

/// Duty status of an officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfficerStatus {
    #[default]
    Active,
    OnLeave,
    Suspended,
    Retired,
}

impl OfficerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfficerStatus::Active => "ACTIVE",
            OfficerStatus::OnLeave => "ON_LEAVE",
            OfficerStatus::Suspended => "SUSPENDED",
            OfficerStatus::Retired => "RETIRED",
        }
    }
}

impl std::fmt::Display for OfficerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of an officer's live counters an assignment affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Cases,
    Firs,
}

/// A police officer.
///
/// `active_cases` and `active_firs` are stored counters. They must equal the
/// number of cases and FIRs pointing at this officer and are only changed
/// under the ordered-lock protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: RecordId,
    pub badge_number: String,
    pub name: String,
    pub rank: String,
    pub department: String,
    pub station: String,
    pub phone: String,
    pub email: String,
    pub status: OfficerStatus,
    pub active_cases: u32,
    pub active_firs: u32,
    pub joined_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Officer {
    pub(crate) fn from_new(new: NewOfficer, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            badge_number: new.badge_number,
            name: new.name,
            rank: new.rank,
            department: new.department,
            station: new.station,
            phone: new.phone,
            email: new.email,
            status: new.status,
            active_cases: 0,
            active_firs: 0,
            joined_date: new.joined_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn apply(&mut self, changes: OfficerChanges, now: DateTime<Utc>) {
        self.name = changes.name;
        self.rank = changes.rank;
        self.department = changes.department;
        self.station = changes.station;
        self.phone = changes.phone;
        self.email = changes.email;
        self.status = changes.status;
        self.updated_at = now;
    }

    /// Returns the counter for `workload`.
    pub fn load(&self, workload: Workload) -> u32 {
        match workload {
            Workload::Cases => self.active_cases,
            Workload::Firs => self.active_firs,
        }
    }

    pub(crate) fn set_load(&mut self, workload: Workload, value: u32) {
        match workload {
            Workload::Cases => self.active_cases = value,
            Workload::Firs => self.active_firs = value,
        }
    }

    pub(crate) fn take_on(&mut self, workload: Workload) {
        self.set_load(workload, self.load(workload).saturating_add(1));
    }

    /// Decrements the counter, clamped at zero.
    pub(crate) fn release(&mut self, workload: Workload) {
        self.set_load(workload, self.load(workload).saturating_sub(1));
    }
}

impl Record for Officer {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Input for registering an officer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOfficer {
    pub badge_number: String,
    pub name: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: OfficerStatus,
    #[serde(default)]
    pub joined_date: Option<DateTime<Utc>>,
}

impl NewOfficer {
    pub fn new(badge_number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            badge_number: badge_number.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn status(mut self, status: OfficerStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require("badge_number", &self.badge_number)?;
        require("name", &self.name)
    }
}

/// The editable fields of an officer. Badge number, join date and the
/// workload counters are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficerChanges {
    pub name: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub status: OfficerStatus,
}

impl OfficerChanges {
    pub(crate) fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

impl From<&Officer> for OfficerChanges {
    fn from(officer: &Officer) -> Self {
        Self {
            name: officer.name.clone(),
            rank: officer.rank.clone(),
            department: officer.department.clone(),
            station: officer.station.clone(),
            phone: officer.phone.clone(),
            email: officer.email.clone(),
            status: officer.status,
        }
    }
}
