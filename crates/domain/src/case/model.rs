use chrono::{DateTime, Utc};
use common::{Actor, EntityKind, RecordId};
use entity_store::Record;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignable;
use crate::error::{Result, require};
use crate::locks::LockDomain;
use crate::officer::Workload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    #[default]
    Filed,
    Pending,
    Hearing,
    VerdictAnnounced,
    Closed,
    Appealed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Filed => "FILED",
            CaseStatus::Pending => "PENDING",
            CaseStatus::Hearing => "HEARING",
            CaseStatus::VerdictAnnounced => "VERDICT_ANNOUNCED",
            CaseStatus::Closed => "CLOSED",
            CaseStatus::Appealed => "APPEALED",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A court case built from one or more FIRs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: RecordId,
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub criminal_ids: Vec<RecordId>,
    pub fir_ids: Vec<RecordId>,
    pub investigating_officer_id: Option<RecordId>,
    pub filing_date: Option<DateTime<Utc>>,
    pub court: String,
    pub judge: String,
    pub prosecutor_name: String,
    pub defense_advocate: String,
    pub status: CaseStatus,
    pub hearing_date: Option<DateTime<Utc>>,
    pub verdict: Option<String>,
    pub evidence_list: Vec<String>,
    pub witness_details: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: RecordId,
    pub updated_by: RecordId,
}

impl Case {
    pub(crate) fn from_new(new: NewCase, actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            case_number: new.case_number,
            title: new.title,
            description: new.description,
            criminal_ids: new.criminal_ids,
            fir_ids: new.fir_ids,
            investigating_officer_id: None,
            filing_date: new.filing_date.or(Some(now)),
            court: new.court,
            judge: new.judge,
            prosecutor_name: new.prosecutor_name,
            defense_advocate: new.defense_advocate,
            status: CaseStatus::Filed,
            hearing_date: new.hearing_date,
            verdict: None,
            evidence_list: new.evidence_list,
            witness_details: new.witness_details,
            created_at: now,
            updated_at: now,
            created_by: actor.user_id,
            updated_by: actor.user_id,
        }
    }

    pub(crate) fn apply(&mut self, changes: CaseChanges, actor: &Actor, now: DateTime<Utc>) {
        self.title = changes.title;
        self.description = changes.description;
        self.criminal_ids = changes.criminal_ids;
        self.fir_ids = changes.fir_ids;
        self.filing_date = changes.filing_date;
        self.court = changes.court;
        self.judge = changes.judge;
        self.prosecutor_name = changes.prosecutor_name;
        self.defense_advocate = changes.defense_advocate;
        self.hearing_date = changes.hearing_date;
        self.verdict = changes.verdict;
        self.evidence_list = changes.evidence_list;
        self.witness_details = changes.witness_details;
        self.touch(actor, now);
    }

    pub(crate) fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.updated_at = now;
        self.updated_by = actor.user_id;
    }
}

impl Record for Case {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Assignable for Case {
    const KIND: EntityKind = EntityKind::Case;
    const DOMAIN: LockDomain = LockDomain::Case;
    const WORKLOAD: Workload = Workload::Cases;

    fn assignee(&self) -> Option<RecordId> {
        self.investigating_officer_id
    }

    /// The case status is left as it is.
    fn assign(&mut self, officer_id: RecordId, actor: &Actor, now: DateTime<Utc>) {
        self.investigating_officer_id = Some(officer_id);
        self.touch(actor, now);
    }
}

/// Input for filing a case. New cases are always `FILED` and have no
/// investigating officer until assigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewCase {
    pub case_number: String,
    pub title: String,
    pub description: String,
    pub criminal_ids: Vec<RecordId>,
    pub fir_ids: Vec<RecordId>,
    pub filing_date: Option<DateTime<Utc>>,
    pub court: String,
    pub judge: String,
    pub prosecutor_name: String,
    pub defense_advocate: String,
    pub hearing_date: Option<DateTime<Utc>>,
    pub evidence_list: Vec<String>,
    pub witness_details: String,
}

impl NewCase {
    pub fn new(case_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            case_number: case_number.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn criminals(mut self, ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.criminal_ids = ids.into_iter().collect();
        self
    }

    pub fn firs(mut self, ids: impl IntoIterator<Item = RecordId>) -> Self {
        self.fir_ids = ids.into_iter().collect();
        self
    }

    pub fn court(mut self, court: impl Into<String>) -> Self {
        self.court = court.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require("case_number", &self.case_number)?;
        require("title", &self.title)
    }
}

/// The editable fields of a case.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaseChanges {
    pub title: String,
    pub description: String,
    pub criminal_ids: Vec<RecordId>,
    pub fir_ids: Vec<RecordId>,
    pub filing_date: Option<DateTime<Utc>>,
    pub court: String,
    pub judge: String,
    pub prosecutor_name: String,
    pub defense_advocate: String,
    pub hearing_date: Option<DateTime<Utc>>,
    pub verdict: Option<String>,
    pub evidence_list: Vec<String>,
    pub witness_details: String,
}

impl CaseChanges {
    pub(crate) fn validate(&self) -> Result<()> {
        require("title", &self.title)
    }
}

impl From<&Case> for CaseChanges {
    fn from(case: &Case) -> Self {
        Self {
            title: case.title.clone(),
            description: case.description.clone(),
            criminal_ids: case.criminal_ids.clone(),
            fir_ids: case.fir_ids.clone(),
            filing_date: case.filing_date,
            court: case.court.clone(),
            judge: case.judge.clone(),
            prosecutor_name: case.prosecutor_name.clone(),
            defense_advocate: case.defense_advocate.clone(),
            hearing_date: case.hearing_date,
            verdict: case.verdict.clone(),
            evidence_list: case.evidence_list.clone(),
            witness_details: case.witness_details.clone(),
        }
    }
}
