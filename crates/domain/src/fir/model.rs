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
pub enum FirStatus {
    #[default]
    Registered,
    UnderInvestigation,
    ChargeSheetFiled,
    Closed,
    Transferred,
}

impl FirStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FirStatus::Registered => "REGISTERED",
            FirStatus::UnderInvestigation => "UNDER_INVESTIGATION",
            FirStatus::ChargeSheetFiled => "CHARGE_SHEET_FILED",
            FirStatus::Closed => "CLOSED",
            FirStatus::Transferred => "TRANSFERRED",
        }
    }
}

impl std::fmt::Display for FirStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A First Information Report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fir {
    pub id: RecordId,
    pub fir_number: String,
    pub criminal_id: Option<RecordId>,
    pub complainant_name: String,
    pub complainant_contact: String,
    pub complainant_address: String,
    pub incident_date_time: Option<DateTime<Utc>>,
    pub incident_location: String,
    pub incident_description: String,
    pub offense_type: String,
    pub sections: String,
    pub status: FirStatus,
    pub assigned_officer_id: Option<RecordId>,
    pub investigation_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: RecordId,
    pub updated_by: RecordId,
}

impl Fir {
    pub(crate) fn from_new(new: NewFir, actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            fir_number: new.fir_number,
            criminal_id: new.criminal_id,
            complainant_name: new.complainant_name,
            complainant_contact: new.complainant_contact,
            complainant_address: new.complainant_address,
            incident_date_time: new.incident_date_time,
            incident_location: new.incident_location,
            incident_description: new.incident_description,
            offense_type: new.offense_type,
            sections: new.sections,
            status: FirStatus::Registered,
            assigned_officer_id: None,
            investigation_notes: None,
            created_at: now,
            updated_at: now,
            created_by: actor.user_id,
            updated_by: actor.user_id,
        }
    }

    pub(crate) fn apply(&mut self, changes: FirChanges, actor: &Actor, now: DateTime<Utc>) {
        self.criminal_id = changes.criminal_id;
        self.complainant_name = changes.complainant_name;
        self.complainant_contact = changes.complainant_contact;
        self.complainant_address = changes.complainant_address;
        self.incident_date_time = changes.incident_date_time;
        self.incident_location = changes.incident_location;
        self.incident_description = changes.incident_description;
        self.offense_type = changes.offense_type;
        self.sections = changes.sections;
        self.investigation_notes = changes.investigation_notes;
        self.touch(actor, now);
    }

    pub(crate) fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.updated_at = now;
        self.updated_by = actor.user_id;
    }
}

impl Record for Fir {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

impl Assignable for Fir {
    const KIND: EntityKind = EntityKind::Fir;
    const DOMAIN: LockDomain = LockDomain::Fir;
    const WORKLOAD: Workload = Workload::Firs;

    fn assignee(&self) -> Option<RecordId> {
        self.assigned_officer_id
    }

    /// Assignment opens the investigation.
    fn assign(&mut self, officer_id: RecordId, actor: &Actor, now: DateTime<Utc>) {
        self.assigned_officer_id = Some(officer_id);
        self.status = FirStatus::UnderInvestigation;
        self.touch(actor, now);
    }
}

/// Input for registering a FIR. New FIRs are always `REGISTERED` and
/// unassigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewFir {
    pub fir_number: String,
    pub criminal_id: Option<RecordId>,
    pub complainant_name: String,
    pub complainant_contact: String,
    pub complainant_address: String,
    pub incident_date_time: Option<DateTime<Utc>>,
    pub incident_location: String,
    pub incident_description: String,
    pub offense_type: String,
    pub sections: String,
}

impl NewFir {
    pub fn new(fir_number: impl Into<String>, complainant_name: impl Into<String>) -> Self {
        Self {
            fir_number: fir_number.into(),
            complainant_name: complainant_name.into(),
            ..Default::default()
        }
    }

    pub fn criminal(mut self, criminal_id: RecordId) -> Self {
        self.criminal_id = Some(criminal_id);
        self
    }

    pub fn offense(mut self, offense_type: impl Into<String>, sections: impl Into<String>) -> Self {
        self.offense_type = offense_type.into();
        self.sections = sections.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require("fir_number", &self.fir_number)?;
        require("complainant_name", &self.complainant_name)
    }
}

/// The editable fields of a FIR. Number, status and assignee are changed
/// only through their dedicated operations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FirChanges {
    pub criminal_id: Option<RecordId>,
    pub complainant_name: String,
    pub complainant_contact: String,
    pub complainant_address: String,
    pub incident_date_time: Option<DateTime<Utc>>,
    pub incident_location: String,
    pub incident_description: String,
    pub offense_type: String,
    pub sections: String,
    pub investigation_notes: Option<String>,
}

impl FirChanges {
    pub(crate) fn validate(&self) -> Result<()> {
        require("complainant_name", &self.complainant_name)
    }
}

impl From<&Fir> for FirChanges {
    fn from(fir: &Fir) -> Self {
        Self {
            criminal_id: fir.criminal_id,
            complainant_name: fir.complainant_name.clone(),
            complainant_contact: fir.complainant_contact.clone(),
            complainant_address: fir.complainant_address.clone(),
            incident_date_time: fir.incident_date_time,
            incident_location: fir.incident_location.clone(),
            incident_description: fir.incident_description.clone(),
            offense_type: fir.offense_type.clone(),
            sections: fir.sections.clone(),
            investigation_notes: fir.investigation_notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fir_is_registered_and_unassigned() {
        let fir = Fir::from_new(NewFir::new("FIR/2024/001", "Amit"), &Actor::system(), Utc::now());

        assert_eq!(fir.status, FirStatus::Registered);
        assert_eq!(fir.assignee(), None);
    }

    #[test]
    fn assign_moves_to_under_investigation() {
        let mut fir = Fir::from_new(NewFir::new("FIR/2024/001", "Amit"), &Actor::system(), Utc::now());
        let actor = Actor::new("admin", RecordId::new(1), "10.0.0.1");

        fir.assign(RecordId::new(3), &actor, Utc::now());

        assert_eq!(fir.assigned_officer_id, Some(RecordId::new(3)));
        assert_eq!(fir.status, FirStatus::UnderInvestigation);
        assert_eq!(fir.updated_by, RecordId::new(1));
    }

    #[test]
    fn apply_leaves_status_and_assignee() {
        let mut fir = Fir::from_new(NewFir::new("FIR/2024/001", "Amit"), &Actor::system(), Utc::now());
        fir.assign(RecordId::new(3), &Actor::system(), Utc::now());

        let mut changes = FirChanges::from(&fir);
        changes.investigation_notes = Some("Witness located".into());
        fir.apply(changes, &Actor::system(), Utc::now());

        assert_eq!(fir.status, FirStatus::UnderInvestigation);
        assert_eq!(fir.assigned_officer_id, Some(RecordId::new(3)));
        assert_eq!(fir.fir_number, "FIR/2024/001");
        assert_eq!(fir.investigation_notes.as_deref(), Some("Witness located"));
    }

    #[test]
    fn status_wire_names() {
        let json = serde_json::to_string(&FirStatus::ChargeSheetFiled).unwrap();
        assert_eq!(json, "\"CHARGE_SHEET_FILED\"");
    }
}
