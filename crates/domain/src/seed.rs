//! Sample records for local runs and demos.

use chrono::{NaiveDate, Utc};
use common::{Actor, RecordId};

use crate::case::{Case, CaseStatus, NewCase};
use crate::criminal::{Criminal, CriminalStatus, NewCriminal};
use crate::error::Result;
use crate::fir::{Fir, FirStatus, NewFir};
use crate::officer::{NewOfficer, Officer, Workload};
use crate::services::Stores;
use crate::user::{NewUser, Role, User};

/// Stores a small, internally consistent data set with fixed ids.
///
/// Officer counters match the seeded assignments. Explicit ids advance each
/// store's counter, so later creates continue after the seeded ids.
pub async fn seed_sample_data(stores: &Stores) -> Result<()> {
    let now = Utc::now();
    let system = Actor::system();
    let id = RecordId::new;

    stores
        .users
        .save(
            User::from_new(
                NewUser::new("admin", "admin@police.gov.in")
                    .full_name("System Administrator")
                    .role(Role::Admin),
                now,
            ),
            Some(id(1)),
        )
        .await?;
    stores
        .users
        .save(
            User::from_new(
                NewUser::new("officer1", "officer1@police.gov.in")
                    .full_name("Inspector Sharma")
                    .role(Role::Officer),
                now,
            ),
            Some(id(2)),
        )
        .await?;

    let mut sharma = Officer::from_new(
        NewOfficer {
            rank: "Inspector".into(),
            station: "Central Station".into(),
            phone: "9876543210".into(),
            email: "sharma@police.gov.in".into(),
            joined_date: Some(now),
            ..NewOfficer::new("B001", "Inspector Sharma").department("CID")
        },
        now,
    );
    sharma.take_on(Workload::Cases);
    sharma.take_on(Workload::Firs);
    stores.officers.save(sharma, Some(id(1))).await?;
    stores
        .officers
        .save(
            Officer::from_new(
                NewOfficer {
                    rank: "Sub-Inspector".into(),
                    station: "North Station".into(),
                    phone: "9876543211".into(),
                    email: "verma@police.gov.in".into(),
                    joined_date: Some(now),
                    ..NewOfficer::new("B002", "SI Verma").department("Crime Branch")
                },
                now,
            ),
            Some(id(2)),
        )
        .await?;

    stores
        .criminals
        .save(
            Criminal::from_new(
                NewCriminal {
                    date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 12),
                    gender: "Male".into(),
                    nationality: "Indian".into(),
                    address: "Sector 12, Delhi".into(),
                    identification_marks: vec!["Scar on left cheek".into()],
                    criminal_history: "Prior theft convictions".into(),
                    ..NewCriminal::new("Rahul Kumar")
                        .alias("Rocky")
                        .status(CriminalStatus::Wanted)
                },
                &system,
                now,
            ),
            Some(id(1)),
        )
        .await?;
    stores
        .criminals
        .save(
            Criminal::from_new(
                NewCriminal {
                    date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 24),
                    gender: "Female".into(),
                    nationality: "Indian".into(),
                    address: "Andheri, Mumbai".into(),
                    criminal_history: "Fraud".into(),
                    ..NewCriminal::new("Priya Singh").status(CriminalStatus::Arrested)
                },
                &system,
                now,
            ),
            Some(id(2)),
        )
        .await?;

    let mut theft = Fir::from_new(
        NewFir {
            complainant_contact: "9811111111".into(),
            incident_location: "Connaught Place".into(),
            incident_description: "Chain snatching near the metro exit".into(),
            incident_date_time: Some(now),
            ..NewFir::new("FIR/2024/001", "Amit Patel")
                .criminal(id(1))
                .offense("Theft", "IPC 379")
        },
        &system,
        now,
    );
    theft.assigned_officer_id = Some(id(1));
    theft.status = FirStatus::UnderInvestigation;
    stores.firs.save(theft, Some(id(1))).await?;
    stores
        .firs
        .save(
            Fir::from_new(
                NewFir {
                    complainant_contact: "9822222222".into(),
                    incident_location: "Bandra West".into(),
                    incident_description: "Online payment fraud".into(),
                    ..NewFir::new("FIR/2024/002", "Neha Gupta")
                        .criminal(id(2))
                        .offense("Fraud", "IPC 420")
                },
                &system,
                now,
            ),
            Some(id(2)),
        )
        .await?;

    let mut case = Case::from_new(
        NewCase {
            description: "Chain snatching case arising from FIR/2024/001".into(),
            judge: "Hon. Justice Rao".into(),
            prosecutor_name: "Adv. Mehta".into(),
            evidence_list: vec!["CCTV footage".into()],
            ..NewCase::new("CASE/2024/001", "State vs Rahul Kumar")
                .criminals([id(1)])
                .firs([id(1)])
                .court("Delhi District Court")
        },
        &system,
        now,
    );
    case.investigating_officer_id = Some(id(1));
    case.status = CaseStatus::Pending;
    stores.cases.save(case, Some(id(1))).await?;

    tracing::info!(
        users = stores.users.count().await,
        officers = stores.officers.count().await,
        criminals = stores.criminals.count().await,
        firs = stores.firs.count().await,
        cases = stores.cases.count().await,
        "sample data seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Services;

    #[tokio::test]
    async fn seeded_counters_match_assignments() {
        let services = Services::in_memory();
        seed_sample_data(services.stores()).await.unwrap();

        for officer in services.officers.list().await {
            let workload = services.officers.workload(officer.id).await.unwrap();
            assert!(workload.is_consistent(), "officer {} drifted", officer.id);
        }
        assert_eq!(
            services.officers.get_by_badge("B001").await.unwrap().active_firs,
            1
        );
    }

    #[tokio::test]
    async fn creates_continue_after_seeded_ids() {
        let services = Services::in_memory();
        seed_sample_data(services.stores()).await.unwrap();

        let criminal = services
            .criminals
            .create(NewCriminal::new("Vikram Rathore"), &Actor::system())
            .await
            .unwrap();

        assert_eq!(criminal.id, RecordId::new(3));
    }
}
