//! End-to-end scenarios against the in-memory ledger backend.
//!
//! Every write here goes through the full path: sequence fetch, canonical
//! serialization, Keccak hash, ECDSA signature, submit, verification.

use std::sync::Arc;

use hl_access::{
    AccessConfig, AccessError, BackendKind, BackendMode, RedeemOutcome, Session, UpsertOutcome,
};
use hl_ledger_client::{InMemoryLedger, PrivateKey};
use shared_types::{Address, Department, Faculty, GradeEntry, StaffMember, Student, U256};
use tempfile::TempDir;

// Well-known development key; its account is 0xf39F…2266.
const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

fn signer() -> Address {
    PrivateKey::parse(KEY).unwrap().address()
}

fn ledger_session(dir: &TempDir) -> (Session<InMemoryLedger>, Arc<InMemoryLedger>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let ledger = Arc::new(InMemoryLedger::new());
    let config = AccessConfig {
        data_dir: dir.path().to_path_buf(),
        mode: BackendMode::LedgerPreferred,
        ..AccessConfig::default()
    };
    let session = Session::open(config, Arc::clone(&ledger)).unwrap();
    (session, ledger)
}

#[test]
fn reachable_ledger_session_is_authoritative() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    assert_eq!(session.backend(), BackendKind::Ledger);
    assert!(!session.is_degraded());
}

#[test]
fn register_campus_then_duplicate_is_rejected_remotely() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let registry = session.registry();

    let tx_id = registry.register_campus("Acme College", KEY).unwrap();
    assert!(!tx_id.is_empty());

    let err = registry.register_campus("Acme College", KEY).unwrap_err();
    assert!(matches!(err, AccessError::RemoteRejection(_)));
}

#[test]
fn malformed_credential_fails_validation_before_any_submit() {
    let dir = TempDir::new().unwrap();
    let (session, ledger) = ledger_session(&dir);
    let registry = session.registry();

    let err = registry.register_campus("Acme College", "not-a-key").unwrap_err();
    assert!(matches!(
        err,
        AccessError::Validation { field: "private_key", .. }
    ));
    assert!(ledger.last_submitted().is_none());
}

#[test]
fn department_submit_read_back_and_duplicate() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let mut departments = session.departments().unwrap();

    let dept = Department {
        organization: "Acme College".into(),
        name: "CS".into(),
        admin: addr(0x11),
    };
    let outcome = departments.upsert(&dept, KEY).unwrap();
    assert!(matches!(outcome, UpsertOutcome::Submitted(_)));

    let listed = departments.list("Acme College").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], dept);

    // The contract reverts on the duplicate; the rejection surfaces
    // verbatim instead of being remapped to a conflict outcome.
    let err = departments.upsert(&dept, KEY).unwrap_err();
    match err {
        AccessError::RemoteRejection(reason) => assert!(reason.contains("already exists")),
        other => panic!("expected remote rejection, got {other:?}"),
    }
}

#[test]
fn student_round_trips_through_signed_transactions() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let mut students = session.students().unwrap();

    let student = Student {
        organization: "Acme College".into(),
        department: "CS".into(),
        account: addr(0xaa),
        name: "Jo Riley".into(),
        roll_no: "CS-042".into(),
        year: 3,
        section: "B".into(),
        email: "jo@acme.edu".into(),
    };
    students.upsert(&student, KEY).unwrap();

    let fetched = students.get("Acme College", addr(0xaa)).unwrap().unwrap();
    assert_eq!(fetched, student);
    assert!(students.get("Acme College", addr(0xbb)).unwrap().is_none());

    let listed = students.list("Acme College", "CS").unwrap();
    assert_eq!(listed, vec![student]);
}

#[test]
fn faculty_listed_per_department() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let mut faculty = session.faculty().unwrap();

    faculty
        .upsert(
            &Faculty {
                organization: "Acme College".into(),
                department: "CS".into(),
                account: addr(0xbb),
                name: "Dr. Ada".into(),
                role: "Professor".into(),
            },
            KEY,
        )
        .unwrap();

    let cs = faculty.list("Acme College", "CS").unwrap();
    assert_eq!(cs.len(), 1);
    assert_eq!(cs[0].name, "Dr. Ada");
    assert!(faculty.list("Acme College", "EE").unwrap().is_empty());
}

#[test]
fn marksheet_preserves_submission_order() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let mut grades = session.grades().unwrap();
    let student = addr(0xaa);

    for (subject, mark) in [("Math", 85u8), ("Physics", 90)] {
        grades
            .add(
                &GradeEntry {
                    organization: "Acme College".into(),
                    student,
                    subject: subject.into(),
                    mark,
                },
                KEY,
            )
            .unwrap();
    }

    let sheet = grades.marks("Acme College", student).unwrap();
    assert_eq!(sheet.subjects, vec!["Math", "Physics"]);
    assert_eq!(sheet.marks, vec![85, 90]);
}

#[test]
fn staff_and_salary_flow() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);

    session
        .staff()
        .unwrap()
        .upsert(
            &StaffMember {
                organization: "General Hospital".into(),
                account: addr(0xcc),
                name: "A. Ward".into(),
                role: "Nurse".into(),
                salary: U256::zero(),
                active: true,
            },
            KEY,
        )
        .unwrap();

    let mut salaries = session.salaries().unwrap();
    assert_eq!(
        salaries.get("General Hospital", addr(0xcc)).unwrap(),
        Some(U256::zero())
    );
    salaries
        .set("General Hospital", addr(0xcc), U256::from(5_000u64), KEY)
        .unwrap();

    let listed = session.staff().unwrap().list("General Hospital").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].salary, U256::from(5_000u64));
    assert!(listed[0].active);

    // Unknown staff member: no salary, not an error.
    assert_eq!(salaries.get("General Hospital", addr(0xdd)).unwrap(), None);
}

#[test]
fn health_report_credits_points_and_filters_per_student() {
    let dir = TempDir::new().unwrap();
    let (session, _ledger) = ledger_session(&dir);
    let mut reports = session.health_reports().unwrap();

    reports
        .submit("General Hospital", addr(0xaa), "bafy-1", 25, "checkup", KEY)
        .unwrap();
    reports
        .submit("General Hospital", addr(0xbb), "bafy-2", 10, "follow-up", KEY)
        .unwrap();

    assert_eq!(reports.list("General Hospital").unwrap().len(), 2);

    let for_student = reports
        .list_for_student("General Hospital", addr(0xaa))
        .unwrap();
    assert_eq!(for_student.len(), 1);
    assert_eq!(for_student[0].content_locator, "bafy-1");
    assert_eq!(for_student[0].points, 25);
    assert_eq!(for_student[0].summary_digest.len(), 64);

    let balance = session
        .points()
        .unwrap()
        .balance("General Hospital", addr(0xaa))
        .unwrap();
    assert_eq!(balance.balance, 25);
}

#[test]
fn redeem_requires_the_key_controlling_the_account() {
    let dir = TempDir::new().unwrap();
    let (session, ledger) = ledger_session(&dir);
    ledger.seed_points("General Hospital", addr(0xaa), 40);

    let mut points = session.points().unwrap();
    let err = points
        .redeem("General Hospital", addr(0xaa), KEY)
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::Validation { field: "private_key", .. }
    ));
    // The rejected attempt must not have touched the balance.
    assert_eq!(
        points.balance("General Hospital", addr(0xaa)).unwrap().balance,
        40
    );
}

#[test]
fn redeem_own_balance_submits_and_zeroes() {
    let dir = TempDir::new().unwrap();
    let (session, ledger) = ledger_session(&dir);
    let account = signer();
    ledger.seed_points("General Hospital", account, 40);

    let mut points = session.points().unwrap();
    let outcome = points.redeem("General Hospital", account, KEY).unwrap();
    match outcome {
        RedeemOutcome::Redeemed { points: n, tx_id } => {
            assert_eq!(n, 40);
            assert!(tx_id.is_some());
        }
        other => panic!("expected redemption, got {other:?}"),
    }
    assert_eq!(
        points.balance("General Hospital", account).unwrap().balance,
        0
    );

    let outcome = points.redeem("General Hospital", account, KEY).unwrap();
    assert_eq!(outcome, RedeemOutcome::NothingToRedeem);
}

#[test]
fn scholarship_zero_normalizes_to_none() {
    let dir = TempDir::new().unwrap();
    let (session, ledger) = ledger_session(&dir);
    ledger.seed_scholarship("Acme College", addr(0xaa), 750_000);

    let scholarships = session.scholarships().unwrap();
    let award = scholarships.get("Acme College", addr(0xaa)).unwrap().unwrap();
    assert_eq!(award.amount, U256::from(750_000u64));
    assert!(scholarships.get("Acme College", addr(0xbb)).unwrap().is_none());
}

#[test]
fn node_loss_mid_session_surfaces_as_connectivity_not_empty() {
    let dir = TempDir::new().unwrap();
    let (session, ledger) = ledger_session(&dir);
    let departments = session.departments().unwrap();

    assert!(departments.list("Acme College").unwrap().is_empty());

    // The backend decision is already made; later failures are errors, not
    // a silent fallback.
    ledger.set_reachable(false);
    let err = departments.list("Acme College").unwrap_err();
    assert!(matches!(err, AccessError::Connectivity(_)));
    assert_eq!(session.backend(), BackendKind::Ledger);
}
