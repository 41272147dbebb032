//! # In-Memory Ledger
//!
//! A test double implementing [`LedgerTransport`] against the same fixed
//! contract surface the remote exposes. Unlike a stub, it enforces the
//! parts that matter to callers: sequence numbers must match, signatures
//! must verify, and duplicate on-chain registrations revert.

use std::collections::HashMap;
use std::sync::Mutex;

use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use serde_json::{json, Value};
use sha3::{Digest, Keccak256};
use shared_types::Address;

use crate::errors::LedgerError;
use crate::keys::derive_address;
use crate::ports::{LedgerTransport, TxId};
use crate::tx::SignedTransaction;

#[derive(Debug, Clone)]
struct DeptEntry {
    org: String,
    name: String,
    admin: Address,
}

#[derive(Debug, Clone)]
struct FacultyEntry {
    org: String,
    dept: String,
    wallet: Address,
    name: String,
    role: String,
}

#[derive(Debug, Clone)]
struct StudentEntry {
    org: String,
    dept: String,
    wallet: Address,
    name: String,
    roll_no: String,
    year: u64,
    section: String,
    email: String,
}

#[derive(Debug, Clone)]
struct StaffEntry {
    org: String,
    wallet: Address,
    name: String,
    role: String,
    salary: u128,
    active: bool,
}

#[derive(Debug, Clone)]
struct ReportEntry {
    org: String,
    student: Address,
    cid: String,
    timestamp: u64,
    points: u64,
    summary_hash: String,
}

#[derive(Debug, Default)]
struct State {
    reachable: bool,
    sequences: HashMap<Address, u64>,
    organizations: Vec<String>,
    departments: Vec<DeptEntry>,
    faculty: Vec<FacultyEntry>,
    students: Vec<StudentEntry>,
    grades: Vec<(String, Address, String, u64)>,
    staff: Vec<StaffEntry>,
    reports: Vec<ReportEntry>,
    points: HashMap<(String, Address), u64>,
    scholarships: HashMap<(String, Address), u128>,
    last_submitted: Option<SignedTransaction>,
}

/// In-memory ledger holding contract state behind a mutex.
pub struct InMemoryLedger {
    state: Mutex<State>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                reachable: true,
                ..State::default()
            }),
        }
    }

    /// Toggle reachability; unreachable fails every operation.
    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    /// The last transaction accepted or attempted, for assertions.
    pub fn last_submitted(&self) -> Option<SignedTransaction> {
        self.lock().last_submitted.clone()
    }

    /// Seed a points balance directly (bypassing the report path).
    pub fn seed_points(&self, org: &str, wallet: Address, points: u64) {
        self.lock().points.insert((org.to_owned(), wallet), points);
    }

    /// Seed a scholarship amount.
    pub fn seed_scholarship(&self, org: &str, wallet: Address, amount: u128) {
        self.lock()
            .scholarships
            .insert((org.to_owned(), wallet), amount);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned mutex only happens after a panicking test; propagating
        // the panic is fine there.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_reachable(state: &State) -> Result<(), LedgerError> {
        if state.reachable {
            Ok(())
        } else {
            Err(LedgerError::Unreachable("in-memory ledger offline".into()))
        }
    }

    fn verify(tx: &SignedTransaction) -> Result<(), LedgerError> {
        let bytes = tx.canonical_bytes()?;

        let hash = hex::encode(Keccak256::digest(&bytes));
        if hash != tx.hash {
            return Err(LedgerError::Rejected("transaction hash mismatch".into()));
        }

        let pubkey_bytes = hex::decode(&tx.public_key)
            .map_err(|_| LedgerError::Rejected("malformed public key".into()))?;
        let verifying = VerifyingKey::from_sec1_bytes(&pubkey_bytes)
            .map_err(|_| LedgerError::Rejected("invalid public key".into()))?;

        let derived = derive_address(&verifying.to_encoded_point(false).as_bytes()[1..]);
        if derived != tx.payload.from {
            return Err(LedgerError::Rejected(
                "submitter does not match signing key".into(),
            ));
        }

        let sig_bytes = hex::decode(&tx.signature)
            .map_err(|_| LedgerError::Rejected("malformed signature".into()))?;
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|_| LedgerError::Rejected("invalid signature".into()))?;
        verifying
            .verify(&bytes, &signature)
            .map_err(|_| LedgerError::Rejected("signature verification failed".into()))
    }

    fn execute(state: &mut State, tx: &SignedTransaction) -> Result<(), LedgerError> {
        let args = &tx.payload.args;
        let from = tx.payload.from;

        match tx.payload.method.as_str() {
            "registerCollege" | "registerHospital" => {
                let name = arg_str(args, 0)?;
                if state.organizations.iter().any(|o| o == &name) {
                    return Err(LedgerError::Rejected("organization already registered".into()));
                }
                state.organizations.push(name);
            }
            "addDepartment" => {
                let (org, name) = (arg_str(args, 0)?, arg_str(args, 1)?);
                let admin = arg_addr(args, 2)?;
                if state
                    .departments
                    .iter()
                    .any(|d| d.org == org && d.name == name)
                {
                    return Err(LedgerError::Rejected("department already exists".into()));
                }
                state.departments.push(DeptEntry { org, name, admin });
            }
            "addFaculty" => {
                let (org, dept) = (arg_str(args, 0)?, arg_str(args, 1)?);
                let wallet = arg_addr(args, 2)?;
                let (name, role) = (arg_str(args, 3)?, arg_str(args, 4)?);
                if state
                    .faculty
                    .iter()
                    .any(|f| f.org == org && f.dept == dept && f.wallet == wallet)
                {
                    return Err(LedgerError::Rejected("faculty already exists".into()));
                }
                state.faculty.push(FacultyEntry {
                    org,
                    dept,
                    wallet,
                    name,
                    role,
                });
            }
            "addStudent" => {
                let (org, dept) = (arg_str(args, 0)?, arg_str(args, 1)?);
                let wallet = arg_addr(args, 2)?;
                let name = arg_str(args, 3)?;
                let roll_no = arg_str(args, 4)?;
                let year = arg_u64(args, 5)?;
                let section = arg_str(args, 6)?;
                let email = arg_str(args, 7)?;
                if state
                    .students
                    .iter()
                    .any(|s| s.org == org && s.wallet == wallet)
                {
                    return Err(LedgerError::Rejected("student already exists".into()));
                }
                state.students.push(StudentEntry {
                    org,
                    dept,
                    wallet,
                    name,
                    roll_no,
                    year,
                    section,
                    email,
                });
            }
            "addMarks" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                let subject = arg_str(args, 2)?;
                let mark = arg_u64(args, 3)?;
                if mark > 100 {
                    return Err(LedgerError::Rejected("mark out of range".into()));
                }
                state.grades.push((org, wallet, subject, mark));
            }
            "addStaff" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                let (name, role) = (arg_str(args, 2)?, arg_str(args, 3)?);
                if state
                    .staff
                    .iter()
                    .any(|s| s.org == org && s.wallet == wallet)
                {
                    return Err(LedgerError::Rejected("staff already exists".into()));
                }
                state.staff.push(StaffEntry {
                    org,
                    wallet,
                    name,
                    role,
                    salary: 0,
                    active: true,
                });
            }
            "setSalary" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                let salary = arg_amount(args, 2)?;
                let member = state
                    .staff
                    .iter_mut()
                    .find(|s| s.org == org && s.wallet == wallet)
                    .ok_or_else(|| LedgerError::Rejected("unknown staff member".into()))?;
                member.salary = salary;
            }
            "submitHealthReport" => {
                let org = arg_str(args, 0)?;
                let student = arg_addr(args, 1)?;
                let cid = arg_str(args, 2)?;
                let points = arg_u64(args, 3)?;
                let summary_hash = arg_str(args, 4)?;
                let timestamp = now_unix();
                state.reports.push(ReportEntry {
                    org: org.clone(),
                    student,
                    cid,
                    timestamp,
                    points,
                    summary_hash,
                });
                *state.points.entry((org, student)).or_insert(0) += points;
            }
            "redeemPoints" => {
                let org = arg_str(args, 0)?;
                let balance = state.points.entry((org, from)).or_insert(0);
                if *balance == 0 {
                    return Err(LedgerError::Rejected("no points to redeem".into()));
                }
                *balance = 0;
            }
            other => {
                return Err(LedgerError::Rejected(format!("unknown method {other}")));
            }
        }
        Ok(())
    }
}

impl LedgerTransport for InMemoryLedger {
    fn probe_liveness(&self) -> bool {
        self.lock().reachable
    }

    fn call(&self, _contract: Address, method: &str, args: &[Value]) -> Result<Value, LedgerError> {
        let state = self.lock();
        Self::check_reachable(&state)?;

        let result = match method {
            "getDepartments" => {
                let org = arg_str(args, 0)?;
                let hits: Vec<&DeptEntry> =
                    state.departments.iter().filter(|d| d.org == org).collect();
                json!([
                    hits.iter().map(|d| d.name.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|d| d.admin.to_string()).collect::<Vec<_>>(),
                ])
            }
            "getFaculty" => {
                let (org, dept) = (arg_str(args, 0)?, arg_str(args, 1)?);
                let hits: Vec<&FacultyEntry> = state
                    .faculty
                    .iter()
                    .filter(|f| f.org == org && f.dept == dept)
                    .collect();
                json!([
                    hits.iter().map(|f| f.wallet.to_string()).collect::<Vec<_>>(),
                    hits.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|f| f.role.clone()).collect::<Vec<_>>(),
                ])
            }
            "getStudent" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                match state
                    .students
                    .iter()
                    .find(|s| s.org == org && s.wallet == wallet)
                {
                    Some(s) => json!([
                        s.dept, s.name, s.roll_no, s.year, s.section, s.email
                    ]),
                    None => Value::Null,
                }
            }
            "getStudents" => {
                let (org, dept) = (arg_str(args, 0)?, arg_str(args, 1)?);
                let hits: Vec<&StudentEntry> = state
                    .students
                    .iter()
                    .filter(|s| s.org == org && s.dept == dept)
                    .collect();
                json!([
                    hits.iter().map(|s| s.wallet.to_string()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.roll_no.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.year).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.section.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.email.clone()).collect::<Vec<_>>(),
                ])
            }
            "getMarks" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                let hits: Vec<_> = state
                    .grades
                    .iter()
                    .filter(|(o, w, _, _)| *o == org && *w == wallet)
                    .collect();
                json!([
                    hits.iter().map(|(_, _, s, _)| s.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|(_, _, _, m)| *m).collect::<Vec<_>>(),
                ])
            }
            "getScholarship" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                let amount = state
                    .scholarships
                    .get(&(org, wallet))
                    .copied()
                    .unwrap_or(0);
                json!(amount.to_string())
            }
            "getPoints" => {
                let org = arg_str(args, 0)?;
                let wallet = arg_addr(args, 1)?;
                json!(state.points.get(&(org, wallet)).copied().unwrap_or(0))
            }
            "getStaffList" => {
                let org = arg_str(args, 0)?;
                let hits: Vec<&StaffEntry> =
                    state.staff.iter().filter(|s| s.org == org).collect();
                json!([
                    hits.iter().map(|s| s.wallet.to_string()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.role.clone()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.salary.to_string()).collect::<Vec<_>>(),
                    hits.iter().map(|s| s.active).collect::<Vec<_>>(),
                ])
            }
            "getAllReports" | "getStudentReports" => {
                let org = arg_str(args, 0)?;
                let student = if method == "getStudentReports" {
                    Some(arg_addr(args, 1)?)
                } else {
                    None
                };
                let hits: Vec<&ReportEntry> = state
                    .reports
                    .iter()
                    .filter(|r| r.org == org && student.map_or(true, |s| r.student == s))
                    .collect();
                Value::Array(
                    hits.iter()
                        .map(|r| {
                            json!([
                                r.student.to_string(),
                                r.cid,
                                r.timestamp,
                                r.points,
                                r.summary_hash,
                            ])
                        })
                        .collect(),
                )
            }
            other => {
                return Err(LedgerError::Rejected(format!("unknown method {other}")));
            }
        };
        Ok(result)
    }

    fn sequence_number(&self, account: &Address) -> Result<u64, LedgerError> {
        let state = self.lock();
        Self::check_reachable(&state)?;
        Ok(state.sequences.get(account).copied().unwrap_or(0))
    }

    fn submit(&self, tx: &SignedTransaction) -> Result<TxId, LedgerError> {
        let mut state = self.lock();
        Self::check_reachable(&state)?;

        Self::verify(tx)?;

        let expected = state
            .sequences
            .get(&tx.payload.from)
            .copied()
            .unwrap_or(0);
        if tx.payload.sequence != expected {
            return Err(LedgerError::Rejected(format!(
                "sequence collision: expected {expected}, got {}",
                tx.payload.sequence
            )));
        }

        Self::execute(&mut state, tx)?;

        state.sequences.insert(tx.payload.from, expected + 1);
        state.last_submitted = Some(tx.clone());
        Ok(TxId(tx.hash.clone()))
    }
}

fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn arg_str(args: &[Value], index: usize) -> Result<String, LedgerError> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| LedgerError::Rejected(format!("argument {index}: expected string")))
}

fn arg_u64(args: &[Value], index: usize) -> Result<u64, LedgerError> {
    args.get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| LedgerError::Rejected(format!("argument {index}: expected integer")))
}

fn arg_addr(args: &[Value], index: usize) -> Result<Address, LedgerError> {
    let raw = arg_str(args, index)?;
    Address::parse(&raw)
        .map_err(|e| LedgerError::Rejected(format!("argument {index}: {e}")))
}

fn arg_amount(args: &[Value], index: usize) -> Result<u128, LedgerError> {
    let raw = arg_str(args, index)?;
    raw.parse::<u128>()
        .map_err(|_| LedgerError::Rejected(format!("argument {index}: expected amount")))
}
