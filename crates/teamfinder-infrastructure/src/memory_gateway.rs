//! In-process gateway.
//!
//! Behaves like the hosted backend as far as this application can observe:
//! auth accounts with a current session, the three tables with their
//! primary/unique/foreign keys, owner-only writes, embedded joins and
//! ordering. Used for the demo backend and throughout the test suites.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use teamfinder_core::TeamfinderError;
use teamfinder_core::error::Result;
use teamfinder_core::gateway::{
    AuthGateway, AuthSession, DataGateway, Filter, Identity, JoinSpec, Record, Table,
};
use teamfinder_core::skill::Skill;
use uuid::Uuid;

use crate::demo;

const MIN_PASSWORD_LEN: usize = 6;
const SESSION_TTL_SECS: i64 = 3600;

/// Gateway operations, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOp {
    SignUp,
    SignIn,
    SignOut,
    CurrentUser,
    SelectAll,
    SelectOne,
    SelectJoined,
    Insert,
    Update,
    Delete,
}

/// `child.column` references `parent.id`.
struct Relation {
    child: Table,
    column: &'static str,
    parent: Table,
}

const RELATIONS: &[Relation] = &[
    Relation {
        child: Table::UserSkills,
        column: "profile_id",
        parent: Table::Profiles,
    },
    Relation {
        child: Table::UserSkills,
        column: "skill_id",
        parent: Table::Skills,
    },
];

struct UniqueKey {
    name: &'static str,
    columns: &'static [&'static str],
}

fn unique_keys(table: Table) -> &'static [UniqueKey] {
    const PROFILES: &[UniqueKey] = &[
        UniqueKey {
            name: "profiles_pkey",
            columns: &["id"],
        },
        UniqueKey {
            name: "profiles_username_key",
            columns: &["username"],
        },
    ];
    const SKILLS: &[UniqueKey] = &[UniqueKey {
        name: "skills_pkey",
        columns: &["id"],
    }];
    const USER_SKILLS: &[UniqueKey] = &[UniqueKey {
        name: "user_skills_pkey",
        columns: &["profile_id", "skill_id"],
    }];

    match table {
        Table::Profiles => PROFILES,
        Table::Skills => SKILLS,
        Table::UserSkills => USER_SKILLS,
    }
}

fn required_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Profiles => &["id", "username"],
        Table::Skills => &["id", "name", "category"],
        Table::UserSkills => &["profile_id", "skill_id"],
    }
}

/// Column holding the owning identity id; `None` for read-only tables.
fn owner_column(table: Table) -> Option<&'static str> {
    match table {
        Table::Profiles => Some("id"),
        Table::UserSkills => Some("profile_id"),
        Table::Skills => None,
    }
}

struct Account {
    identity: Identity,
    password: String,
}

struct InjectedFailure {
    op: GatewayOp,
    table: Option<Table>,
    message: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Account>,
    current: Option<Identity>,
    tables: HashMap<Table, Vec<Record>>,
    failures: Vec<InjectedFailure>,
    calls: usize,
}

impl MemoryState {
    fn rows(&self, table: Table) -> &[Record] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn rows_mut(&mut self, table: Table) -> &mut Vec<Record> {
        self.tables.entry(table).or_default()
    }

    fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|identity| identity.id.as_str())
    }

    /// True when the signed-in identity may write `row`.
    fn owns(&self, table: Table, row: &Record) -> bool {
        match (owner_column(table), self.current_id()) {
            (Some(column), Some(id)) => row.get(column).and_then(Value::as_str) == Some(id),
            _ => false,
        }
    }

    /// Not-null, unique and foreign-key checks for `row`. `skip` is the index
    /// of the row being replaced on update.
    fn check_constraints(&self, table: Table, row: &Record, skip: Option<usize>) -> Result<()> {
        if !row.is_object() {
            return Err(TeamfinderError::gateway_status(
                400,
                "Expected a JSON object",
            ));
        }

        for column in required_columns(table) {
            if row.get(*column).is_none_or(Value::is_null) {
                return Err(TeamfinderError::gateway_status(
                    400,
                    format!(
                        "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                        column, table
                    ),
                ));
            }
        }

        for key in unique_keys(table) {
            let values: Vec<&Value> = key
                .columns
                .iter()
                .filter_map(|column| row.get(*column))
                .collect();
            if values.len() != key.columns.len() {
                continue;
            }
            let clash = self.rows(table).iter().enumerate().any(|(index, other)| {
                Some(index) != skip
                    && key
                        .columns
                        .iter()
                        .zip(&values)
                        .all(|(column, value)| other.get(*column) == Some(*value))
            });
            if clash {
                return Err(TeamfinderError::gateway_status(
                    409,
                    format!(
                        "duplicate key value violates unique constraint \"{}\"",
                        key.name
                    ),
                ));
            }
        }

        for relation in RELATIONS.iter().filter(|r| r.child == table) {
            let key = row.get(relation.column);
            let exists = self
                .rows(relation.parent)
                .iter()
                .any(|parent| parent.get("id") == key);
            if !exists {
                return Err(TeamfinderError::gateway_status(
                    409,
                    format!(
                        "insert or update on table \"{}\" violates foreign key constraint \"{}_{}_fkey\"",
                        table, table, relation.column
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Shapes `row` of `table` according to `join`, resolving embeds.
    fn project(&self, table: Table, row: &Record, join: &JoinSpec) -> Result<Record> {
        let mut out = Map::new();
        if join.selects_all() {
            if let Some(object) = row.as_object() {
                out = object.clone();
            }
        } else {
            for column in &join.columns {
                out.insert(
                    column.clone(),
                    row.get(column).cloned().unwrap_or(Value::Null),
                );
            }
        }

        for (relation, spec) in &join.embeds {
            let target: Table = relation
                .parse()
                .map_err(|_| no_relationship(table, relation))?;

            let value = if let Some(link) = RELATIONS
                .iter()
                .find(|r| r.parent == table && r.child == target)
            {
                let id = row.get("id");
                let children = self
                    .rows(target)
                    .iter()
                    .filter(|child| id.is_some() && child.get(link.column) == id)
                    .map(|child| self.project(target, child, spec))
                    .collect::<Result<Vec<_>>>()?;
                Value::Array(children)
            } else if let Some(link) = RELATIONS
                .iter()
                .find(|r| r.child == table && r.parent == target)
            {
                let parent = row.get(link.column).and_then(|key| {
                    self.rows(target)
                        .iter()
                        .find(|parent| parent.get("id") == Some(key))
                });
                match parent {
                    Some(parent) => self.project(target, parent, spec)?,
                    None => Value::Null,
                }
            } else {
                return Err(no_relationship(table, relation));
            };
            out.insert(relation.clone(), value);
        }
        Ok(Value::Object(out))
    }
}

fn no_relationship(table: Table, relation: &str) -> TeamfinderError {
    TeamfinderError::gateway_status(
        400,
        format!(
            "Could not find a relationship between '{}' and '{}' in the schema cache",
            table, relation
        ),
    )
}

fn rls_violation(table: Table) -> TeamfinderError {
    TeamfinderError::gateway_status(
        403,
        format!(
            "new row violates row-level security policy for table \"{}\"",
            table
        ),
    )
}

/// Orders by the column's text; missing and null values sort last.
fn compare_column(a: &Record, b: &Record, column: &str) -> Ordering {
    let key = |row: &Record| match row.get(column) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(other) => Some(other.to_string()),
    };
    match (key(a), key(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Gateway over in-memory tables.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway seeded with the demo skill catalog and a few profiles.
    pub fn with_demo_data() -> Self {
        let gateway = Self::new();
        gateway.seed_skills(&demo::skills());
        gateway.seed_rows(Table::Profiles, demo::profiles());
        gateway.seed_rows(Table::UserSkills, demo::user_skills());
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the call and fires a matching injected failure, if any.
    fn begin(&self, op: GatewayOp, table: Option<Table>) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls += 1;
        let injected = state
            .failures
            .iter()
            .position(|f| f.op == op && (f.table.is_none() || f.table == table));
        if let Some(index) = injected {
            let failure = state.failures.remove(index);
            tracing::debug!(?op, message = %failure.message, "Injected gateway failure");
            return Err(TeamfinderError::gateway_status(500, failure.message));
        }
        Ok(state)
    }

    /// Makes the next `op` (on `table`, or on any table) fail with `message`.
    pub fn fail_next(&self, op: GatewayOp, table: Option<Table>, message: impl Into<String>) {
        self.lock().failures.push(InjectedFailure {
            op,
            table,
            message: message.into(),
        });
    }

    /// Number of gateway operations served so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    /// Replaces the skill catalog.
    pub fn seed_skills(&self, skills: &[Skill]) {
        let rows = skills
            .iter()
            .filter_map(|skill| serde_json::to_value(skill).ok())
            .collect();
        self.lock().tables.insert(Table::Skills, rows);
    }

    /// Appends rows without constraint or owner checks.
    pub fn seed_rows(&self, table: Table, rows: Vec<Record>) {
        self.lock().rows_mut(table).extend(rows);
    }

    /// Creates an account without signing in.
    pub fn register(&self, email: &str, password: &str) -> Result<Identity> {
        let mut state = self.lock();
        Self::create_account(&mut state, email, password)
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: Table) -> Vec<Record> {
        self.lock().rows(table).to_vec()
    }

    fn create_account(state: &mut MemoryState, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_ascii_lowercase();
        if !valid_email(&email) {
            return Err(TeamfinderError::gateway_status(
                400,
                "Unable to validate email address: invalid format",
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(TeamfinderError::gateway_status(
                422,
                "Password should be at least 6 characters.",
            ));
        }
        if state
            .accounts
            .iter()
            .any(|account| account.identity.email.as_deref() == Some(email.as_str()))
        {
            return Err(TeamfinderError::gateway_status(422, "User already registered"));
        }

        let identity = Identity::new(Uuid::new_v4().to_string(), Some(email));
        state.accounts.push(Account {
            identity: identity.clone(),
            password: password.to_string(),
        });
        Ok(identity)
    }

    fn issue_session(identity: Identity) -> AuthSession {
        AuthSession {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Some(Uuid::new_v4().to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(SESSION_TTL_SECS)),
            user: identity,
        }
    }
}

#[async_trait]
impl AuthGateway for MemoryGateway {
    /// Accounts are confirmed immediately, so sign-up also signs in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let mut state = self.begin(GatewayOp::SignUp, None)?;
        let identity = Self::create_account(&mut state, email, password)?;
        state.current = Some(identity.clone());
        tracing::info!(user_id = %identity.id, "Signed up");
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        let mut state = self.begin(GatewayOp::SignIn, None)?;
        let email = email.trim().to_ascii_lowercase();
        let identity = state
            .accounts
            .iter()
            .find(|account| {
                account.identity.email.as_deref() == Some(email.as_str())
                    && account.password == password
            })
            .map(|account| account.identity.clone())
            .ok_or_else(|| TeamfinderError::gateway_status(400, "Invalid login credentials"))?;

        state.current = Some(identity.clone());
        tracing::info!(user_id = %identity.id, "Signed in");
        Ok(Self::issue_session(identity))
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.begin(GatewayOp::SignOut, None)?;
        if let Some(identity) = state.current.take() {
            tracing::info!(user_id = %identity.id, "Signed out");
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Identity>> {
        let state = self.begin(GatewayOp::CurrentUser, None)?;
        Ok(state.current.clone())
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn select_all(&self, table: Table, order_by: Option<&str>) -> Result<Vec<Record>> {
        let state = self.begin(GatewayOp::SelectAll, Some(table))?;
        let mut rows = state.rows(table).to_vec();
        if let Some(column) = order_by {
            rows.sort_by(|a, b| compare_column(a, b, column));
        }
        Ok(rows)
    }

    async fn select_one_by_id(&self, table: Table, id: &str) -> Result<Record> {
        let state = self.begin(GatewayOp::SelectOne, Some(table))?;
        state
            .rows(table)
            .iter()
            .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            .cloned()
            .ok_or_else(|| TeamfinderError::not_found(table.name(), id))
    }

    async fn select_joined(
        &self,
        table: Table,
        join: &JoinSpec,
        filters: &[Filter],
    ) -> Result<Vec<Record>> {
        let state = self.begin(GatewayOp::SelectJoined, Some(table))?;
        state
            .rows(table)
            .iter()
            .filter(|row| filters.iter().all(|filter| filter.matches(row)))
            .map(|row| state.project(table, row, join))
            .collect()
    }

    async fn insert(&self, table: Table, record: Record) -> Result<()> {
        let mut state = self.begin(GatewayOp::Insert, Some(table))?;
        if !state.owns(table, &record) {
            return Err(rls_violation(table));
        }
        state.check_constraints(table, &record, None)?;
        state.rows_mut(table).push(record);
        tracing::debug!(table = %table, "Inserted row");
        Ok(())
    }

    /// Updating a row that does not exist (or is not owned) changes nothing.
    async fn update(&self, table: Table, id: &str, partial: Record) -> Result<()> {
        let mut state = self.begin(GatewayOp::Update, Some(table))?;
        let Some(changes) = partial.as_object() else {
            return Err(TeamfinderError::gateway_status(400, "Expected a JSON object"));
        };

        let target = state
            .rows(table)
            .iter()
            .position(|row| row.get("id").and_then(Value::as_str) == Some(id));
        let Some(index) = target else {
            return Ok(());
        };
        if !state.owns(table, &state.rows(table)[index]) {
            return Ok(());
        }

        let mut updated = state.rows(table)[index].clone();
        if let Some(object) = updated.as_object_mut() {
            for (column, value) in changes {
                object.insert(column.clone(), value.clone());
            }
        }
        state.check_constraints(table, &updated, Some(index))?;
        state.rows_mut(table)[index] = updated;
        tracing::debug!(table = %table, id, "Updated row");
        Ok(())
    }

    async fn delete_by_keys(&self, table: Table, keys: &[Filter]) -> Result<()> {
        let mut state = self.begin(GatewayOp::Delete, Some(table))?;
        if keys.is_empty() {
            return Err(TeamfinderError::validation(
                "Refusing to delete without key filters",
            ));
        }

        let doomed: Vec<bool> = state
            .rows(table)
            .iter()
            .map(|row| keys.iter().all(|key| key.matches(row)) && state.owns(table, row))
            .collect();
        let mut flags = doomed.into_iter();
        let rows = state.rows_mut(table);
        let before = rows.len();
        rows.retain(|_| !flags.next().unwrap_or(false));
        tracing::debug!(table = %table, removed = before - rows.len(), "Deleted rows");
        Ok(())
    }
}
