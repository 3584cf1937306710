use serde::{Deserialize, Serialize};

/// Identifier of a record within its own collection.
///
/// Ids are unique per collection only: a case and an officer may share the
/// same numeric id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Placeholder carried by records that have not been stored yet.
    pub const UNASSIGNED: RecordId = RecordId(0);

    /// Creates a record ID from a raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns true if this id was handed out by a store.
    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// The kinds of records managed by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Officer,
    Criminal,
    #[serde(rename = "FIR")]
    Fir,
    Case,
}

impl EntityKind {
    /// Returns the name used in audit entries and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Officer => "Officer",
            EntityKind::Criminal => "Criminal",
            EntityKind::Fir => "FIR",
            EntityKind::Case => "Case",
        }
    }

    /// Parses a kind name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        [
            EntityKind::User,
            EntityKind::Officer,
            EntityKind::Criminal,
            EntityKind::Fir,
            EntityKind::Case,
        ]
        .into_iter()
        .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The already-authenticated caller of a mutating operation.
///
/// Authentication happens at the service boundary; the core only records
/// who acted and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub username: String,
    pub user_id: RecordId,
    pub source_address: String,
}

impl Actor {
    pub fn new(
        username: impl Into<String>,
        user_id: RecordId,
        source_address: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            user_id,
            source_address: source_address.into(),
        }
    }

    /// Actor used for startup tasks that run without a request.
    pub fn system() -> Self {
        Self::new("system", RecordId::UNASSIGNED, "127.0.0.1")
    }
}
