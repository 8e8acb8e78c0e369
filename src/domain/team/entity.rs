//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_team_description, validate_team_id, validate_team_name, TeamValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;

/// Team identifier (UUID v4, text form)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    /// Parse a TeamId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, TeamValidationError> {
        let id = id.into();
        validate_team_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamId {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TeamId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team entity
///
/// Invariant: `admin` is always an element of `members`. Every constructor
/// and member mutation ends with [`Team::enforce_admin_membership`], and the
/// team repository calls it again before each write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    admin: UserId,
    #[serde(default)]
    members: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Serialized field holding the member list
pub const MEMBERS_FIELD: &str = "members";

impl Team {
    /// Create a new team administered (and joined) by `admin`
    pub fn new(name: impl AsRef<str>, admin: UserId) -> Result<Self, TeamValidationError> {
        let name = name.as_ref().trim().to_string();
        validate_team_name(&name)?;
        let now = Utc::now();

        let mut team = Self {
            id: TeamId::generate(),
            name,
            description: None,
            admin,
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        team.enforce_admin_membership();

        Ok(team)
    }

    /// Set description (builder pattern); blank descriptions are dropped
    pub fn with_description(
        mut self,
        description: Option<impl Into<String>>,
    ) -> Result<Self, TeamValidationError> {
        self.set_description(description.map(Into::into))?;
        Ok(self)
    }

    /// Seed additional members (builder pattern); duplicates are ignored
    pub fn with_members(mut self, members: impl IntoIterator<Item = UserId>) -> Self {
        for member in members {
            self.insert_member(member);
        }
        self.enforce_admin_membership();
        self
    }

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn admin(&self) -> &UserId {
        &self.admin
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    pub fn is_admin(&self, user: &UserId) -> bool {
        &self.admin == user
    }

    /// Add a member with set semantics. Returns false if already present.
    pub fn add_member(&mut self, user: UserId) -> bool {
        let added = self.insert_member(user);
        self.enforce_admin_membership();

        if added {
            self.touch();
        }

        added
    }

    /// Update the description
    pub fn set_description(
        &mut self,
        description: Option<String>,
    ) -> Result<(), TeamValidationError> {
        let description = description.filter(|d| !d.trim().is_empty());

        if let Some(ref d) = description {
            validate_team_description(d)?;
        }

        self.description = description;
        self.touch();
        Ok(())
    }

    /// Append the administrator to the member list if it is missing.
    ///
    /// Unconditional; returns true if the list had to be repaired.
    pub fn enforce_admin_membership(&mut self) -> bool {
        if self.members.contains(&self.admin) {
            return false;
        }

        self.members.push(self.admin.clone());
        true
    }

    fn insert_member(&mut self, user: UserId) -> bool {
        if self.members.contains(&user) {
            return false;
        }

        self.members.push(user);
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Team {
    type Key = TeamId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
