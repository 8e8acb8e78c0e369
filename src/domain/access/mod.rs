//! Access control over teams and tasks
//!
//! A [`MembershipOracle`] answers "is this user a member / the administrator
//! of this team", and the [`AuthorizationGate`] turns those answers into one
//! [`Decision`] per operation.

mod decision;
mod gate;
mod membership;

pub use decision::{Decision, Denial, DenialKind};
pub use gate::{AccessOperation, AuthorizationGate, MemberAddition, TaskScope, TeamScope};
pub use membership::{MembershipOracle, TeamMembershipOracle};

#[cfg(test)]
pub use membership::MockMembershipOracle;
