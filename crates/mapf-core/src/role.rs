//! Agent roles and right-of-way priority.

use std::fmt;

/// The right-of-way class of an agent, fixed at simulation start.
///
/// Priority is derived from the role (`Leader > Follower > Normal`); exact
/// ties between two agents of the same role are broken by the lower
/// `AgentId` (stable insertion order).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Leader,
    Follower,
    #[default]
    Normal,
}

impl Role {
    /// Numeric arbitration priority.  Higher wins a contested cell.
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            Role::Leader   => 3,
            Role::Follower => 2,
            Role::Normal   => 1,
        }
    }

    /// Whether an agent of this role signals willingness to yield in its
    /// intents.  Leaders never volunteer to wait; everyone else does.
    #[inline]
    pub fn yield_willing(self) -> bool {
        !matches!(self, Role::Leader)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Leader   => "leader",
            Role::Follower => "follower",
            Role::Normal   => "normal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
