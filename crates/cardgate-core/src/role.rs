// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Portal roles.

use serde::{Deserialize, Serialize};

/// A role tag carried in a session.
///
/// The set of roles is open-ended, so this is a newtype over the tag rather
/// than a closed enum. Tags are normalised to upper case on construction,
/// which makes `"scout"` and `"SCOUT"` the same role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Platform administrator.
    pub const SUPER_ADMIN: &'static str = "SUPER_ADMIN";
    /// Portal administrator.
    pub const ADMIN: &'static str = "ADMIN";
    /// Council-level administrator.
    pub const COUNCIL_ADMIN: &'static str = "COUNCIL_ADMIN";
    /// Troop leader.
    pub const TROOP_LEADER: &'static str = "TROOP_LEADER";
    /// Scout selling cards.
    pub const SCOUT: &'static str = "SCOUT";
    /// Parent of a scout.
    pub const PARENT: &'static str = "PARENT";

    /// Creates a role from a tag.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_uppercase())
    }

    /// Returns the normalised tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this role has the given tag (case-insensitive).
    pub fn is(&self, tag: &str) -> bool {
        self.0.eq_ignore_ascii_case(tag.trim())
    }

    /// Returns a human-readable name, e.g. `COUNCIL_ADMIN` becomes `Council Admin`.
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<String> for Role {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl From<&str> for Role {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_normalisation() {
        assert_eq!(Role::new("scout"), Role::new("SCOUT"));
        assert_eq!(Role::new("  Parent ").as_str(), "PARENT");
        assert!(Role::new("council_admin").is(Role::COUNCIL_ADMIN));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Role::new("COUNCIL_ADMIN").display_name(), "Council Admin");
        assert_eq!(Role::new("SCOUT").display_name(), "Scout");
        assert_eq!(Role::new("super__admin").display_name(), "Super Admin");
    }

    #[test]
    fn test_serde_normalises() {
        let role: Role = serde_json::from_str("\"troop_leader\"").unwrap();
        assert_eq!(role.as_str(), Role::TROOP_LEADER);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"TROOP_LEADER\"");
    }
}
