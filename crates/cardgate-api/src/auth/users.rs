// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Users accepted by the credentials sign-in endpoint.

use cardgate_core::{Claims, Role};

/// A user that may sign in.
#[derive(Clone)]
pub struct PortalUser {
    /// User ID, used as the token subject.
    pub id: String,
    /// Sign-in email.
    pub email: String,
    /// Sign-in password.
    pub password: String,
    /// Role.
    pub role: Role,
    /// Display name.
    pub name: Option<String>,
    /// Council the user belongs to.
    pub council_id: Option<String>,
}

impl PortalUser {
    /// Creates a user.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<Role>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
            name: None,
            council_id: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the council.
    pub fn with_council(mut self, council_id: impl Into<String>) -> Self {
        self.council_id = Some(council_id.into());
        self
    }

    /// Builds session claims for this user.
    pub fn claims(&self, expires_in_secs: i64) -> Claims {
        let mut builder = Claims::builder(&self.id)
            .role(self.role.clone())
            .email(&self.email)
            .expires_in(expires_in_secs);
        if let Some(ref name) = self.name {
            builder = builder.name(name);
        }
        if let Some(ref council_id) = self.council_id {
            builder = builder.council_id(council_id);
        }
        builder.build()
    }
}

impl std::fmt::Debug for PortalUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// In-memory user list.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<PortalUser>,
}

impl UserDirectory {
    /// Creates a directory.
    pub fn new(users: Vec<PortalUser>) -> Self {
        Self { users }
    }

    /// Returns the number of users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Checks an email and password pair.
    ///
    /// Emails match case-insensitively. Both comparisons always run so a
    /// wrong password and an unknown email take the same path.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&PortalUser> {
        let email = email.trim();
        self.users.iter().find(|user| {
            let email_ok = user.email.eq_ignore_ascii_case(email);
            let password_ok = constant_time_eq(user.password.as_bytes(), password.as_bytes());
            email_ok & password_ok
        })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
