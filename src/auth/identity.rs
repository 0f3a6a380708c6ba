// src/auth/identity.rs
use std::collections::HashMap;

use crate::errors::ServerError;

/// Header carrying the caller's identity.
pub const USER_HEADER: &str = "X-User-ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Contributor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners and admins may mutate a record.
    pub fn can_modify(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }

    pub fn require_owner_or_admin(&self, owner_id: &str) -> Result<(), ServerError> {
        if self.can_modify(owner_id) {
            Ok(())
        } else {
            Err(ServerError::Forbidden("Unauthorized".into()))
        }
    }

    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServerError::Forbidden("Admin access required".into()))
        }
    }
}

/// Resolves the identity header (if any) to a principal.
pub trait Authenticator: Send + Sync {
    fn resolve(&self, user_id: Option<&str>) -> Principal;
}

/// Fixed role table. Missing or unknown ids resolve to the fallback user.
pub struct RoleTable {
    users: HashMap<String, Role>,
    fallback: String,
}

impl RoleTable {
    pub fn new(fallback: &str) -> Self {
        Self {
            users: HashMap::new(),
            fallback: fallback.to_string(),
        }
    }

    pub fn with_user(mut self, id: &str, role: Role) -> Self {
        self.users.insert(id.to_string(), role);
        self
    }

    /// The three demo accounts the platform ships with.
    pub fn demo() -> Self {
        Self::new("netrunnerX")
            .with_user("netrunnerX", Role::Admin)
            .with_user("reliefAdmin", Role::Admin)
            .with_user("citizen1", Role::Contributor)
    }
}

impl Authenticator for RoleTable {
    fn resolve(&self, user_id: Option<&str>) -> Principal {
        let known = user_id
            .map(str::trim)
            .and_then(|id| self.users.get_key_value(id));

        match known {
            Some((id, role)) => Principal {
                id: id.clone(),
                role: *role,
            },
            None => Principal {
                id: self.fallback.clone(),
                role: self
                    .users
                    .get(&self.fallback)
                    .copied()
                    .unwrap_or(Role::Contributor),
            },
        }
    }
}
