use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Role names as stored in the `roles` table.
pub const ADMIN_ROLE_NAME: &str = "admin";
pub const USER_ROLE_NAME: &str = "user";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => USER_ROLE_NAME,
            Role::Admin => ADMIN_ROLE_NAME,
        }
    }

    /// Claim roles granted to a user whose `roles.name` is `role_name`.
    /// Admins also hold the user role; anything unknown is a plain user.
    pub fn grants_for(role_name: Option<&str>) -> Vec<Role> {
        match role_name {
            Some(name) if name.eq_ignore_ascii_case(ADMIN_ROLE_NAME) => {
                vec![Role::Admin, Role::User]
            }
            _ => vec![Role::User],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
    pub roles: Vec<Role>,
}

impl Claims {
    pub fn user_id(&self) -> Result<i32, AppError> {
        self.sub
            .parse::<i32>()
            .map_err(|_| AppError::unauthorized("Invalid token subject"))
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Debug, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
}
