use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Branch,
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Portal::Admin => f.write_str("admin"),
            Portal::Branch => f.write_str("branch"),
        }
    }
}

impl FromStr for Portal {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Portal::Admin),
            "branch" | "user" => Ok(Portal::Branch),
            other => Err(format!("unknown portal: {other}")),
        }
    }
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(skip)]
    pub portal: Portal,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("portal", &self.portal)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Role {
    Admin,
    #[serde(rename_all = "camelCase")]
    BranchUser { branch_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn can_manage_branches(&self) -> bool {
        self.is_admin()
    }

    pub fn branch_scope(&self) -> Option<&str> {
        match &self.role {
            Role::Admin => None,
            Role::BranchUser { branch_id } => Some(branch_id),
        }
    }
}
