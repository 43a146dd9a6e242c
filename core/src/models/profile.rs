// core/src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role string whose presence grants admin capability.
pub const ADMIN_ROLE: &str = "admin";

/// Authentication identity. Its `created_at` is the member-since date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub id: Uuid,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub user_id: Uuid,
  pub full_name: Option<String>,
  pub email: Option<String>,
  pub company: Option<String>,
  pub role: Option<String>,
  pub bio: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Profile {
  pub fn blank(user_id: Uuid, email: &str, created_at: DateTime<Utc>) -> Self {
    Self {
      user_id,
      full_name: None,
      email: Some(email.to_string()),
      company: None,
      role: None,
      bio: None,
      created_at,
    }
  }

  pub fn apply(&mut self, update: ProfileUpdate) {
    self.full_name = update.full_name;
    self.company = update.company;
    self.role = update.role;
    self.bio = update.bio;
  }
}

/// Fields a user may edit on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub full_name: Option<String>,
  pub company: Option<String>,
  pub role: Option<String>,
  pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRole {
  pub user_id: Uuid,
  pub role: String,
}

/// Admin listing row: a profile with its role rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
  pub profile: Profile,
  pub roles: Vec<String>,
}

impl AdminUser {
  pub fn is_admin(&self) -> bool {
    self.roles.iter().any(|role| role == ADMIN_ROLE)
  }

  pub fn display_name(&self) -> &str {
    self
      .profile
      .full_name
      .as_deref()
      .filter(|name| !name.is_empty())
      .or(self.profile.email.as_deref())
      .unwrap_or_default()
  }
}
