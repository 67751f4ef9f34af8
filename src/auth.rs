// 🔐 Accounts - registration, login, admin approval workflow
//
// Credentials are looked up in the locally stored user list. This keeps
// honest users apart on a shared machine; it is not a security boundary.

use crate::config::AdminConfig;
use crate::store::{new_timestamp_id, Event, Store, CURRENT_USER_KEY, USERS_KEY};
use crate::validation::{is_valid_email, FormErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_ADMIN_ID: &str = "admin-default";
pub const SYSTEM_ACTOR: &str = "system";
pub const MIN_PASSWORD_LEN: usize = 6;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirm_password";

// ============================================================================
// USER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::User => "user",
        }
    }
}

/// Account lifecycle. Only approved accounts can use the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub status: AccountStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Id of the admin who took the last decision, or `system`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    /// SHA-256 of the password chosen at registration
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_digest: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_approved(&self) -> bool {
        self.status == AccountStatus::Approved
    }
}

fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// FORMS & ERRORS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub name: String,
    pub confirm_password: String,
}

impl RegisterData {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.add(FIELD_NAME, "Name is required");
        }

        if self.email.trim().is_empty() {
            errors.add(FIELD_EMAIL, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add(FIELD_EMAIL, "Invalid email format");
        }

        if self.password.is_empty() {
            errors.add(FIELD_PASSWORD, "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                FIELD_PASSWORD,
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }

        if self.password != self.confirm_password {
            errors.add(FIELD_CONFIRM_PASSWORD, "Passwords do not match");
        }

        errors.into_result()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fix the highlighted fields")]
    Validation(FormErrors),

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Your account is awaiting approval by the administrator")]
    PendingApproval,

    #[error("Your account was rejected by the administrator")]
    Rejected,

    #[error("This email is already in use")]
    EmailTaken,
}

// ============================================================================
// AUTH SERVICE
// ============================================================================

pub struct AuthService<'a> {
    store: &'a Store,
    admin: AdminConfig,
    session: Option<User>,
}

impl<'a> AuthService<'a> {
    /// Provision the default admin when needed and restore the saved session.
    pub fn new(store: &'a Store, admin: &AdminConfig) -> Self {
        let mut service = Self {
            store,
            admin: admin.clone(),
            session: None,
        };

        service.ensure_default_admin();
        service.session = store.load_or_default::<Option<User>>(CURRENT_USER_KEY);
        service
    }

    fn users(&self) -> Vec<User> {
        self.store.load_or_default(USERS_KEY)
    }

    fn save_users(&self, users: &[User]) {
        self.store.save_or_log(USERS_KEY, &users);
    }

    /// Create the default admin unless some admin already exists.
    fn ensure_default_admin(&self) {
        let mut users = self.users();
        if users.iter().any(User::is_admin) {
            return;
        }

        let now = Utc::now();
        users.push(User {
            id: DEFAULT_ADMIN_ID.to_string(),
            email: self.admin.email.clone(),
            name: self.admin.name.clone(),
            role: Role::Admin,
            created_at: now,
            status: AccountStatus::Approved,
            approved_at: Some(now),
            approved_by: Some(SYSTEM_ACTOR.to_string()),
            password_digest: password_digest(&self.admin.password),
        });
        self.save_users(&users);

        info!(email = %self.admin.email, "default admin provisioned");
    }

    pub fn all_users(&self) -> Vec<User> {
        self.users()
    }

    pub fn pending_users(&self) -> Vec<User> {
        self.users()
            .into_iter()
            .filter(|u| u.status == AccountStatus::Pending)
            .collect()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(User::is_admin)
    }

    /// Only approved accounts may register athletes
    pub fn can_register_swimmers(&self) -> bool {
        self.session.as_ref().is_some_and(User::is_approved)
    }

    /// Create a pending coach account. The new user is not logged in.
    pub fn register(&mut self, data: RegisterData) -> Result<User, AuthError> {
        data.validate().map_err(AuthError::Validation)?;

        let mut users = self.users();
        if users.iter().any(|u| u.email == data.email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: new_timestamp_id(),
            email: data.email,
            name: data.name,
            role: Role::Coach,
            created_at: Utc::now(),
            status: AccountStatus::Pending,
            approved_at: None,
            approved_by: None,
            password_digest: password_digest(&data.password),
        };

        users.push(user.clone());
        self.save_users(&users);
        self.store.record(Event::new(
            "user_registered",
            "user",
            &user.id,
            serde_json::json!({ "email": user.email }),
            &user.id,
        ));
        info!(id = %user.id, "account created, awaiting approval");

        Ok(user)
    }

    pub fn login(&mut self, credentials: LoginCredentials) -> Result<User, AuthError> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let user = self
            .users()
            .into_iter()
            .find(|u| u.email == credentials.email)
            .ok_or(AuthError::InvalidCredentials)?;

        let password_ok = if user.is_admin() {
            credentials.password == self.admin.password
        } else {
            user.password_digest == password_digest(&credentials.password)
        };
        if !password_ok {
            warn!(email = %credentials.email, "failed login");
            return Err(AuthError::InvalidCredentials);
        }

        match user.status {
            AccountStatus::Pending => return Err(AuthError::PendingApproval),
            AccountStatus::Rejected => return Err(AuthError::Rejected),
            AccountStatus::Approved => {}
        }

        self.store.save_or_log(CURRENT_USER_KEY, &user);
        self.session = Some(user.clone());
        info!(id = %user.id, role = user.role.as_str(), "logged in");

        Ok(user)
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.store.remove_or_log(CURRENT_USER_KEY);
    }

    /// Reload the session user from the user list, picking up decisions
    /// taken since the session was saved.
    pub fn refresh_session(&mut self) {
        let Some(current) = &self.session else {
            return;
        };

        if let Some(fresh) = self.users().into_iter().find(|u| u.id == current.id) {
            if &fresh != current {
                self.store.save_or_log(CURRENT_USER_KEY, &fresh);
            }
            self.session = Some(fresh);
        }
    }

    pub fn approve_user(&mut self, user_id: &str) -> bool {
        self.decide(user_id, AccountStatus::Approved)
    }

    pub fn reject_user(&mut self, user_id: &str) -> bool {
        self.decide(user_id, AccountStatus::Rejected)
    }

    /// Status transition by the logged-in admin. False when the caller is
    /// not an admin or the user does not exist.
    fn decide(&mut self, user_id: &str, status: AccountStatus) -> bool {
        let admin_id = match &self.session {
            Some(user) if user.is_admin() => user.id.clone(),
            _ => return false,
        };

        let mut users = self.users();
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };

        user.status = status;
        user.approved_at = Some(Utc::now());
        user.approved_by = Some(admin_id.clone());
        self.save_users(&users);

        let event_type = match status {
            AccountStatus::Approved => "user_approved",
            AccountStatus::Rejected => "user_rejected",
            AccountStatus::Pending => "user_reset",
        };
        self.store.record(Event::new(
            event_type,
            "user",
            user_id,
            serde_json::json!({ "status": status.as_str() }),
            &admin_id,
        ));
        info!(user_id, status = status.as_str(), "account decision recorded");

        true
    }
}
