#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::SessionStore;
use crate::domain::models::User;
use crate::domain::models::UserRole;

/// Demo accounts accepted by the portal sign-in.
const DEMO_ACCOUNTS: [(&str, &str, UserRole); 7] = [
    ("patient1@email.com", "password123", UserRole::Patient),
    ("patient2@email.com", "patient2024", UserRole::Patient),
    ("hospital1@med.com", "hospital2024", UserRole::Hospital),
    ("hospital2@med.com", "staffaccess", UserRole::Hospital),
    ("pharmacy1@med.com", "pharmacy2024", UserRole::Pharmacy),
    ("pharmacy2@med.com", "rxaccess", UserRole::Pharmacy),
    ("admin@mediconnect.com", "admin2024", UserRole::Admin),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter your email address.")]
    EmailRequired,
    #[error("Please enter your password.")]
    PasswordRequired,
    #[error("Please select the hospital you're associated with.")]
    HospitalRequired,
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub zip_code: Option<String>,
    pub hospital_name: Option<String>,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() {
            return Err(LoginError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(LoginError::PasswordRequired);
        }
        if self.role == UserRole::Pharmacy
            && self
                .hospital_name
                .as_deref()
                .map(|name| return name.trim().is_empty())
                .unwrap_or(true)
        {
            return Err(LoginError::HospitalRequired);
        }

        let email = self.email.trim().to_lowercase();
        let matched = DEMO_ACCOUNTS.iter().any(|(account_email, password, role)| {
            return *account_email == email && *password == self.password && *role == self.role;
        });
        if !matched {
            return Err(LoginError::InvalidCredentials);
        }

        return Ok(());
    }
}

/// Signed-in state of the portal. Created once at start-up from whatever the
/// store remembers, and torn down by `logout`.
pub struct AuthSession<S: SessionStore> {
    store: S,
    user: Option<User>,
}

impl<S: SessionStore> AuthSession<S> {
    pub async fn init(store: S) -> Result<AuthSession<S>> {
        let user = store.load().await?;
        tracing::debug!(
            logged_in = user.is_some(),
            role = ?user.as_ref().map(|user| return user.role),
            "auth session rehydrated"
        );

        return Ok(AuthSession { store, user });
    }

    pub fn user(&self) -> Option<&User> {
        return self.user.as_ref();
    }

    pub fn is_logged_in(&self) -> bool {
        return self.user.is_some();
    }

    pub async fn login(&mut self, req: LoginRequest) -> Result<&User> {
        req.validate()?;

        let user = User {
            role: req.role,
            email: req.email.trim().to_lowercase(),
            zip_code: req.zip_code.filter(|zip| return !zip.trim().is_empty()),
            hospital_name: req.hospital_name.filter(|name| return !name.trim().is_empty()),
        };

        self.store.save(&user).await?;
        tracing::info!(email = user.email, role = %user.role, "user signed in");

        return Ok(self.user.insert(user));
    }

    pub async fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.user.take() {
            tracing::info!(email = user.email, "user signed out");
        }
        self.store.clear().await?;

        return Ok(());
    }
}
