use thiserror::Error;

use crate::api::StorefrontApi;
use crate::dto::auth::{LoginRequest, RegisterRequest};
use crate::error::ApiError;
use crate::models::UserProfile;
use crate::session::SessionStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please enter email and password")]
    MissingCredentials,

    #[error("All fields are required")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Exchange credentials for a session. The email is trimmed and lowercased
/// before it goes out; the resulting session lands in the store with the
/// requested lifetime.
pub async fn login(
    api: &dyn StorefrontApi,
    session: &SessionStore,
    email: &str,
    password: &str,
    remember_me: bool,
) -> Result<UserProfile, AuthError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    let response = api
        .login(LoginRequest {
            email,
            password: password.to_string(),
        })
        .await?;
    session.sign_in(response.access_token, response.user.clone(), remember_me);
    Ok(response.user)
}

/// Sign-up form. Validation mirrors the backend's fail-fast checks; the
/// backend remains authoritative for everything else.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}

pub async fn register(api: &dyn StorefrontApi, form: RegisterForm) -> Result<(), AuthError> {
    form.validate()?;
    api.register(RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        password: form.password,
        confirm_password: form.confirm_password,
    })
    .await?;
    Ok(())
}
