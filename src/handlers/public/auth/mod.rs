// handlers/public/auth/mod.rs - Account and token acquisition endpoints

pub mod login;
pub mod refresh;
pub mod signup;

pub use login::login_post;
pub use refresh::refresh_post;
pub use signup::signup_post;

use serde::Deserialize;

use crate::error::ApiError;

/// Body shared by signup and login
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields present and non-empty
    pub fn required(self) -> Result<(String, String), ApiError> {
        match (self.email, self.password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Ok((email.trim().to_string(), password))
            }
            _ => Err(ApiError::bad_request("Email and password are required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_fields() {
        let missing = Credentials {
            email: Some("a@b.co".into()),
            password: None,
        };
        assert_eq!(missing.required().unwrap_err().message(), "Email and password are required");

        let ok = Credentials {
            email: Some("  a@b.co ".into()),
            password: Some("pw".into()),
        };
        assert_eq!(ok.required().unwrap(), ("a@b.co".to_string(), "pw".to_string()));
    }
}
