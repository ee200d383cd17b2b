use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body of `POST /api/v1/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl Registration {
    pub fn login(&self) -> Login {
        Login {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPayload {
    pub rating: i32,
    pub title: String,
    pub comment: String,
}

/// Response envelope shared by register and login. Only the token is read.
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    data: Option<AuthData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthData {
    access_token: Option<String>,
}

impl AuthEnvelope {
    pub fn into_token(self) -> Result<String> {
        match self.data.and_then(|d| d.access_token) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::MissingToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registration_uses_camel_case_keys() {
        let reg = Registration {
            full_name: "Tester User".to_string(),
            email: "test10@example.com".to_string(),
            password: "Password123!".to_string(),
            role: "ADMIN".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&reg).unwrap(),
            json!({
                "fullName": "Tester User",
                "email": "test10@example.com",
                "password": "Password123!",
                "role": "ADMIN"
            })
        );
        assert_eq!(
            serde_json::to_value(reg.login()).unwrap(),
            json!({"email": "test10@example.com", "password": "Password123!"})
        );
    }

    #[test]
    fn token_is_read_from_nested_data() {
        let envelope: AuthEnvelope = serde_json::from_value(json!({
            "success": true,
            "message": "OK",
            "data": {
                "accessToken": "abc",
                "refreshToken": "def",
                "tokenType": "Bearer",
                "expiresIn": 900000
            }
        }))
        .unwrap();
        assert_eq!(envelope.into_token().unwrap(), "abc");
    }

    #[test]
    fn missing_or_empty_token_is_rejected() {
        let missing: AuthEnvelope = serde_json::from_value(json!({"data": {}})).unwrap();
        assert!(matches!(missing.into_token(), Err(Error::MissingToken)));

        let empty: AuthEnvelope =
            serde_json::from_value(json!({"data": {"accessToken": ""}})).unwrap();
        assert!(matches!(empty.into_token(), Err(Error::MissingToken)));

        let no_data: AuthEnvelope = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(matches!(no_data.into_token(), Err(Error::MissingToken)));
    }
}
