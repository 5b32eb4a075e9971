use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use validator::{Validate, ValidationError};

/// Credentials for `POST api/v1/authentication/sign-in`.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "sign_in_password", skip_on_field_errors = false))]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Successful sign-in.
///
/// `roles` is kept as raw JSON: backends have been seen returning a string
/// list, a list of `{name|role|authority}` objects, or a comma-separated
/// string. The session manager normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub id: i64,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub roles: serde_json::Value,
}

/// Account registration payload for `POST api/v1/authentication/sign-up`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "sign_up_password", skip_on_field_errors = false))]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[validate(length(
        min = 1,
        max = 60,
        message = "First name must be between 1 and 60 characters"
    ))]
    pub first_name: String,
    #[validate(length(
        min = 1,
        max = 60,
        message = "Last name must be between 1 and 60 characters"
    ))]
    pub last_name: String,
    #[validate(length(
        min = 9,
        max = 20,
        message = "Phone number must be between 9 and 20 characters"
    ))]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub roles: Vec<String>,
}

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 6;

// Runs at struct level so the secret never becomes a validator param.
fn password_length(password: &SecretString) -> Result<(), ValidationError> {
    if password.expose_secret().chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        let mut err = ValidationError::new("length");
        err.message = Some("Password must be at least 6 characters long".into());
        err.add_param("field".into(), &"password");
        Err(err)
    }
}

fn sign_in_password(req: &SignInRequest) -> Result<(), ValidationError> {
    password_length(&req.password)
}

fn sign_up_password(req: &SignUpRequest) -> Result<(), ValidationError> {
    password_length(&req.password)
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::schema::ValidationReport;

    fn sign_in(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.into(),
            password: SecretString::from(password.to_owned()),
        }
    }

    #[test]
    fn sign_in_accepts_valid_credentials() {
        assert!(sign_in("ana@x.com", "secret1").validate().is_ok());
    }

    #[test]
    fn sign_in_reports_each_bad_field() {
        let report = ValidationReport::from(sign_in("not-an-email", "123").validate().unwrap_err());
        assert_eq!(report.message_for("email"), Some("Invalid email address"));
        assert_eq!(
            report.message_for("password"),
            Some("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn sign_in_serializes_the_exposed_password() {
        let body = serde_json::to_value(sign_in("ana@x.com", "secret1")).unwrap();
        assert_eq!(body["password"], "secret1");
    }

    #[test]
    fn sign_up_checks_phone_and_names() {
        let req = SignUpRequest {
            email: "ana@x.com".into(),
            password: SecretString::from("secret1".to_owned()),
            first_name: String::new(),
            last_name: "Lopez".into(),
            phone: "123".into(),
            roles: None,
        };
        let report = ValidationReport::from(req.validate().unwrap_err());
        let paths: Vec<&str> = report.issues().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["firstName", "phone"]);
    }

    #[test]
    fn sign_up_reports_short_password_alongside_field_errors() {
        let req = SignUpRequest {
            email: "ana@x.com".into(),
            password: SecretString::from("12345".to_owned()),
            first_name: "Ana".into(),
            last_name: "Lopez".into(),
            phone: "123".into(),
            roles: None,
        };
        let report = ValidationReport::from(req.validate().unwrap_err());
        assert_eq!(
            report.message_for("password"),
            Some("Password must be at least 6 characters long")
        );
        assert!(report.message_for("phone").is_some());
        assert!(!report.to_string().contains("12345"));
    }
}
