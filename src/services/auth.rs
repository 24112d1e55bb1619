use crate::config::AdminCredentials;
use crate::error::AppError;

/// Exact match against the configured pair. With no pair configured every
/// attempt fails.
pub fn verify_admin(admin: &AdminCredentials, email: &str, password: &str) -> Result<(), AppError> {
    match (&admin.email, &admin.password) {
        (Some(expected_email), Some(expected_password))
            if expected_email == email && expected_password == password =>
        {
            Ok(())
        }
        _ => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials {
            email: Some("admin@example.com".to_string()),
            password: Some("s3cret".to_string()),
        }
    }

    #[test]
    fn accepts_exact_pair() {
        assert!(verify_admin(&admin(), "admin@example.com", "s3cret").is_ok());
    }

    #[test]
    fn rejects_near_misses() {
        assert!(matches!(
            verify_admin(&admin(), "Admin@example.com", "s3cret"),
            Err(AppError::Unauthorized)
        ));
        assert!(verify_admin(&admin(), "admin@example.com", "s3cret ").is_err());
        assert!(verify_admin(&admin(), "", "").is_err());
    }

    #[test]
    fn unconfigured_admin_rejects_everything() {
        assert!(verify_admin(&AdminCredentials::default(), "", "").is_err());
    }
}
