use validator::validate_email;

/// An email address that mail can be sent to and whose opens can be tracked.
///
/// The address doubles as the identifier stored in both `sent_emails` and
/// `opens`, so a value of this type is the only way into the persistence
/// layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEmail(String);

impl TrackedEmail {
    pub fn parse(s: String) -> Result<TrackedEmail, String> {
        // Must also fit the varchar(255) `email_id` columns.
        if s.chars().count() <= 255 && validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email address.", s))
        }
    }
}

impl AsRef<str> for TrackedEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackedEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
