/// Name of the project a tracked email was sent for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    /// Returns an instance of `ProjectName` if the input fits the `project`
    /// column: not blank, at most 255 characters, no control characters.
    pub fn parse(s: String) -> Result<ProjectName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        // varchar(255) counts characters, not bytes.
        let is_too_long = s.chars().count() > 255;
        let contains_control_characters = s.chars().any(char::is_control);

        if is_empty_or_whitespace || is_too_long || contains_control_characters {
            Err(format!("{} is not a valid project name.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
