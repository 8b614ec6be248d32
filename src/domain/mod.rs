mod project_name;
mod tracked_email;

pub use project_name::ProjectName;
pub use tracked_email::TrackedEmail;
