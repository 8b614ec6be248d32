mod open_event;
mod sent_email;

pub use open_event::OpenEvent;
pub use sent_email::SentEmail;
