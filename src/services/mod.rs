pub mod email_template;
pub mod generation;
pub mod mailer;
pub mod notifier;

pub use generation::GenerationService;
pub use mailer::{MailTransport, OutgoingEmail, SmtpMailer, SmtpSettings};
pub use notifier::{DispatchReport, DispatchRequest, Notifier, RecipientResult};
