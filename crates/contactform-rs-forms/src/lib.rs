//! # contactform-rs-forms
//!
//! The form state machine and validation pipeline: declared fields, the
//! honeypot spam guard, per-field rules, the submission lifecycle, and the
//! narrow mail transport interface the form drives once it is valid.

pub mod clock;
pub mod field;
pub mod form;
pub mod honeypot;
pub mod state;
pub mod transport;
pub mod validation;
pub mod widgets;

pub use clock::{Clock, FixedClock, SystemClock};
pub use field::{Field, FieldKind, FieldSpec};
pub use form::{Form, HttpMethod, Payload};
pub use honeypot::{HoneypotGuard, SpamReason};
pub use state::{ExternalSignal, SubmissionState};
pub use transport::{MailError, MailMessage, MailTransport, Mailbox};
pub use validation::ErrorMap;
