//! Mailbox registration
//!
//! Validates and stores mailboxes decoded from `registerMailbox` calls.

pub mod dispatch;
pub mod registry;

pub use dispatch::{dispatch, Registration, REGISTER_MAILBOX};
pub use registry::{
    is_valid_name, Mailbox, MailboxRegistry, RegistrationOutcome, MAX_NAME_LEN, MIN_NAME_LEN,
};
