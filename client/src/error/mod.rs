//! The closed error taxonomy and its user-facing projection.
//!
//! Every failure a fetch can produce is one of the [`AppError`] variants;
//! there is no escape hatch, so matches over the taxonomy stay exhaustive.
//! [`error_to_message`] turns any variant into a displayable string, with
//! per-kind overrides via [`MessageMap`].

mod app_error;
mod message;

pub use app_error::{AppError, ErrorKind, ValidationIssue};
pub use message::{error_to_message, MessageMap, MessageOverride};

pub(crate) use app_error::{NETWORK_FAILED, PARSE_FAILED, TIMED_OUT, VALIDATION_FAILED};
