//! Routes a classified error into a hosting form's error state.
//!
//! The adapter owns no state and mutates nothing directly; every effect goes
//! through the injected [`FormHost`] callbacks, so any form library can sit
//! on the other side.

use std::collections::HashMap;

use client::{error_to_message, parse_field_errors, AppError, MessageMap};

/// The form-state host the adapter drives.
///
/// `set_focus` and `set_server_error` default to no-ops for hosts that have
/// no focus handling or no global error slot.
pub trait FormHost {
    /// Records a message against one field.
    fn set_error(&mut self, field: &str, message: &str);

    /// Moves focus to a field.
    fn set_focus(&mut self, _field: &str) {}

    /// Shows a form-wide error not tied to any field.
    fn set_server_error(&mut self, _message: &str) {}
}

/// Routing configuration for [`apply_form_error`].
#[derive(Default)]
pub struct ApplyOptions<'a> {
    /// Maps an HTTP status to the field that should carry its message, e.g.
    /// `401 -> "password"`, `409 -> "email"`.
    pub status_field_map: HashMap<u16, String>,
    /// Per-kind message overrides passed through to the projection.
    pub messages: Option<&'a MessageMap>,
}

/// Applies a classified error to the hosting form.
///
/// Priority order:
/// 1. The server reported per-field errors: every entry goes to
///    `set_error` in the server's order, focus moves to the first field,
///    and the global slot is left untouched.
/// 2. The error is HTTP and `status_field_map` knows its status: that field
///    gets the projected message and the focus.
/// 3. Anything else lands in the global slot via `set_server_error`.
pub fn apply_form_error(error: &AppError, host: &mut impl FormHost, options: &ApplyOptions<'_>) {
    if let Some(fields) = parse_field_errors(error) {
        let mut first = None;
        for (field, message) in &fields {
            host.set_error(field, message);
            if first.is_none() {
                first = Some(field.clone());
            }
        }
        if let Some(field) = first {
            host.set_focus(&field);
        }
        return;
    }

    if let AppError::Http { status, .. } = error {
        if let Some(field) = options.status_field_map.get(status) {
            host.set_error(field, &error_to_message(error, options.messages));
            host.set_focus(field);
            return;
        }
    }

    host.set_server_error(&error_to_message(error, options.messages));
}
