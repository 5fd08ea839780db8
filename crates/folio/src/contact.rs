#![forbid(unsafe_code)]

//! Contact form: validation, simulated submission, and the success toast.
//!
//! # Submission
//!
//! ```text
//!  submit ──► validate ──invalid──► errors shown, Idle
//!                │
//!              valid
//!                ▼
//!          Submitting ──latency──► Idle + toast + form reset
//! ```
//!
//! Submitting ignores further submits. Nothing is sent anywhere; the
//! latency is a timer and the submission always succeeds.
//!
//! # Toast
//!
//! The toast is created off-screen (`Entering`), slides in shortly after
//! (`Shown`), slides out after its dwell time (`Leaving`) and is removed
//! once the slide-out finishes. Each toast has a generation; timers for a
//! replaced toast are ignored.

use std::collections::BTreeMap;
use std::fmt;

use folio_core::document::{Document, ElementId};
use folio_core::event::FormData;
use tracing::{debug, info};

use crate::theme::Theme;

pub const ERROR_CLASS: &str = "error-message";
pub const TOAST_CLASS: &str = "success-message";
pub const TOAST_TEXT: &str = "Message sent successfully! Thank you for reaching out.";
pub const SENDING_LABEL: &str = "Sending...";
/// Minimum trimmed message length, in characters.
pub const MIN_MESSAGE_CHARS: usize = 10;

const ERROR_BORDER: &str = "#ff5459";
const ERROR_SHADOW: &str = "0 0 0 3px rgba(255, 84, 89, 0.2)";

/// A form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// Form field name, also the element id of the control.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Element id of the error message shown under the field.
    #[must_use]
    pub fn error_id(self) -> ElementId {
        ElementId::new(format!("{}-error", self.name()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four submitted values. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    #[must_use]
    pub fn from_form(data: &FormData) -> Self {
        let get = |field: Field| data.get(field.name()).unwrap_or_default().to_owned();
        Self {
            name: get(Field::Name),
            email: get(Field::Email),
            subject: get(Field::Subject),
            message: get(Field::Message),
        }
    }
}

/// Outcome of [`validate`]: one message per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    errors: BTreeMap<Field, &'static str>,
}

impl Validation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(f, m)| (*f, *m))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Whitespace as browsers define it for `\s` and `String.prototype.trim`:
/// ASCII blanks, no-break spaces, the Unicode space separators, the line and
/// paragraph separators and the byte order mark. `U+0085` is not included.
#[must_use]
pub fn is_form_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn trimmed(value: &str) -> &str {
    value.trim_matches(is_form_space)
}

/// `local@domain.tld`: no [form whitespace](is_form_space), exactly one
/// `@`, and a dot in the domain with text on both sides.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_form_space) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Check every field and collect all errors.
#[must_use]
pub fn validate(fields: &ContactFields) -> Validation {
    let mut errors = BTreeMap::new();

    if trimmed(&fields.name).is_empty() {
        errors.insert(Field::Name, "Name is required");
    }

    if trimmed(&fields.email).is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&fields.email) {
        errors.insert(Field::Email, "Please enter a valid email");
    }

    if trimmed(&fields.subject).is_empty() {
        errors.insert(Field::Subject, "Subject is required");
    }

    let message = trimmed(&fields.message);
    if message.is_empty() {
        errors.insert(Field::Message, "Message is required");
    } else if message.chars().count() < MIN_MESSAGE_CHARS {
        // Counted in scalar values, so an emoji is one character.
        errors.insert(Field::Message, "Message must be at least 10 characters long");
    }

    Validation { errors }
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Valid; the simulated request is in flight.
    Accepted,
    /// Invalid; errors are shown.
    Rejected(Validation),
    /// A submission is already in flight.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Created off-screen.
    Entering,
    /// On screen.
    Shown,
    /// Sliding out.
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Toast {
    generation: u64,
    phase: ToastPhase,
    theme: Theme,
}

impl Toast {
    fn colors(&self) -> (&'static str, &'static str) {
        match self.theme {
            Theme::Dark => ("#32c5d2", "#1a365d"),
            Theme::Light => ("#319795", "#ffffff"),
        }
    }
}

/// Owns validation errors, the submit phase and the toast.
#[derive(Debug, Clone)]
pub struct ContactForm {
    form: ElementId,
    submit_button: Option<ElementId>,
    toast_id: ElementId,
    label: String,
    validation: Validation,
    phase: SubmitPhase,
    toast: Option<Toast>,
    toast_generation: u64,
    sent: u64,
}

impl ContactForm {
    #[must_use]
    pub fn new(
        form: ElementId,
        submit_button: Option<ElementId>,
        toast_id: ElementId,
        label: impl Into<String>,
    ) -> Self {
        Self {
            form,
            submit_button,
            toast_id,
            label: label.into(),
            validation: Validation::default(),
            phase: SubmitPhase::Idle,
            toast: None,
            toast_generation: 0,
            sent: 0,
        }
    }

    /// The form element.
    #[must_use]
    pub fn form(&self) -> &ElementId {
        &self.form
    }

    /// Handle a submit of this form.
    pub fn submit(&mut self, data: &FormData) -> SubmitOutcome {
        if self.phase == SubmitPhase::Submitting {
            debug!("submit ignored while sending");
            return SubmitOutcome::Ignored;
        }
        let fields = ContactFields::from_form(data);
        self.validation = validate(&fields);
        if !self.validation.is_valid() {
            info!(errors = self.validation.len(), "form validation failed");
            return SubmitOutcome::Rejected(self.validation.clone());
        }
        info!("form is valid, sending");
        self.phase = SubmitPhase::Submitting;
        SubmitOutcome::Accepted
    }

    /// The simulated request finished. Returns the new toast generation,
    /// or `None` if nothing was in flight.
    pub fn complete(&mut self, theme: Theme) -> Option<u64> {
        if self.phase != SubmitPhase::Submitting {
            return None;
        }
        self.phase = SubmitPhase::Idle;
        self.sent += 1;
        self.toast_generation += 1;
        if self.toast.is_some() {
            debug!("replacing previous toast");
        }
        self.toast = Some(Toast {
            generation: self.toast_generation,
            phase: ToastPhase::Entering,
            theme,
        });
        info!(sent = self.sent, "form submitted successfully");
        Some(self.toast_generation)
    }

    fn toast_step(&mut self, generation: u64, from: ToastPhase, to: ToastPhase) -> bool {
        match &mut self.toast {
            Some(t) if t.generation == generation && t.phase == from => {
                t.phase = to;
                true
            }
            _ => false,
        }
    }

    /// Slide the toast in.
    pub fn toast_in(&mut self, generation: u64) -> bool {
        self.toast_step(generation, ToastPhase::Entering, ToastPhase::Shown)
    }

    /// Start sliding the toast out. Works from `Entering` as well, so a
    /// dwell shorter than the entrance still dismisses it.
    pub fn toast_out(&mut self, generation: u64) -> bool {
        self.toast_step(generation, ToastPhase::Shown, ToastPhase::Leaving)
            || self.toast_step(generation, ToastPhase::Entering, ToastPhase::Leaving)
    }

    /// Remove the toast after its slide-out.
    pub fn toast_remove(&mut self, generation: u64) -> bool {
        match self.toast {
            Some(t) if t.generation == generation && t.phase == ToastPhase::Leaving => {
                self.toast = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    #[must_use]
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    #[must_use]
    pub fn toast_phase(&self) -> Option<ToastPhase> {
        self.toast.map(|t| t.phase)
    }

    /// Successful submissions so far.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn view(&self, doc: &mut Document) {
        for field in Field::ALL {
            let control = doc.element_mut(field.name());
            if self.validation.error(field).is_some() {
                control
                    .set_style("border-color", ERROR_BORDER)
                    .set_style("box-shadow", ERROR_SHADOW);
            }
        }
        for (field, message) in self.validation.errors() {
            doc.element_mut(field.error_id())
                .add_class(ERROR_CLASS)
                .set_text(message);
        }

        if let Some(button) = &self.submit_button {
            let sending = self.phase == SubmitPhase::Submitting;
            doc.element_mut(button)
                .set_text(if sending { SENDING_LABEL } else { self.label.as_str() })
                .set_disabled(sending)
                .set_style("opacity", if sending { "0.7" } else { "1" });
        }

        if let Some(toast) = &self.toast {
            let (background, color) = toast.colors();
            let offset = match toast.phase {
                ToastPhase::Shown => "translateX(0)",
                ToastPhase::Entering | ToastPhase::Leaving => "translateX(100%)",
            };
            doc.element_mut(&self.toast_id)
                .add_class(TOAST_CLASS)
                .set_text(TOAST_TEXT)
                .set_style("background", background)
                .set_style("color", color)
                .set_style("transform", offset);
        }
    }
}
