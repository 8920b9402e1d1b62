//! Create/edit form controller for a merchant draft.
//!
//! Validation runs only on submit. Editing a field clears that field's
//! error immediately. A submit in flight blocks further submits. In create
//! mode a successful submit closes the form; in edit mode closing is left to
//! the caller, which interposes a confirmation step.

use core::fmt::Display;
use core::future::Future;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Merchant, MerchantFormData, MerchantStatus};

/// Error for a blank name.
pub const NAME_REQUIRED: &str = "Merchant name is required";
/// Error for a blank email.
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Error for a malformed email.
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
/// Error for a blank phone.
pub const PHONE_REQUIRED: &str = "Phone number is required";
/// Error for a malformed phone.
pub const PHONE_INVALID: &str = "Please enter a valid phone number";

/// `local@domain.tld`, permissive, case-insensitive.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^[^\s@<>()\[\]{}]+@[^\s@<>()\[\]{}]+\.[^\s@<>()\[\]{}]+").ok());

/// ASCII digits, whitespace and `+-().{/}` only.
static PHONE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9\s\-+().{/}]+$").ok());

/// Returns `true` if the pattern compiled and matches.
fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

/// Whether the form creates a new merchant or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    /// Empty draft, closes itself after a successful submit.
    #[default]
    Create,
    /// Draft seeded from this merchant; the caller decides when to close.
    Edit(Merchant),
}

/// A text field of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// Contact name (required).
    Name,
    /// Contact email (required).
    Email,
    /// Contact phone (required).
    Phone,
    /// Business name.
    BusinessName,
    /// Registration number.
    RegistrationNumber,
    /// Street address.
    Address,
    /// City.
    City,
    /// Country.
    Country,
}

/// Per-field validation messages. Only the required fields can fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    /// Name error.
    pub name: Option<&'static str>,
    /// Email error.
    pub email: Option<&'static str>,
    /// Phone error.
    pub phone: Option<&'static str>,
}

impl FieldErrors {
    /// Returns `true` when no field has an error.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Returns the error of one field.
    #[inline]
    #[must_use]
    pub const fn get(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::Name => self.name,
            FormField::Email => self.email,
            FormField::Phone => self.phone,
            FormField::BusinessName
            | FormField::RegistrationNumber
            | FormField::Address
            | FormField::City
            | FormField::Country => None,
        }
    }

    /// Clears the error of one field.
    #[inline]
    pub const fn clear(&mut self, field: FormField) {
        match field {
            FormField::Name => self.name = None,
            FormField::Email => self.email = None,
            FormField::Phone => self.phone = None,
            FormField::BusinessName
            | FormField::RegistrationNumber
            | FormField::Address
            | FormField::City
            | FormField::Country => {}
        }
    }

    /// Validates a draft.
    #[inline]
    #[must_use]
    pub fn check(draft: &MerchantFormData) -> Self {
        let email = draft.email.trim();
        let phone = draft.phone.trim();
        Self {
            name: draft.name.trim().is_empty().then_some(NAME_REQUIRED),
            email: if email.is_empty() {
                Some(EMAIL_REQUIRED)
            } else if matches(&EMAIL_PATTERN, email) {
                None
            } else {
                Some(EMAIL_INVALID)
            },
            phone: if phone.is_empty() {
                Some(PHONE_REQUIRED)
            } else if matches(&PHONE_PATTERN, phone) {
                None
            } else {
                Some(PHONE_INVALID)
            },
        }
    }
}

/// Result of [`MerchantForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the callback was not called.
    Invalid,
    /// Another submit is still in flight; the callback was not called.
    Busy,
    /// The callback completed; `close` tells whether the form closes.
    Accepted {
        /// The form closes itself (create mode only).
        close: bool,
    },
    /// The callback failed; the form stays open.
    Rejected,
}

/// Form state: mode, draft, field errors, in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct MerchantForm {
    /// Create or edit.
    mode: FormMode,
    /// The draft being edited.
    draft: MerchantFormData,
    /// Errors from the last validation.
    errors: FieldErrors,
    /// A submit is outstanding.
    submitting: bool,
}

impl MerchantForm {
    /// Creates a form in create mode with an empty draft.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a form editing `merchant`.
    #[inline]
    #[must_use]
    pub fn editing(merchant: Merchant) -> Self {
        let mut form = Self::new();
        form.open_edit(merchant);
        form
    }

    /// Switches to create mode with a fresh draft and no errors.
    #[inline]
    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.draft = MerchantFormData::default();
        self.errors = FieldErrors::default();
    }

    /// Switches to edit mode with a draft copied from `merchant` and no
    /// errors.
    #[inline]
    pub fn open_edit(&mut self, merchant: Merchant) {
        self.draft = MerchantFormData::from(&merchant);
        self.mode = FormMode::Edit(merchant);
        self.errors = FieldErrors::default();
    }

    /// Sets a text field and clears its error. Blank optional fields become
    /// absent.
    #[inline]
    pub fn set_field<T: Into<String>>(&mut self, field: FormField, value: T) {
        let text: String = value.into();
        let optional = || (!text.trim().is_empty()).then(|| text.clone());
        match field {
            FormField::Name => self.draft.name = text.clone(),
            FormField::Email => self.draft.email = text.clone(),
            FormField::Phone => self.draft.phone = text.clone(),
            FormField::BusinessName => self.draft.business_name = optional(),
            FormField::RegistrationNumber => self.draft.registration_number = optional(),
            FormField::Address => self.draft.address = optional(),
            FormField::City => self.draft.city = optional(),
            FormField::Country => self.draft.country = optional(),
        }
        self.errors.clear(field);
    }

    /// Sets the lifecycle status.
    #[inline]
    pub const fn set_status(&mut self, status: MerchantStatus) {
        self.draft.status = status;
    }

    /// Validates the draft and stores the errors. Returns `true` when valid.
    #[inline]
    pub fn validate(&mut self) -> bool {
        self.errors = FieldErrors::check(&self.draft);
        self.errors.is_empty()
    }

    /// Starts a submit: validates, marks the form in flight, and hands out
    /// the draft. Returns `None` when invalid or already in flight.
    #[inline]
    pub fn begin_submit(&mut self) -> Option<MerchantFormData> {
        if self.submitting {
            tracing::debug!("submit ignored, already in flight");
            return None;
        }
        if !self.validate() {
            tracing::debug!(errors = ?self.errors, "submit blocked by validation");
            return None;
        }
        self.submitting = true;
        Some(self.draft.clone())
    }

    /// Ends a submit. Returns `true` when the form should close, which only
    /// happens for a successful create.
    #[inline]
    pub fn finish_submit(&mut self, succeeded: bool) -> bool {
        self.submitting = false;
        succeeded && self.mode == FormMode::Create
    }

    /// Runs a full submit around `on_submit`. Callback errors are logged
    /// and swallowed; surfacing them is the caller's job.
    #[inline]
    pub async fn submit<F, Fut, E>(&mut self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(MerchantFormData) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        if self.submitting {
            return SubmitOutcome::Busy;
        }
        let Some(draft) = self.begin_submit() else {
            return SubmitOutcome::Invalid;
        };
        match on_submit(draft).await {
            Ok(()) => SubmitOutcome::Accepted {
                close: self.finish_submit(true),
            },
            Err(err) => {
                tracing::debug!(error = %err, "submit callback failed");
                let _close = self.finish_submit(false);
                SubmitOutcome::Rejected
            }
        }
    }

    /// Create or edit.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The merchant being edited, if any.
    #[inline]
    #[must_use]
    pub const fn editing_target(&self) -> Option<&Merchant> {
        match self.mode {
            FormMode::Edit(ref merchant) => Some(merchant),
            FormMode::Create => None,
        }
    }

    /// The current draft.
    #[inline]
    #[must_use]
    pub const fn draft(&self) -> &MerchantFormData {
        &self.draft
    }

    /// Errors from the last validation.
    #[inline]
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// `true` while a submit is outstanding; the submit control is disabled.
    #[inline]
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }
}
