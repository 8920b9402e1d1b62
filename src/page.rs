//! Merchants page orchestration.
//!
//! [`MerchantsPage`] owns which overlay is open, the pending update payload,
//! the transient notification and the list's refresh trigger. Only one
//! overlay can be open at a time; the update confirmation handshake lives
//! inside the form overlay so it can never show without a payload.

use core::time::Duration;

use tokio::time::Instant;

use crate::details::MerchantDetails;
use crate::error::DashboardError;
use crate::form::{FormMode, MerchantForm};
use crate::list::MerchantList;
use crate::models::{Merchant, MerchantFormData};
use crate::service::MerchantService;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Success text after a create.
pub const CREATED: &str = "Merchant created successfully!";
/// Success text after an update.
pub const UPDATED: &str = "Merchant updated successfully!";
/// Success text after a delete.
pub const DELETED: &str = "Merchant deleted successfully!";
/// Fallback failure text for a create.
pub const CREATE_FAILED: &str = "Failed to create merchant";
/// Fallback failure text for an update.
pub const UPDATE_FAILED: &str = "Failed to update merchant";
/// Fallback failure text for a delete.
pub const DELETE_FAILED: &str = "Failed to delete merchant";

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
}

/// Transient message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Success or error.
    pub kind: NotificationKind,
    /// Display text.
    pub message: String,
    /// When it was raised.
    pub created_at: Instant,
}

impl Notification {
    /// Returns `true` once [`NOTIFICATION_TTL`] has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTIFICATION_TTL
    }
}

/// Edit-submit handshake: submit, then confirm, then apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UpdateFlow {
    /// No update pending.
    #[default]
    Idle,
    /// Confirmation dialog open over the form with this payload.
    AwaitingConfirmation(MerchantFormData),
    /// The update call is in flight.
    Applying,
}

/// The form overlay and its update handshake.
#[derive(Debug, Clone)]
pub struct FormOverlay {
    /// The form under any confirmation dialog.
    pub form: MerchantForm,
    /// Update handshake state (edit mode only).
    pub update: UpdateFlow,
}

/// What is layered over the list.
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    /// Nothing open.
    #[default]
    Idle,
    /// Create or edit form.
    Form(FormOverlay),
    /// Delete confirmation for this merchant.
    DeleteConfirmation(Merchant),
    /// Read-only details.
    Details(Box<MerchantDetails>),
}

/// Result of submitting the form through the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSubmission {
    /// No form open, validation failed, or a submit was already in flight.
    Blocked,
    /// Create succeeded; the form closed.
    Created,
    /// Create failed; the form stays open.
    Failed,
    /// Edit payload stored; waiting for confirmation.
    AwaitingConfirmation,
}

/// Page-level state for merchant management.
#[derive(Debug, Default)]
pub struct MerchantsPage {
    /// The list under every overlay.
    list: MerchantList,
    /// Open overlay.
    overlay: Overlay,
    /// Latest notification.
    notification: Option<Notification>,
    /// Bumped after each successful mutation.
    refresh_trigger: u64,
}

impl MerchantsPage {
    /// Creates an idle page with a fresh list.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty create form.
    #[inline]
    pub fn open_create(&mut self) {
        self.overlay = Overlay::Form(FormOverlay {
            form: MerchantForm::new(),
            update: UpdateFlow::Idle,
        });
    }

    /// Opens the edit form seeded from `merchant`.
    #[inline]
    pub fn open_edit(&mut self, merchant: Merchant) {
        self.overlay = Overlay::Form(FormOverlay {
            form: MerchantForm::editing(merchant),
            update: UpdateFlow::Idle,
        });
    }

    /// Closes the form, dropping the editing target and any pending update.
    #[inline]
    pub fn close_form(&mut self) {
        if matches!(self.overlay, Overlay::Form(_)) {
            self.overlay = Overlay::Idle;
        }
    }

    /// Submits the open form.
    ///
    /// Create mode calls the backend; edit mode only stores the payload and
    /// waits for [`MerchantsPage::confirm_update`]. Editing a merchant with
    /// no id fails here, before any confirmation is shown.
    #[inline]
    pub async fn submit_form<S: MerchantService>(&mut self, service: &S) -> FormSubmission {
        let Overlay::Form(ref mut overlay) = self.overlay else {
            return FormSubmission::Blocked;
        };
        if overlay.update != UpdateFlow::Idle {
            return FormSubmission::Blocked;
        }
        let Some(draft) = overlay.form.begin_submit() else {
            return FormSubmission::Blocked;
        };

        if matches!(*overlay.form.mode(), FormMode::Edit(_)) {
            let missing = match overlay.form.editing_target().map(Merchant::require_id) {
                Some(Ok(_)) => None,
                Some(Err(err)) => Some(err),
                None => Some(DashboardError::MissingId),
            };
            if let Some(err) = missing {
                tracing::warn!(error = %err, "update rejected before confirmation");
                let _close = overlay.form.finish_submit(false);
                self.notify(NotificationKind::Error, err.user_message(UPDATE_FAILED));
                return FormSubmission::Failed;
            }
            let _close = overlay.form.finish_submit(true);
            overlay.update = UpdateFlow::AwaitingConfirmation(draft);
            tracing::debug!("update waiting for confirmation");
            return FormSubmission::AwaitingConfirmation;
        }

        match service.add_merchant(&draft).await {
            Ok(created) => {
                tracing::info!(merchant_id = ?created.id, "merchant created");
                let close = overlay.form.finish_submit(true);
                if close {
                    self.overlay = Overlay::Idle;
                }
                self.notify(NotificationKind::Success, CREATED.to_owned());
                self.bump_refresh();
                FormSubmission::Created
            }
            Err(err) => {
                tracing::warn!(error = %err, "create failed");
                let _close = overlay.form.finish_submit(false);
                self.notify(NotificationKind::Error, err.user_message(CREATE_FAILED));
                FormSubmission::Failed
            }
        }
    }

    /// Applies the pending update. Returns `true` on success.
    ///
    /// Success closes everything. Failure closes the confirmation, drops the
    /// payload and leaves the form open.
    #[inline]
    pub async fn confirm_update<S: MerchantService>(&mut self, service: &S) -> bool {
        let Overlay::Form(ref mut overlay) = self.overlay else {
            return false;
        };
        if !matches!(overlay.update, UpdateFlow::AwaitingConfirmation(_)) {
            return false;
        }
        let UpdateFlow::AwaitingConfirmation(draft) =
            core::mem::replace(&mut overlay.update, UpdateFlow::Applying)
        else {
            return false;
        };
        let target = overlay.form.editing_target().map(Merchant::require_id);
        let outcome = match target {
            Some(Ok(id)) => service.update_merchant_by_id(id, &draft).await,
            Some(Err(err)) => Err(err),
            None => Err(DashboardError::MissingId),
        };

        match outcome {
            Ok(updated) => {
                tracing::info!(merchant_id = ?updated.id, "merchant updated");
                self.overlay = Overlay::Idle;
                self.bump_refresh();
                self.notify(NotificationKind::Success, UPDATED.to_owned());
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "update failed");
                overlay.update = UpdateFlow::Idle;
                self.notify(NotificationKind::Error, err.user_message(UPDATE_FAILED));
                false
            }
        }
    }

    /// Dismisses the update confirmation; the form and draft stay as they
    /// were.
    #[inline]
    pub fn cancel_update(&mut self) {
        if let Overlay::Form(ref mut overlay) = self.overlay
            && matches!(overlay.update, UpdateFlow::AwaitingConfirmation(_))
        {
            overlay.update = UpdateFlow::Idle;
        }
    }

    /// Asks for confirmation before deleting `merchant`.
    #[inline]
    pub fn request_delete(&mut self, merchant: Merchant) {
        self.overlay = Overlay::DeleteConfirmation(merchant);
    }

    /// Dismisses the delete confirmation.
    #[inline]
    pub fn cancel_delete(&mut self) {
        if matches!(self.overlay, Overlay::DeleteConfirmation(_)) {
            self.overlay = Overlay::Idle;
        }
    }

    /// Deletes the pending target. The dialog is dismissed either way; only
    /// a success refreshes the list. Returns `true` on success.
    #[inline]
    pub async fn confirm_delete<S: MerchantService>(&mut self, service: &S) -> bool {
        let Overlay::DeleteConfirmation(target) = core::mem::take(&mut self.overlay) else {
            return false;
        };
        let outcome = match target.require_id() {
            Ok(id) => service.remove_merchant(id).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => {
                tracing::info!(merchant_id = ?target.id, "merchant deleted");
                self.bump_refresh();
                self.notify(NotificationKind::Success, DELETED.to_owned());
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "delete failed");
                self.notify(NotificationKind::Error, err.user_message(DELETE_FAILED));
                false
            }
        }
    }

    /// Opens the details overlay for `merchant`. Call
    /// [`MerchantDetails::load`] through [`MerchantsPage::details_mut`] to
    /// fill it.
    #[inline]
    pub fn view(&mut self, merchant: Merchant) {
        self.overlay = Overlay::Details(Box::new(MerchantDetails::new(merchant)));
    }

    /// Opens details and loads them.
    #[inline]
    pub async fn view_and_load<S: MerchantService>(&mut self, merchant: Merchant, service: &S) {
        self.view(merchant);
        if let Some(details) = self.details_mut() {
            details.load(service).await;
        }
    }

    /// Closes the details overlay without side effects.
    #[inline]
    pub fn close_details(&mut self) {
        if matches!(self.overlay, Overlay::Details(_)) {
            self.overlay = Overlay::Idle;
        }
    }

    /// Fetches the list if its request changed.
    #[inline]
    pub async fn sync_list<S: MerchantService>(&mut self, service: &S) -> bool {
        self.list.sync(service).await
    }

    /// Drops the notification once it has expired.
    #[inline]
    pub fn prune_notification(&mut self, now: Instant) {
        if self.notification.as_ref().is_some_and(|note| note.is_expired(now)) {
            self.notification = None;
        }
    }

    /// Dismisses the notification.
    #[inline]
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// The open overlay.
    #[inline]
    #[must_use]
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// The open form, if any.
    #[inline]
    #[must_use]
    pub const fn form(&self) -> Option<&MerchantForm> {
        match self.overlay {
            Overlay::Form(ref overlay) => Some(&overlay.form),
            Overlay::Idle | Overlay::DeleteConfirmation(_) | Overlay::Details(_) => None,
        }
    }

    /// The open form, for editing fields.
    #[inline]
    pub const fn form_mut(&mut self) -> Option<&mut MerchantForm> {
        match self.overlay {
            Overlay::Form(ref mut overlay) => Some(&mut overlay.form),
            Overlay::Idle | Overlay::DeleteConfirmation(_) | Overlay::Details(_) => None,
        }
    }

    /// The payload waiting for confirmation, if any.
    #[inline]
    #[must_use]
    pub const fn pending_update(&self) -> Option<&MerchantFormData> {
        match self.overlay {
            Overlay::Form(ref overlay) => match overlay.update {
                UpdateFlow::AwaitingConfirmation(ref draft) => Some(draft),
                UpdateFlow::Idle | UpdateFlow::Applying => None,
            },
            Overlay::Idle | Overlay::DeleteConfirmation(_) | Overlay::Details(_) => None,
        }
    }

    /// The merchant awaiting delete confirmation, if any.
    #[inline]
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&Merchant> {
        match self.overlay {
            Overlay::DeleteConfirmation(ref merchant) => Some(merchant),
            Overlay::Idle | Overlay::Form(_) | Overlay::Details(_) => None,
        }
    }

    /// The open details, if any.
    #[inline]
    pub fn details_mut(&mut self) -> Option<&mut MerchantDetails> {
        match self.overlay {
            Overlay::Details(ref mut details) => Some(details.as_mut()),
            Overlay::Idle | Overlay::Form(_) | Overlay::DeleteConfirmation(_) => None,
        }
    }

    /// The latest notification, even if expired.
    #[inline]
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// The merchant list.
    #[inline]
    #[must_use]
    pub const fn list(&self) -> &MerchantList {
        &self.list
    }

    /// The merchant list, for input handling.
    #[inline]
    pub const fn list_mut(&mut self) -> &mut MerchantList {
        &mut self.list
    }

    /// Current refresh counter.
    #[inline]
    #[must_use]
    pub const fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    /// Raises a notification, replacing any previous one.
    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.notification = Some(Notification {
            kind,
            message,
            created_at: Instant::now(),
        });
    }

    /// Increments the trigger and hands it to the list.
    fn bump_refresh(&mut self) {
        self.refresh_trigger = self.refresh_trigger.saturating_add(1);
        self.list.set_refresh_trigger(self.refresh_trigger);
    }
}
