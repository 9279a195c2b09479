//! Notification service.
//!
//! Email delivery is simulated: the message that would be sent is logged
//! at info level.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use grooveo_core::notification::{
    Notification, NotificationDraft, NotificationFeed, NotificationPreferences, email_subject,
};
use grooveo_core::{Email, NotificationId, NotificationKind};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::seed;
use crate::store::{self, KeyValueStore, Slot};

/// A preference toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Email,
    OrderStatus,
    Promotional,
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "order-status" => Ok(Self::OrderStatus),
            "promotional" => Ok(Self::Promotional),
            other => Err(format!(
                "unknown preference {other} (expected email, order-status or promotional)"
            )),
        }
    }
}

/// Outcome of adding a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub notification: Notification,
    /// Whether the notification should pop up immediately.
    pub toast: bool,
    /// Whether a (simulated) email was sent.
    pub emailed: bool,
}

/// Reads and writes the `notifications` and `notification-preferences`
/// slots.
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn KeyValueStore>,
    email_to: Email,
}

impl NotificationService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, email_to: Email) -> Self {
        Self { store, email_to }
    }

    /// The feed, newest first. A store that has never held notifications is
    /// seeded with the welcome samples.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    pub fn feed(&self) -> Result<NotificationFeed> {
        if let Some(feed) = store::load(self.store.as_ref(), Slot::Notifications)? {
            return Ok(feed);
        }
        let mut feed = NotificationFeed::default();
        for notification in seed::sample_notifications(Utc::now()).into_iter().rev() {
            feed.add(notification);
        }
        self.save(&feed)?;
        tracing::debug!("Seeded sample notifications");
        Ok(feed)
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn unread_count(&self) -> Result<usize> {
        Ok(self.feed()?.unread_count())
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read.
    pub fn preferences(&self) -> Result<NotificationPreferences> {
        Ok(
            store::load(self.store.as_ref(), Slot::NotificationPreferences)?
                .unwrap_or_default(),
        )
    }

    /// Flip one preference and return the new set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    pub fn toggle(&self, preference: Preference) -> Result<NotificationPreferences> {
        let mut prefs = self.preferences()?;
        match preference {
            Preference::Email => prefs.email = !prefs.email,
            Preference::OrderStatus => prefs.order_status = !prefs.order_status,
            Preference::Promotional => prefs.promotional = !prefs.promotional,
        }
        store::save(self.store.as_ref(), Slot::NotificationPreferences, &prefs)?;
        Ok(prefs)
    }

    /// Store a new unread notification at the top of the feed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    #[instrument(skip(self, draft), fields(kind = ?draft.kind, title = %draft.title))]
    pub fn add(&self, draft: NotificationDraft) -> Result<Delivery> {
        let prefs = self.preferences()?;
        let notification = Notification::from_draft(draft, NotificationId::generate(), Utc::now());

        let mut feed = self.feed()?;
        feed.add(notification.clone());
        self.save(&feed)?;

        let toast = match notification.kind {
            NotificationKind::OrderStatus => prefs.order_status,
            NotificationKind::Promotion => prefs.promotional,
            NotificationKind::Account | NotificationKind::System => true,
        };
        if prefs.email {
            self.send_email(&notification);
        }

        Ok(Delivery {
            notification,
            toast,
            emailed: prefs.email,
        })
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no notification has this ID.
    pub fn mark_read(&self, id: &NotificationId) -> Result<()> {
        let mut feed = self.feed()?;
        if !feed.mark_read(id) {
            return Err(AppError::NotFound(format!("notification {id}")));
        }
        self.save(&feed)
    }

    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be read or written.
    pub fn mark_all_read(&self) -> Result<()> {
        let mut feed = self.feed()?;
        feed.mark_all_read();
        self.save(&feed)
    }

    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no notification has this ID.
    pub fn remove(&self, id: &NotificationId) -> Result<()> {
        let mut feed = self.feed()?;
        if !feed.remove(id) {
            return Err(AppError::NotFound(format!("notification {id}")));
        }
        self.save(&feed)
    }

    /// Remove every notification. The samples are not re-seeded afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the store cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.save(&NotificationFeed::default())
    }

    fn send_email(&self, notification: &Notification) {
        let subject = match (notification.kind, notification.order_status) {
            (NotificationKind::OrderStatus, Some(status)) => email_subject(status),
            _ => notification.title.as_str(),
        };
        tracing::info!(
            to = %self.email_to,
            subject,
            body = %notification.message,
            action_url = notification.action_url.as_deref(),
            "Sending email notification"
        );
    }

    fn save(&self, feed: &NotificationFeed) -> Result<()> {
        store::save(self.store.as_ref(), Slot::Notifications, feed)?;
        Ok(())
    }
}
