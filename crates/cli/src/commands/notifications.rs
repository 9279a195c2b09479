//! Notification commands.

use clap::Subcommand;
use grooveo_core::NotificationId;
use grooveo_storefront::services::Preference;
use grooveo_storefront::{AppState, Result};

use super::report;

#[derive(Subcommand)]
pub enum NotificationAction {
    /// List notifications, newest first
    List {
        /// Only show unread notifications
        #[arg(short, long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
    /// Delete one notification
    Remove { id: String },
    /// Delete every notification
    Clear,
    /// Show preferences, or flip one (`email`, `order-status`, `promotional`)
    Prefs { toggle: Option<Preference> },
}

pub fn run(state: &AppState, action: NotificationAction) -> Result<()> {
    let notifications = state.notifications();
    match action {
        NotificationAction::List { unread } => {
            let feed = notifications.feed()?;
            tracing::info!("{} unread", feed.unread_count());
            for n in feed.items().iter().filter(|n| !unread || !n.read) {
                let marker = if n.read { ' ' } else { '*' };
                tracing::info!(
                    "{marker} {:<38} {}  {}",
                    n.id.as_str(),
                    n.timestamp.format("%Y-%m-%d %H:%M"),
                    n.title
                );
                tracing::info!("    {}", n.message);
            }
        }
        NotificationAction::Read { id } => {
            notifications
                .mark_read(&NotificationId::new(id))
                .map_err(report)?;
        }
        NotificationAction::ReadAll => notifications.mark_all_read()?,
        NotificationAction::Remove { id } => {
            notifications
                .remove(&NotificationId::new(id))
                .map_err(report)?;
        }
        NotificationAction::Clear => {
            notifications.clear()?;
            tracing::info!("Notifications cleared");
        }
        NotificationAction::Prefs { toggle } => {
            let prefs = match toggle {
                Some(preference) => notifications.toggle(preference)?,
                None => notifications.preferences()?,
            };
            tracing::info!("email:        {}", on_off(prefs.email));
            tracing::info!("order-status: {}", on_off(prefs.order_status));
            tracing::info!("promotional:  {}", on_off(prefs.promotional));
        }
    }
    Ok(())
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
