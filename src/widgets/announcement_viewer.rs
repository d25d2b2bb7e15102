use chrono::DateTime;
use iced::widget::{text, Column};
use iced::Element;

use crate::app::Message;
use crate::models::{Announcement, AnnouncementScope};

pub fn announcement_viewer<'a>(announcement: &Announcement) -> Element<'a, Message> {
    let scope = match announcement.scope {
        AnnouncementScope::School => "School",
        AnnouncementScope::Subject => "Subject",
    };

    let mut content = Column::new()
        .spacing(5)
        .push(text(announcement.title.clone()).size(18))
        .push(text(scope).size(12));

    if let Some(date) = announcement.created_at.as_deref() {
        content = content.push(text(format_date(date)).size(12));
    }

    let body = if announcement.body.trim().is_empty() {
        "No details.".to_string()
    } else {
        announcement.body.clone()
    };
    content.push(text(body)).into()
}

/// RFC 3339 dates are shown as `dd.mm.yyyy HH:MM` in their own offset, anything else verbatim.
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
