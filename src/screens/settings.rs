use iced::{widget::{column, text, Container, vertical_space}, Length, Center, Theme};
use iced::widget::pick_list;
use crate::app::{App, Message};
use crate::config::theme_to_str;

pub fn settings_screen(app: &App) -> Container<Message> {
    let current_name = theme_to_str(&app.theme);
    let theme_names: Vec<&'static str> = Theme::ALL.iter().map(theme_to_str).collect();
    let push = app.config.push_url.as_deref().unwrap_or("disabled");

    let content = column![
        text("Settings").size(30),
        vertical_space(),
        pick_list(theme_names, Some(current_name), Message::ThemeSelected)
        .placeholder("Choose a theme"),
        text(format!("Portal API: {}", app.config.api_base_url)).size(14),
        text(format!("Live updates: {}", push)).size(14),
        text(format!("Announcements per page: {}", app.config.announcements_page_size)).size(14),
        vertical_space(),
    ]
        .spacing(15)
        .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
