use iced::{widget::{button, column}, Alignment, Element, Length, Renderer, Theme};
use iced::widget::{text, vertical_space, Container, Row};
use iced_font_awesome::fa_icon_solid;
use crate::app::{Message, App};

fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: &'a str,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

fn nav_button<'a>(app: &'a App, icon: &'a str, label: &'a str, path: &str) -> Element<'a, Message> {
    button(icon_button_content(
        fa_icon_solid(icon).style(move |_| text::base(&app.theme)),
        label,
    ))
        .on_press(Message::Navigate(path.to_string()))
        .width(Length::Fill)
        .into()
}

pub fn nav_menu(app: &App) -> Container<Message> {
    let push_state = if app.config.push_url.is_none() {
        "Live updates off"
    } else if app.push_connected {
        "Live updates on"
    } else {
        "Connecting..."
    };

    let content = column![
        nav_button(app, "house", "Portal", "/portal"),
        nav_button(app, "pen-to-square", "Grades", "/grades"),
        nav_button(app, "chalkboard", "Classes", "/classes"),
        nav_button(app, "clipboard-question", "Assessment", "/assessment"),
        vertical_space(),
        text(push_state).size(12),
        nav_button(app, "gear", "Settings", "/settings"),
        button(icon_button_content(
            fa_icon_solid("arrow-right-from-bracket").style(move |_| text::base(&app.theme)),
            "Sign out"
        )).on_press(Message::Logout).width(Length::Fill),
    ]
        .spacing(10);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
