use iced::widget::{button, column, text, Container};
use iced::{Center, Length};
use iced_font_awesome::fa_icon_solid;

use crate::app::Message;

pub fn access_denied_screen<'a>() -> Container<'a, Message> {
    let content = column![
        fa_icon_solid("lock").size(48.0),
        text("Access denied").size(30),
        text("Sign in to open this page."),
        button("Go to sign in").on_press(Message::Navigate("/".to_string())),
    ]
        .spacing(15)
        .align_x(Center);

    Container::new(content).center(Length::Fill)
}
