use iced::{widget::{column, text, text_input, button, vertical_space, Container}, Length, Center};
use crate::app::{App, Message};

pub fn login_screen(app: &App) -> Container<Message> {
    let content = column![
        text("Sign in").size(30),
        vertical_space(),
        text_input("First name", &app.first_name)
            .on_input(Message::FirstNameChanged)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        text_input("Grade id", &app.grade_id)
            .on_input(Message::GradeIdChanged)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        text_input("Access key", &app.access_key)
            .on_input(Message::AccessKeyChanged)
            .on_submit(Message::LoginPressed)
            .secure(true)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        button("Sign in")
            .on_press(Message::LoginPressed)
            .padding(10),
        text(&app.error_message).size(20),
        vertical_space(),
        button("Settings")
            .on_press(Message::Navigate("/settings".to_string()))
            .padding(10),
    ]
        .spacing(15)
        .width(Length::Fill)
        .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
