use iced::widget::{button, column, text, Container};
use iced::{Center, Length};

use crate::app::Message;

fn editor_placeholder<'a>(title: &'a str, link_label: &'a str, link: &str, id: Option<&str>) -> Container<'a, Message> {
    let content = column![
        text(format!("Current Query: {}", id.unwrap_or("None"))),
        text(title).size(24),
        button(link_label)
            .style(button::text)
            .on_press(Message::Navigate(link.to_string())),
    ]
        .spacing(30)
        .align_x(Center);

    Container::new(content).center(Length::Fill)
}

pub fn grades_form_screen(id: Option<&str>) -> Container<Message> {
    editor_placeholder("Grades Editor", "Update Grade ID #123", "/grades?id=123", id)
}

pub fn classes_form_screen(id: Option<&str>) -> Container<Message> {
    editor_placeholder("Classes Editor", "Update Class ID #123", "/classes?id=123", id)
}
