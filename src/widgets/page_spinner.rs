use iced::widget::{column, text, Container};
use iced::{Center, Length};
use iced_aw::Spinner;

use crate::app::Message;

pub fn page_spinner<'a>() -> Container<'a, Message> {
    let content = column![Spinner::new(), text("Loading...").size(16)]
        .spacing(15)
        .align_x(Center);

    Container::new(content).center(Length::Fill)
}
