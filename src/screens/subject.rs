use iced::widget::{button, column, text, Container};
use iced::Length;

use crate::app::{App, Message};
use crate::models::Id;
use crate::routes::Screen;
use crate::widgets::{announcement_viewer, page_spinner, simple_list_view, ListConfig, ListKind};

pub fn subject_path(id: &Id) -> String {
    Screen::Subject(id.clone()).path()
}

pub fn subject_screen<'a>(app: &'a App, id: &Id) -> Container<'a, Message> {
    let back = button("Back to portal").on_press(Message::Navigate("/portal".to_string()));

    let Some(subject) = app.snapshot.subject(id.as_str()) else {
        if app.snapshot.loading {
            return page_spinner();
        }
        return Container::new(
            column![back, text("This subject is not part of your grade anymore.").size(20)].spacing(20),
        )
            .width(Length::Fill)
            .padding(20);
    };

    let content = column![
        back,
        text(subject.name.clone()).size(30),
        simple_list_view(
            &app.theme,
            ListKind::Subject,
            ListConfig {
                title: "Subject Announcements",
                page_max: app.config.announcements_page_size,
                icon: "bullhorn",
                label_field: "title",
                viewer: announcement_viewer,
            },
            &subject.announcements,
            app.subject_list,
        ),
    ]
        .spacing(20)
        .width(Length::Fixed(600.0));

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
