use iced::widget::{button, column, horizontal_space, mouse_area, row, text, Column, Container, Row, Scrollable};
use iced::{Alignment, Length};
use iced_aw::Card;

use crate::app::{App, Message};
use crate::screens::subject::subject_path;
use crate::widgets::{announcement_viewer, page_spinner, simple_list_view, ListConfig, ListKind};

pub fn user_portal_screen(app: &App) -> Container<Message> {
    let snapshot = &app.snapshot;
    if snapshot.loading {
        return page_spinner();
    }

    let name = app
        .session
        .as_ref()
        .map(|session| session.first_name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("student");

    let status = if snapshot.refreshing { "Refreshing..." } else { "" };
    let header = row![
        text(format!("welcome back, {} 😄", name)).size(32),
        horizontal_space(),
        text(status).size(14),
        button("Refresh").on_press_maybe((!snapshot.refreshing).then_some(Message::RefreshPressed)),
    ]
        .spacing(15)
        .align_y(Alignment::Center);

    let page_max = app.config.announcements_page_size;
    let announcements = column![
        simple_list_view(
            &app.theme,
            ListKind::School,
            ListConfig {
                title: "School Announcements",
                page_max,
                icon: "school",
                label_field: "title",
                viewer: announcement_viewer,
            },
            &snapshot.school_announcements,
            app.school_list,
        ),
        simple_list_view(
            &app.theme,
            ListKind::Grade,
            ListConfig {
                title: "Grade Announcements",
                page_max,
                icon: "pen-ruler",
                label_field: "title",
                viewer: announcement_viewer,
            },
            &snapshot.grade_announcements(),
            app.grade_list,
        ),
    ]
        .spacing(20)
        .width(Length::FillPortion(2));

    let subjects: iced::Element<Message> = if snapshot.subjects.is_empty() {
        text("No subjects to show.").size(18).into()
    } else {
        let mut cards = Row::new().spacing(15);
        for subject in &snapshot.subjects {
            let card = Card::new(
                text(subject.name.clone()).size(22),
                text(format!("{} announcements", subject.announcements.len())).size(14),
            )
                .width(Length::Fixed(220.0));
            cards = cards.push(mouse_area(card).on_press(Message::Navigate(subject_path(&subject.id))));
        }
        Scrollable::new(cards.wrap()).height(Length::Fill).into()
    };

    let content = Column::new()
        .spacing(30)
        .push(header)
        .push(
            row![announcements, Container::new(subjects).width(Length::FillPortion(3))]
                .spacing(30),
        );

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
