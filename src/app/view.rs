use iced::Length;
use iced::widget::{Column, Container, Row};
use crate::routes::Screen;
use crate::screens::{
    access_denied_screen, assessment_screen, classes_form_screen, grades_form_screen, login_screen, nav_menu,
    settings_screen, subject_screen, user_portal_screen,
};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Row<Message> {
        Row::new()
            .spacing(20)
            .push(
                // Sidebar only for signed-in users
                if self.session.is_some() {
                    Container::new(nav_menu(self))
                        .width(Length::Fixed(200.0))
                        .height(Length::Fill)
                        .padding(10)
                } else {
                    Container::new(Column::new())
                        .width(Length::Fixed(0.0))
                        .height(Length::Fill)
                }
            )
            .push(
                match &self.current_screen {
                    Screen::Login => login_screen(self),
                    Screen::Portal => user_portal_screen(self),
                    Screen::Subject(id) => subject_screen(self, id),
                    Screen::GradesEditor { id } => grades_form_screen(id.as_deref()),
                    Screen::ClassesEditor { id } => classes_form_screen(id.as_deref()),
                    Screen::Assessment => assessment_screen(self),
                    Screen::Settings => settings_screen(self),
                    Screen::AccessDenied => access_denied_screen(),
                }
                    .width(Length::Fill),
            )
    }
}
