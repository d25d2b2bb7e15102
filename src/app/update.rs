use std::sync::Arc;

use iced::Task;

use crate::api::{HttpPortalApi, PortalApi};
use crate::app::subscription::PushStatus;
use crate::config::{save_config, theme_from_str};
use crate::dashboard::DashboardController;
use crate::models::UserSession;
use crate::push::PushChannel;
use crate::routes::{parse_route, Screen};
use super::{App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FirstNameChanged(v) => {
                self.first_name = v;
                Task::none()
            }
            Message::GradeIdChanged(v) => {
                self.grade_id = v;
                Task::none()
            }
            Message::AccessKeyChanged(v) => {
                self.access_key = v;
                Task::none()
            }
            Message::LoginPressed => {
                let grade_id = self.grade_id.trim();
                let access_key = self.access_key.trim();
                if grade_id.is_empty() || access_key.is_empty() {
                    self.error_message = "Please enter your grade id and access key.".to_string();
                    return Task::none();
                }

                let session = UserSession {
                    first_name: self.first_name.trim().to_string(),
                    grade_id: grade_id.to_string(),
                    access_key: access_key.to_string(),
                };
                self.error_message.clear();
                self.start_session(session)
            }
            Message::Logout => {
                self.end_session();
                self.access_key.clear();
                self.current_screen = Screen::Login;
                Task::none()
            }
            Message::Navigate(location) => {
                self.navigate(&location);
                Task::none()
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = theme_from_str(name) {
                    self.config.theme_name = name.to_string();
                    if let Err(err) = save_config(&self.config) {
                        tracing::warn!(error = %err, "Failed to save theme");
                    }
                    self.theme = theme;
                }
                Task::none()
            }
            Message::DashboardUpdated(controller_id, snapshot) => {
                let current = self.dashboard.as_ref().map(|c| c.id());
                if current != Some(controller_id) {
                    tracing::debug!(controller_id, "Dropping snapshot from a previous session");
                    return Task::none();
                }
                if snapshot.revision >= self.snapshot.revision {
                    self.snapshot = snapshot;
                }
                Task::none()
            }
            Message::RefreshPressed => {
                let Some(controller) = self.dashboard.clone() else {
                    return Task::none();
                };
                let id = controller.id();
                tracing::info!(controller = id, "Manual dashboard refresh");
                Task::perform(
                    async move { controller.handle_refresh().await },
                    move |snapshot| Message::DashboardUpdated(id, snapshot),
                )
            }
            Message::PushStatus(status) => {
                self.push_connected = status == PushStatus::Connected;
                Task::none()
            }
            Message::ListPageChanged(kind, page) => {
                let list = self.list_state_mut(kind);
                list.page = page;
                list.expanded = None;
                Task::none()
            }
            Message::ListItemToggled(kind, index) => {
                let list = self.list_state_mut(kind);
                list.expanded = if list.expanded == Some(index) { None } else { Some(index) };
                Task::none()
            }
            Message::AnswerSelected(index) => {
                self.assessment.select(index);
                Task::none()
            }
            Message::AssessmentTextChanged(text) => {
                self.assessment.text = text;
                Task::none()
            }
            Message::NextQuestion => {
                self.assessment.next();
                if self.assessment.is_complete() {
                    tracing::info!(responses = self.assessment.responses.len(), "Assessment finished");
                }
                Task::none()
            }
            Message::RestartAssessment => {
                self.assessment.restart();
                Task::none()
            }
        }
    }

    fn start_session(&mut self, session: UserSession) -> Task<Message> {
        self.end_session();

        let api: Arc<dyn PortalApi> = Arc::new(HttpPortalApi::new(&self.config.api_base_url));
        let channel: Arc<dyn PushChannel> = Arc::new(self.push_channel.clone());
        let controller = DashboardController::new(api, channel, &session, &self.config.refresh_resource);
        let id = controller.id();

        tracing::info!(controller = id, grade_id = %session.grade_id, "Signed in");
        self.snapshot = controller.snapshot();
        self.dashboard = Some(Arc::clone(&controller));
        self.session = Some(session);
        self.reset_lists();
        self.current_screen = Screen::Portal;

        Task::perform(
            async move { controller.initialize().await },
            move |snapshot| Message::DashboardUpdated(id, snapshot),
        )
    }

    fn end_session(&mut self) {
        if let Some(controller) = self.dashboard.take() {
            controller.dispose();
        }
        self.session = None;
        self.push_connected = false;
        self.snapshot = Default::default();
    }

    fn navigate(&mut self, location: &str) {
        let Some(screen) = parse_route(location) else {
            tracing::warn!(location, "Unknown route");
            return;
        };

        if screen.requires_session() && self.session.is_none() {
            self.current_screen = Screen::AccessDenied;
            return;
        }
        if matches!(screen, Screen::Subject(_)) {
            self.subject_list = Default::default();
        }
        self.current_screen = screen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dashboard::DashboardSnapshot;
    use crate::models::Id;
    use crate::widgets::ListKind;

    fn app() -> App {
        App::new(Config::default())
    }

    fn signed_in() -> App {
        let mut app = app();
        app.grade_id = "g1".to_string();
        app.access_key = "key".to_string();
        let _ = app.update(Message::LoginPressed);
        app
    }

    #[test]
    fn login_requires_grade_and_key() {
        let mut app = app();
        app.grade_id = "g1".to_string();
        let _ = app.update(Message::LoginPressed);

        assert!(app.session.is_none());
        assert_eq!(app.current_screen, Screen::Login);
        assert!(!app.error_message.is_empty());
    }

    #[test]
    fn login_opens_the_portal_in_loading_state() {
        let app = signed_in();

        assert_eq!(app.current_screen, Screen::Portal);
        assert_eq!(app.session.as_ref().map(|s| s.grade_id.as_str()), Some("g1"));
        assert!(app.snapshot.loading);
        assert!(app.dashboard.is_some());
    }

    #[test]
    fn session_routes_are_denied_without_a_session() {
        let mut app = app();
        let _ = app.update(Message::Navigate("/grades?id=123".to_string()));
        assert_eq!(app.current_screen, Screen::AccessDenied);

        let _ = app.update(Message::Navigate("/settings".to_string()));
        assert_eq!(app.current_screen, Screen::Settings);
    }

    #[test]
    fn navigation_parses_query_and_subject_routes() {
        let mut app = signed_in();
        let _ = app.update(Message::Navigate("/grades?id=123".to_string()));
        assert_eq!(app.current_screen, Screen::GradesEditor { id: Some("123".to_string()) });

        let _ = app.update(Message::Navigate("/subject/7".to_string()));
        assert_eq!(app.current_screen, Screen::Subject(Id::new("7")));

        let _ = app.update(Message::Navigate("/unknown".to_string()));
        assert_eq!(app.current_screen, Screen::Subject(Id::new("7")));
    }

    #[test]
    fn snapshots_from_other_controllers_or_older_revisions_are_dropped() {
        let mut app = signed_in();
        let id = app.dashboard.as_ref().map(|c| c.id()).unwrap();

        let newer = DashboardSnapshot {
            loading: false,
            revision: 10,
            ..Default::default()
        };
        let _ = app.update(Message::DashboardUpdated(id, newer));
        assert!(!app.snapshot.loading);

        let older = DashboardSnapshot {
            loading: true,
            revision: 3,
            ..Default::default()
        };
        let _ = app.update(Message::DashboardUpdated(id, older));
        assert!(!app.snapshot.loading);

        let foreign = DashboardSnapshot {
            refreshing: true,
            revision: 99,
            loading: false,
            ..Default::default()
        };
        let _ = app.update(Message::DashboardUpdated(id + 1000, foreign));
        assert!(!app.snapshot.refreshing);
    }

    #[test]
    fn logout_disposes_the_controller() {
        let mut app = signed_in();
        let controller = app.dashboard.clone().unwrap();

        let _ = app.update(Message::Logout);

        assert!(controller.is_disposed());
        assert!(app.dashboard.is_none());
        assert!(app.session.is_none());
        assert!(app.access_key.is_empty());
        assert_eq!(app.current_screen, Screen::Login);
    }

    #[test]
    fn each_session_gets_its_own_push_connection() {
        let mut app = App::new(Config {
            push_url: Some("http://localhost:3001/events".to_string()),
            ..Config::default()
        });
        assert_eq!(app.push_key(), None);

        app.grade_id = "g1".to_string();
        app.access_key = "first".to_string();
        let _ = app.update(Message::LoginPressed);
        let first = app.push_key().unwrap();

        app.access_key = "second".to_string();
        let _ = app.update(Message::LoginPressed);
        let second = app.push_key().unwrap();

        assert_eq!(first.url, second.url);
        assert_ne!(first, second);

        let _ = app.update(Message::Logout);
        assert_eq!(app.push_key(), None);
    }

    #[test]
    fn list_paging_collapses_the_expanded_item() {
        let mut app = app();
        let _ = app.update(Message::ListItemToggled(ListKind::School, 1));
        assert_eq!(app.school_list.expanded, Some(1));

        let _ = app.update(Message::ListItemToggled(ListKind::School, 1));
        assert_eq!(app.school_list.expanded, None);

        let _ = app.update(Message::ListItemToggled(ListKind::Grade, 0));
        let _ = app.update(Message::ListPageChanged(ListKind::Grade, 2));
        assert_eq!(app.grade_list.page, 2);
        assert_eq!(app.grade_list.expanded, None);
    }
}
