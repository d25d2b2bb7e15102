use std::sync::Arc;

use iced::Theme;

use crate::assessment::AssessmentState;
use crate::config::{load_config, Config};
use crate::dashboard::{DashboardController, DashboardSnapshot};
use crate::models::UserSession;
use crate::push::LocalPushChannel;
use crate::routes::Screen;
use crate::widgets::{ListKind, ListState};

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub current_screen: Screen,
    // Sign-in form
    pub first_name: String,
    pub grade_id: String,
    pub access_key: String,
    pub error_message: String,
    //
    pub session: Option<UserSession>,
    pub push_channel: LocalPushChannel,
    pub push_connected: bool,
    pub dashboard: Option<Arc<DashboardController>>,
    pub snapshot: DashboardSnapshot,
    //
    pub school_list: ListState,
    pub grade_list: ListState,
    pub subject_list: ListState,
    //
    pub assessment: AssessmentState,
}

impl Default for App {
    fn default() -> Self {
        Self::new(load_config())
    }
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            theme: config.theme(),
            current_screen: Screen::Login,
            first_name: config.first_name.clone().unwrap_or_default(),
            grade_id: config.grade_id.clone().unwrap_or_default(),
            access_key: config.access_key.clone().unwrap_or_default(),
            error_message: String::new(),
            session: None,
            push_channel: LocalPushChannel::new(),
            push_connected: false,
            dashboard: None,
            snapshot: DashboardSnapshot::default(),
            school_list: ListState::default(),
            grade_list: ListState::default(),
            subject_list: ListState::default(),
            assessment: AssessmentState::default(),
            config,
        }
    }

    pub fn list_state_mut(&mut self, kind: ListKind) -> &mut ListState {
        match kind {
            ListKind::School => &mut self.school_list,
            ListKind::Grade => &mut self.grade_list,
            ListKind::Subject => &mut self.subject_list,
        }
    }

    pub fn reset_lists(&mut self) {
        self.school_list = ListState::default();
        self.grade_list = ListState::default();
        self.subject_list = ListState::default();
    }
}
