use crate::app::subscription::PushStatus;
use crate::dashboard::DashboardSnapshot;
use crate::widgets::ListKind;

#[derive(Debug, Clone)]
pub enum Message {
    FirstNameChanged(String),
    GradeIdChanged(String),
    AccessKeyChanged(String),
    LoginPressed,
    Logout,
    //
    Navigate(String),
    ThemeSelected(&'static str),
    // Dashboard, tagged with the id of the controller that produced the snapshot
    DashboardUpdated(u64, DashboardSnapshot),
    RefreshPressed,
    PushStatus(PushStatus),
    //
    ListPageChanged(ListKind, usize),
    ListItemToggled(ListKind, usize),
    // Assessment
    AnswerSelected(usize),
    AssessmentTextChanged(String),
    NextQuestion,
    RestartAssessment,
}
