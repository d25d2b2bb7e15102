//! Data-loading and live-refresh controller behind the user portal.
//!
//! The controller issues the grade and school-announcement reads together, joins them and
//! derives the dashboard view from both results. After the first load it keeps listening for
//! `refresh-<resource>` push events and repeats the cycle without clearing what is on screen.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::{FetchError, FetchResult, PortalApi};
use crate::models::{Announcement, GradeRecord, SubjectSummary, UserSession};
use crate::push::{self, EventHandler, EventSubscription, PushChannel};

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

/// What the portal renders. `grade_announcements` is not stored, see
/// [`DashboardSnapshot::grade_announcements`].
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub subjects: Vec<SubjectSummary>,
    pub school_announcements: Vec<Announcement>,
    pub loading: bool,
    pub refreshing: bool,
    pub revision: u64,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            subjects: Vec::new(),
            school_announcements: Vec::new(),
            loading: true,
            refreshing: false,
            revision: 0,
        }
    }
}

impl DashboardSnapshot {
    pub fn grade_announcements(&self) -> Vec<Announcement> {
        flatten_announcements(&self.subjects)
    }

    pub fn subject(&self, id: &str) -> Option<&SubjectSummary> {
        self.subjects.iter().find(|subject| subject.id.as_str() == id)
    }
}

/// Every subject's announcements in subject order, each subject keeping its own order.
pub fn flatten_announcements(subjects: &[SubjectSummary]) -> Vec<Announcement> {
    subjects
        .iter()
        .flat_map(|subject| subject.announcements.iter().cloned())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    Initial,
    Refresh,
}

/// One dispatched load cycle. `flagged` cycles are the ones that raised `refreshing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    pub generation: u64,
    pub kind: CycleKind,
    flagged: bool,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub grade: FetchResult<GradeRecord>,
    pub school: FetchResult<Vec<Announcement>>,
}

/// View state plus the bookkeeping that orders overlapping cycles.
#[derive(Debug, Default)]
pub struct DashboardState {
    view: DashboardSnapshot,
    dispatched: u64,
    applied: u64,
    pending_refreshes: usize,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &DashboardSnapshot {
        &self.view
    }

    pub fn begin(&mut self, kind: CycleKind) -> Cycle {
        self.dispatched += 1;
        let flagged = match kind {
            CycleKind::Initial => {
                self.view.loading = true;
                false
            }
            // While the first load is outstanding the spinner already covers this cycle.
            CycleKind::Refresh if self.view.loading => false,
            CycleKind::Refresh => {
                self.pending_refreshes += 1;
                self.view.refreshing = true;
                true
            }
        };
        self.view.revision += 1;

        Cycle {
            generation: self.dispatched,
            kind,
            flagged,
        }
    }

    /// Applies a joined cycle. Returns false when a newer cycle had already been applied
    /// and this one's data was dropped.
    pub fn complete(&mut self, cycle: Cycle, outcome: LoadOutcome) -> bool {
        if cycle.flagged {
            self.pending_refreshes = self.pending_refreshes.saturating_sub(1);
            self.view.refreshing = self.pending_refreshes > 0;
        }

        let fresh = cycle.generation > self.applied;
        if fresh {
            self.applied = cycle.generation;
            self.view.subjects = match outcome.grade {
                Ok(record) => record.subjects,
                Err(_) => Vec::new(),
            };
            self.view.school_announcements = outcome.school.unwrap_or_default();
            self.view.loading = false;
        }
        self.view.revision += 1;
        fresh
    }
}

struct PendingCycle {
    cycle: Cycle,
    grade: JoinHandle<FetchResult<GradeRecord>>,
    school: JoinHandle<FetchResult<Vec<Announcement>>>,
}

pub struct DashboardController {
    id: u64,
    api: Arc<dyn PortalApi>,
    channel: Arc<dyn PushChannel>,
    grade_id: String,
    access_key: String,
    resource_class: String,
    state: Mutex<DashboardState>,
    updates: watch::Sender<DashboardSnapshot>,
    subscription: Mutex<Option<EventSubscription>>,
    initialized: AtomicBool,
    subscribed: AtomicBool,
    disposed: AtomicBool,
}

impl DashboardController {
    pub fn new(
        api: Arc<dyn PortalApi>,
        channel: Arc<dyn PushChannel>,
        session: &UserSession,
        resource_class: &str,
    ) -> Arc<Self> {
        let state = DashboardState::new();
        let (updates, _) = watch::channel(state.view().clone());
        Arc::new(Self {
            id: NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed),
            api,
            channel,
            grade_id: session.grade_id.clone(),
            access_key: session.access_key.clone(),
            resource_class: resource_class.to_string(),
            state: Mutex::new(state),
            updates,
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
            subscribed: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().view().clone()
    }

    pub fn updates(&self) -> watch::Receiver<DashboardSnapshot> {
        self.updates.subscribe()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Dispatches the first load and registers the refresh handler before returning.
    /// The returned future resolves once both reads have settled. Only the first call loads;
    /// later calls resolve to the current snapshot.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(self: &Arc<Self>) -> impl Future<Output = DashboardSnapshot> + Send + use<> {
        let pending = if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!(controller = self.id, "Dashboard already initialized");
            None
        } else {
            self.dispatch(CycleKind::Initial)
        };
        self.subscribe();
        let this = Arc::clone(self);
        async move { this.settle(pending).await }
    }

    /// Reloads both reads under the `refreshing` flag. Safe to call while another cycle is
    /// in flight; the newest generation wins.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn handle_refresh(self: &Arc<Self>) -> impl Future<Output = DashboardSnapshot> + Send + use<> {
        let pending = self.dispatch(CycleKind::Refresh);
        let this = Arc::clone(self);
        async move { this.settle(pending).await }
    }

    /// Releases the push subscription. Results of cycles still in flight are discarded.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(subscription) = self.subscription.lock().take() {
            subscription.unsubscribe();
        }
        tracing::info!(controller = self.id, "Dashboard controller disposed");
    }

    fn dispatch(&self, kind: CycleKind) -> Option<PendingCycle> {
        if self.is_disposed() {
            tracing::debug!(controller = self.id, ?kind, "Ignoring load on disposed controller");
            return None;
        }

        let cycle = {
            let mut state = self.state.lock();
            let cycle = state.begin(kind);
            self.updates.send_replace(state.view().clone());
            cycle
        };
        tracing::debug!(controller = self.id, generation = cycle.generation, ?kind, "Dispatching dashboard load");

        let api = Arc::clone(&self.api);
        let grade_id = self.grade_id.clone();
        let access_key = self.access_key.clone();
        let grade = tokio::spawn(async move { api.fetch_grade_record(&grade_id, &access_key).await });

        let api = Arc::clone(&self.api);
        let access_key = self.access_key.clone();
        let school = tokio::spawn(async move { api.fetch_school_announcements(&access_key).await });

        Some(PendingCycle { cycle, grade, school })
    }

    async fn settle(&self, pending: Option<PendingCycle>) -> DashboardSnapshot {
        let Some(PendingCycle { cycle, grade, school }) = pending else {
            return self.snapshot();
        };

        let (grade, school) = tokio::join!(grade, school);
        let outcome = LoadOutcome {
            grade: grade.unwrap_or_else(|e| Err(FetchError::FetchFailed(format!("grade fetch task: {}", e)))),
            school: school.unwrap_or_else(|e| Err(FetchError::FetchFailed(format!("school fetch task: {}", e)))),
        };

        if let Err(err) = &outcome.grade {
            tracing::warn!(controller = self.id, generation = cycle.generation, error = %err, "Grade record unavailable");
        }
        if let Err(err) = &outcome.school {
            tracing::warn!(controller = self.id, generation = cycle.generation, error = %err, "School announcements unavailable");
        }

        if self.is_disposed() {
            tracing::debug!(controller = self.id, generation = cycle.generation, "Discarding load for disposed controller");
            return self.snapshot();
        }

        let mut state = self.state.lock();
        if !state.complete(cycle, outcome) {
            tracing::debug!(
                controller = self.id,
                generation = cycle.generation,
                kind = ?cycle.kind,
                "Discarding stale dashboard load"
            );
        }
        let view = state.view().clone();
        self.updates.send_replace(view.clone());
        view
    }

    fn subscribe(self: &Arc<Self>) {
        if self.is_disposed() || self.subscribed.swap(true, Ordering::SeqCst) {
            return;
        }

        let event = push::refresh_event(&self.resource_class);
        let weak = Arc::downgrade(self);
        let handler: EventHandler = Arc::new(move || {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            if controller.is_disposed() {
                return;
            }
            tokio::spawn(controller.handle_refresh());
        });

        let subscription = self.channel.on(&event, handler);
        tracing::info!(controller = self.id, event = %event, "Subscribed to push invalidation");
        *self.subscription.lock() = Some(subscription);
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.get_mut().take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Id;

    fn announcement(id: &str, title: &str) -> Announcement {
        Announcement {
            id: Id::new(id),
            title: title.to_string(),
            body: String::new(),
            scope: Default::default(),
            created_at: None,
        }
    }

    fn subject(id: &str, name: &str, announcements: Vec<Announcement>) -> SubjectSummary {
        SubjectSummary {
            id: Id::new(id),
            name: name.to_string(),
            announcements,
        }
    }

    fn record(subjects: Vec<SubjectSummary>) -> GradeRecord {
        GradeRecord { id: None, subjects }
    }

    #[test]
    fn flatten_keeps_subject_then_announcement_order() {
        let subjects = vec![
            subject("1", "S1", vec![announcement("a", "a"), announcement("b", "b")]),
            subject("2", "S2", vec![announcement("c", "c")]),
        ];

        let titles: Vec<String> = flatten_announcements(&subjects).into_iter().map(|a| a.title).collect();

        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn failed_grade_fetch_clears_subjects() {
        let mut state = DashboardState::new();
        let first = state.begin(CycleKind::Initial);
        state.complete(
            first,
            LoadOutcome {
                grade: Ok(record(vec![subject("1", "Math", vec![announcement("a1", "Quiz")])])),
                school: Ok(vec![announcement("s1", "Holiday")]),
            },
        );

        let second = state.begin(CycleKind::Refresh);
        state.complete(
            second,
            LoadOutcome {
                grade: Err(FetchError::EmptyResult),
                school: Ok(vec![announcement("s2", "Exams")]),
            },
        );

        assert!(state.view().subjects.is_empty());
        assert!(state.view().grade_announcements().is_empty());
        assert_eq!(state.view().school_announcements[0].title, "Exams");
    }

    #[test]
    fn failed_school_fetch_degrades_to_empty() {
        let mut state = DashboardState::new();
        let cycle = state.begin(CycleKind::Initial);
        state.complete(
            cycle,
            LoadOutcome {
                grade: Ok(record(vec![subject("1", "Math", vec![])])),
                school: Err(FetchError::FetchFailed("timeout".to_string())),
            },
        );

        assert_eq!(state.view().subjects.len(), 1);
        assert!(state.view().school_announcements.is_empty());
        assert!(!state.view().loading);
    }

    #[test]
    fn stale_cycle_does_not_overwrite_newer_result() {
        let mut state = DashboardState::new();
        let initial = state.begin(CycleKind::Initial);
        state.complete(initial, LoadOutcome { grade: Ok(record(vec![])), school: Ok(vec![]) });

        let older = state.begin(CycleKind::Refresh);
        let newer = state.begin(CycleKind::Refresh);
        assert!(state.view().refreshing);

        let applied = state.complete(
            newer,
            LoadOutcome {
                grade: Ok(record(vec![subject("2", "Fresh", vec![])])),
                school: Ok(vec![]),
            },
        );
        assert!(applied);
        assert!(state.view().refreshing, "older cycle still in flight");

        let applied = state.complete(
            older,
            LoadOutcome {
                grade: Ok(record(vec![subject("1", "Stale", vec![])])),
                school: Ok(vec![]),
            },
        );
        assert!(!applied);
        assert!(!state.view().refreshing);
        assert_eq!(state.view().subjects[0].name, "Fresh");
    }

    #[test]
    fn refresh_during_initial_load_never_raises_refreshing() {
        let mut state = DashboardState::new();
        let initial = state.begin(CycleKind::Initial);
        let refresh = state.begin(CycleKind::Refresh);

        assert!(state.view().loading);
        assert!(!state.view().refreshing);

        state.complete(refresh, LoadOutcome { grade: Ok(record(vec![])), school: Ok(vec![]) });
        assert!(!state.view().loading);
        assert!(!state.view().refreshing);

        assert!(!state.complete(initial, LoadOutcome { grade: Ok(record(vec![])), school: Ok(vec![]) }));
    }

    #[test]
    fn every_transition_bumps_the_revision() {
        let mut state = DashboardState::new();
        let before = state.view().revision;
        let cycle = state.begin(CycleKind::Initial);
        let dispatched = state.view().revision;
        state.complete(cycle, LoadOutcome { grade: Err(FetchError::EmptyResult), school: Ok(vec![]) });

        assert!(dispatched > before);
        assert!(state.view().revision > dispatched);
    }
}
