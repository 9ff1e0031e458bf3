use crate::auth::{refresh_delay_ms, AnyAuth, AuthProvider, RefreshStep, Session};
use crate::config::EnvConfig;
use crate::error::JournalError;
use crate::journal::day::{self, DayState, DayViewKey};
use crate::journal::important::{apply_important, ImportantState};
use crate::journal::repository::{RepositoryKey, RepositoryState};
use crate::journal::search::{self, SearchParams, SearchState};
use crate::journal::pump;
use crate::models::EntryType;
use crate::storage::{apply_theme, clear_session_storage, load_session_from_storage, load_theme, save_session_to_storage, Theme};
use crate::store::{AnyStore, EntryStore};
use crate::util::{now_ms, DayKey};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

#[derive(Clone)]
pub(crate) struct AppState {
    pub store: AnyStore,
    pub auth: AnyAuth,

    pub session: RwSignal<Option<Session>>,
    /// True until the stored session has been checked at startup.
    pub restoring: RwSignal<bool>,

    pub theme: RwSignal<Theme>,

    /// Background ID-token refresh for the current session.
    refresher: StoredValue<Option<AbortHandle>>,
}

/// Back-off after a refresh that failed on the network.
const REFRESH_RETRY_MS: u32 = 30_000;

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::from_window();
        let store = AnyStore::from_config(&config);
        let auth = AnyAuth::from_config(&config);
        let theme = load_theme();
        apply_theme(theme);

        Self {
            store,
            auth,
            session: RwSignal::new(None),
            restoring: RwSignal::new(true),
            theme: RwSignal::new(theme),
            refresher: StoredValue::new(None),
        }
    }

    pub fn is_local(&self) -> bool {
        self.store.is_local()
    }

    pub fn start_session(&self, session: Session) {
        log::info!("signed in as {}", session.user.uid);
        self.store.set_token(Some(session.id_token.clone()));
        if self.auth.persists_sessions() {
            save_session_to_storage(&session);
        }
        self.schedule_refresh(&session);
        self.session.set(Some(session));
    }

    fn stop_refresh(&self) {
        if let Some(Some(h)) = self.refresher.try_get_value() {
            h.abort();
        }
        let _ = self.refresher.try_update_value(|h| *h = None);
    }

    /// Renews the ID token shortly before it expires. Every renewal goes
    /// through `start_session`, which schedules the next one.
    fn schedule_refresh(&self, session: &Session) {
        self.stop_refresh();
        let Some(delay) = refresh_delay_ms(session, now_ms()) else {
            return;
        };
        log::debug!("next session refresh in {delay} ms");
        let (handle, reg) = AbortHandle::new_pair();
        self.refresher.set_value(Some(handle));
        let (app, session) = (self.clone(), session.clone());
        spawn_local(async move {
            let _ = Abortable::new(app.keep_fresh(session, delay), reg).await;
        });
    }

    async fn keep_fresh(self, session: Session, mut delay: u32) {
        loop {
            TimeoutFuture::new(delay).await;
            match RefreshStep::from_result(self.auth.refresh(session.clone()).await) {
                RefreshStep::Renewed(next) => {
                    self.start_session(next);
                    return;
                }
                RefreshStep::Retry => delay = REFRESH_RETRY_MS,
                RefreshStep::SignOut => {
                    self.sign_out();
                    return;
                }
            }
        }
    }

    pub fn sign_out(&self) {
        self.stop_refresh();
        self.auth.sign_out();
        self.store.set_token(None);
        clear_session_storage();
        self.session.set(None);
    }

    /// Picks up the session saved by a previous visit.
    pub fn restore_session(&self) {
        let app = self.clone();
        spawn_local(async move {
            if let Some(stored) = load_session_from_storage() {
                match app.auth.restore(stored).await {
                    Some(session) => app.start_session(session),
                    None => clear_session_storage(),
                }
            }
            app.restoring.set(false);
        });
    }

    pub fn toggle_theme(&self) {
        let next = self.theme.get_untracked().toggled();
        apply_theme(next);
        self.theme.set(next);
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

/// Uid of the signed-in user; only notifies when it actually changes.
fn use_user_id() -> Memo<Option<String>> {
    let session = expect_context::<AppContext>().0.session;
    Memo::new(move |_| session.with(|s| s.as_ref().map(|s| s.user.uid.clone())))
}

/// Owns the background task of a live view; restarting aborts the previous
/// one, which drops its subscription.
#[derive(Clone, Copy)]
struct LiveTask(StoredValue<Option<AbortHandle>>);

impl LiveTask {
    fn new() -> Self {
        let handle = StoredValue::new(None::<AbortHandle>);
        on_cleanup(move || {
            if let Some(Some(h)) = handle.try_get_value() {
                h.abort();
            }
        });
        Self(handle)
    }

    fn stop(&self) {
        if let Some(h) = self.0.get_value() {
            h.abort();
        }
        self.0.set_value(None);
    }

    fn restart(&self, fut: impl Future<Output = ()> + 'static) {
        self.stop();
        let (handle, reg): (AbortHandle, AbortRegistration) = AbortHandle::new_pair();
        self.0.set_value(Some(handle));
        spawn_local(async move {
            let _ = Abortable::new(fut, reg).await;
        });
    }
}

#[derive(Clone, Copy)]
pub(crate) struct JournalHandle {
    pub state: RwSignal<DayState>,
    store: StoredValue<AnyStore>,
}

impl JournalHandle {
    fn key(&self) -> Option<DayViewKey> {
        self.state.with_untracked(|s| s.key().cloned())
    }

    fn report(state: RwSignal<DayState>, error: JournalError) {
        state.try_update(|s| s.entries.record_error(error));
    }

    /// Fire-and-forget; the live list picks the entry up.
    pub fn add_entry(&self, content: String, entry_type: EntryType) {
        let (state, store, key) = (self.state, self.store.get_value(), self.key());
        spawn_local(async move {
            if let Err(e) = day::add_entry(&store, key.as_ref(), &content, entry_type).await {
                Self::report(state, e);
            }
        });
    }

    pub fn toggle_task(&self, id: String) {
        let (state, store) = (self.state, self.store.get_value());
        let Some(key) = self.key() else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = day::toggle_task(&store, &key, &id).await {
                Self::report(state, e);
            }
        });
    }

    pub fn edit_entry(&self, id: String, content: String) {
        let (state, store) = (self.state, self.store.get_value());
        let Some(key) = self.key() else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = day::edit_entry(&store, &key, &id, &content).await {
                Self::report(state, e);
            }
        });
    }

    pub fn delete_entry(&self, id: String) {
        let (state, store) = (self.state, self.store.get_value());
        let Some(key) = self.key() else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = day::delete_entry(&store, &key, &id).await {
                Self::report(state, e);
            }
        });
    }

    pub fn toggle_importance(&self) {
        let (state, store) = (self.state, self.store.get_value());
        let Some(req) = state.try_update(|s| s.begin_importance_toggle()).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = day::persist_importance(&store, &req).await;
            state.try_update(|s| s.finish_importance_toggle(&req, result));
        });
    }

    pub fn dismiss_error(&self) {
        self.state.update(|s| s.entries.clear_error());
    }
}

/// Day view for the signed-in user on `date`.
pub(crate) fn use_journal(date: Signal<DayKey>) -> JournalHandle {
    let app = expect_context::<AppContext>().0;
    let user_id = use_user_id();
    let state = RwSignal::new(DayState::default());
    let store = StoredValue::new(app.store.clone());
    let task = LiveTask::new();

    Effect::new(move |_| {
        let key = DayViewKey::new(user_id.get().as_deref(), &date.get());
        state.update(|s| s.begin(key.clone()));
        let Some(key) = key else {
            task.stop();
            return;
        };
        let store = store.get_value();
        log::debug!("subscribing to day {}", key.date);
        let sub = store.subscribe_entries_for_date(&key.user_id, &key.date);

        task.restart(async move {
            let seed = {
                let key = key.clone();
                async move {
                    let meta = store.get_day(&key.user_id, &key.date).await;
                    state.try_update(|s| s.apply_day_meta(&key, meta));
                }
            };
            let live = pump(sub, move |item| {
                state
                    .try_update(|s| s.apply_snapshot(&key, item))
                    .unwrap_or(false)
            });
            futures::future::join(seed, live).await;
        });
    });

    JournalHandle { state, store }
}

/// Every entry of the selected category, newest first.
pub(crate) fn use_repository(entry_type: Signal<EntryType>) -> RwSignal<RepositoryState> {
    let app = expect_context::<AppContext>().0;
    let user_id = use_user_id();
    let state = RwSignal::new(RepositoryState::default());
    let store = StoredValue::new(app.store.clone());
    let task = LiveTask::new();

    Effect::new(move |_| {
        let key = RepositoryKey::new(user_id.get().as_deref(), entry_type.get());
        state.update(|s| s.begin(key.clone()));
        let Some(key) = key else {
            task.stop();
            return;
        };
        log::debug!("subscribing to {} entries", key.entry_type);
        let sub = store
            .get_value()
            .subscribe_entries_for_type(&key.user_id, key.entry_type);
        task.restart(pump(sub, move |item| {
            state.try_update(|s| s.apply(&key, item)).unwrap_or(false)
        }));
    });

    state
}

pub(crate) fn use_important_dates() -> RwSignal<ImportantState> {
    let app = expect_context::<AppContext>().0;
    let user_id = use_user_id();
    let state = RwSignal::new(ImportantState::default());
    let store = StoredValue::new(app.store.clone());
    let task = LiveTask::new();

    Effect::new(move |_| {
        let uid = user_id.get();
        state.update(|s| s.begin(uid.clone()));
        let Some(uid) = uid else {
            task.stop();
            return;
        };
        let sub = store.get_value().subscribe_important_days(&uid);
        task.restart(pump(sub, move |item| {
            state
                .try_update(|s| apply_important(s, &uid, item))
                .unwrap_or(false)
        }));
    });

    state
}

#[derive(Clone, Copy)]
pub(crate) struct SearchHandle {
    pub state: RwSignal<SearchState>,
    store: StoredValue<AnyStore>,
    user_id: Memo<Option<String>>,
}

impl SearchHandle {
    /// Starts a search; a search still in flight is superseded.
    pub fn run(&self, params: SearchParams) {
        let Some(uid) = self.user_id.get_untracked() else {
            return;
        };
        let (state, store) = (self.state, self.store.get_value());
        let Some(token) = state.try_update(|s| s.begin()) else {
            return;
        };
        spawn_local(async move {
            let result = search::search(&store, &uid, &params).await;
            state.try_update(|s| s.finish(token, &params.term, result));
        });
    }
}

pub(crate) fn use_search() -> SearchHandle {
    let app = expect_context::<AppContext>().0;
    SearchHandle {
        state: RwSignal::new(SearchState::default()),
        store: StoredValue::new(app.store.clone()),
        user_id: use_user_id(),
    }
}
