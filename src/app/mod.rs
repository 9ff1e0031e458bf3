use crate::pages::{
    GuestOnly, HomePage, ImportantDatesPage, LoginPage, NotFound, RepositoryPage, RequireAuth,
    SearchPage,
};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app = AppState::new();
    app.restore_session();
    provide_context(AppContext(app));

    // Router hooks (`use_navigate`, `use_query_map`) need to run under <Router>.
    view! {
        <Router>
            <Routes fallback=|| view! { <NotFound /> }>
                <Route path=path!("login") view=move || view! {
                    <GuestOnly>
                        <LoginPage />
                    </GuestOnly>
                } />
                <Route path=path!("repository") view=move || view! {
                    <RequireAuth>
                        <RepositoryPage />
                    </RequireAuth>
                } />
                <Route path=path!("search") view=move || view! {
                    <RequireAuth>
                        <SearchPage />
                    </RequireAuth>
                } />
                <Route path=path!("important") view=move || view! {
                    <RequireAuth>
                        <ImportantDatesPage />
                    </RequireAuth>
                } />
                <Route path=path!("") view=move || view! {
                    <RequireAuth>
                        <HomePage />
                    </RequireAuth>
                } />
            </Routes>
        </Router>
    }
}
