use crate::components::ui::{ErrorBanner, PageSpinner};
use crate::components::{CategoryTabs, EntryList};
use crate::journal::Phase;
use crate::models::EntryType;
use crate::state::use_repository;
use leptos::prelude::*;

/// Long-lived entries across all days, one category at a time.
#[component]
pub fn RepositoryPage() -> impl IntoView {
    let selected: RwSignal<EntryType> = RwSignal::new(EntryType::Vocabulary);
    let state = use_repository(selected.into());

    let loading = move || state.with(|s| matches!(s.phase, Phase::Uninitialized | Phase::Loading));
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let entries = Signal::derive(move || state.with(|s| s.items.clone()));

    view! {
        <div class="space-y-6">
            <h1 class="font-serif text-3xl font-bold tracking-tight">"Repository"</h1>
            <CategoryTabs selected=selected types=EntryType::repository_tabs().to_vec() />
            <ErrorBanner error=error />
            <Show when=move || !loading() fallback=|| view! { <PageSpinner /> }>
                <EntryList entries=entries show_date=true />
            </Show>
        </div>
    }
}
