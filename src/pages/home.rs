use crate::components::glyphs::{ChevronLeftGlyph, StarGlyph};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, ErrorBanner, Input, PageSpinner};
use crate::components::{CategoryTabs, ComposerBox, EntryList};
use crate::journal::Phase;
use crate::models::EntryType;
use crate::state::use_journal;
use crate::util::{today_local, DayKey};
use icons::ChevronRight;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

/// `?date=` if it is a real date, today otherwise.
fn date_from_query(raw: Option<String>) -> DayKey {
    raw.and_then(|d| DayKey::parse(&d).ok())
        .unwrap_or_else(today_local)
}

#[component]
pub fn HomePage() -> impl IntoView {
    let query = use_query_map();
    let navigate = StoredValue::new(use_navigate());
    let date = Memo::new(move |_| date_from_query(query.get().get("date")));

    let journal = use_journal(date.into());
    let state = journal.state;
    let selected: RwSignal<EntryType> = RwSignal::new(EntryType::Task);

    let go_to = move |day: DayKey| {
        navigate.with_value(|nav| nav(&format!("/?date={day}"), Default::default()));
    };

    // Native picker; only complete dates navigate.
    let picker: RwSignal<String> = RwSignal::new(String::new());
    Effect::new(move |_| picker.set(date.get().to_string()));
    let on_pick = Callback::new(move |raw: String| {
        if let Ok(day) = DayKey::parse(&raw) {
            if day != date.get_untracked() {
                go_to(day);
            }
        }
    });

    let is_today = move || date.get() == today_local();
    let is_important = move || state.with(|s| s.is_important);
    let loading = move || matches!(state.with(|s| s.phase()), Phase::Uninitialized | Phase::Loading);
    let error = Signal::derive(move || state.with(|s| s.error().cloned()));
    let entries = Signal::derive(move || state.with(|s| s.entries_of(selected.get())));

    view! {
        <div class="space-y-6">
            <div class="flex items-start justify-between gap-3">
                <div class="space-y-1">
                    <p class="text-xs font-medium uppercase tracking-widest text-stone-400">
                        {move || if is_today() { "Today".to_string() } else { date.get().weekday_year() }}
                    </p>
                    <h1 class="font-serif text-3xl font-bold tracking-tight">{move || date.get().heading()}</h1>
                </div>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Mark day as important"
                    attr:aria-pressed=move || is_important().to_string()
                    on:click=move |_| journal.toggle_importance()
                >
                    <span class=move || {
                        if is_important() { "text-amber-500" } else { "text-stone-300 dark:text-stone-600" }
                    }>
                        <StarGlyph filled=Signal::derive(is_important) />
                    </span>
                </Button>
            </div>

            <div class="flex items-center gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Icon
                    attr:aria-label="Previous day"
                    on:click=move |_| go_to(date.get_untracked().shift(-1))
                >
                    <ChevronLeftGlyph />
                </Button>
                <Input r#type="date" class="w-auto" bind_value=picker on_change=on_pick />
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Icon
                    attr:aria-label="Next day"
                    on:click=move |_| go_to(date.get_untracked().shift(1))
                >
                    <ChevronRight />
                </Button>
                <Show when=move || !is_today()>
                    <Button variant=ButtonVariant::Link size=ButtonSize::Sm on:click=move |_| go_to(today_local())>
                        "Today"
                    </Button>
                </Show>
            </div>

            <CategoryTabs selected=selected types=EntryType::all() />

            <ErrorBanner error=error on_dismiss=Callback::new(move |_| journal.dismiss_error()) />

            <Show when=move || !loading() fallback=|| view! { <PageSpinner /> }>
                <EntryList
                    entries=entries
                    on_toggle=Callback::new(move |id: String| journal.toggle_task(id))
                    on_delete=Callback::new(move |id: String| journal.delete_entry(id))
                    on_edit=Callback::new(move |(id, content): (String, String)| {
                        journal.edit_entry(id, content)
                    })
                />
            </Show>

            <div class="sticky bottom-20 md:bottom-6">
                <ComposerBox
                    entry_type=selected
                    on_submit=Callback::new(move |(content, entry_type): (String, EntryType)| {
                        journal.add_entry(content, entry_type)
                    })
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_date_falls_back_to_today() {
        assert_eq!(date_from_query(Some("2024-03-05".to_string())).as_str(), "2024-03-05");
        assert_eq!(date_from_query(Some("tomorrow".to_string())), today_local());
        assert_eq!(date_from_query(None), today_local());
    }
}
