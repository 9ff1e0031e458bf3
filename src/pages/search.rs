use crate::components::ui::{Button, ButtonSize, ErrorBanner, Input, Label, PageSpinner};
use crate::components::{EntryList, TypeChips};
use crate::error::JournalError;
use crate::journal::search::SearchParams;
use crate::models::EntryType;
use crate::state::use_search;
use crate::util::{DateRange, DayKey};
use leptos::prelude::*;

/// Both dates or neither; a half-filled range is an input error.
fn range_from_inputs(from: &str, to: &str) -> Result<Option<DateRange>, JournalError> {
    let parse = |raw: &str| {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        DayKey::parse(raw)
            .map(Some)
            .map_err(|_| JournalError::InvalidInput(format!("\"{raw}\" is not a date.")))
    };
    match (parse(from)?, parse(to)?) {
        (Some(start), Some(end)) => Ok(Some(DateRange { start, end })),
        (None, None) => Ok(None),
        _ => Err(JournalError::InvalidInput(
            "Pick both a start and an end date.".to_string(),
        )),
    }
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let handle = use_search();
    let state = handle.state;

    let term: RwSignal<String> = RwSignal::new(String::new());
    let entry_type: RwSignal<Option<EntryType>> = RwSignal::new(None);
    let from: RwSignal<String> = RwSignal::new(String::new());
    let to: RwSignal<String> = RwSignal::new(String::new());
    let input_error: RwSignal<Option<JournalError>> = RwSignal::new(None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match range_from_inputs(&from.get_untracked(), &to.get_untracked()) {
            Ok(range) => {
                input_error.set(None);
                handle.run(SearchParams {
                    term: term.get_untracked(),
                    entry_type: entry_type.get_untracked(),
                    range,
                });
            }
            Err(e) => input_error.set(Some(e)),
        }
    };

    let error = Signal::derive(move || input_error.get().or_else(|| state.with(|s| s.error.clone())));
    let searching = move || state.with(|s| s.searching);
    let results = Signal::derive(move || state.with(|s| s.results.clone()));
    let has_results = move || state.with(|s| !s.results.is_empty());

    view! {
        <div class="space-y-6">
            <h1 class="font-serif text-3xl font-bold tracking-tight">"Search"</h1>

            <form class="space-y-4" on:submit=on_submit>
                <div class="flex gap-2">
                    <Input
                        r#type="search"
                        placeholder="Search entries..."
                        bind_value=term
                        autofocus=true
                        class="h-10"
                    />
                    <Button size=ButtonSize::Default class="h-10" attr:disabled=searching>
                        "Apply"
                    </Button>
                </div>

                <TypeChips selected=entry_type />

                <div class="flex flex-wrap items-end gap-3">
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="search-from" class="text-xs">"From"</Label>
                        <Input id="search-from" r#type="date" bind_value=from class="h-9 w-auto" />
                    </div>
                    <div class="flex flex-col gap-1.5">
                        <Label html_for="search-to" class="text-xs">"To"</Label>
                        <Input id="search-to" r#type="date" bind_value=to class="h-9 w-auto" />
                    </div>
                </div>
            </form>

            <ErrorBanner error=error />

            <Show when=move || !searching() fallback=|| view! { <PageSpinner /> }>
                <Show when=has_results>
                    <EntryList entries=results show_date=true />
                </Show>
                <Show when=move || state.with(|s| s.no_results())>
                    <div class="py-12 text-center font-serif text-sm italic text-stone-400">"No results found."</div>
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_mean_no_range() {
        assert_eq!(range_from_inputs("", " ").expect("no range"), None);
    }

    #[test]
    fn test_full_range_is_parsed() {
        let range = range_from_inputs("2024-01-01", "2024-01-31")
            .expect("valid")
            .expect("range");
        assert_eq!(range.start.as_str(), "2024-01-01");
        assert_eq!(range.end.as_str(), "2024-01-31");
    }

    #[test]
    fn test_half_range_is_rejected() {
        assert!(matches!(
            range_from_inputs("2024-01-01", ""),
            Err(JournalError::InvalidInput(_))
        ));
        assert!(matches!(
            range_from_inputs("", "2024-01-01"),
            Err(JournalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_garbage_date_is_rejected() {
        assert!(range_from_inputs("01/02/2024", "2024-01-31").is_err());
    }
}
