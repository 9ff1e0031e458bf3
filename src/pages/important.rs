use crate::components::ui::{ErrorBanner, PageSpinner};
use crate::journal::Phase;
use crate::state::use_important_dates;
use icons::ChevronRight;
use leptos::prelude::*;

#[component]
pub fn ImportantDatesPage() -> impl IntoView {
    let state = use_important_dates();

    let loading = move || state.with(|s| matches!(s.phase, Phase::Uninitialized | Phase::Loading));
    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let is_empty = move || state.with(|s| s.items.is_empty());

    view! {
        <div class="space-y-6">
            <div class="space-y-1">
                <h1 class="font-serif text-3xl font-bold tracking-tight">"Important"</h1>
                <p class="text-sm text-stone-500 dark:text-stone-400">"Days you starred, most recent first."</p>
            </div>

            <ErrorBanner error=error />

            <Show when=move || !loading() fallback=|| view! { <PageSpinner /> }>
                <Show
                    when=move || !is_empty()
                    fallback=|| view! {
                        <div class="py-12 text-center font-serif text-sm italic text-stone-400">
                            "No important days yet."
                        </div>
                    }
                >
                    <ul class="grid gap-3 sm:grid-cols-2">
                        {move || {
                            state
                                .get()
                                .items
                                .into_iter()
                                .map(|day| {
                                    let (month, dom) = day.date.month_day_tile();
                                    view! {
                                        <li>
                                            <a
                                                href=format!("/?date={}", day.date)
                                                class="group flex items-center gap-4 rounded-xl border border-stone-200 bg-white p-4 shadow-sm transition-colors hover:border-stone-400 dark:border-stone-800 dark:bg-stone-900 dark:hover:border-stone-600"
                                            >
                                                <div class="flex size-14 shrink-0 flex-col items-center justify-center rounded-lg bg-amber-50 text-amber-700 dark:bg-amber-950/40 dark:text-amber-400">
                                                    <span class="text-[10px] font-semibold uppercase tracking-wider">{month}</span>
                                                    <span class="font-serif text-xl font-bold leading-none">{dom}</span>
                                                </div>
                                                <div class="min-w-0 flex-1">
                                                    <div class="font-medium">{day.date.heading()}</div>
                                                    <div class="text-xs text-stone-500">{day.date.weekday_year()}</div>
                                                </div>
                                                <ChevronRight class="size-4 text-stone-300 group-hover:text-stone-500" />
                                            </a>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </Show>
            </Show>
        </div>
    }
}
