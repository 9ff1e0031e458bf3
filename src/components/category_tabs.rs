use crate::components::ui::{Chip, ChipSize, ChipVariant};
use crate::models::EntryType;
use leptos::prelude::*;

/// Underlined tab strip; exactly one type is selected.
#[component]
pub fn CategoryTabs(selected: RwSignal<EntryType>, #[prop(into)] types: Vec<EntryType>) -> impl IntoView {
    let types = StoredValue::new(types);

    view! {
        <div class="flex gap-5 overflow-x-auto border-b border-stone-200 dark:border-stone-800">
            {move || {
                let current = selected.get();
                types
                    .get_value()
                    .into_iter()
                    .map(|t| {
                        let class = if t == current {
                            "border-stone-900 text-stone-900 dark:border-stone-100 dark:text-stone-100"
                        } else {
                            "border-transparent text-stone-400 hover:text-stone-700 dark:hover:text-stone-200"
                        };
                        view! {
                            <Chip
                                size=ChipSize::Tab
                                class=class
                                attr:aria-current=(t == current).then_some("page")
                                on:click=move |_| selected.set(t)
                            >
                                {t.label()}
                            </Chip>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}

/// "All" followed by one chip per type.
#[component]
pub fn TypeChips(selected: RwSignal<Option<EntryType>>) -> impl IntoView {
    let options = std::iter::once((None, "All"))
        .chain(EntryType::all().into_iter().map(|t| (Some(t), t.label())))
        .collect::<Vec<_>>();
    let options = StoredValue::new(options);

    view! {
        <div class="flex flex-wrap gap-2">
            {move || {
                let current = selected.get();
                options
                    .get_value()
                    .into_iter()
                    .map(|(value, label)| {
                        let variant = if value == current { ChipVariant::Active } else { ChipVariant::Default };
                        view! {
                            <Chip variant=variant on:click=move |_| selected.set(value)>
                                {label}
                            </Chip>
                        }
                    })
                    .collect_view()
            }}
        </div>
    }
}
