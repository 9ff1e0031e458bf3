use crate::components::glyphs::TrashGlyph;
use crate::models::{EntryType, JournalEntry};
use crate::util::format_time_of_day;
use icons::Check;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Card styling per entry type.
fn row_class(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::Reflection => {
            "bg-stone-50 font-serif italic text-stone-700 border-stone-200 dark:bg-stone-900/60 dark:text-stone-300 dark:border-stone-800"
        }
        EntryType::Vocabulary => {
            "bg-white border-yellow-200 dark:bg-stone-900 dark:border-yellow-900/60"
        }
        EntryType::Birthday => "bg-white border-pink-200 dark:bg-stone-900 dark:border-pink-900/60",
        EntryType::Fact => {
            "bg-white border-stone-200 border-l-4 border-l-blue-400 dark:bg-stone-900 dark:border-stone-800"
        }
        EntryType::Task | EntryType::Log => {
            "bg-white border-stone-200 dark:bg-stone-900 dark:border-stone-800"
        }
    }
}

/// What a key press does inside the inline editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EditKey {
    Save,
    Cancel,
    Type,
}

fn edit_key(key: &str, shift: bool) -> EditKey {
    match key {
        "Enter" if !shift => EditKey::Save,
        "Escape" => EditKey::Cancel,
        _ => EditKey::Type,
    }
}

/// Type badge; the everyday types go without one.
fn badge(entry_type: EntryType) -> Option<&'static str> {
    match entry_type {
        EntryType::Log | EntryType::Task | EntryType::Vocabulary => None,
        EntryType::Reflection => Some("reflection"),
        EntryType::Fact => Some("fact"),
        EntryType::Birthday => Some("date"),
    }
}

#[component]
pub fn EntryList(
    #[prop(into)] entries: Signal<Vec<JournalEntry>>,
    /// Absent on read-only lists.
    #[prop(optional, into)]
    on_toggle: Option<Callback<String>>,
    #[prop(optional, into)] on_delete: Option<Callback<String>>,
    /// Called with `(id, new content)`; double-click a row to edit.
    #[prop(optional, into)]
    on_edit: Option<Callback<(String, String)>>,
    #[prop(optional)] show_date: bool,
) -> impl IntoView {
    view! {
        <Show
            when=move || entries.with(|e| !e.is_empty())
            fallback=|| view! {
                <div class="py-12 text-center font-serif text-sm italic text-stone-400 dark:text-stone-500">
                    "No entries yet. Start writing."
                </div>
            }
        >
            <ul class="space-y-3">
                {move || {
                    entries
                        .get()
                        .into_iter()
                        .map(|entry| view! { <EntryRow entry=entry on_toggle=on_toggle on_delete=on_delete on_edit=on_edit show_date=show_date /> })
                        .collect_view()
                }}
            </ul>
        </Show>
    }
}

#[component]
fn EntryRow(
    entry: JournalEntry,
    on_toggle: Option<Callback<String>>,
    on_delete: Option<Callback<String>>,
    on_edit: Option<Callback<(String, String)>>,
    show_date: bool,
) -> impl IntoView {
    let is_task = entry.entry_type.is_task();
    let done = entry.is_completed;
    let toggle_id = entry.id.clone();
    let delete_id = entry.id.clone();
    let time = (!is_task).then(|| format_time_of_day(entry.created_at));
    let date = show_date.then(|| entry.date.to_string());
    let id = StoredValue::new(entry.id.clone());
    let content = StoredValue::new(entry.content.clone());
    let editing = RwSignal::new(false);
    let draft = RwSignal::new(String::new());

    let start_edit = move |_| {
        if on_edit.is_some() {
            draft.set(content.get_value());
            editing.set(true);
        }
    };

    let save = move || {
        editing.set(false);
        let text = draft.get_untracked();
        if text.trim() == content.with_value(|c| c.trim().to_string()) {
            return;
        }
        if let Some(cb) = on_edit {
            cb.run((id.get_value(), text));
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| match edit_key(&ev.key(), ev.shift_key()) {
        EditKey::Save => {
            ev.prevent_default();
            save();
        }
        EditKey::Cancel => editing.set(false),
        EditKey::Type => {}
    };

    let on_input = move |ev: web_sys::Event| {
        if let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        {
            draft.set(area.value());
        }
    };

    view! {
        <li class=format!("group relative flex items-start gap-3 rounded-xl border p-4 shadow-sm transition-colors {}", row_class(entry.entry_type))>
            {is_task.then(|| view! {
                <button
                    class=move || {
                        if done {
                            "mt-0.5 flex size-5 shrink-0 items-center justify-center rounded-md border border-stone-900 bg-stone-900 text-white dark:border-stone-100 dark:bg-stone-100 dark:text-stone-900"
                        } else {
                            "mt-0.5 flex size-5 shrink-0 items-center justify-center rounded-md border border-stone-300 hover:border-stone-500 dark:border-stone-600"
                        }
                    }
                    attr:aria-label=if done { "Mark as not done" } else { "Mark as done" }
                    disabled=on_toggle.is_none()
                    on:click=move |_| {
                        if let Some(cb) = on_toggle {
                            cb.run(toggle_id.clone());
                        }
                    }
                >
                    {done.then(|| view! { <Check class="size-3.5" /> })}
                </button>
            })}

            <div class="min-w-0 flex-1">
                <div class="mb-1 flex items-center gap-2 text-[11px] uppercase tracking-wider text-stone-400 dark:text-stone-500">
                    {badge(entry.entry_type).map(|b| view! { <span class="font-medium">{b}</span> })}
                    {time.map(|t| view! { <span>{t}</span> })}
                    {date.map(|d| view! { <span>{format!("• {d}")}</span> })}
                </div>
                <Show
                    when=move || editing.get()
                    fallback=move || view! {
                        <p
                            class=if done {
                                "whitespace-pre-wrap break-words text-stone-400 line-through dark:text-stone-500"
                            } else {
                                "whitespace-pre-wrap break-words"
                            }
                            on:dblclick=start_edit
                        >
                            {content.get_value()}
                        </p>
                    }
                >
                    <textarea
                        rows="2"
                        class="w-full resize-none rounded-md border border-stone-300 bg-transparent px-2 py-1 outline-none focus:border-stone-500 dark:border-stone-700"
                        attr:aria-label="Edit entry"
                        autofocus=true
                        prop:value=move || draft.get()
                        on:input=on_input
                        on:keydown=on_keydown
                        on:blur=move |_| editing.set(false)
                    />
                </Show>
            </div>

            {on_delete.map(|cb| view! {
                <button
                    class="shrink-0 text-stone-300 opacity-0 transition-opacity hover:text-red-500 group-hover:opacity-100 focus:opacity-100 dark:text-stone-600 dark:hover:text-red-400"
                    attr:aria-label="Delete entry"
                    on:click=move |_| cb.run(delete_id.clone())
                >
                    <TrashGlyph />
                </button>
            })}
        </li>
    }
}
