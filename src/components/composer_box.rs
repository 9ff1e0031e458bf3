use crate::components::glyphs::{ArrowUpGlyph, MicGlyph};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::composer::{detect_dictation, key_action, Composer, KeyAction};
use crate::models::EntryType;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Text box pinned under the day view. Submits into whichever category is
/// selected above it.
#[component]
pub fn ComposerBox(
    #[prop(into)] entry_type: Signal<EntryType>,
    #[prop(into)] on_submit: Callback<(String, EntryType)>,
) -> impl IntoView {
    let composer = RwSignal::new(Composer::default());
    let dictation = StoredValue::new_local(detect_dictation());
    let supported = dictation.with_value(|d| d.is_supported());

    Effect::new(move |_| {
        let t = entry_type.get();
        composer.update(|c| c.entry_type = t);
    });

    on_cleanup(move || {
        let _ = dictation.try_with_value(|d| d.stop());
    });

    let stop_dictation = move || {
        dictation.with_value(|d| d.stop());
        composer.update(|c| c.stop_listening());
    };

    let submit = move || {
        let was_listening = composer.with_untracked(|c| c.listening);
        let Some(Some(entry)) = composer.try_update(|c| c.submit()) else {
            return;
        };
        if was_listening {
            dictation.with_value(|d| d.stop());
        }
        on_submit.run(entry);
    };

    let toggle_mic = move |_| {
        if composer.with_untracked(|c| c.listening) {
            stop_dictation();
            return;
        }
        composer.update(|c| c.start_listening());
        let started = dictation.with_value(|d| {
            d.start(
                Box::new(move |transcript| {
                    composer.try_update(|c| c.on_transcript(transcript));
                }),
                Box::new(move || {
                    composer.try_update(|c| c.stop_listening());
                }),
            )
        });
        if !started {
            log::warn!("dictation did not start");
            composer.update(|c| c.stop_listening());
        }
    };

    let on_input = move |ev: web_sys::Event| {
        if let Some(area) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        {
            composer.update(|c| c.text = area.value());
        }
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let listening = composer.with_untracked(|c| c.listening);
        match key_action(&ev.key(), ev.shift_key(), listening) {
            KeyAction::Submit => {
                ev.prevent_default();
                submit();
            }
            KeyAction::StopDictation => {
                ev.prevent_default();
                stop_dictation();
            }
            KeyAction::Default => {}
        }
    };

    let placeholder = move || {
        if composer.with(|c| c.listening) {
            "Listening...".to_string()
        } else {
            format!("Add to {}...", entry_type.get().label().to_lowercase())
        }
    };

    view! {
        <div class="flex items-end gap-2 rounded-2xl border border-stone-200 bg-white p-2 shadow-sm dark:border-stone-800 dark:bg-stone-900">
            <textarea
                rows="1"
                class="max-h-40 min-h-[44px] flex-1 resize-none bg-transparent px-3 py-2.5 text-base outline-none placeholder:text-stone-400"
                placeholder=placeholder
                prop:value=move || composer.with(|c| c.text.clone())
                on:input=on_input
                on:keydown=on_keydown
            />

            <Show when=move || supported>
                {move || {
                    let listening = composer.with(|c| c.listening);
                    view! {
                        <Button
                            variant=if listening { ButtonVariant::Listening } else { ButtonVariant::Ghost }
                            size=ButtonSize::Icon
                            class="rounded-full"
                            attr:aria-label=if listening { "Stop dictation" } else { "Dictate" }
                            on:click=toggle_mic
                        >
                            <MicGlyph />
                        </Button>
                    }
                }}
            </Show>

            <Button
                size=ButtonSize::Round
                attr:aria-label="Add entry"
                attr:disabled=move || !composer.with(|c| c.can_submit())
                on:click=move |_| submit()
            >
                <ArrowUpGlyph class="size-5" />
            </Button>
        </div>
    }
}
