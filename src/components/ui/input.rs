use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

#[component]
pub fn Input(
    #[prop(into, optional)] class: String,

    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,

    // Manual two-way binding: `prop:value` in, `on:input` out.
    #[prop(into)] bind_value: RwSignal<String>,

    /// Fired after `bind_value` is updated. Date inputs use this to navigate.
    #[prop(optional, into)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-stone-400 flex h-9 w-full min-w-0 rounded-md border border-stone-200 bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:opacity-50 md:text-sm dark:border-stone-700",
        "focus-visible:border-stone-400 focus-visible:ring-2 focus-visible:ring-stone-400/20",
        class
    );

    let on_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            let value = input.value();
            bind_value.set(value.clone());
            if let Some(cb) = on_change {
                cb.run(value);
            }
        }
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            required=required
            autofocus=autofocus
            prop:value=move || bind_value.get()
            on:input=on_input
        />
    }
}
