use icons::Loader;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Centered spinner shown while a list waits for its first snapshot.
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-20">
            <Spinner class="size-8 text-stone-500 dark:text-stone-300" />
        </div>
    }
}
