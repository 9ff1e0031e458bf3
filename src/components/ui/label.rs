use leptos::prelude::*;
use tw_merge::*;

#[component]
pub fn Label(
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] html_for: String,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!(
        "flex items-center gap-2 text-xs font-medium uppercase tracking-wide text-stone-500 select-none dark:text-stone-400",
        class
    );

    view! {
        <label class=class r#for=html_for>
            {children()}
        </label>
    }
}
