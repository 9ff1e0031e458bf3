use crate::error::JournalError;
use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Inline error line. Write and read failures can be dismissed; a failed live
/// channel cannot, since the view stays errored until it is remounted.
#[component]
pub fn ErrorBanner(
    #[prop(into)] error: Signal<Option<JournalError>>,
    #[prop(optional, into)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        error.get().map(|e| {
            let dismissable = on_dismiss.is_some() && !e.is_subscription();
            view! {
                <Alert class="flex items-start justify-between gap-3 border-red-200 bg-red-50 dark:border-red-900/50 dark:bg-red-950/30">
                    <AlertDescription class="text-red-700 dark:text-red-300">{e.to_string()}</AlertDescription>
                    <Show when=move || dismissable>
                        <button
                            class="text-xs text-red-500 hover:underline"
                            on:click=move |_| {
                                if let Some(cb) = on_dismiss {
                                    cb.run(());
                                }
                            }
                        >
                            "Dismiss"
                        </button>
                    </Show>
                </Alert>
            }
        })
    }
}
