use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "flex flex-col gap-4 rounded-xl border border-stone-200 bg-white py-6 shadow-sm dark:border-stone-800 dark:bg-stone-900"}
    clx! {CardHeader, div, "flex flex-col items-start gap-1.5 px-6"}
    clx! {CardTitle, h2, "font-serif text-xl leading-none font-semibold"}
    clx! {CardContent, div, "px-6"}
    clx! {CardDescription, p, "text-sm text-stone-500 dark:text-stone-400"}
}

pub use components::*;
