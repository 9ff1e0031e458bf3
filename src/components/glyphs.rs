//! Stroke icons drawn inline, in the same 24x24 grid as the `icons` crate.

use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
fn Glyph(#[prop(into, optional)] class: String, children: Children) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=tw_merge!("size-4", class)
            aria-hidden="true"
        >
            {children()}
        </svg>
    }
}

#[component]
pub fn StarGlyph(#[prop(into, optional)] class: String, #[prop(into)] filled: Signal<bool>) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill=move || if filled.get() { "currentColor" } else { "none" }
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            class=tw_merge!("size-5", class)
            aria-hidden="true"
        >
            <polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2" />
        </svg>
    }
}

#[component]
pub fn TrashGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M3 6h18" />
            <path d="M19 6v14a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2V6" />
            <path d="M8 6V4a2 2 0 0 1 2-2h4a2 2 0 0 1 2 2v2" />
        </Glyph>
    }
}

#[component]
pub fn MicGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M12 2a3 3 0 0 0-3 3v7a3 3 0 0 0 6 0V5a3 3 0 0 0-3-3Z" />
            <path d="M19 10v2a7 7 0 0 1-14 0v-2" />
            <line x1="12" x2="12" y1="19" y2="22" />
        </Glyph>
    }
}

#[component]
pub fn ArrowUpGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="m5 12 7-7 7 7" />
            <path d="M12 19V5" />
        </Glyph>
    }
}

#[component]
pub fn ChevronLeftGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="m15 18-6-6 6-6" />
        </Glyph>
    }
}

#[component]
pub fn SunGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <circle cx="12" cy="12" r="4" />
            <path d="M12 2v2" />
            <path d="M12 20v2" />
            <path d="m4.93 4.93 1.41 1.41" />
            <path d="m17.66 17.66 1.41 1.41" />
            <path d="M2 12h2" />
            <path d="M20 12h2" />
            <path d="m6.34 17.66-1.41 1.41" />
            <path d="m19.07 4.93-1.41 1.41" />
        </Glyph>
    }
}

#[component]
pub fn MoonGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M12 3a6 6 0 0 0 9 9 9 9 0 1 1-9-9Z" />
        </Glyph>
    }
}

#[component]
pub fn LogOutGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4" />
            <polyline points="16 17 21 12 16 7" />
            <line x1="21" x2="9" y1="12" y2="12" />
        </Glyph>
    }
}

#[component]
pub fn BookGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M4 19.5v-15A2.5 2.5 0 0 1 6.5 2H20v20H6.5a2.5 2.5 0 0 1 0-5H20" />
        </Glyph>
    }
}

#[component]
pub fn SearchGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <circle cx="11" cy="11" r="8" />
            <path d="m21 21-4.3-4.3" />
        </Glyph>
    }
}

#[component]
pub fn PenGlyph(#[prop(into, optional)] class: String) -> impl IntoView {
    view! {
        <Glyph class=class>
            <path d="M12 20h9" />
            <path d="M16.5 3.5a2.12 2.12 0 0 1 3 3L7 19l-4 1 1-4Z" />
        </Glyph>
    }
}
