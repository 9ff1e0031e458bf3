use crate::auth::redirect_for;
use crate::components::glyphs::{BookGlyph, LogOutGlyph, MoonGlyph, PenGlyph, SearchGlyph, StarGlyph, SunGlyph};
use crate::components::ui::{Button, ButtonSize, ButtonVariant, PageSpinner};
use crate::state::AppContext;
use crate::storage::Theme;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

#[derive(Clone, Copy, PartialEq, Eq)]
enum NavItem {
    Journal,
    Repository,
    Search,
    Important,
}

impl NavItem {
    const ALL: [NavItem; 4] = [NavItem::Journal, NavItem::Repository, NavItem::Search, NavItem::Important];

    fn href(self) -> &'static str {
        match self {
            NavItem::Journal => "/",
            NavItem::Repository => "/repository",
            NavItem::Search => "/search",
            NavItem::Important => "/important",
        }
    }

    fn label(self) -> &'static str {
        match self {
            NavItem::Journal => "Journal",
            NavItem::Repository => "Repository",
            NavItem::Search => "Search",
            NavItem::Important => "Important",
        }
    }

    fn is_active(self, pathname: &str) -> bool {
        match self {
            NavItem::Journal => pathname == "/" || pathname.is_empty(),
            other => pathname.starts_with(other.href()),
        }
    }

    fn glyph(self) -> AnyView {
        match self {
            NavItem::Journal => view! { <PenGlyph /> }.into_any(),
            NavItem::Repository => view! { <BookGlyph /> }.into_any(),
            NavItem::Search => view! { <SearchGlyph /> }.into_any(),
            NavItem::Important => view! { <StarGlyph filled=false /> }.into_any(),
        }
    }
}

/// Sends the visitor wherever `redirect_for` says once the stored session has
/// been checked.
fn use_route_gate() {
    let app = expect_context::<AppContext>().0;
    let (session, restoring) = (app.session, app.restoring);
    let navigate = StoredValue::new(use_navigate());
    let location = use_location();

    Effect::new(move |_| {
        if restoring.get() {
            return;
        }
        let signed_in = session.with(|s| s.is_some());
        if let Some(to) = redirect_for(&location.pathname.get(), signed_in) {
            navigate.with_value(|nav| {
                nav(
                    to,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                )
            });
        }
    });
}

/// Protected route wrapper.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    use_route_gate();
    let app = expect_context::<AppContext>().0;
    let (session, restoring) = (app.session, app.restoring);

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show
            when=move || !restoring.get() && session.with(|s| s.is_some())
            fallback=|| view! { <PageSpinner /> }
        >
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}

/// Only shown to signed-out visitors.
#[component]
pub fn GuestOnly(children: ChildrenFn) -> impl IntoView {
    use_route_gate();
    let app = expect_context::<AppContext>().0;
    let (session, restoring) = (app.session, app.restoring);
    let children = StoredValue::new(children);

    view! {
        <Show
            when=move || !restoring.get() && session.with(|s| s.is_none())
            fallback=|| view! { <PageSpinner /> }
        >
            {move || children.with_value(|c| c())}
        </Show>
    }
}

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let theme = app.theme;
    let email = {
        let session = app.session;
        move || session.with(|s| s.as_ref().and_then(|s| s.user.email.clone()).unwrap_or_default())
    };
    let app = StoredValue::new(app);
    let location = use_location();
    let pathname = move || location.pathname.get();

    let toggle_theme = move |_| app.with_value(|a| a.toggle_theme());
    let sign_out = move |_| app.with_value(|a| a.sign_out());

    let theme_glyph = move || match theme.get() {
        Theme::Dark => view! { <SunGlyph /> }.into_any(),
        Theme::Light => view! { <MoonGlyph /> }.into_any(),
    };

    let nav_links = move |compact: bool| {
        NavItem::ALL
            .into_iter()
            .map(|item| {
                let active = move || item.is_active(&pathname());
                let class = move || {
                    let base = if compact {
                        "flex flex-1 flex-col items-center gap-1 py-2 text-[10px] font-medium"
                    } else {
                        "flex items-center gap-3 rounded-lg px-3 py-2 text-sm font-medium transition-colors"
                    };
                    let tone = if active() {
                        "text-stone-900 bg-stone-100 dark:text-stone-100 dark:bg-stone-800"
                    } else {
                        "text-stone-500 hover:text-stone-900 dark:text-stone-400 dark:hover:text-stone-100"
                    };
                    format!("{base} {tone}")
                };
                view! {
                    <a
                        href=item.href()
                        class=class
                        aria-current=move || active().then_some("page")
                    >
                        {item.glyph()}
                        <span>{item.label()}</span>
                    </a>
                }
            })
            .collect_view()
    };

    view! {
        <div class="min-h-screen bg-[#FAFAF9] text-stone-900 dark:bg-stone-950 dark:text-stone-100">
            <aside class="fixed inset-y-0 left-0 hidden w-60 flex-col border-r border-stone-200 px-4 py-6 md:flex dark:border-stone-800">
                <a href="/" class="mb-8 flex items-center gap-2 px-2">
                    <span class="flex size-8 items-center justify-center rounded-full bg-stone-900 font-serif text-sm font-bold text-white dark:bg-stone-100 dark:text-stone-900">
                        "s."
                    </span>
                    <span class="font-serif text-xl font-bold tracking-tight">"stay."</span>
                </a>

                <nav class="flex flex-col gap-1">{nav_links(false)}</nav>

                <div class="mt-auto space-y-2 border-t border-stone-200 pt-4 dark:border-stone-800">
                    <div class="truncate px-2 text-xs text-stone-400">{email}</div>
                    <div class="flex items-center gap-1">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:aria-label="Toggle theme"
                            on:click=toggle_theme
                        >
                            {theme_glyph}
                        </Button>
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=sign_out>
                            <LogOutGlyph />
                            "Sign out"
                        </Button>
                    </div>
                </div>
            </aside>

            <header class="sticky top-0 z-10 flex items-center justify-between border-b border-stone-200 bg-[#FAFAF9]/90 px-4 py-3 backdrop-blur md:hidden dark:border-stone-800 dark:bg-stone-950/90">
                <span class="font-serif text-lg font-bold tracking-tight">"stay."</span>
                <div class="flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Toggle theme"
                        on:click=toggle_theme
                    >
                        {theme_glyph}
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Sign out"
                        on:click=sign_out
                    >
                        <LogOutGlyph />
                    </Button>
                </div>
            </header>

            <main class="mx-auto w-full max-w-2xl px-4 pb-28 pt-6 md:ml-60 md:pb-10 lg:mx-auto">
                {children()}
            </main>

            <nav class="fixed inset-x-0 bottom-0 z-10 flex border-t border-stone-200 bg-[#FAFAF9] md:hidden dark:border-stone-800 dark:bg-stone-950">
                {nav_links(true)}
            </nav>
        </div>
    }
}

/// Unknown paths are gated like any protected route.
#[component]
pub fn NotFound() -> impl IntoView {
    use_route_gate();
    view! { <div class="px-4 py-8 text-xs text-stone-500">"Not found"</div> }
}
