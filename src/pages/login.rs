use crate::auth::{AuthProvider, MIN_PASSWORD_LEN};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription,
    CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    SignUp,
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);
    let mode: RwSignal<Mode> = RwSignal::new(Mode::SignIn);

    let app = expect_context::<AppContext>().0;
    let is_local = app.is_local();
    let app = StoredValue::new(app);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let app = app.get_value();
        let signing_up = mode.get_untracked() == Mode::SignUp;

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            let result = if signing_up {
                app.auth.sign_up(&email_val, &password_val).await
            } else {
                app.auth.sign_in(&email_val, &password_val).await
            };
            match result {
                // The route gate moves us off /login once the session is set.
                Ok(session) => app.start_session(session),
                Err(e) => {
                    log::warn!("auth failed: {e}");
                    error.try_set(Some(e.to_string()));
                }
            }
            loading.try_set(false);
        });
    };

    let switch_mode = move |_| {
        error.set(None);
        mode.update(|m| {
            *m = match m {
                Mode::SignIn => Mode::SignUp,
                Mode::SignUp => Mode::SignIn,
            }
        });
    };

    view! {
        <div class="min-h-screen bg-[#FAFAF9] text-stone-900 dark:bg-stone-950 dark:text-stone-100">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-8 flex flex-col items-center gap-3">
                    <div class="flex size-12 items-center justify-center rounded-full bg-stone-900 font-serif text-xl font-bold text-white dark:bg-stone-100 dark:text-stone-900">
                        "s."
                    </div>
                    <span class="font-serif text-3xl font-bold tracking-tight">"stay."</span>
                    <span class="text-sm text-stone-500 dark:text-stone-400">"A quiet place for your days."</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">
                            {move || match mode.get() {
                                Mode::SignIn => "Welcome back",
                                Mode::SignUp => "Create an account",
                            }}
                        </CardTitle>
                        <CardDescription class="text-xs">
                            {if is_local {
                                "Demo mode: accounts and entries live only in this tab."
                            } else {
                                "Use your email and password to continue."
                            }}
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-9 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-9 text-sm"
                                />
                                <Show when=move || mode.get() == Mode::SignUp>
                                    <span class="text-[11px] text-stone-400">
                                        {format!("At least {MIN_PASSWORD_LEN} characters.")}
                                    </span>
                                </Show>
                            </div>

                            {move || {
                                error.get().map(|e| {
                                    view! {
                                        <Alert class="border-red-200 bg-red-50 dark:border-red-900/50 dark:bg-red-950/30">
                                            <AlertDescription class="text-xs text-red-700 dark:text-red-300">
                                                {e}
                                            </AlertDescription>
                                        </Alert>
                                    }
                                })
                            }}

                            <Button class="w-full" attr:disabled=move || loading.get()>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get()>
                                        <Spinner />
                                    </Show>
                                    {move || match (mode.get(), loading.get()) {
                                        (Mode::SignIn, false) => "Sign in",
                                        (Mode::SignIn, true) => "Signing in...",
                                        (Mode::SignUp, false) => "Sign up",
                                        (Mode::SignUp, true) => "Creating account...",
                                    }}
                                </span>
                            </Button>
                        </form>

                        <div class="pt-3 text-center text-xs text-stone-500">
                            {move || match mode.get() {
                                Mode::SignIn => "No account? ",
                                Mode::SignUp => "Already have an account? ",
                            }}
                            <Button
                                variant=ButtonVariant::Link
                                size=ButtonSize::Sm
                                class="h-auto px-0 text-xs"
                                attr:r#type="button"
                                on:click=switch_mode
                            >
                                {move || match mode.get() {
                                    Mode::SignIn => "Sign up",
                                    Mode::SignUp => "Sign in",
                                }}
                            </Button>
                        </div>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
