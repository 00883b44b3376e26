mod api;
mod results;
mod run_view;

use a11yboard_core::{DashboardConfig, QueryState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::path;
use lucide_leptos::{Accessibility, LoaderCircle, Search};

use crate::api::fetch_config;
use crate::results::AllResults;
use crate::run_view::AccessibilityView;

#[component]
fn App() -> impl IntoView {
    view! {
        <Router>
            <div class="flex flex-col h-screen bg-slate-950 text-slate-100 font-sans">
                <header class="flex items-center space-x-3 px-8 py-4 border-b border-slate-800 bg-slate-900/50">
                    <div class="p-2 bg-blue-600 rounded-lg shadow-lg shadow-blue-900/20">
                        <Accessibility size=22 />
                    </div>
                    <A href="/" attr:class="text-2xl font-bold tracking-tight text-white">"a11yboard"</A>
                </header>
                <main class="flex-grow overflow-auto p-8">
                    <Routes fallback=|| view! { <NotFound /> }.into_any()>
                        <Route path=path!("/") view=|| view! { <Home /> } />
                        <Route path=path!("/accessibility") view=|| view! { <RunPage /> } />
                        <Route path=path!("/results") view=|| view! { <ResultsPage /> } />
                    </Routes>
                </main>
            </div>
        </Router>
    }
    .into_any()
}

/// Entry form: open the view for a run id.
#[component]
fn Home() -> impl IntoView {
    let (run_id, set_run_id) = signal(String::new());
    let navigate = use_navigate();

    let open = move || {
        let id = run_id.get_untracked();
        let id = id.trim();
        if !id.is_empty() {
            let search = QueryState::for_run(id).to_search();
            navigate(&format!("/accessibility?{}", search), Default::default());
        }
    };
    let on_key = open.clone();

    view! {
        <div class="max-w-xl space-y-4">
            <h1 class="text-3xl font-bold text-white">"Accessibility Analysis"</h1>
            <p class="text-slate-400">"Enter a run id to inspect its accessibility results."</p>
            <div class="flex space-x-2">
                <input
                    class="flex-grow bg-slate-900 border border-slate-800 rounded-lg px-4 py-2 font-mono"
                    placeholder="run id"
                    prop:value=run_id
                    on:input=move |ev| set_run_id.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            on_key();
                        }
                    }
                />
                <button
                    class="flex items-center space-x-2 px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-500"
                    on:click=move |_| open()
                >
                    <Search size=16 />
                    <span>"Open"</span>
                </button>
            </div>
        </div>
    }
}

fn load_config() -> RwSignal<Option<DashboardConfig>> {
    let config = RwSignal::new(None::<DashboardConfig>);
    spawn_local(async move {
        let loaded = fetch_config().await;
        log::debug!("Backend at {}", loaded.server_url);
        _ = config.try_set(Some(loaded));
    });
    config
}

fn loading() -> AnyView {
    view! {
        <div class="flex items-center space-x-3 text-slate-400">
            <div class="animate-spin"><LoaderCircle size=20 /></div>
            <span>"Loading..."</span>
        </div>
    }
    .into_any()
}

/// Loads the dashboard config, then mounts a fresh view for every search
/// string (a different run or filter set).
#[component]
fn RunPage() -> impl IntoView {
    let config = load_config();
    let location = use_location();

    move || match config.get() {
        Some(config) => {
            let search = location.search.get();
            let hash = window().location().hash().unwrap_or_default();
            view! { <AccessibilityView search=search hash=hash config=config /> }.into_any()
        }
        None => loading(),
    }
}

#[component]
fn ResultsPage() -> impl IntoView {
    let config = load_config();
    let location = use_location();

    move || match config.get() {
        Some(config) => {
            let search = location.search.get();
            view! { <AllResults search=search config=config /> }.into_any()
        }
        None => loading(),
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center h-full space-y-4">
            <h1 class="text-4xl font-bold">"404"</h1>
            <p class="text-slate-400">"Page not found"</p>
            <A href="/" attr:class="text-blue-400 hover:underline">"Back"</A>
        </div>
    }
    .into_any()
}

fn main() {
    let debug_enabled = window()
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item("debug_enabled").ok().flatten())
        .is_some_and(|v| v == "true");

    let level = if debug_enabled {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    _ = console_log::init_with_level(level);
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
