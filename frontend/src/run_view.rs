//! The accessibility run view: tabs for the overview donut, the raw run
//! object, the results table and one tab per viewable artifact.

use std::collections::HashMap;

use a11yboard_core::driver::FetchScope;
use a11yboard_core::table::COLUMNS;
use a11yboard_core::{
    all_results_href, ArtifactBody, Command, DashboardConfig, Event, PieData, ResultRow, RunState,
    RunView, Tab,
};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use lucide_leptos::{
    ChevronLeft, ChevronRight, Download, FileText, LoaderCircle, RefreshCw, TriangleAlert,
};
use plotly::common::Font;
use plotly::layout::{Annotation, Margin};
use plotly::{Layout, Pie, Plot};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

use crate::api::GlooBackend;

const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

/// Executes the view's commands in the browser and feeds the resulting
/// events back into it.
#[derive(Clone)]
struct Executor {
    view: RwSignal<RunView>,
    backend: GlooBackend,
    scope: FetchScope,
}

impl Executor {
    fn send(&self, event: Event) {
        // None once the view is disposed.
        let commands = self.view.try_update(|v| v.handle(event)).unwrap_or_default();
        self.execute(commands);
    }

    fn execute(&self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Fetch(fetch) => {
                    let this = self.clone();
                    spawn_local(async move {
                        match this.scope.wrap(fetch.run(&this.backend)).await {
                            Ok(event) => this.send(event),
                            Err(e) => log::debug!("Fetch dropped: {}", e),
                        }
                    });
                }
                Command::PushHistory(hash) => push_hash(&hash),
            }
        }
    }
}

fn push_hash(hash: &str) {
    let pushed = window()
        .history()
        .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(hash)));
    if let Err(e) = pushed {
        log::warn!("Could not push history entry {}: {:?}", hash, e);
    }
}

fn object_url(mime: &str, bytes: &[u8]) -> Result<String, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    web_sys::Url::create_object_url_with_blob(&blob)
}

#[component]
pub fn AccessibilityView(search: String, hash: String, config: DashboardConfig) -> impl IntoView {
    let (initial, commands) = RunView::mount(&search, &hash);
    let view = RwSignal::new(initial);
    let exec = Executor {
        view,
        backend: GlooBackend::new(&config),
        scope: FetchScope::new(),
    };
    exec.execute(commands);

    // Back/forward between tab entries.
    let history_exec = exec.clone();
    let listener = window_event_listener(ev::popstate, move |_| {
        let hash = window().location().hash().unwrap_or_default();
        history_exec.send(Event::HistoryChanged(hash));
    });

    // Artifact id -> object URL of its image.
    let object_urls = RwSignal::new(HashMap::<String, String>::new());
    Effect::new(move |_| {
        view.with(|v| {
            for tab in v.artifact_tabs() {
                let ArtifactBody::Image { mime, bytes } = &tab.body else {
                    continue;
                };
                let id = &tab.artifact.id;
                if object_urls.with_untracked(|urls| urls.contains_key(id)) {
                    continue;
                }
                match object_url(mime, bytes) {
                    Ok(url) => object_urls.update(|urls| {
                        urls.insert(id.clone(), url);
                    }),
                    Err(e) => log::warn!("Could not create object URL for {}: {:?}", tab.title(), e),
                }
            }
        });
    });

    let scope = exec.scope.clone();
    on_cleanup(move || {
        let _ = view.try_update(|v| v.handle(Event::Unmount));
        scope.close();
        listener.remove();
        for url in object_urls.try_get_untracked().unwrap_or_default().into_values() {
            if let Err(e) = web_sys::Url::revoke_object_url(&url) {
                log::warn!("Could not revoke object URL: {:?}", e);
            }
        }
    });

    let run_state = Memo::new(move |_| view.with(|v| v.run_state().clone()));
    let active = Memo::new(move |_| view.with(|v| v.active_tab().clone()));
    let urls = exec.backend.urls().clone();
    let tab_exec = exec.clone();

    let tab_bar = move || {
        let mut tabs = vec![
            (Tab::Overview, "Overview".to_string()),
            (Tab::RunObject, "Run Object".to_string()),
            (Tab::ResultsList, "Results List".to_string()),
        ];
        view.with(|v| {
            tabs.extend(v.artifact_tabs().iter().map(|t| (t.tab(), t.title().to_string())));
        });
        let current = active.get();
        tabs.into_iter()
            .map(|(tab, label)| {
                let exec = tab_exec.clone();
                let class = if tab == current {
                    "px-4 py-2 text-sm font-medium border-b-2 border-blue-500 text-white"
                } else {
                    "px-4 py-2 text-sm font-medium border-b-2 border-transparent text-slate-400 hover:text-white"
                };
                view! {
                    <button class=class on:click=move |_| exec.send(Event::TabSelected(tab.clone()))>
                        {label}
                    </button>
                }
            })
            .collect_view()
    };

    let body = move || match run_state.get() {
        RunState::Loading => view! {
            <div class="flex items-center space-x-3 text-slate-400 p-8">
                <div class="animate-spin"><LoaderCircle size=20 /></div>
                <span>"Loading run..."</span>
            </div>
        }
        .into_any(),
        RunState::Failed(message) => view! {
            <div class="flex items-center space-x-3 bg-red-950/40 border border-red-900 text-red-300 rounded-xl p-6">
                <TriangleAlert size=20 />
                <span>"Could not load run: " {message}</span>
            </div>
        }
        .into_any(),
        RunState::Loaded(run) => match active.get() {
            Tab::Overview => view! { <Overview run=*run view=view /> }.into_any(),
            Tab::RunObject => {
                let text = serde_json::to_string_pretty(&run.to_value()).unwrap_or_default();
                view! {
                    <pre class="bg-slate-900 border border-slate-800 rounded-xl p-4 text-sm text-slate-300 overflow-auto">
                        {text}
                    </pre>
                }
                .into_any()
            }
            Tab::ResultsList => view! { <ResultsPanel view=view exec=exec.clone() /> }.into_any(),
            Tab::Artifact(id) => {
                let download = urls.artifact_download(&id);
                view! { <ArtifactPanel view=view id=id download=download object_urls=object_urls /> }
                    .into_any()
            }
        },
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold text-white">"Accessibility Analysis"</h1>
            <nav class="flex border-b border-slate-800 space-x-1 overflow-x-auto">{tab_bar}</nav>
            <div>{body}</div>
        </div>
    }
}

#[component]
fn Overview(run: a11yboard_core::Run, view: RwSignal<RunView>) -> impl IntoView {
    let pie = Memo::new(move |_| view.with(|v| v.pie().clone()));
    let s = run.summary;

    view! {
        <div class="space-y-6">
            <div class="grid grid-cols-2 md:grid-cols-6 gap-4">
                <SummaryCard label="Tests" value=s.tests />
                <SummaryCard label="Failures" value=s.failures />
                <SummaryCard label="Errors" value=s.errors />
                <SummaryCard label="Skips" value=s.skips />
                <SummaryCard label="XFailures" value=s.xfailures />
                <SummaryCard label="XPasses" value=s.xpasses />
            </div>
            <div class="bg-slate-900 border border-slate-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4 text-white">"Accessibility"</h2>
                {move || {
                    let total = pie.with(|p| p.total);
                    (total == 0).then(|| view! {
                        <p class="text-sm text-slate-500">"No accessibility data for this run"</p>
                    })
                }}
                <Donut pie=pie />
            </div>
        </div>
    }
}

#[component]
fn SummaryCard(label: &'static str, value: u64) -> impl IntoView {
    view! {
        <div class="bg-slate-900 border border-slate-800 rounded-xl p-4">
            <p class="text-sm text-slate-400">{label}</p>
            <p class="text-2xl font-bold text-white">{value}</p>
        </div>
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot)]
    fn new_plot(root: &JsValue, data: &JsValue, layout: &JsValue, config: &JsValue);
}

/// Plotly figure JSON for the passes/violations donut.
fn donut_figure(pie: &PieData) -> String {
    let trace = Pie::new(vec![pie.passes.count, pie.violations.count])
        .labels(vec![PieData::label(&pie.passes), PieData::label(&pie.violations)])
        .hole(0.6);

    let layout = Layout::new()
        .margin(Margin::new().left(20).right(20).top(20).bottom(20))
        .show_legend(true)
        .paper_background_color("rgba(0,0,0,0)")
        .plot_background_color("rgba(0,0,0,0)")
        .font(Font::new().color("#94a3b8"))
        // passes green, violations red
        .colorway(vec!["#22c55e", "#ef4444"])
        .annotations(vec![Annotation::new()
            .text(format!("{}<br>elements", pie.total))
            .show_arrow(false)
            .font(Font::new().size(20))]);

    let mut plot = Plot::new();
    plot.set_layout(layout);
    plot.add_trace(trace);
    plot.to_json()
}

#[component]
fn Donut(pie: Memo<PieData>) -> impl IntoView {
    let div_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        let figure = donut_figure(&pie.get());
        let Some(div) = div_ref.get() else {
            return;
        };
        match js_sys::JSON::parse(&figure) {
            Ok(js) => {
                let part = |key: &str| {
                    js_sys::Reflect::get(&js, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
                };
                new_plot(&JsValue::from(div), &part("data"), &part("layout"), &part("config"));
            }
            Err(e) => log::error!("Failed to parse Plotly JSON: {:?}", e),
        }
    });

    view! { <div node_ref=div_ref class="w-full h-80"></div> }
}

fn status_class(status: &str) -> &'static str {
    match status {
        "passed" => "text-green-400",
        "failed" => "text-red-400",
        "error" => "text-orange-400",
        "skipped" | "xfailed" => "text-yellow-400",
        _ => "text-slate-300",
    }
}

pub(crate) fn result_row(row: ResultRow) -> impl IntoView {
    let class = status_class(&row.status);
    view! {
        <tr class="border-t border-slate-800 hover:bg-slate-800/30">
            <td class="px-4 py-2 font-mono text-sm">{row.test}</td>
            <td class="px-4 py-2 font-mono text-xs text-slate-500">{row.run}</td>
            <td class=format!("px-4 py-2 font-medium {}", class)>{row.result}</td>
            <td class="px-4 py-2 text-slate-400">{row.duration}</td>
            <td class="px-4 py-2 text-slate-400">{row.started}</td>
        </tr>
    }
}

#[component]
fn ResultsPanel(view: RwSignal<RunView>, exec: Executor) -> impl IntoView {
    let table = Memo::new(move |_| view.with(|v| v.table().clone()));
    let span = COLUMNS.len().to_string();

    let rows = move || {
        let t = table.get();
        if t.is_loading() {
            view! {
                <tr><td colspan=span.clone() class="px-4 py-6">
                    <div class="flex justify-center animate-spin text-slate-400"><LoaderCircle size=20 /></div>
                </td></tr>
            }
            .into_any()
        } else if t.is_error() {
            view! {
                <tr><td colspan=span.clone() class="px-4 py-6 text-center text-red-400">"Error fetching result data"</td></tr>
            }
            .into_any()
        } else if t.is_empty() {
            view! {
                <tr><td colspan=span.clone() class="px-4 py-6 text-center text-slate-500">"No results found"</td></tr>
            }
            .into_any()
        } else {
            t.rows().iter().cloned().map(result_row).collect_view().into_any()
        }
    };

    let all_results = view.with_untracked(|v| v.query().run_id().map(all_results_href).ok());
    let refresh = exec.clone();
    let prev = exec.clone();
    let next = exec.clone();
    let resize = exec;

    view! {
        <div class="space-y-4">
            <div class="flex justify-end space-x-2">
                <button
                    class="flex items-center space-x-2 px-3 py-2 rounded-lg bg-slate-800 hover:bg-slate-700 text-sm"
                    on:click=move |_| refresh.send(Event::RefreshResults)
                >
                    <RefreshCw size=16 />
                    <span>"Refresh"</span>
                </button>
                {all_results.map(|href| view! {
                    <A href=href attr:class="flex items-center space-x-1 px-3 py-2 rounded-lg bg-blue-600 hover:bg-blue-500 text-sm">
                        <span>"See all results"</span>
                        <ChevronRight size=16 />
                    </A>
                })}
            </div>
            <div class="bg-slate-900 border border-slate-800 rounded-xl overflow-hidden">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-slate-800/50">
                            {COLUMNS.map(|c| view! { <th class="px-4 py-3 font-semibold text-slate-300">{c}</th> }).collect_view()}
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
            <div class="flex items-center justify-between text-sm text-slate-400">
                <span>
                    {move || table.with(|t| format!(
                        "Page {} of {} ({} items)", t.page, t.total_pages, t.total_items
                    ))}
                </span>
                <div class="flex items-center space-x-2">
                    <select
                        class="bg-slate-800 rounded-lg px-2 py-1"
                        on:change=move |e| {
                            match event_target_value(&e).parse::<u32>() {
                                Ok(size) => resize.send(Event::SetPageSize(size)),
                                Err(_) => log::warn!("Ignoring page size {}", event_target_value(&e)),
                            }
                        }
                    >
                        {move || {
                            let current = table.with(|t| t.page_size);
                            PAGE_SIZES
                                .map(|size| view! {
                                    <option value=size.to_string() selected={size == current}>{size} " / page"</option>
                                })
                                .collect_view()
                        }}
                    </select>
                    <button
                        class="p-2 rounded-lg bg-slate-800 hover:bg-slate-700 disabled:opacity-40"
                        disabled=move || table.with(|t| t.page <= 1)
                        on:click=move |_| {
                            let page = table.with_untracked(|t| t.page);
                            prev.send(Event::SetPage(page.saturating_sub(1)));
                        }
                    >
                        <ChevronLeft size=16 />
                    </button>
                    <button
                        class="p-2 rounded-lg bg-slate-800 hover:bg-slate-700 disabled:opacity-40"
                        disabled=move || table.with(|t| t.page >= t.total_pages)
                        on:click=move |_| {
                            let page = table.with_untracked(|t| t.page);
                            next.send(Event::SetPage(page + 1));
                        }
                    >
                        <ChevronRight size=16 />
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ArtifactPanel(
    view: RwSignal<RunView>,
    id: String,
    download: String,
    object_urls: RwSignal<HashMap<String, String>>,
) -> impl IntoView {
    let tab_id = id.clone();
    let tab = Memo::new(move |_| {
        view.with(|v| v.artifact_tabs().iter().find(|t| t.artifact.id == tab_id).cloned())
    });

    move || {
        let Some(tab) = tab.get() else {
            return view! {
                <p class="text-slate-500">"Artifact " {id.clone()} " is not available"</p>
            }
            .into_any();
        };
        let filename = tab.title().to_string();
        let content = match tab.body {
            ArtifactBody::Text(text) => view! {
                <pre class="bg-slate-950 border border-slate-800 rounded-xl p-4 text-sm font-mono text-slate-300 overflow-auto max-h-[70vh] whitespace-pre-wrap">
                    {text}
                </pre>
            }
            .into_any(),
            ArtifactBody::Image { .. } => {
                let key = tab.artifact.id.clone();
                view! {
                    <img
                        class="max-w-full rounded-xl border border-slate-800"
                        alt=filename.clone()
                        src=move || object_urls.with(|urls| urls.get(&key).cloned())
                    />
                }
                .into_any()
            }
        };
        view! {
            <div class="space-y-4">
                <div class="flex items-center justify-between">
                    <div class="flex items-center space-x-2 text-slate-300">
                        <FileText size=18 />
                        <span class="font-mono">{filename}</span>
                    </div>
                    <a
                        href=download.clone()
                        class="flex items-center space-x-2 px-3 py-2 rounded-lg bg-blue-600 hover:bg-blue-500 text-white text-sm"
                    >
                        <Download size=16 />
                        <span>"Download"</span>
                    </a>
                </div>
                {content}
            </div>
        }
        .into_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a11yboard_core::AccessibilityData;

    #[test]
    fn test_donut_figure_uses_counts_and_ratios() {
        let pie = PieData::from_counts(AccessibilityData {
            passes: 3,
            violations: 1,
        });
        let figure: serde_json::Value = serde_json::from_str(&donut_figure(&pie)).unwrap();
        assert_eq!(figure["data"][0]["type"], "pie");
        assert_eq!(figure["data"][0]["values"], serde_json::json!([3, 1]));
        assert_eq!(figure["data"][0]["labels"][0], "passes: 75%");
        assert_eq!(figure["data"][0]["labels"][1], "violations: 25%");
        assert_eq!(figure["layout"]["annotations"][0]["text"], "4<br>elements");
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class("passed"), "text-green-400");
        assert_eq!(status_class("unknown"), "text-slate-300");
    }
}
