//! General results page: every result matching the URL filters, without
//! the run view's accessibility scoping.

use a11yboard_core::driver::FetchScope;
use a11yboard_core::table::COLUMNS;
use a11yboard_core::{Backend, DashboardConfig, QueryState, ResultsQuery, ResultsTable};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use lucide_leptos::{ChevronLeft, ChevronRight, LoaderCircle};

use crate::api::GlooBackend;
use crate::run_view::result_row;

#[component]
pub fn AllResults(search: String, config: DashboardConfig) -> impl IntoView {
    let state = QueryState::parse(&search);
    let query = ResultsQuery::from_state(&state);
    let table = RwSignal::new(ResultsTable::new(query.page, query.page_size));

    let scope = FetchScope::new();
    let fetch_scope = scope.clone();
    let backend = GlooBackend::new(&config);
    spawn_local(async move {
        match fetch_scope.wrap(backend.list_results(&query)).await {
            Ok(Ok(page)) => {
                _ = table.try_update(|t| t.apply(&page));
            }
            Ok(Err(e)) => {
                log::error!("Error fetching result data: {}", e);
                _ = table.try_update(|t| t.fail());
            }
            Err(e) => log::debug!("Fetch dropped: {}", e),
        }
    });
    on_cleanup(move || scope.close());

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

    let page_href = move |page: u32| {
        let target = QueryState {
            page,
            ..state.clone()
        };
        format!("/results?{}", target.to_search())
    };
    let pager = move || {
        let t = table.get();
        let prev = (t.page > 1).then(|| page_href(t.page - 1));
        let next = (t.page < t.total_pages).then(|| page_href(t.page + 1));
        view! {
            <div class="flex items-center justify-between text-sm text-slate-400">
                <span>{format!("Page {} of {} ({} items)", t.page, t.total_pages, t.total_items)}</span>
                <div class="flex items-center space-x-2">
                    {prev.map(|href| view! {
                        <A href=href attr:class="p-2 rounded-lg bg-slate-800 hover:bg-slate-700"><ChevronLeft size=16 /></A>
                    })}
                    {next.map(|href| view! {
                        <A href=href attr:class="p-2 rounded-lg bg-slate-800 hover:bg-slate-700"><ChevronRight size=16 /></A>
                    })}
                </div>
            </div>
        }
    };

    view! {
        <div class="space-y-4">
            <h1 class="text-3xl font-bold text-white">"Test Results"</h1>
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
            {pager}
        </div>
    }
}
