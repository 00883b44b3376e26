//! The run view as a command/event state machine.
//!
//! `RunView::mount` parses the page URL and returns the first commands.
//! Executors run each [`Fetch`] against a [`Backend`], feed the resulting
//! [`Event`] back through [`RunView::handle`], and execute whatever new
//! commands come out. Nothing here performs I/O.

use tracing::{debug, error, warn};

use crate::artifact::{insert_ordered, ArtifactTab};
use crate::client::{ArtifactOwner, Backend, ResultsQuery};
use crate::error::Result;
use crate::models::{Artifact, ArtifactContent, ResultsPage, Run};
use crate::pie::PieData;
use crate::query::QueryState;
use crate::table::ResultsTable;
use crate::tabs::{Tab, TabController, TabLoad};

/// A request for data.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch {
    Run { run_id: String },
    Artifacts { run_id: String },
    Artifact { artifact: Artifact, position: usize },
    Results { generation: u64, query: ResultsQuery },
}

impl Fetch {
    /// Perform the request and wrap the outcome as the matching event.
    pub async fn run<B: Backend>(self, backend: &B) -> Event {
        match self {
            Fetch::Run { run_id } => Event::RunLoaded(backend.get_run(&run_id).await),
            Fetch::Artifacts { run_id } => {
                Event::ArtifactsListed(backend.list_artifacts(ArtifactOwner::Run(&run_id)).await)
            }
            Fetch::Artifact { artifact, position } => {
                let content = backend.view_artifact(&artifact.id).await;
                Event::ArtifactLoaded {
                    artifact,
                    position,
                    content,
                }
            }
            Fetch::Results { generation, query } => Event::ResultsLoaded {
                generation,
                page: backend.list_results(&query).await,
            },
        }
    }
}

/// Side effects requested by the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(Fetch),
    /// Push a history entry with this hash (e.g. `#results-list`).
    PushHistory(String),
}

/// Inputs to the view.
#[derive(Debug)]
pub enum Event {
    RunLoaded(Result<Run>),
    ArtifactsListed(Result<Vec<Artifact>>),
    ArtifactLoaded {
        artifact: Artifact,
        position: usize,
        content: Result<ArtifactContent>,
    },
    ResultsLoaded {
        generation: u64,
        page: Result<ResultsPage>,
    },
    TabSelected(Tab),
    /// Browser history moved; carries the new hash.
    HistoryChanged(String),
    SetPage(u32),
    SetPageSize(u32),
    RefreshResults,
    /// The view is going away; every later event is ignored.
    Unmount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Loading,
    Loaded(Box<Run>),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunView {
    query: QueryState,
    run_id: Option<String>,
    run: RunState,
    tabs: TabController,
    pie: PieData,
    table: ResultsTable,
    artifact_tabs: Vec<ArtifactTab>,
    /// Id of the latest results request; older responses are dropped.
    results_generation: u64,
    closed: bool,
}

impl RunView {
    /// Build the view from the page's search string and hash.
    pub fn mount(search: &str, hash: &str) -> (Self, Vec<Command>) {
        let query = QueryState::parse(search);
        let table = ResultsTable::new(query.page, query.page_size);
        let (run_id, run, commands) = match query.run_id() {
            Ok(id) => (
                Some(id.to_string()),
                RunState::Loading,
                vec![Command::Fetch(Fetch::Run {
                    run_id: id.to_string(),
                })],
            ),
            Err(e) => {
                error!("Cannot load run view: {}", e);
                (None, RunState::Failed(e.to_string()), Vec::new())
            }
        };
        let view = Self {
            query,
            run_id,
            run,
            tabs: TabController::from_hash(hash),
            pie: PieData::default(),
            table,
            artifact_tabs: Vec::new(),
            results_generation: 0,
            closed: false,
        };
        (view, commands)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn run(&self) -> Option<&Run> {
        match &self.run {
            RunState::Loaded(run) => Some(&**run),
            _ => None,
        }
    }

    pub fn active_tab(&self) -> &Tab {
        self.tabs.active()
    }

    pub fn pie(&self) -> &PieData {
        &self.pie
    }

    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    pub fn artifact_tabs(&self) -> &[ArtifactTab] {
        &self.artifact_tabs
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Apply an event and return the commands it triggers.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        if self.closed {
            debug!("View closed, dropping event {}", event_name(&event));
            return Vec::new();
        }
        match event {
            Event::RunLoaded(Ok(run)) => {
                debug!("Loaded run {}", run.id);
                self.run = RunState::Loaded(Box::new(run));
                let mut commands = Vec::new();
                if let Some(run_id) = self.run_id.clone() {
                    commands.push(Command::Fetch(Fetch::Artifacts { run_id }));
                }
                let load = self.tabs.active().on_enter();
                commands.extend(self.load(load));
                commands
            }
            Event::RunLoaded(Err(e)) => {
                error!("Error fetching run: {}", e);
                self.run = RunState::Failed(e.to_string());
                Vec::new()
            }
            Event::ArtifactsListed(Ok(artifacts)) => {
                let commands = artifacts
                    .iter()
                    .cloned()
                    .enumerate()
                    .map(|(position, artifact)| Command::Fetch(Fetch::Artifact { artifact, position }))
                    .collect();
                if let RunState::Loaded(run) = &mut self.run {
                    run.artifacts = artifacts;
                }
                commands
            }
            Event::ArtifactsListed(Err(e)) => {
                error!("Error fetching artifacts: {}", e);
                Vec::new()
            }
            Event::ArtifactLoaded {
                artifact,
                position,
                content,
            } => {
                match content {
                    Ok(content) => {
                        if let Some(tab) = ArtifactTab::from_content(artifact, position, content) {
                            insert_ordered(&mut self.artifact_tabs, tab);
                        }
                    }
                    Err(e) => warn!("Error fetching artifact {}: {}", artifact.filename, e),
                }
                Vec::new()
            }
            Event::ResultsLoaded { generation, page } => {
                if generation != self.results_generation {
                    debug!(
                        "Dropping stale results response {} (latest {})",
                        generation, self.results_generation
                    );
                    return Vec::new();
                }
                match page {
                    Ok(page) => {
                        self.table.apply(&page);
                        self.query.page = self.table.page;
                        self.query.page_size = self.table.page_size;
                    }
                    Err(e) => {
                        error!("Error fetching result data: {}", e);
                        self.table.fail();
                    }
                }
                Vec::new()
            }
            Event::TabSelected(tab) => {
                let transition = self.tabs.select(tab);
                let mut commands: Vec<Command> =
                    transition.push_hash.map(Command::PushHistory).into_iter().collect();
                commands.extend(self.load(transition.load));
                commands
            }
            Event::HistoryChanged(hash) => match self.tabs.navigate(&hash) {
                Some(load) => self.load(load),
                None => Vec::new(),
            },
            Event::SetPage(page) => {
                self.query.page = page.max(1);
                self.fetch_results()
            }
            Event::SetPageSize(page_size) => {
                self.query.page_size = page_size.max(1);
                self.fetch_results()
            }
            Event::RefreshResults => self.fetch_results(),
            Event::Unmount => {
                debug!("Run view unmounted");
                self.closed = true;
                Vec::new()
            }
        }
    }

    fn load(&mut self, load: TabLoad) -> Vec<Command> {
        match load {
            TabLoad::RecomputePie => {
                if let Some(data) = self.run().map(Run::accessibility) {
                    self.pie = PieData::from_counts(data);
                }
                Vec::new()
            }
            TabLoad::FetchResults => self.fetch_results(),
            TabLoad::Nothing => Vec::new(),
        }
    }

    fn fetch_results(&mut self) -> Vec<Command> {
        let Some(run_id) = self.run_id.as_deref() else {
            return Vec::new();
        };
        let query = ResultsQuery::for_run(run_id, &self.query);
        self.results_generation += 1;
        self.table.begin_loading();
        vec![Command::Fetch(Fetch::Results {
            generation: self.results_generation,
            query,
        })]
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::RunLoaded(_) => "RunLoaded",
        Event::ArtifactsListed(_) => "ArtifactsListed",
        Event::ArtifactLoaded { .. } => "ArtifactLoaded",
        Event::ResultsLoaded { .. } => "ResultsLoaded",
        Event::TabSelected(_) => "TabSelected",
        Event::HistoryChanged(_) => "HistoryChanged",
        Event::SetPage(_) => "SetPage",
        Event::SetPageSize(_) => "SetPageSize",
        Event::RefreshResults => "RefreshResults",
        Event::Unmount => "Unmount",
    }
}
