//! The planner window.
use std::path::PathBuf;
use std::time::Duration;

use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, checkbox, column, container, row, stack, text, text_input};
use iced::{Element, Length, Subscription, Task as Command, window};

use crate::{
    ChartControls, ChartEvent,
    chart::TaskChart,
    config::PlannerConfig,
    icon_cache::{IconCache, fetch_remote},
    legend,
    planner::{Change, Planner},
    store::{JsonFileStore, Persistence, SavedState, TaskStore},
    table::{self, IconDraft, RowDraft, TableMessage},
    transfer::{self, Format},
};

#[derive(Debug, Clone)]
pub enum Message {
    Chart(ChartEvent),
    Table(TableMessage),
    AddTask,
    QuickEditToggled(bool),
    ToggleLegend,
    ImportPathChanged(String),
    Import,
    Export(Format),
    AutoSaveIntervalChanged(String),
    AutoSaveTick,
    IconFetched(String, Result<Vec<u8>, String>),
    CloseRequested(window::Id),
}

pub struct App {
    planner: Planner,
    persistence: Persistence,
    export_dir: PathBuf,
    icons: IconCache,
    controls: ChartControls,
    row_draft: RowDraft,
    icon_draft: IconDraft,
    legend_collapsed: bool,
    import_path: String,
    interval_draft: String,
    status: Option<String>,
}

impl App {
    pub fn new(config: PlannerConfig) -> (Self, Command<Message>) {
        let local = JsonFileStore::new("local", config.local_store_path());
        let shell = config
            .shell_file
            .clone()
            .map(|path| Box::new(JsonFileStore::new("shell", path)) as Box<dyn TaskStore>);
        let persistence = Persistence::new(Box::new(local), shell);

        let mut saved = persistence.load_initial();
        if saved.tasks.is_empty() {
            saved.auto_save_interval = config.auto_save_secs;
        }
        tracing::info!(
            count = saved.tasks.len(),
            interval = saved.auto_save_interval,
            "loaded tasks"
        );

        let mut app = Self::with_state(saved, persistence, config.export_dir);
        let fetches = app.sync_icons();
        (app, fetches)
    }

    fn with_state(saved: SavedState, persistence: Persistence, export_dir: PathBuf) -> Self {
        let planner = Planner::from_saved(saved);
        Self {
            interval_draft: planner.auto_save_interval().to_string(),
            planner,
            persistence,
            export_dir,
            icons: IconCache::default(),
            controls: ChartControls::default(),
            row_draft: RowDraft::default(),
            icon_draft: IconDraft::default(),
            legend_collapsed: false,
            import_path: String::new(),
            status: None,
        }
    }

    pub fn title(&self) -> String {
        format!("Quadrant planner ({} tasks)", self.planner.tasks().len())
    }

    pub fn update(&mut self, message: Message) -> Command<Message> {
        let revision = self.planner.revision();
        let command = match message {
            Message::Chart(event) => {
                let change = self.planner.apply_chart_event(event);
                match event {
                    ChartEvent::Select(index) => self.open_row_editor(index),
                    ChartEvent::ActivateSecondary(index) => self.open_icon_editor(index),
                    ChartEvent::DragUpdate { index, .. } => {
                        if self.planner.editing() == Some(index) {
                            self.open_row_editor(index);
                        }
                    }
                }
                self.persist_if(change);
                Command::none()
            }
            Message::Table(msg) => self.update_table(msg),
            Message::AddTask => {
                let change = self.planner.add_task();
                if let Some(index) = self.planner.editing() {
                    self.open_row_editor(index);
                }
                self.persist_if(change);
                Command::none()
            }
            Message::QuickEditToggled(enabled) => {
                self.controls = self.controls.with_quick_edit(enabled);
                Command::none()
            }
            Message::ToggleLegend => {
                self.legend_collapsed = !self.legend_collapsed;
                Command::none()
            }
            Message::ImportPathChanged(path) => {
                self.import_path = path;
                Command::none()
            }
            Message::Import => {
                let path = PathBuf::from(self.import_path.trim());
                match transfer::import_file(&path) {
                    Ok(tasks) => {
                        self.status = Some(format!("Imported {} tasks", tasks.len()));
                        let change = self.planner.replace_all(tasks);
                        self.persist_if(change);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "import failed");
                    }
                }
                Command::none()
            }
            Message::Export(format) => {
                match transfer::export_to_dir(self.planner.tasks(), format, &self.export_dir) {
                    Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
                    Err(e) => tracing::warn!(error = %e, "export failed"),
                }
                Command::none()
            }
            Message::AutoSaveIntervalChanged(raw) => {
                if let Ok(secs) = raw.trim().parse::<u64>() {
                    self.planner.set_auto_save_interval(secs);
                }
                self.interval_draft = raw;
                Command::none()
            }
            Message::AutoSaveTick => {
                self.save();
                Command::none()
            }
            Message::IconFetched(url, result) => {
                self.icons.finish_fetch(&url, result);
                Command::none()
            }
            Message::CloseRequested(id) => {
                tracing::info!(?id, "saving before exit");
                self.save();
                iced::exit()
            }
        };

        if self.planner.revision() != revision {
            Command::batch([command, self.sync_icons()])
        } else {
            command
        }
    }

    fn update_table(&mut self, msg: TableMessage) -> Command<Message> {
        match msg {
            TableMessage::Select(index) => {
                self.planner.select(index);
                self.open_row_editor(index);
            }
            TableMessage::Delete(index) => {
                let change = self.planner.delete_task(index);
                self.persist_if(change);
                if let Some(open) = self.planner.editing() {
                    self.open_row_editor(open);
                }
            }
            TableMessage::EditTitle(index, title) => {
                let change = self.planner.edit_title(index, title);
                self.persist_if(change);
            }
            TableMessage::EditAxis(index, axis, raw) => {
                let change = self.planner.edit_axis(index, axis, &raw);
                self.persist_if(change);
                self.row_draft.set(axis, raw);
            }
            TableMessage::Commit => {
                let change = self.planner.commit_edit();
                self.persist_if(change);
            }
            TableMessage::OpenIconEditor(index) => {
                self.planner.activate_secondary(index);
                self.open_icon_editor(index);
            }
            TableMessage::IconSourceChanged(source) => {
                self.icon_draft.source = source;
                self.icon_draft.error = None;
            }
            TableMessage::IconShapeChanged(shape) => self.icon_draft.shape = shape,
            TableMessage::IconInputChanged(input) => {
                self.icon_draft.input = input;
                self.icon_draft.error = None;
            }
            TableMessage::ApplyIcon => {
                if let Some(index) = self.planner.icon_editing() {
                    match self.icon_draft.resolve() {
                        Ok(icon) => {
                            let change = self.planner.set_icon(index, icon);
                            self.persist_if(change);
                            let change = self.planner.commit_edit();
                            self.persist_if(change);
                        }
                        Err(e) => self.icon_draft.error = Some(e.to_string()),
                    }
                }
            }
            TableMessage::CancelIcon => {
                let change = self.planner.commit_edit();
                self.persist_if(change);
            }
        }
        Command::none()
    }

    fn open_row_editor(&mut self, index: usize) {
        if let Some(task) = self.planner.task(index) {
            self.row_draft = RowDraft::from_task(task);
        }
    }

    fn open_icon_editor(&mut self, index: usize) {
        if let Some(task) = self.planner.task(index) {
            self.icon_draft = IconDraft::from_icon(&task.icon);
        }
    }

    fn persist_if(&self, change: Change) {
        if change.should_persist() {
            self.save();
        }
    }

    fn save(&self) {
        self.persistence.save_all(&self.planner.snapshot());
    }

    /// Decode new local icons and start fetching new remote ones.
    fn sync_icons(&mut self) -> Command<Message> {
        let fetches = self.icons.sync(self.planner.tasks());
        Command::batch(fetches.into_iter().map(|url| {
            Command::perform(fetch_remote(url.clone()), move |result| {
                Message::IconFetched(url.clone(), result.map_err(|e| e.to_string()))
            })
        }))
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let every = Duration::from_secs(self.planner.auto_save_interval());
        Subscription::batch([
            iced::time::every(every).map(|_| Message::AutoSaveTick),
            window::close_requests().map(Message::CloseRequested),
        ])
    }

    pub fn view(&self) -> Element<'_, Message> {
        let chart = TaskChart::new(self.planner.tasks(), self.planner.revision(), &self.icons)
            .controls(self.controls)
            .editing(self.planner.editing())
            .view()
            .map(Message::Chart);
        let chart = stack![
            chart,
            container(legend::urgency_legend(
                self.legend_collapsed,
                Message::ToggleLegend
            ))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(8)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Top),
        ];

        let toolbar = row![
            button("Add task").on_press(Message::AddTask),
            checkbox(self.controls.quick_edit)
                .label("Quick edit (drag markers)")
                .on_toggle(Message::QuickEditToggled),
            text("Autosave (s)"),
            text_input("30", &self.interval_draft)
                .on_input(Message::AutoSaveIntervalChanged)
                .width(Length::Fixed(60.0)),
            button("Export CSV").on_press(Message::Export(Format::Csv)),
            button("Export JSON").on_press(Message::Export(Format::Json)),
            text_input("tasks.csv or tasks.json", &self.import_path)
                .on_input(Message::ImportPathChanged)
                .on_submit(Message::Import)
                .width(Length::Fixed(220.0)),
            button("Import").on_press(Message::Import),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let mut side = column![
            table::task_table(&self.planner, &self.row_draft).map(Message::Table)
        ]
        .spacing(12)
        .width(Length::FillPortion(2));
        if let Some(index) = self.planner.icon_editing()
            && let Some(task) = self.planner.task(index)
        {
            side = side.push(table::icon_editor(index, task, &self.icon_draft).map(Message::Table));
        }
        side = side.push(table::hint_panel(self.planner.tasks()));

        let mut content = column![
            toolbar,
            row![
                container(chart).width(Length::FillPortion(3)).height(Length::Fill),
                side,
            ]
            .spacing(12)
            .height(Length::Fill),
        ]
        .spacing(10)
        .padding(12);
        if let Some(status) = &self.status {
            content = content.push(text(status).size(12));
        }
        content.into()
    }
}

/// Run the planner until its window closes.
pub fn run(config: PlannerConfig) -> iced::Result {
    iced::application(move || App::new(config.clone()), App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .window(window::Settings {
            exit_on_close_request: false,
            ..window::Settings::default()
        })
        .run()
}
