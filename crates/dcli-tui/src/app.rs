//! Dashboard state and the main loop

use crate::event::{Event, EventHandler};
use crate::router::{route, DocView, Intent, LogView, OptionsMenu, Screen, ShellChoice, TopView};
use crate::shell::{self, ExecRequest, SHELLS};
use crate::ui;
use crate::widgets::{ChoiceMenu, RowTable};
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use dcli_config::GlobalConfig;
use dcli_core::{
    container_rows, detail, image_rows, network_rows, spawn_refresh_listener, stack_rows,
    verbs_for, volume_rows, ActionDispatcher, CoreError, EntityKind, SnapshotStore,
};
use dcli_engine::{Container, ContainerEngine, HostInfo, LOG_TAIL_LINES};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Rows or lines moved by PageUp/PageDown
const PAGE_STEP: usize = 10;

/// Application state
pub struct App {
    /// Current screen and its transient state
    pub screen: Screen,
    pub containers: RowTable,
    pub images: RowTable,
    pub networks: RowTable,
    pub volumes: RowTable,
    pub stacks: RowTable,
    /// Engine server version for the status bar
    pub engine_version: String,
    pub host: HostInfo,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Shell session chosen on the exec menu, started by the main loop
    pub pending_exec: Option<ExecRequest>,
    store: SnapshotStore,
    dispatcher: ActionDispatcher,
    exec_binary: String,
    tick_rate: Duration,
}

impl App {
    /// Create the app and load the container list
    pub async fn new(engine: Arc<dyn ContainerEngine>, config: &GlobalConfig) -> AppResult<Self> {
        let engine_version = engine.version().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read engine version: {}", e);
            String::new()
        });
        let host = engine.host_info().await.unwrap_or_else(|e| {
            tracing::warn!("Failed to read host info: {}", e);
            HostInfo::default()
        });

        let mut app = Self {
            screen: Screen::ContainerList,
            containers: RowTable::new(),
            images: RowTable::new(),
            networks: RowTable::new(),
            volumes: RowTable::new(),
            stacks: RowTable::new(),
            engine_version,
            host,
            status_message: None,
            should_quit: false,
            pending_exec: None,
            store: SnapshotStore::new(engine.clone()),
            dispatcher: ActionDispatcher::new(engine),
            exec_binary: config.engine.exec_binary.clone(),
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
        };

        app.store.refresh_containers().await?;
        app.rebuild_rows(EntityKind::Container).await;
        Ok(app)
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventHandler::new(self.tick_rate);

        let listener = self.spawn_listener(events.sender());

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if let Some(event) = events.next().await {
                self.handle_event(event).await?;
            }

            if let Some(request) = self.pending_exec.take() {
                self.attach_shell(terminal, &mut events, request).await?;
            }
        }

        listener.abort();
        Ok(())
    }

    /// Start the background refresh listener, reporting each refresh on `sender`
    pub fn spawn_listener(&self, sender: UnboundedSender<Event>) -> JoinHandle<()> {
        spawn_refresh_listener(self.store.clone(), move |count| {
            let _ = sender.send(Event::ContainersRefreshed(count));
        })
    }

    /// Handle an event from the terminal or the listener
    pub async fn handle_event(&mut self, event: Event) -> AppResult<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.send_key(key.code, key.modifiers).await?;
            }
            Event::ContainersRefreshed(count) => {
                tracing::debug!("Listener refreshed {} containers", count);
                self.rebuild_rows(EntityKind::Container).await;
            }
            Event::Key(_) | Event::Tick | Event::Resize(_, _) | Event::Mouse(_) => {}
        }
        Ok(())
    }

    /// Feed a key press, as the event loop does
    pub async fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        let intent = route(&self.screen, code, modifiers);
        self.apply(intent).await;
        Ok(())
    }

    async fn apply(&mut self, intent: Intent) {
        let kind = self.screen.kind();

        match intent {
            Intent::None => {}
            Intent::Quit => self.should_quit = true,
            Intent::Refresh => {
                self.containers.set_filter("");
                self.refresh(EntityKind::Container).await;
                self.screen = Screen::ContainerList;
            }
            Intent::ShowList(target) => {
                self.table_mut(target).set_filter("");
                self.refresh(target).await;
                self.screen = Screen::list_for(target);
            }
            Intent::Back => self.screen = Screen::list_for(kind),
            Intent::MoveUp
            | Intent::MoveDown
            | Intent::PageUp
            | Intent::PageDown
            | Intent::Home
            | Intent::End => self.navigate(intent),
            Intent::OpenDetail => self.open_detail(kind).await,
            Intent::OpenSearch => {
                if let Some(screen) = Screen::search_for(kind) {
                    self.screen = screen;
                }
            }
            Intent::OpenOptions => self.open_options(kind).await,
            Intent::OpenLogs => self.open_logs().await,
            Intent::OpenStats => self.open_stats().await,
            Intent::OpenTop => self.open_top().await,
            Intent::OpenShellChoice => self.open_shell_choice().await,
            Intent::SubmitSearch => self.submit_search(kind).await,
            Intent::EditSearch(code) => {
                if let Some(input) = self.screen.search_input_mut() {
                    input.handle_key(code);
                }
            }
            Intent::ConfirmOption => self.confirm_option(kind).await,
            Intent::ConfirmShell => self.confirm_shell(),
        }
    }

    // ==================== Lists ====================

    pub fn table(&self, kind: EntityKind) -> &RowTable {
        match kind {
            EntityKind::Container => &self.containers,
            EntityKind::Image => &self.images,
            EntityKind::Network => &self.networks,
            EntityKind::Volume => &self.volumes,
            EntityKind::Stack => &self.stacks,
        }
    }

    pub fn table_mut(&mut self, kind: EntityKind) -> &mut RowTable {
        match kind {
            EntityKind::Container => &mut self.containers,
            EntityKind::Image => &mut self.images,
            EntityKind::Network => &mut self.networks,
            EntityKind::Volume => &mut self.volumes,
            EntityKind::Stack => &mut self.stacks,
        }
    }

    /// Refetch one kind and rebuild its rows. A failed fetch keeps the
    /// previous rows and reports on the status line.
    async fn refresh(&mut self, kind: EntityKind) {
        let result = match kind {
            EntityKind::Container => self.store.refresh_containers().await,
            EntityKind::Image => self.store.refresh_images().await,
            EntityKind::Network => self.store.refresh_networks().await,
            EntityKind::Volume => self.store.refresh_volumes().await,
            EntityKind::Stack => self.store.refresh_stacks().await,
        };

        if let Err(e) = result {
            self.report(format!("Failed to refresh {}s: {}", kind, e));
        }
        self.rebuild_rows(kind).await;
    }

    async fn rebuild_rows(&mut self, kind: EntityKind) {
        let filter = self.table(kind).filter().to_string();
        let rows = match kind {
            EntityKind::Container => container_rows(&self.store.containers().await, &filter),
            EntityKind::Image => image_rows(
                &self.store.images().await,
                &filter,
                chrono::Utc::now().timestamp(),
            ),
            EntityKind::Network => network_rows(&self.store.networks().await, &filter),
            EntityKind::Volume => volume_rows(&self.store.volumes().await, &filter),
            EntityKind::Stack => stack_rows(&self.store.stacks().await, &filter),
        };
        self.table_mut(kind).set_rows(rows);
    }

    fn navigate(&mut self, intent: Intent) {
        if self.screen.is_list() {
            let kind = self.screen.kind();
            let table = self.table_mut(kind);
            match intent {
                Intent::MoveUp => table.select_prev(),
                Intent::MoveDown => table.select_next(),
                Intent::PageUp => table.page_up(PAGE_STEP),
                Intent::PageDown => table.page_down(PAGE_STEP),
                Intent::Home => table.select_first(),
                Intent::End => table.select_last(),
                _ => {}
            }
            return;
        }

        if let Some(options) = self.screen.options_mut() {
            step_menu(&mut options.menu, intent);
            return;
        }

        if let Screen::ContainerExecShellChoice(choice) = &mut self.screen {
            step_menu(&mut choice.menu, intent);
            return;
        }

        // Upper bounds are clamped when drawing
        if let Some(scroll) = self.screen.scroll_mut() {
            *scroll = match intent {
                Intent::MoveUp => scroll.saturating_sub(1),
                Intent::MoveDown => scroll.saturating_add(1),
                Intent::PageUp => scroll.saturating_sub(PAGE_STEP),
                Intent::PageDown => scroll.saturating_add(PAGE_STEP),
                Intent::Home => 0,
                Intent::End => usize::MAX,
                _ => *scroll,
            };
        }
    }

    async fn submit_search(&mut self, kind: EntityKind) {
        let Some(input) = self.screen.search_input() else {
            return;
        };
        let filter = input.value().to_string();
        tracing::debug!("Filtering {}s by {:?}", kind, filter);

        self.table_mut(kind).set_filter(filter);
        self.rebuild_rows(kind).await;
        self.screen = Screen::list_for(kind);
    }

    // ==================== Detail and options ====================

    fn selected_key(&self, kind: EntityKind) -> Option<String> {
        self.table(kind).selected_key().map(str::to_string)
    }

    async fn open_detail(&mut self, kind: EntityKind) {
        let Some(key) = self.selected_key(kind) else {
            return;
        };
        match self.detail_view(kind, &key).await {
            Ok(view) => self.screen = Screen::detail_for(kind, view),
            Err(e) => self.report(e.to_string()),
        }
    }

    async fn detail_view(&self, kind: EntityKind, key: &str) -> dcli_core::Result<DocView> {
        let not_found = || CoreError::NotFound {
            kind,
            key: key.to_string(),
        };

        let view = match kind {
            EntityKind::Container => {
                let container = self.store.container(key).await.ok_or_else(not_found)?;
                DocView::new(container.name.clone(), detail::container_detail(&container))
            }
            EntityKind::Image => {
                let image = self.store.image(key).await.ok_or_else(not_found)?;
                let now = chrono::Utc::now().timestamp();
                DocView::new(image.repo_tag(), detail::image_detail(&image, now))
            }
            EntityKind::Network => {
                let network = self.store.network(key).await.ok_or_else(not_found)?;
                DocView::new(network.name.clone(), detail::network_detail(&network))
            }
            EntityKind::Volume => {
                let volume = self.store.volume(key).await.ok_or_else(not_found)?;
                DocView::new(volume.name.clone(), detail::volume_detail(&volume))
            }
            EntityKind::Stack => {
                let stack = self.store.stack(key).await.ok_or_else(not_found)?;
                DocView::new(stack.name(), detail::stack_detail(&stack))
            }
        };
        Ok(view)
    }

    async fn open_options(&mut self, kind: EntityKind) {
        let Some(key) = self.selected_key(kind) else {
            return;
        };

        let title = match kind {
            EntityKind::Container => self
                .store
                .container(&key)
                .await
                .map(|c| format!("Options container: {} - {}", c.name, c.image)),
            EntityKind::Image => self
                .store
                .image(&key)
                .await
                .map(|i| format!("Options image: {}", i.repo_tag())),
            EntityKind::Network => self
                .store
                .network(&key)
                .await
                .map(|n| format!("Options network: {}", n.name)),
            EntityKind::Volume => self
                .store
                .volume(&key)
                .await
                .map(|v| format!("Options volume: {}", v.name)),
            EntityKind::Stack => return,
        };

        let Some(title) = title else {
            self.report(CoreError::NotFound { kind, key }.to_string());
            return;
        };

        let menu = OptionsMenu {
            key,
            title,
            menu: ChoiceMenu::new(verbs_for(kind).to_vec()),
            error: None,
        };
        if let Some(screen) = Screen::options_for(kind, menu) {
            self.screen = screen;
        }
    }

    /// Dispatch the highlighted verb. Success refreshes and returns to the
    /// list; failure stays on the menu with the error shown.
    async fn confirm_option(&mut self, kind: EntityKind) {
        let Some(options) = self.screen.options() else {
            return;
        };
        let Some(verb) = options.menu.selected().copied() else {
            return;
        };
        let key = options.key.clone();

        match self.dispatcher.apply(kind, &key, verb).await {
            Ok(()) => {
                self.status_message = Some(format!("{} {} {}", verb, kind, short_key(&key)));
                self.refresh(kind).await;
                self.screen = Screen::list_for(kind);
            }
            Err(e) => {
                tracing::warn!("{} {} {} failed: {}", verb, kind, key, e);
                if let Some(options) = self.screen.options_mut() {
                    options.error = Some(e.to_string());
                }
            }
        }
    }

    // ==================== Container screens ====================

    async fn selected_container(&mut self) -> Option<Container> {
        let key = self.selected_key(EntityKind::Container)?;
        let container = self.store.container(&key).await;
        if container.is_none() {
            self.report(
                CoreError::NotFound {
                    kind: EntityKind::Container,
                    key,
                }
                .to_string(),
            );
        }
        container
    }

    async fn open_logs(&mut self) {
        let Some(container) = self.selected_container().await else {
            return;
        };
        match self
            .store
            .engine()
            .container_logs(&container.id, LOG_TAIL_LINES)
            .await
        {
            Ok(mut lines) => {
                lines.reverse();
                self.screen = Screen::ContainerLogs(LogView {
                    container: container.name,
                    lines,
                    scroll: 0,
                });
            }
            Err(e) => self.report(format!("Failed to read logs: {}", e)),
        }
    }

    async fn open_stats(&mut self) {
        let Some(container) = self.selected_container().await else {
            return;
        };
        match self.store.engine().container_stats(&container.id).await {
            Ok(stats) => {
                self.screen = Screen::ContainerStats(DocView::new(
                    container.name,
                    detail::stats_detail(&stats),
                ));
            }
            Err(e) => self.report(format!("Failed to read stats: {}", e)),
        }
    }

    async fn open_top(&mut self) {
        let Some(container) = self.selected_container().await else {
            return;
        };
        match self.store.engine().container_top(&container.id).await {
            Ok(processes) => {
                self.screen = Screen::ContainerTop(TopView {
                    container: container.name,
                    processes,
                    scroll: 0,
                });
            }
            Err(e) => self.report(format!("Failed to list processes: {}", e)),
        }
    }

    async fn open_shell_choice(&mut self) {
        let Some(container) = self.selected_container().await else {
            return;
        };
        self.screen = Screen::ContainerExecShellChoice(ShellChoice {
            title: format!("Exec command container: {}", container.name),
            container_id: container.id,
            menu: ChoiceMenu::new(SHELLS.to_vec()),
        });
    }

    fn confirm_shell(&mut self) {
        if let Screen::ContainerExecShellChoice(choice) = &self.screen {
            if let Some(shell) = choice.menu.selected() {
                self.pending_exec = Some(ExecRequest {
                    container_id: choice.container_id.clone(),
                    shell: shell.to_string(),
                });
            }
        }
        self.screen = Screen::ContainerList;
    }

    /// Hand the terminal to an exec session and take it back afterwards
    async fn attach_shell<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut EventHandler,
        request: ExecRequest,
    ) -> AppResult<()> {
        events.set_paused(true);
        // Let an in-flight terminal poll finish before the child reads stdin
        tokio::time::sleep(self.tick_rate).await;
        crate::suspend_terminal()?;

        let exec_binary = self.exec_binary.clone();
        let outcome = tokio::task::spawn_blocking(move || shell::run_exec(&exec_binary, &request))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Exec task failed: {}", e);
                Err(shell::EXEC_FAILED_MESSAGE.to_string())
            });

        crate::resume_terminal()?;
        terminal.clear()?;
        events.drain();
        events.set_paused(false);

        match outcome {
            Ok(()) => self.refresh(EntityKind::Container).await,
            Err(message) => self.screen = Screen::ExecError(message),
        }
        Ok(())
    }

    fn report(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.status_message = Some(message);
    }
}

fn step_menu<T>(menu: &mut ChoiceMenu<T>, intent: Intent) {
    match intent {
        Intent::MoveUp => menu.prev(),
        Intent::MoveDown => menu.next(),
        _ => {}
    }
}

/// Ids are shortened for the status line, names are kept
fn short_key(key: &str) -> &str {
    match key.char_indices().nth(12) {
        Some((idx, _)) if key.chars().all(|c| c.is_ascii_hexdigit()) => &key[..idx],
        _ => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_key() {
        assert_eq!(short_key("0123456789abcdef0123"), "0123456789ab");
        assert_eq!(short_key("pgdata"), "pgdata");
        assert_eq!(short_key("a-very-long-volume-name"), "a-very-long-volume-name");
    }

    #[test]
    fn test_step_menu() {
        let mut menu = ChoiceMenu::new(vec![1, 2, 3]);
        step_menu(&mut menu, Intent::MoveUp);
        assert_eq!(menu.selected(), Some(&3));
        step_menu(&mut menu, Intent::PageDown);
        assert_eq!(menu.selected(), Some(&3));
    }
}
