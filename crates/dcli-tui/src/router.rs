//! Screen state machine
//!
//! `Screen` is the single source of truth for what the dashboard shows.
//! Each variant carries the transient state it owns (search buffer, menu
//! cursor, scroll offset), so leaving a screen discards that state.
//! `route` maps a key press on the current screen to an `Intent`; it never
//! touches the engine. The app applies intents and performs any I/O.

use crate::widgets::{ChoiceMenu, TextInputState};
use crossterm::event::{KeyCode, KeyModifiers};
use dcli_core::{EntityKind, Verb};
use dcli_engine::ProcessList;

/// Characters accepted by the search prompts
pub const SEARCH_MAX_CHARS: usize = 156;

/// A scrollable markdown document (detail and stats screens)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocView {
    pub title: String,
    pub markdown: String,
    pub scroll: usize,
}

impl DocView {
    pub fn new(title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            scroll: 0,
        }
    }
}

/// Log tail of one container, newest line first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogView {
    pub container: String,
    pub lines: Vec<String>,
    pub scroll: usize,
}

/// Process table of one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopView {
    pub container: String,
    pub processes: ProcessList,
    pub scroll: usize,
}

/// Lifecycle options for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsMenu {
    pub key: String,
    pub title: String,
    pub menu: ChoiceMenu<Verb>,
    /// Failure of the last dispatched action
    pub error: Option<String>,
}

/// Shell picker for attaching to a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChoice {
    pub container_id: String,
    pub title: String,
    pub menu: ChoiceMenu<&'static str>,
}

/// Every screen the dashboard can show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    ContainerList,
    ContainerDetail(DocView),
    ContainerSearch(TextInputState),
    ContainerLogs(LogView),
    ContainerOptions(OptionsMenu),
    ContainerStats(DocView),
    ContainerTop(TopView),
    ContainerExecShellChoice(ShellChoice),
    ExecError(String),
    ImageList,
    ImageDetail(DocView),
    ImageSearch(TextInputState),
    ImageOptions(OptionsMenu),
    NetworkList,
    NetworkDetail(DocView),
    NetworkSearch(TextInputState),
    NetworkOptions(OptionsMenu),
    VolumeList,
    VolumeDetail(DocView),
    VolumeSearch(TextInputState),
    VolumeOptions(OptionsMenu),
    StackList,
    StackDetail(DocView),
}

impl Screen {
    /// List screen of an entity kind
    pub fn list_for(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Container => Self::ContainerList,
            EntityKind::Image => Self::ImageList,
            EntityKind::Network => Self::NetworkList,
            EntityKind::Volume => Self::VolumeList,
            EntityKind::Stack => Self::StackList,
        }
    }

    /// Detail screen of an entity kind
    pub fn detail_for(kind: EntityKind, view: DocView) -> Self {
        match kind {
            EntityKind::Container => Self::ContainerDetail(view),
            EntityKind::Image => Self::ImageDetail(view),
            EntityKind::Network => Self::NetworkDetail(view),
            EntityKind::Volume => Self::VolumeDetail(view),
            EntityKind::Stack => Self::StackDetail(view),
        }
    }

    /// Search screen of an entity kind, if it has one
    pub fn search_for(kind: EntityKind) -> Option<Self> {
        let input = TextInputState::with_max_chars(SEARCH_MAX_CHARS);
        match kind {
            EntityKind::Container => Some(Self::ContainerSearch(input)),
            EntityKind::Image => Some(Self::ImageSearch(input)),
            EntityKind::Network => Some(Self::NetworkSearch(input)),
            EntityKind::Volume => Some(Self::VolumeSearch(input)),
            EntityKind::Stack => None,
        }
    }

    /// Options screen of an entity kind, if it has one
    pub fn options_for(kind: EntityKind, menu: OptionsMenu) -> Option<Self> {
        match kind {
            EntityKind::Container => Some(Self::ContainerOptions(menu)),
            EntityKind::Image => Some(Self::ImageOptions(menu)),
            EntityKind::Network => Some(Self::NetworkOptions(menu)),
            EntityKind::Volume => Some(Self::VolumeOptions(menu)),
            EntityKind::Stack => None,
        }
    }

    /// Entity kind whose list owns this screen
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::ContainerList
            | Self::ContainerDetail(_)
            | Self::ContainerSearch(_)
            | Self::ContainerLogs(_)
            | Self::ContainerOptions(_)
            | Self::ContainerStats(_)
            | Self::ContainerTop(_)
            | Self::ContainerExecShellChoice(_)
            | Self::ExecError(_) => EntityKind::Container,
            Self::ImageList | Self::ImageDetail(_) | Self::ImageSearch(_) | Self::ImageOptions(_) => {
                EntityKind::Image
            }
            Self::NetworkList
            | Self::NetworkDetail(_)
            | Self::NetworkSearch(_)
            | Self::NetworkOptions(_) => EntityKind::Network,
            Self::VolumeList
            | Self::VolumeDetail(_)
            | Self::VolumeSearch(_)
            | Self::VolumeOptions(_) => EntityKind::Volume,
            Self::StackList | Self::StackDetail(_) => EntityKind::Stack,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::ContainerList
                | Self::ImageList
                | Self::NetworkList
                | Self::VolumeList
                | Self::StackList
        )
    }

    pub fn search_input(&self) -> Option<&TextInputState> {
        match self {
            Self::ContainerSearch(input)
            | Self::ImageSearch(input)
            | Self::NetworkSearch(input)
            | Self::VolumeSearch(input) => Some(input),
            _ => None,
        }
    }

    pub fn search_input_mut(&mut self) -> Option<&mut TextInputState> {
        match self {
            Self::ContainerSearch(input)
            | Self::ImageSearch(input)
            | Self::NetworkSearch(input)
            | Self::VolumeSearch(input) => Some(input),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&OptionsMenu> {
        match self {
            Self::ContainerOptions(menu)
            | Self::ImageOptions(menu)
            | Self::NetworkOptions(menu)
            | Self::VolumeOptions(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn options_mut(&mut self) -> Option<&mut OptionsMenu> {
        match self {
            Self::ContainerOptions(menu)
            | Self::ImageOptions(menu)
            | Self::NetworkOptions(menu)
            | Self::VolumeOptions(menu) => Some(menu),
            _ => None,
        }
    }

    /// Scroll offset of document-like screens
    pub fn scroll_mut(&mut self) -> Option<&mut usize> {
        match self {
            Self::ContainerDetail(view)
            | Self::ContainerStats(view)
            | Self::ImageDetail(view)
            | Self::NetworkDetail(view)
            | Self::VolumeDetail(view)
            | Self::StackDetail(view) => Some(&mut view.scroll),
            Self::ContainerLogs(view) => Some(&mut view.scroll),
            Self::ContainerTop(view) => Some(&mut view.scroll),
            _ => None,
        }
    }
}

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    None,
    Quit,
    /// Refetch containers and show their list
    Refresh,
    /// Refetch a kind and show its list
    ShowList(EntityKind),
    /// Return to the owning list, discarding the screen state
    Back,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    OpenDetail,
    OpenSearch,
    OpenOptions,
    OpenLogs,
    OpenStats,
    OpenTop,
    OpenShellChoice,
    SubmitSearch,
    EditSearch(KeyCode),
    ConfirmOption,
    ConfirmShell,
}

/// Map a key press on `screen` to an intent
pub fn route(screen: &Screen, code: KeyCode, modifiers: KeyModifiers) -> Intent {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match (code, ctrl) {
        (KeyCode::Char('c'), true) => return Intent::Quit,
        (KeyCode::Char('r'), true) => return Intent::Refresh,
        _ => {}
    }

    if screen.search_input().is_some() {
        return match code {
            KeyCode::Esc => Intent::Back,
            KeyCode::Enter => Intent::SubmitSearch,
            KeyCode::Char(_) if ctrl => Intent::None,
            _ => Intent::EditSearch(code),
        };
    }

    if screen.is_list() {
        return route_list(screen, code, ctrl);
    }

    match code {
        KeyCode::Esc => Intent::Back,
        KeyCode::Up | KeyCode::Char('k') if !ctrl => Intent::MoveUp,
        KeyCode::Down | KeyCode::Char('j') if !ctrl => Intent::MoveDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::Home => Intent::Home,
        KeyCode::End => Intent::End,
        KeyCode::Enter => match screen {
            Screen::ContainerOptions(_)
            | Screen::ImageOptions(_)
            | Screen::NetworkOptions(_)
            | Screen::VolumeOptions(_) => Intent::ConfirmOption,
            Screen::ContainerExecShellChoice(_) => Intent::ConfirmShell,
            _ => Intent::None,
        },
        _ => Intent::None,
    }
}

fn route_list(screen: &Screen, code: KeyCode, ctrl: bool) -> Intent {
    let kind = screen.kind();

    if ctrl {
        return match code {
            KeyCode::Char('b') => Intent::ShowList(EntityKind::Image),
            KeyCode::Char('n') => Intent::ShowList(EntityKind::Network),
            KeyCode::Char('v') => Intent::ShowList(EntityKind::Volume),
            KeyCode::Char('p') => Intent::ShowList(EntityKind::Stack),
            KeyCode::Char('f') if kind != EntityKind::Stack => Intent::OpenSearch,
            KeyCode::Char('o') if kind != EntityKind::Stack => Intent::OpenOptions,
            KeyCode::Char('l') if kind == EntityKind::Container => Intent::OpenLogs,
            KeyCode::Char('e') if kind == EntityKind::Container => Intent::OpenShellChoice,
            KeyCode::Char('s') if kind == EntityKind::Container => Intent::OpenStats,
            KeyCode::Char('t') if kind == EntityKind::Container => Intent::OpenTop,
            _ => Intent::None,
        };
    }

    match code {
        KeyCode::Up | KeyCode::Char('k') => Intent::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Intent::MoveDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::Home => Intent::Home,
        KeyCode::End => Intent::End,
        KeyCode::Enter => Intent::OpenDetail,
        _ => Intent::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: KeyModifiers = KeyModifiers::CONTROL;
    const NONE: KeyModifiers = KeyModifiers::NONE;

    fn doc() -> DocView {
        DocView::new("t", "# t")
    }

    fn options() -> OptionsMenu {
        OptionsMenu {
            key: "c1".into(),
            title: "Options container: web - nginx".into(),
            menu: ChoiceMenu::new(vec![Verb::Stop, Verb::Start]),
            error: None,
        }
    }

    #[test]
    fn test_global_keys_from_every_screen() {
        let screens = vec![
            Screen::ContainerList,
            Screen::ImageDetail(doc()),
            Screen::search_for(EntityKind::Volume).unwrap(),
            Screen::ContainerOptions(options()),
            Screen::ExecError("boom".into()),
        ];
        for screen in &screens {
            assert_eq!(route(screen, KeyCode::Char('c'), CTRL), Intent::Quit);
            assert_eq!(route(screen, KeyCode::Char('r'), CTRL), Intent::Refresh);
        }
    }

    #[test]
    fn test_container_list_keys() {
        let s = Screen::ContainerList;
        assert_eq!(route(&s, KeyCode::Enter, NONE), Intent::OpenDetail);
        assert_eq!(route(&s, KeyCode::Char('f'), CTRL), Intent::OpenSearch);
        assert_eq!(route(&s, KeyCode::Char('o'), CTRL), Intent::OpenOptions);
        assert_eq!(route(&s, KeyCode::Char('l'), CTRL), Intent::OpenLogs);
        assert_eq!(route(&s, KeyCode::Char('e'), CTRL), Intent::OpenShellChoice);
        assert_eq!(route(&s, KeyCode::Char('s'), CTRL), Intent::OpenStats);
        assert_eq!(route(&s, KeyCode::Char('t'), CTRL), Intent::OpenTop);
        assert_eq!(
            route(&s, KeyCode::Char('b'), CTRL),
            Intent::ShowList(EntityKind::Image)
        );
        assert_eq!(
            route(&s, KeyCode::Char('n'), CTRL),
            Intent::ShowList(EntityKind::Network)
        );
        assert_eq!(
            route(&s, KeyCode::Char('v'), CTRL),
            Intent::ShowList(EntityKind::Volume)
        );
        assert_eq!(
            route(&s, KeyCode::Char('p'), CTRL),
            Intent::ShowList(EntityKind::Stack)
        );
        assert_eq!(route(&s, KeyCode::Esc, NONE), Intent::None);
    }

    #[test]
    fn test_container_only_keys_are_inert_elsewhere() {
        for screen in [Screen::ImageList, Screen::NetworkList, Screen::VolumeList] {
            assert_eq!(route(&screen, KeyCode::Char('l'), CTRL), Intent::None);
            assert_eq!(route(&screen, KeyCode::Char('e'), CTRL), Intent::None);
            assert_eq!(route(&screen, KeyCode::Char('t'), CTRL), Intent::None);
            assert_eq!(route(&screen, KeyCode::Char('f'), CTRL), Intent::OpenSearch);
        }
    }

    #[test]
    fn test_stack_list_has_no_search_or_options() {
        let s = Screen::StackList;
        assert_eq!(route(&s, KeyCode::Char('f'), CTRL), Intent::None);
        assert_eq!(route(&s, KeyCode::Char('o'), CTRL), Intent::None);
        assert_eq!(route(&s, KeyCode::Enter, NONE), Intent::OpenDetail);
        assert!(Screen::search_for(EntityKind::Stack).is_none());
    }

    #[test]
    fn test_search_screen_captures_typing() {
        let s = Screen::search_for(EntityKind::Container).unwrap();
        assert_eq!(
            route(&s, KeyCode::Char('j'), NONE),
            Intent::EditSearch(KeyCode::Char('j'))
        );
        assert_eq!(
            route(&s, KeyCode::Backspace, NONE),
            Intent::EditSearch(KeyCode::Backspace)
        );
        assert_eq!(route(&s, KeyCode::Enter, NONE), Intent::SubmitSearch);
        assert_eq!(route(&s, KeyCode::Esc, NONE), Intent::Back);
        assert_eq!(route(&s, KeyCode::Char('b'), CTRL), Intent::None);
    }

    #[test]
    fn test_menus_confirm_with_enter() {
        let options = Screen::NetworkOptions(options());
        assert_eq!(route(&options, KeyCode::Enter, NONE), Intent::ConfirmOption);
        assert_eq!(route(&options, KeyCode::Down, NONE), Intent::MoveDown);

        let shells = Screen::ContainerExecShellChoice(ShellChoice {
            container_id: "c1".into(),
            title: "Exec command container: web".into(),
            menu: ChoiceMenu::new(vec!["bin/bash"]),
        });
        assert_eq!(route(&shells, KeyCode::Enter, NONE), Intent::ConfirmShell);
        assert_eq!(route(&shells, KeyCode::Esc, NONE), Intent::Back);
    }

    #[test]
    fn test_non_list_screens_ignore_list_shortcuts() {
        let s = Screen::ContainerDetail(doc());
        assert_eq!(route(&s, KeyCode::Char('b'), CTRL), Intent::None);
        assert_eq!(route(&s, KeyCode::Enter, NONE), Intent::None);
        assert_eq!(route(&s, KeyCode::Esc, NONE), Intent::Back);
        assert_eq!(route(&s, KeyCode::PageDown, NONE), Intent::PageDown);
    }

    #[test]
    fn test_screen_kinds() {
        assert_eq!(Screen::ExecError("x".into()).kind(), EntityKind::Container);
        assert_eq!(Screen::StackDetail(doc()).kind(), EntityKind::Stack);
        assert_eq!(Screen::list_for(EntityKind::Volume), Screen::VolumeList);
        assert!(Screen::ImageList.is_list());
        assert!(!Screen::ImageDetail(doc()).is_list());
    }

    #[test]
    fn test_search_input_is_capped() {
        let mut s = Screen::search_for(EntityKind::Image).unwrap();
        let input = s.search_input_mut().unwrap();
        for _ in 0..200 {
            input.insert('a');
        }
        assert_eq!(input.char_count(), SEARCH_MAX_CHARS);
    }
}
