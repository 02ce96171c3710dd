//! Which desk app is open, and whether the desk has been started
//!
//! One state machine serves both layouts. The render mode only changes how
//! `open` and `close` are interpreted: the full desk tracks a single open
//! window, the compact layout navigates by scrolling and tracks nothing.

use serde::{Deserialize, Serialize};

use crate::knowledge::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppId {
    Ai,
    Experience,
    Projects,
    Education,
    Achievements,
    Mail,
}

impl AppId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppId::Ai => "ai",
            AppId::Experience => "experience",
            AppId::Projects => "projects",
            AppId::Education => "education",
            AppId::Achievements => "achievements",
            AppId::Mail => "mail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::all().into_iter().find(|app| app.as_str() == needle)
    }

    /// Desk icon order.
    pub fn all() -> Vec<AppId> {
        vec![
            AppId::Ai,
            AppId::Experience,
            AppId::Projects,
            AppId::Education,
            AppId::Achievements,
            AppId::Mail,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppId::Ai => "AI Assistant",
            AppId::Experience => "Experience",
            AppId::Projects => "Projects",
            AppId::Education => "Education",
            AppId::Achievements => "Achievements",
            AppId::Mail => "Mail",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            AppId::Ai => "🤖",
            AppId::Experience => "💼",
            AppId::Projects => "🛠",
            AppId::Education => "🎓",
            AppId::Achievements => "🏆",
            AppId::Mail => "✉",
        }
    }

    /// Knowledge shown in the app's window. The assistant has none; it chats.
    pub fn topics(&self) -> &'static [Topic] {
        match self {
            AppId::Ai => &[],
            AppId::Experience => &[Topic::Experience, Topic::Internships],
            AppId::Projects => &[Topic::Projects],
            AppId::Education => &[Topic::Education],
            AppId::Achievements => &[Topic::Achievements],
            AppId::Mail => &[Topic::Contact],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    NotStarted,
    Started,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Full,
    Compact,
}

impl RenderMode {
    /// Compact when the surface is at most `compact_width` columns wide.
    pub fn for_width(width: u16, compact_width: u16) -> Self {
        if width <= compact_width {
            RenderMode::Compact
        } else {
            RenderMode::Full
        }
    }
}

/// What the presentation layer should do after `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Window(AppId),
    ScrollTo(AppId),
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    stage: Stage,
    open_app: Option<AppId>,
    render_mode: RenderMode,
}

impl ViewState {
    pub fn new(render_mode: RenderMode) -> Self {
        Self {
            render_mode,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_started(&self) -> bool {
        self.stage == Stage::Started
    }

    pub fn open_app(&self) -> Option<AppId> {
        self.open_app
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn start(&mut self) {
        if self.stage == Stage::NotStarted {
            tracing::info!(mode = ?self.render_mode, "experience started");
            self.stage = Stage::Started;
        }
    }

    pub fn open(&mut self, app: AppId) -> Navigation {
        if !self.is_started() {
            return Navigation::Ignored;
        }
        match self.render_mode {
            RenderMode::Full => {
                tracing::debug!(app = app.as_str(), "open window");
                self.open_app = Some(app);
                Navigation::Window(app)
            }
            RenderMode::Compact => Navigation::ScrollTo(app),
        }
    }

    pub fn close(&mut self) {
        if self.render_mode == RenderMode::Full {
            self.open_app = None;
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if mode == self.render_mode {
            return;
        }
        tracing::debug!(from = ?self.render_mode, to = ?mode, "render mode changed");
        self.render_mode = mode;
        if mode == RenderMode::Compact {
            self.open_app = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> ViewState {
        let mut view = ViewState::default();
        view.start();
        view
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut view = ViewState::default();
        assert_eq!(view.stage(), Stage::NotStarted);
        view.start();
        view.start();
        assert_eq!(view.stage(), Stage::Started);
    }

    #[test]
    fn test_open_before_start_is_ignored() {
        let mut view = ViewState::default();
        assert_eq!(view.open(AppId::Ai), Navigation::Ignored);
        assert_eq!(view.open_app(), None);
        view.close();
        assert_eq!(view.stage(), Stage::NotStarted);
    }

    #[test]
    fn test_single_open_app() {
        let mut view = started();
        assert_eq!(view.open(AppId::Ai), Navigation::Window(AppId::Ai));
        assert_eq!(view.open(AppId::Mail), Navigation::Window(AppId::Mail));
        assert_eq!(view.open_app(), Some(AppId::Mail));
    }

    #[test]
    fn test_close_clears_and_repeats_safely() {
        let mut view = started();
        view.open(AppId::Projects);
        view.close();
        assert_eq!(view.open_app(), None);
        view.close();
        assert_eq!(view.open_app(), None);
    }

    #[test]
    fn test_compact_open_scrolls_without_tracking() {
        let mut view = ViewState::new(RenderMode::Compact);
        view.start();
        assert_eq!(view.open(AppId::Education), Navigation::ScrollTo(AppId::Education));
        assert_eq!(view.open_app(), None);
    }

    #[test]
    fn test_switching_to_compact_drops_open_app() {
        let mut view = started();
        view.open(AppId::Ai);
        view.set_render_mode(RenderMode::Compact);
        assert_eq!(view.open_app(), None);
        view.set_render_mode(RenderMode::Full);
        assert!(view.is_started());
        assert_eq!(view.open_app(), None);
    }

    #[test]
    fn test_render_mode_for_width() {
        assert_eq!(RenderMode::for_width(80, 100), RenderMode::Compact);
        assert_eq!(RenderMode::for_width(100, 100), RenderMode::Compact);
        assert_eq!(RenderMode::for_width(101, 100), RenderMode::Full);
    }

    #[test]
    fn test_app_id_round_trip_names() {
        for app in AppId::all() {
            assert_eq!(AppId::from_str(app.as_str()), Some(app));
        }
        assert_eq!(AppId::from_str("MAIL"), Some(AppId::Mail));
        assert_eq!(AppId::from_str("browser"), None);
    }
}
