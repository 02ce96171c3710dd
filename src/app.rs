use std::sync::Arc;

use deskfolio_core::{
    AnswerSource, AppId, ChatSession, KnowledgeBase, Navigation, RenderMode, ViewState,
};
use ratatui::layout::Rect;

use crate::peripherals::{Keyboard, MousePad};

/// Canned questions offered under the chat.
pub const SUGGESTIONS: [&str; 4] = [
    "What are your skills?",
    "Tell me about your experience",
    "What projects have you built?",
    "How can I contact you?",
];

/// Icons per row on the desk.
pub const ICON_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Section shown at the top of the compact page: the last one whose start has
/// scrolled to the first row of the page viewport.
pub fn active_section(offsets: &[(AppId, u16)], scroll: u16) -> Option<AppId> {
    let mut current = offsets.first().map(|(app, _)| *app);
    for (app, offset) in offsets {
        if *offset <= scroll {
            current = Some(*app);
        }
    }
    current
}

pub struct App {
    pub should_quit: bool,
    pub view: ViewState,
    pub compact_width: u16,
    pub input_mode: InputMode,

    // Assistant chat
    pub session: ChatSession,
    pub source_label: String,
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input, in chars
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Desk
    pub selected_icon: usize,
    pub content_scroll: u16,

    // Compact page
    pub page_scroll: u16,
    pub section_offsets: Vec<(AppId, u16)>,
    /// Bring the end of the assistant section into view on the next render
    pub follow_chat: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing dots
    pub clock: String,
    pub keyboard: Keyboard,
    pub mouse: MousePad,

    // Areas for mouse hit-testing (updated during render)
    pub screen_area: Option<Rect>,
    pub chat_area: Option<Rect>,
    pub icon_areas: Vec<(AppId, Rect)>,
    pub link_areas: Vec<(AppId, Rect)>,

    pub knowledge: KnowledgeBase,
}

impl App {
    pub fn new(source: Arc<dyn AnswerSource>, source_label: String, compact_width: u16, width: u16) -> Self {
        let mut app = Self {
            should_quit: false,
            view: ViewState::new(RenderMode::for_width(width, compact_width)),
            compact_width,
            input_mode: InputMode::Normal,

            session: ChatSession::new(source),
            source_label,
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            selected_icon: 0,
            content_scroll: 0,

            page_scroll: 0,
            section_offsets: Vec::new(),
            follow_chat: false,

            animation_frame: 0,
            clock: current_time(),
            keyboard: Keyboard::default(),
            mouse: MousePad::default(),

            screen_area: None,
            chat_area: None,
            icon_areas: Vec::new(),
            link_areas: Vec::new(),

            knowledge: KnowledgeBase::builtin(),
        };
        // The compact layout has no start screen
        if app.is_compact() {
            app.view.start();
        }
        app
    }

    pub fn is_compact(&self) -> bool {
        self.view.render_mode() == RenderMode::Compact
    }

    pub fn start(&mut self) {
        self.view.start();
    }

    pub fn resize(&mut self, width: u16) {
        let mode = RenderMode::for_width(width, self.compact_width);
        if mode == self.view.render_mode() {
            return;
        }
        self.view.set_render_mode(mode);
        self.keyboard.release_all();
        self.input_mode = InputMode::Normal;
        if mode == RenderMode::Compact {
            self.view.start();
        }
    }

    pub fn open_app(&mut self, app: AppId) {
        match self.view.open(app) {
            Navigation::Window(app) => {
                self.content_scroll = 0;
                if app == AppId::Ai {
                    self.input_mode = InputMode::Editing;
                    self.scroll_chat_to_bottom();
                }
            }
            Navigation::ScrollTo(app) => self.scroll_to_section(app),
            Navigation::Ignored => {}
        }
    }

    pub fn close_app(&mut self) {
        self.view.close();
        self.input_mode = InputMode::Normal;
    }

    pub fn selected_app(&self) -> AppId {
        let apps = AppId::all();
        apps[self.selected_icon.min(apps.len() - 1)]
    }

    /// Move the icon selection on the desk grid.
    pub fn move_selection(&mut self, dx: isize, dy: isize) {
        let count = AppId::all().len() as isize;
        let columns = ICON_COLUMNS as isize;
        let current = self.selected_icon as isize;
        let next = current + dx + dy * columns;
        if (0..count).contains(&next) {
            self.selected_icon = next as usize;
        }
    }

    pub fn send_chat(&mut self) {
        let text = std::mem::take(&mut self.chat_input);
        self.chat_cursor = 0;
        if self.session.send(&text).is_some() {
            self.scroll_chat_to_bottom();
        }
    }

    pub fn send_suggestion(&mut self, index: usize) {
        if let Some(question) = SUGGESTIONS.get(index) {
            if self.session.send(question).is_some() {
                self.scroll_chat_to_bottom();
            }
        }
    }

    /// Tick animation, answers, peripherals and the clock
    pub fn tick(&mut self) {
        if self.session.poll() > 0 {
            self.scroll_chat_to_bottom();
        }
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.keyboard.tick();
        self.mouse.step();
        self.clock = current_time();
    }

    /// Scroll chat to bottom so the newest message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        if self.is_compact() {
            self.follow_chat = true;
        }

        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for msg in self.session.messages() {
            total_lines += 1; // Role line ("You:" or "AI:")
            for line in msg.content.lines() {
                let char_count = line.chars().count();
                total_lines += (char_count / wrap_width) + 1;
            }
            if msg.pending {
                total_lines += 1; // typing indicator
            }
            total_lines += 1; // Blank line after message
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        // Paragraph scroll offsets are u16
        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    pub fn scroll_to_section(&mut self, app: AppId) {
        if let Some((_, offset)) = self.section_offsets.iter().find(|(a, _)| *a == app) {
            self.page_scroll = *offset;
        }
    }

    pub fn active_section(&self) -> Option<AppId> {
        active_section(&self.section_offsets, self.page_scroll)
    }
}

fn current_time() -> String {
    chrono::Local::now().format("%I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskfolio_core::{ChatRole, LocalAnswers, Stage};

    const WIDE: u16 = 160;
    const NARROW: u16 = 60;

    fn new_app(width: u16) -> App {
        App::new(Arc::new(LocalAnswers::default()), "offline".to_string(), 100, width)
    }

    #[test]
    fn test_full_layout_waits_for_start() {
        let mut app = new_app(WIDE);
        assert_eq!(app.view.stage(), Stage::NotStarted);
        app.open_app(AppId::Projects);
        assert_eq!(app.view.open_app(), None);

        app.start();
        app.open_app(AppId::Projects);
        assert_eq!(app.view.open_app(), Some(AppId::Projects));
    }

    #[test]
    fn test_compact_layout_auto_starts() {
        let app = new_app(NARROW);
        assert!(app.is_compact());
        assert!(app.view.is_started());
    }

    #[test]
    fn test_opening_assistant_focuses_input() {
        let mut app = new_app(WIDE);
        app.start();
        app.open_app(AppId::Ai);
        assert_eq!(app.input_mode, InputMode::Editing);
        app.close_app();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.view.open_app(), None);
    }

    #[test]
    fn test_resize_to_compact_closes_window_and_starts() {
        let mut app = new_app(WIDE);
        app.start();
        app.open_app(AppId::Mail);
        app.resize(NARROW);
        assert!(app.is_compact());
        assert_eq!(app.view.open_app(), None);

        let mut fresh = new_app(WIDE);
        fresh.resize(NARROW);
        assert!(fresh.view.is_started());
    }

    #[test]
    fn test_compact_open_scrolls_to_section() {
        let mut app = new_app(NARROW);
        app.section_offsets = vec![(AppId::Ai, 0), (AppId::Experience, 12), (AppId::Projects, 30)];
        app.open_app(AppId::Projects);
        assert_eq!(app.page_scroll, 30);
        assert_eq!(app.active_section(), Some(AppId::Projects));
        app.close_app();
        assert_eq!(app.page_scroll, 30);
    }

    #[test]
    fn test_active_section() {
        let offsets = [(AppId::Ai, 0), (AppId::Experience, 10), (AppId::Mail, 20)];
        assert_eq!(active_section(&offsets, 0), Some(AppId::Ai));
        assert_eq!(active_section(&offsets, 9), Some(AppId::Ai));
        assert_eq!(active_section(&offsets, 10), Some(AppId::Experience));
        assert_eq!(active_section(&offsets, 19), Some(AppId::Experience));
        assert_eq!(active_section(&offsets, 50), Some(AppId::Mail));
        assert_eq!(active_section(&[], 5), None);
    }

    #[test]
    fn test_short_first_section_stays_active_at_top() {
        // Empty transcript: the assistant section is a title, a hint and a blank line
        let offsets = [(AppId::Ai, 0), (AppId::Experience, 3)];
        assert_eq!(active_section(&offsets, 0), Some(AppId::Ai));
        assert_eq!(active_section(&offsets, 2), Some(AppId::Ai));
        assert_eq!(active_section(&offsets, 3), Some(AppId::Experience));
    }

    #[test]
    fn test_chat_scroll_saturates_on_huge_transcript() {
        let mut app = new_app(WIDE);
        app.chat_input = "x\n".repeat(70_000);
        app.chat_cursor = app.chat_input.chars().count();
        app.send_chat();
        assert_eq!(app.session.len(), 2);

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[test]
    fn test_full_layout_does_not_follow_page() {
        let mut app = new_app(WIDE);
        app.scroll_chat_to_bottom();
        assert!(!app.follow_chat);

        let mut compact = new_app(NARROW);
        compact.scroll_chat_to_bottom();
        assert!(compact.follow_chat);
    }

    #[test]
    fn test_icon_selection_stays_on_grid() {
        let mut app = new_app(WIDE);
        app.move_selection(-1, 0);
        assert_eq!(app.selected_icon, 0);
        app.move_selection(1, 1);
        assert_eq!(app.selected_app(), AppId::Achievements);
        app.move_selection(0, 1);
        assert_eq!(app.selected_app(), AppId::Achievements);
        app.move_selection(1, 0);
        assert_eq!(app.selected_app(), AppId::Mail);
    }

    #[tokio::test]
    async fn test_send_chat_clears_input_and_answers() {
        let mut app = new_app(WIDE);
        app.chat_input = "hello there".to_string();
        app.chat_cursor = 11;
        app.send_chat();
        assert!(app.chat_input.is_empty());
        assert_eq!(app.chat_cursor, 0);

        app.session.settle().await;
        let messages = app.session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_blank_chat_input_is_ignored() {
        let mut app = new_app(WIDE);
        app.chat_input = "   ".to_string();
        app.send_chat();
        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_suggestion_sends_question() {
        let mut app = new_app(WIDE);
        app.send_suggestion(0);
        app.send_suggestion(99);
        app.session.settle().await;
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.session.messages()[0].content, SUGGESTIONS[0]);
    }
}
