//! Application core — event loop, screen stack, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tracing::info;

use rosterly_api::StudentsClient;
use rosterly_core::Notice;

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{DetailScreen, FormScreen, ListScreen};
use crate::theme;
use crate::tui::Tui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveScreen {
    List,
    Detail,
    Form,
}

/// Top-level application state and event loop.
pub struct App {
    /// Base URL of the remote roster, shown in the status bar.
    server: url::Url,
    client: Arc<StudentsClient>,
    active: ActiveScreen,
    /// The list screen lives for the whole session.
    list: ListScreen,
    /// Detail and form screens exist only while open.
    detail: Option<DetailScreen>,
    form: Option<FormScreen>,
    running: bool,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<rosterly_core::DeleteConfirmation>,
    /// Active notification toast.
    notification: Option<Notice>,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(server: url::Url, client: Arc<StudentsClient>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let list = ListScreen::new(Arc::clone(&client));
        Self {
            server,
            client,
            active: ActiveScreen::List,
            list,
            detail: None,
            form: None,
            running: true,
            pending_confirm: None,
            notification: None,
            help_visible: false,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.list.init(self.action_tx.clone())?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions.
            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action)?;

                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays are handled here;
    /// everything else is delegated to the active screen component.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Screens own their keys; text entry must see plain characters.
        self.active_mut().handle_key_event(key)
    }

    /// Process a single action — update app state and propagate to screens.
    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(Notice::is_expired)
                {
                    self.notification = None;
                }
                if let Some(follow_up) = self.active_mut().update(Action::Tick)? {
                    self.action_tx.send(follow_up)?;
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            // ── Navigation ───────────────────────────────────────────

            Action::OpenList => {
                self.detail = None;
                self.form = None;
                self.active = ActiveScreen::List;
                self.list.start_load();
            }

            Action::OpenDetail(id) => {
                let mut screen = DetailScreen::new(Arc::clone(&self.client), id);
                screen.init(self.action_tx.clone())?;
                self.detail = Some(screen);
                self.active = ActiveScreen::Detail;
            }

            Action::OpenCreate => {
                let mut screen = FormScreen::new_create(Arc::clone(&self.client));
                screen.init(self.action_tx.clone())?;
                self.form = Some(screen);
                self.active = ActiveScreen::Form;
            }

            Action::OpenEdit(id) => {
                let mut screen = FormScreen::new_edit(Arc::clone(&self.client), id);
                screen.init(self.action_tx.clone())?;
                self.form = Some(screen);
                self.active = ActiveScreen::Form;
            }

            Action::Back => match self.active {
                ActiveScreen::Form => {
                    self.form = None;
                    if let Some(detail) = self.detail.as_mut() {
                        // The record may have changed under the detail view.
                        self.active = ActiveScreen::Detail;
                        detail.start_load();
                    } else {
                        self.active = ActiveScreen::List;
                        self.list.start_load();
                    }
                }
                ActiveScreen::Detail => {
                    self.detail = None;
                    self.active = ActiveScreen::List;
                    self.list.start_load();
                }
                ActiveScreen::List => {}
            },

            // ── Confirm dialog ───────────────────────────────────────

            Action::ShowConfirm(confirmation) => {
                self.pending_confirm = Some(confirmation);
            }

            Action::ConfirmYes => {
                if let Some(confirmation) = self.pending_confirm.take() {
                    self.action_tx.send(Action::DeleteConfirmed(confirmation))?;
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            // ── Notifications ────────────────────────────────────────

            Action::Notify(notice) => {
                self.notification = Some(notice);
            }

            // ── Network results ──────────────────────────────────────
            //
            // Delivered to the owning screen regardless of which screen
            // is active: a response landing while another view is open
            // must still clear the owner's in-flight state.

            Action::ListFetched(..) | Action::ListDeleteFinished(..) => {
                if let Some(follow_up) = self.list.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }

            Action::DetailFetched(..) | Action::DetailDeleteFinished(..) => {
                if let Some(detail) = self.detail.as_mut() {
                    if let Some(follow_up) = detail.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::PrefillFetched(..) | Action::SubmitFinished(..) => {
                if let Some(form) = self.form.as_mut() {
                    if let Some(follow_up) = form.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // The confirm dialog blocks navigation, so the screen that
            // asked is still the active one.
            Action::DeleteConfirmed(..) => {
                if let Some(follow_up) = self.active_mut().update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }

        Ok(())
    }

    fn active_mut(&mut self) -> &mut dyn Component {
        match self.active {
            ActiveScreen::List => &mut self.list,
            ActiveScreen::Detail => match self.detail.as_mut() {
                Some(screen) => screen,
                None => &mut self.list,
            },
            ActiveScreen::Form => match self.form.as_mut() {
                Some(screen) => screen,
                None => &mut self.list,
            },
        }
    }

    /// Render the full application frame.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content_area = layout[0];
        let status_area = layout[1];

        self.active_mut().render(frame, content_area);
        self.render_status_bar(frame, status_area);

        // Overlays on top (order matters: last = topmost)
        if let Some(notice) = &self.notification {
            render_notification(frame, area, notice);
        }

        if let Some(confirmation) = &self.pending_confirm {
            render_confirm_dialog(frame, area, confirmation);
        }

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let host = self.server.host_str().unwrap_or("?");
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("● {host}"), Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled("  │  ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Render the help overlay centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 16u16.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  List",
            Style::default().fg(theme::ACCENT),
        )),
        entry("j/k ↑/↓", "Move up/down"),
        entry("Enter", "Open details"),
        entry("/", "Filter by name, email or course"),
        entry("a", "Add a student"),
        entry("e", "Edit selected"),
        entry("d", "Delete selected"),
        entry("r", "Reload from the server"),
        Line::from(""),
        Line::from(Span::styled(
            "  Global",
            Style::default().fg(theme::ACCENT),
        )),
        entry("Esc", "Back / close"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "                    Esc or ? to close",
            theme::key_hint(),
        )),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Render a centered confirmation dialog.
fn render_confirm_dialog(
    frame: &mut Frame,
    area: Rect,
    confirmation: &rosterly_core::DeleteConfirmation,
) {
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 5u16;

    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        dialog_area,
    );

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::WARNING_YELLOW));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(
            format!("  Delete {}?", confirmation.label()),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Render a notification toast in the bottom-right corner.
fn render_notification(frame: &mut Frame, area: Rect, notice: &Notice) {
    let msg_len = notice.message().len() as u16;
    let width = (msg_len + 6).clamp(20, 60);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2); // above status bar
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::SUCCESS_GREEN));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(" ✓ ", Style::default().fg(theme::SUCCESS_GREEN)),
        Span::styled(notice.message(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use rosterly_api::TransportConfig;

    // Nothing listens on port 1, so fetches fail fast.
    fn app_with_dead_server() -> App {
        let url: url::Url = "http://127.0.0.1:1".parse().unwrap();
        let client = StudentsClient::new(url.as_str(), &TransportConfig::default()).unwrap();
        App::new(url, Arc::new(client))
    }

    async fn next_action(app: &mut App) -> Action {
        tokio::time::timeout(Duration::from_secs(5), app.action_rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn list_fetch_result_reaches_list_while_form_is_open() {
        let mut app = app_with_dead_server();
        let tx = app.action_tx.clone();
        app.list.init(tx).unwrap();

        // Open the create form before the list response lands.
        app.process_action(Action::OpenCreate).unwrap();

        let fetched = next_action(&mut app).await;
        assert!(matches!(fetched, Action::ListFetched(..)));
        app.process_action(fetched).unwrap();

        // Back to the list: the in-flight flag must be clear so the
        // refetch actually starts and produces a new result.
        app.process_action(Action::Back).unwrap();
        let refetched = next_action(&mut app).await;
        assert!(matches!(refetched, Action::ListFetched(..)));
    }

    #[tokio::test]
    async fn detail_result_is_dropped_after_detail_closes() {
        let mut app = app_with_dead_server();
        let tx = app.action_tx.clone();
        app.list.init(tx).unwrap();

        // Open the detail view (spawning its fetch) and leave before
        // the response arrives.
        app.process_action(Action::OpenDetail(7)).unwrap();
        app.process_action(Action::Back).unwrap();
        assert!(app.detail.is_none());

        // Both the list fetch and the abandoned detail fetch resolve;
        // processing them must not resurrect the closed view.
        for _ in 0..2 {
            let action = next_action(&mut app).await;
            app.process_action(action).unwrap();
        }
        assert!(app.detail.is_none());
    }
}
