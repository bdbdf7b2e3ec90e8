//! Roster list screen — table, local search, delete flow.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;

use rosterly_api::StudentsClient;
use rosterly_core::{ListController, ListPhase};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct ListScreen {
    client: Arc<StudentsClient>,
    controller: ListController<StudentsClient>,
    table_state: TableState,
    throbber: ThrobberState,
    search_active: bool,
    action_tx: Option<UnboundedSender<Action>>,
}

impl ListScreen {
    pub fn new(client: Arc<StudentsClient>) -> Self {
        let controller = ListController::new(Arc::clone(&client));
        Self {
            client,
            controller,
            table_state: TableState::default(),
            throbber: ThrobberState::default(),
            search_active: false,
            action_tx: None,
        }
    }

    /// Kick off a (re)fetch; the result comes back as `ListFetched`.
    pub fn start_load(&mut self) {
        let Some(token) = self.controller.begin_load() else {
            return;
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.list_all().await;
            let _ = tx.send(Action::ListFetched(token, result));
        });
    }

    fn selected_id(&self) -> Option<i64> {
        let idx = self.table_state.selected()?;
        self.controller.visible().get(idx).map(|s| s.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.visible().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(idx));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.visible().len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.table_state.selected().unwrap_or(0) as isize;
        #[allow(clippy::cast_sign_loss)]
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.table_state.select(Some(next));
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.search_active = false;
            }
            KeyCode::Backspace => {
                let mut term = self.controller.search().to_string();
                term.pop();
                self.controller.set_search(term);
                self.clamp_selection();
            }
            KeyCode::Char(c) => {
                let mut term = self.controller.search().to_string();
                term.push(c);
                self.controller.set_search(term);
                self.clamp_selection();
            }
            _ => {}
        }
        None
    }
}

impl Component for ListScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        self.start_load();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_active {
            return Ok(self.handle_search_key(key));
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('/') => {
                self.search_active = true;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.controller.visible().is_empty() {
                    self.table_state.select(Some(0));
                }
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                let len = self.controller.visible().len();
                if len > 0 {
                    self.table_state.select(Some(len - 1));
                }
                None
            }
            KeyCode::Enter => self.selected_id().map(Action::OpenDetail),
            KeyCode::Char('a') => Some(Action::OpenCreate),
            KeyCode::Char('e') => self.selected_id().map(Action::OpenEdit),
            KeyCode::Char('d') => self
                .selected_id()
                .and_then(|id| self.controller.request_delete(id))
                .map(Action::ShowConfirm),
            KeyCode::Char('r') => {
                self.start_load();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ListFetched(token, result) => {
                self.controller.apply_load(token, result);
                self.clamp_selection();
            }

            Action::DeleteConfirmed(confirmation) => {
                if self.controller.begin_delete(&confirmation).is_some() {
                    let Some(tx) = self.action_tx.clone() else {
                        return Ok(None);
                    };
                    let client = Arc::clone(&self.client);
                    tokio::spawn(async move {
                        let result = client.delete(confirmation.id()).await;
                        let _ = tx.send(Action::ListDeleteFinished(result));
                    });
                }
            }

            Action::ListDeleteFinished(result) => {
                if self.controller.apply_delete(result) {
                    let notice = self.controller.take_notice();
                    self.start_load();
                    return Ok(notice.map(Action::Notify));
                }
            }

            Action::Tick => {
                self.throbber.calc_next();
            }

            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Search / hint line
        ])
        .split(area);

        let block = Block::default()
            .title(" Students ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);

        match self.controller.phase() {
            ListPhase::Loading => {
                let throbber = Throbber::default()
                    .label("Loading students…")
                    .style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(throbber, inner, &mut self.throbber);
            }
            ListPhase::LoadFailed { message } => {
                let text = Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(theme::ERROR_RED),
                ));
                frame.render_widget(Paragraph::new(text), inner);
            }
            ListPhase::Loaded => {
                if let Some(message) = self.controller.empty_message() {
                    frame.render_widget(
                        Paragraph::new(Span::styled(message, theme::table_row())),
                        inner,
                    );
                } else {
                    self.render_table(frame, inner);
                }
            }
        }

        self.render_footer(frame, layout[1]);
    }
}

impl ListScreen {
    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let header = Row::new(
            ["ID", "Name", "Email", "Course", "Year"]
                .into_iter()
                .map(Cell::from),
        )
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .controller
            .visible()
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.id.to_string()),
                    Cell::from(s.full_name()),
                    Cell::from(s.email.clone()),
                    Cell::from(s.course.clone()),
                    Cell::from(s.year.to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Min(20),
                Constraint::Min(12),
                Constraint::Length(4),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if self.search_active || !self.controller.search().is_empty() {
            let cursor = if self.search_active { "█" } else { "" };
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::HIGHLIGHT)),
                Span::styled(
                    self.controller.search().to_string(),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::styled(cursor, Style::default().fg(theme::ACCENT)),
                Span::styled("  Esc done", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let line = if let Some(error) = self.controller.error() {
            Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(theme::ERROR_RED),
            ))
        } else {
            Line::from(vec![
                Span::styled(" ↵ ", theme::key_hint_key()),
                Span::styled("view  ", theme::key_hint()),
                Span::styled("a ", theme::key_hint_key()),
                Span::styled("add  ", theme::key_hint()),
                Span::styled("e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
                Span::styled("/ ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
