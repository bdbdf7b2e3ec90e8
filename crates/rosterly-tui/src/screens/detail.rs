//! Single-record detail screen.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;

use rosterly_api::{Student, StudentsClient};
use rosterly_core::{DeleteOutcome, DetailController, DetailPhase};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct DetailScreen {
    client: Arc<StudentsClient>,
    controller: DetailController<StudentsClient>,
    action_tx: Option<UnboundedSender<Action>>,
}

impl DetailScreen {
    pub fn new(client: Arc<StudentsClient>, id: i64) -> Self {
        let controller = DetailController::new(Arc::clone(&client), id);
        Self {
            client,
            controller,
            action_tx: None,
        }
    }

    pub fn start_load(&mut self) {
        let Some(token) = self.controller.begin_load() else {
            return;
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        let id = self.controller.id();
        tokio::spawn(async move {
            let result = client.get_by_id(id).await;
            let _ = tx.send(Action::DetailFetched(token, result));
        });
    }
}

impl Component for DetailScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        self.start_load();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Char('e') => Some(Action::OpenEdit(self.controller.id())),
            KeyCode::Char('d') => self.controller.request_delete().map(Action::ShowConfirm),
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
            Action::DetailFetched(token, result) => {
                self.controller.apply_load(token, result);
            }

            Action::DeleteConfirmed(confirmation) => {
                if self.controller.begin_delete(&confirmation).is_some() {
                    let Some(tx) = self.action_tx.clone() else {
                        return Ok(None);
                    };
                    let client = Arc::clone(&self.client);
                    tokio::spawn(async move {
                        let result = client.delete(confirmation.id()).await;
                        let _ = tx.send(Action::DetailDeleteFinished(result));
                    });
                }
            }

            Action::DetailDeleteFinished(result) => {
                if let DeleteOutcome::Deleted { notice } = self.controller.apply_delete(result) {
                    // Leave the view; the list shows the notice.
                    if let Some(tx) = &self.action_tx {
                        let _ = tx.send(Action::Notify(notice));
                    }
                    return Ok(Some(Action::Back));
                }
            }

            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // Record
            Constraint::Length(1), // Hint line
        ])
        .split(area);

        let block = Block::default()
            .title(" Student ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);

        match self.controller.phase() {
            DetailPhase::Loading => {
                frame.render_widget(
                    Paragraph::new(Span::styled("Loading…", theme::table_row())),
                    inner,
                );
            }
            DetailPhase::LoadFailed { message } => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        message.clone(),
                        Style::default().fg(theme::ERROR_RED),
                    )),
                    inner,
                );
            }
            DetailPhase::Ready(student) => {
                let lines = record_lines(student);
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }

        self.render_footer(frame, layout[1]);
    }
}

impl DetailScreen {
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(error) = self.controller.error() {
            Line::from(Span::styled(
                format!(" {error}"),
                Style::default().fg(theme::ERROR_RED),
            ))
        } else {
            Line::from(vec![
                Span::styled(" e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("refresh  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("back", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn record_lines(student: &Student) -> Vec<Line<'_>> {
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<8}"), theme::table_header()),
            Span::styled(value, theme::table_row()),
        ])
    };
    vec![
        Line::from(""),
        field("ID", student.id.to_string()),
        field("Name", student.full_name()),
        field("Email", student.email.clone()),
        field("Phone", student.phone.clone()),
        field("Course", student.course.clone()),
        field("Year", student.year.to_string()),
    ]
}
