//! Create/edit form screen.

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

use rosterly_api::StudentsClient;
use rosterly_core::{Field, FormController, FormPhase, Mode, SubmitOp, SubmitOutcome, SubmitRequest};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct FormScreen {
    client: Arc<StudentsClient>,
    controller: FormController<StudentsClient>,
    focused: usize,
    action_tx: Option<UnboundedSender<Action>>,
}

impl FormScreen {
    pub fn new_create(client: Arc<StudentsClient>) -> Self {
        let controller = FormController::new_create(Arc::clone(&client));
        Self {
            client,
            controller,
            focused: 0,
            action_tx: None,
        }
    }

    pub fn new_edit(client: Arc<StudentsClient>, id: i64) -> Self {
        let controller = FormController::new_edit(Arc::clone(&client), id);
        Self {
            client,
            controller,
            focused: 0,
            action_tx: None,
        }
    }

    fn start_prefill(&mut self) {
        let Some((token, id)) = self.controller.begin_load() else {
            return;
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.get_by_id(id).await;
            let _ = tx.send(Action::PrefillFetched(token, result));
        });
    }

    fn start_submit(&mut self) {
        let Some(SubmitRequest { token, op }) = self.controller.begin_submit() else {
            return;
        };
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = match op {
                SubmitOp::Create(draft) => client.create(&draft).await,
                SubmitOp::Update(id, draft) => client.update(id, &draft).await,
            };
            let _ = tx.send(Action::SubmitFinished(token, result));
        });
    }

    fn focused_field(&self) -> Field {
        Field::ALL[self.focused]
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % Field::ALL.len();
    }

    fn focus_prev(&mut self) {
        self.focused = (self.focused + Field::ALL.len() - 1) % Field::ALL.len();
    }

    fn title(&self) -> &'static str {
        match self.controller.mode() {
            Mode::Create => " Add Student ",
            Mode::Edit { .. } => " Edit Student ",
        }
    }
}

impl Component for FormScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        self.start_prefill();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::Back)),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => self.start_submit(),
            KeyCode::Char(c) => {
                let field = self.focused_field();
                let mut value = self.controller.field(field).to_owned();
                value.push(c);
                self.controller.set_field(field, value);
            }
            KeyCode::Backspace => {
                let field = self.focused_field();
                let mut value = self.controller.field(field).to_owned();
                value.pop();
                self.controller.set_field(field, value);
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::PrefillFetched(token, result) => {
                self.controller.apply_load(token, result);
            }

            Action::SubmitFinished(token, result) => {
                match self.controller.apply_submit(token, result) {
                    Some(SubmitOutcome::Saved { notice, .. }) => {
                        if let Some(tx) = &self.action_tx {
                            let _ = tx.send(Action::Notify(notice));
                        }
                        return Ok(Some(Action::Back));
                    }
                    // The form stays open with the error banner shown.
                    Some(SubmitOutcome::Rejected) | None => {}
                }
            }

            _ => {}
        }
        Ok(None)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Hint line
        ])
        .split(area);

        let block = Block::default()
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(layout[0]);
        frame.render_widget(block, layout[0]);

        match self.controller.phase() {
            FormPhase::PageLoading => {
                frame.render_widget(
                    Paragraph::new(Span::styled("Loading…", theme::table_row())),
                    inner,
                );
            }
            FormPhase::LoadFailed { message } => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        message.clone(),
                        Style::default().fg(theme::ERROR_RED),
                    )),
                    inner,
                );
            }
            FormPhase::Ready => {
                let lines = self.field_lines();
                frame.render_widget(Paragraph::new(lines), inner);
            }
        }

        self.render_footer(frame, layout[1]);
    }
}

impl FormScreen {
    fn field_lines(&self) -> Vec<Line<'_>> {
        let mut lines = vec![Line::from("")];
        for (idx, field) in Field::ALL.iter().enumerate() {
            let focused = idx == self.focused;
            let label_style = if focused {
                theme::field_focused()
            } else {
                theme::table_header()
            };
            let value = self.controller.field(*field);
            let mut spans = vec![
                Span::styled(format!("  {:<12}", field.label()), label_style),
                Span::styled(value.to_owned(), theme::table_row()),
            ];
            if focused {
                spans.push(Span::styled("█", theme::field_focused()));
            }
            lines.push(Line::from(spans));
            if let Some(message) = self.controller.errors().get(field) {
                lines.push(Line::from(Span::styled(
                    format!("  {:<12}{message}", ""),
                    theme::field_error(),
                )));
            }
        }
        if let Some(error) = self.controller.error() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(theme::ERROR_RED),
            )));
        }
        lines
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if self.controller.is_submitting() {
            Line::from(Span::styled(" Saving…", theme::key_hint()))
        } else {
            Line::from(vec![
                Span::styled(" Tab ", theme::key_hint_key()),
                Span::styled("next field  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("save  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
