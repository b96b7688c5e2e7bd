use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;
use tui_textarea::TextArea;

use crate::domain::models::Action;
use crate::domain::models::Attachment;
use crate::domain::models::Backend as ChatBackend;
use crate::domain::models::Event;
use crate::domain::models::SlashCommand;
use crate::domain::models::User;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::CommandOutcome;

/// How the user left the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    Logout,
}

const DISCLAIMER: &str =
    "Answers are for information only and are not a diagnosis. Always consult your doctor.";

fn header_line(user: &User) -> Line<'static> {
    return Line::from(vec![
        Span::styled(
            " MediConnect Health Assistant ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::from(format!(" {} ", user.email)),
        Span::styled(DISCLAIMER, Style::default().fg(Color::DarkGray)),
    ]);
}

fn input_block(title: &str) -> Block<'_> {
    return Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(title)
        .padding(Padding::new(1, 1, 0, 0));
}

fn new_textarea<'a>() -> TextArea<'a> {
    let mut textarea = TextArea::default();
    textarea.set_block(input_block(
        "Type your health question, /attach a lab report, or /help",
    ));
    return textarea;
}

fn analyzing_box() -> Paragraph<'static> {
    return Paragraph::new("Analyzing your information... (CTRL+C to cancel)")
        .block(input_block(""))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
}

fn attachment_chips(attachments: &[Attachment]) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "Staged: ",
        Style::default().fg(Color::DarkGray),
    )];

    for (idx, attachment) in attachments.iter().enumerate() {
        spans.push(Span::styled(
            format!("({}) [{}] {}", idx + 1, attachment.kind.label(), attachment.name),
            Style::default().fg(Color::LightBlue),
        ));
        spans.push(Span::from("  "));
    }

    return Line::from(spans);
}

fn paste(textarea: &mut TextArea, text: &str) {
    for char in text.chars() {
        let key = match char {
            '\n' => Key::Enter,
            '\r' => continue,
            _ => Key::Char(char),
        };

        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    user: &User,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<ChatExit> {
    let mut events = EventsService::new(rx);
    let mut textarea = new_textarea();

    loop {
        terminal.draw(|frame| {
            let mut chips_height = 0;
            if !app_state.attachments.is_empty() {
                chips_height = 1;
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(chips_height),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            frame.render_widget(Paragraph::new(header_line(user)), layout[0]);

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            app_state
                .bubble_list
                .render(frame, layout[1], app_state.scroll.position);
            if app_state.scroll.max_position() > 0 {
                frame.render_stateful_widget(
                    Scrollbar::new(ScrollbarOrientation::VerticalRight),
                    layout[1].inner(&Margin {
                        vertical: 1,
                        horizontal: 0,
                    }),
                    &mut app_state.scroll.scrollbar_state,
                );
            }

            if chips_height > 0 {
                frame.render_widget(
                    Paragraph::new(attachment_chips(&app_state.attachments)),
                    layout[2],
                );
            }

            if app_state.is_waiting() {
                frame.render_widget(analyzing_box(), layout[3]);
            } else {
                frame.render_widget(textarea.widget(), layout[3]);
            }
        })?;

        match events.next().await? {
            Event::AssistantAnswer(res) => {
                app_state.handle_backend_response(res);
            }
            Event::Cancel() => {
                if app_state.is_waiting() {
                    tx.send(Action::CancelQuestion())?;
                    continue;
                }

                return Ok(ChatExit::Quit);
            }
            Event::Submit() => {
                if app_state.is_waiting() {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                textarea = new_textarea();

                if let Some(command) = SlashCommand::parse(&input_str) {
                    match app_state.handle_slash_command(&command).await? {
                        CommandOutcome::Quit => return Ok(ChatExit::Quit),
                        CommandOutcome::Logout => return Ok(ChatExit::Logout),
                        CommandOutcome::Continue => continue,
                    }
                }

                if let Some(prompt) = app_state.submit(&input_str) {
                    tx.send(Action::AskAssistant(prompt))?;
                }
            }
            Event::Paste(text) => {
                if !app_state.is_waiting() {
                    paste(&mut textarea, &text);
                }
            }
            Event::TextInput(input) => {
                if !app_state.is_waiting() {
                    textarea.input(input);
                }
            }
            Event::Scroll(scroll_move) => {
                app_state.scroll.apply(scroll_move);
            }
            Event::Redraw() => (),
        }
    }
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    backend: Arc<dyn ChatBackend + Send + Sync>,
    user: &User,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<ChatExit> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app_state = AppState::new();
    app_state.check_backend(backend.as_ref()).await;

    let res = start_loop(&mut terminal, &mut app_state, user, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    tracing::debug!(messages = app_state.messages.len(), "chat closed");
    return res;
}
