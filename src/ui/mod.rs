pub mod render;
pub mod text;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::App;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn run(&mut self, app: &mut App) -> Result<()> {
        while app.running {
            self.terminal
                .draw(|frame| render::render(frame, app))
                .map_err(anyhow::Error::from)?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        handle_key_event(app, key);
                    }
                }
            }
        }

        Ok(())
    }
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.request_quit(),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => app.select_next(),
        (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.select_previous(),
        (_, KeyCode::Esc) => app.clear_input(),
        (KeyModifiers::ALT, KeyCode::Enter) => {
            if let Err(err) = app.copy_selected_path() {
                app.status_message = format!("Error: {err:#}");
            }
        }
        (_, KeyCode::Enter) => {
            if let Err(err) = app.open_selected() {
                app.status_message = format!("Error: {err:#}");
            }
        }
        (_, KeyCode::Backspace) => app.backspace_input(),
        (_, KeyCode::Up) => app.select_previous(),
        (_, KeyCode::Down) | (_, KeyCode::Tab) => app.select_next(),
        (_, KeyCode::BackTab) => app.select_previous(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => app.push_char(c),
        _ => {}
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
    }
}
