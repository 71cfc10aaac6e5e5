mod canvas;

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mathcanvas_config::Config;
use mathcanvas_engine::editing::{Cmd, Expression, Modes, NodeKind, TextKind};
use mathcanvas_engine::render::metrics::{CHAR_H, CHAR_W};
use mathcanvas_engine::render::{RenderOptions, draw};
use mathcanvas_engine::transport::{KeyPress, KeySink, SinkStatus, TypeOptions, type_string};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use canvas::CellCanvas;

/// Poll interval; also drives the cursor flash.
const TICK: Duration = Duration::from_millis(120);
const FLASH_TICKS: u32 = 4;

/// Sink that collects "typed" characters into a string; stands in for
/// the host-side keyboard transport.
#[derive(Default)]
struct LogSink {
    out: String,
}

impl KeySink for LogSink {
    fn send_key(&mut self, key: KeyPress) -> SinkStatus {
        self.out.push(key.ch);
        SinkStatus::Sent
    }
}

struct App {
    expr: Expression,
    modes: Modes,
    alpha_lock: bool,
    config: Config,
    cursor_visible: bool,
    flash_timer: u32,
    send_log: Vec<String>,
    status: String,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            expr: Expression::new(),
            modes: Modes::default(),
            alpha_lock: false,
            config,
            cursor_visible: true,
            flash_timer: 0,
            send_log: Vec::new(),
            status: String::new(),
        }
    }

    fn tick(&mut self) {
        self.flash_timer += 1;
        if self.flash_timer >= FLASH_TICKS {
            self.flash_timer = 0;
            self.cursor_visible = !self.cursor_visible;
        }
    }

    /// Apply a command and honor the returned mode-reset directive.
    fn apply(&mut self, cmd: Cmd) {
        match self.expr.apply(cmd) {
            Ok(patch) => {
                if patch.reset_modes && !self.alpha_lock {
                    self.modes.clear();
                }
                if self.alpha_lock {
                    self.modes.alpha = true;
                }
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn insert_text(&mut self, kind: TextKind, text: &str) {
        self.apply(Cmd::InsertText {
            kind,
            text: text.to_string(),
        });
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Any keypress snaps the cursor back to visible.
        self.cursor_visible = true;
        self.flash_timer = 0;
        self.status.clear();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('k') = key.code {
                self.apply(Cmd::Clear);
            }
            return false;
        }

        match key.code {
            KeyCode::Esc => {
                // Step out of a nested slot first, then drop modes, then quit.
                if self.expr.cursor().sequence != self.expr.root() {
                    self.expr.exit_to_parent_right();
                    self.modes.clear();
                    self.alpha_lock = false;
                } else if self.modes.shift || self.modes.alpha || self.alpha_lock {
                    self.modes.clear();
                    self.alpha_lock = false;
                } else {
                    return true;
                }
            }

            KeyCode::F(2) => self.modes.toggle_shift(),
            KeyCode::F(3) => {
                if self.modes.shift {
                    self.alpha_lock = !self.alpha_lock;
                    self.modes.alpha = self.alpha_lock;
                    self.modes.shift = false;
                } else if self.alpha_lock {
                    self.alpha_lock = false;
                    self.modes.alpha = false;
                } else {
                    self.modes.toggle_alpha();
                }
            }

            KeyCode::Left => {
                // Step left; fall into a container just skipped, or exit
                // the slot when already at its start.
                if self.expr.move_left() {
                    self.expr.enter_from_right();
                } else {
                    self.expr.exit_to_parent_left();
                }
            }
            KeyCode::Right => {
                if self.expr.enter_from_left() {
                    // Entered the container ahead.
                } else if self.expr.move_right() {
                    // Stepped past a leaf.
                } else {
                    self.expr.exit_to_parent_right();
                }
            }
            KeyCode::Up => {
                self.expr.prev_slot();
            }
            KeyCode::Down => {
                self.expr.next_slot();
            }

            KeyCode::Backspace => self.apply(Cmd::Delete),

            KeyCode::Enter => {
                if self.expr.cursor().sequence != self.expr.root() {
                    self.expr.exit_to_parent_right();
                } else {
                    self.send();
                }
            }

            KeyCode::Char(ch) => self.handle_char(ch),

            _ => {}
        }
        false
    }

    fn handle_char(&mut self, ch: char) {
        if self.modes.alpha || self.alpha_lock {
            self.insert_text(TextKind::Variable, &ch.to_string());
            return;
        }

        if self.modes.shift {
            match ch {
                '/' => self.apply(Cmd::InsertMixedFraction),
                '^' => self.apply(Cmd::InsertNthRoot),
                '(' => self.apply(Cmd::InsertRoot { index: 3 }),
                'q' => self.apply(Cmd::InsertRoot { index: 2 }),
                'p' => self.insert_text(TextKind::Pi, "π"),
                's' => self.apply(Cmd::InsertFunction {
                    name: "sin".to_string(),
                }),
                'c' => self.apply(Cmd::InsertFunction {
                    name: "cos".to_string(),
                }),
                't' => self.apply(Cmd::InsertFunction {
                    name: "tan".to_string(),
                }),
                'l' => self.apply(Cmd::InsertFunction {
                    name: "log".to_string(),
                }),
                'n' => self.apply(Cmd::InsertFunction {
                    name: "ln".to_string(),
                }),
                _ => self.modes.clear(),
            }
            return;
        }

        match ch {
            '0'..='9' | '.' => self.insert_text(TextKind::Number, &ch.to_string()),
            '+' | '-' | '=' => self.insert_text(TextKind::Operator, &ch.to_string()),
            '*' => self.insert_text(TextKind::Operator, "×"),
            ':' => self.insert_text(TextKind::Operator, "÷"),
            '/' => self.apply(Cmd::InsertFraction),
            '^' => self.apply(Cmd::InsertExponent),
            '_' => self.apply(Cmd::InsertSubscript),
            '(' => self.apply(Cmd::InsertParen),
            ')' => {
                if self.expr.cursor().sequence != self.expr.root() {
                    self.expr.exit_to_parent_right();
                }
            }
            '|' => self.apply(Cmd::InsertAbs),
            '[' => self.insert_text(TextKind::ParenOpen, "["),
            ']' => self.insert_text(TextKind::ParenClose, "]"),
            ',' => self.insert_text(TextKind::Variable, ","),
            'a'..='z' | 'A'..='Z' => self.insert_text(TextKind::Variable, &ch.to_string()),
            _ => {}
        }
    }

    fn send(&mut self) {
        let latex = match self.expr.to_latex() {
            Ok(latex) => latex,
            Err(e) => {
                self.status = e.to_string();
                return;
            }
        };
        if latex.is_empty() {
            self.status = "Nothing to send".to_string();
            return;
        }

        let payload = if self.config.wrap_in_dollars {
            format!("${latex}$")
        } else {
            latex
        };

        let mut sink = LogSink::default();
        let mut progress = (0usize, 0usize);
        match type_string(
            &mut sink,
            &payload,
            &TypeOptions::default(),
            |sent, total| progress = (sent, total),
            || false,
        ) {
            Ok(_) => {
                self.send_log.push(sink.out);
                self.status = format!("Sent {}/{} characters", progress.0, progress.1);
                if self.config.clear_on_send {
                    self.apply(Cmd::Clear);
                }
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Context-sensitive hint line, naming the slot the cursor is in.
    fn hint(&self) -> String {
        match self.expr.cursor_container() {
            Some((NodeKind::Fraction { numer, .. }, slot)) => {
                if slot == *numer {
                    "Numerator | Down:Denominator | Enter:Exit".to_string()
                } else {
                    "Denominator | Up:Numerator | Enter:Exit".to_string()
                }
            }
            Some((NodeKind::Exponent { .. }, _)) => "Exponent | Enter:Exit".to_string(),
            Some((NodeKind::Subscript { .. }, _)) => "Subscript | Enter:Exit".to_string(),
            Some((NodeKind::Root { .. }, _)) => "Root | Enter:Exit".to_string(),
            Some((NodeKind::NthRoot { index, .. }, slot)) => {
                if slot == *index {
                    "Root index | Down:Content | Enter:Exit".to_string()
                } else {
                    "Root content | Up:Index | Enter:Exit".to_string()
                }
            }
            Some(_) => "Enter:Exit | Arrows:Navigate".to_string(),
            None => {
                "Enter:Send  /:Frac  ^:Pow  _:Sub  (:Paren  |:Abs  F2:Shift  F3:Alpha  Esc:Quit"
                    .to_string()
            }
        }
    }
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: failed to load config: {e}");
            eprintln!("Falling back to defaults");
            Config::default()
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        } else {
            app.tick();
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    // Header with mode indicators
    let mut header = vec![Span::raw("mathcanvas")];
    if app.modes.shift {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            " SHF ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ));
    }
    if app.alpha_lock {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            " A-L ",
            Style::default().bg(Color::Green).fg(Color::Black),
        ));
    } else if app.modes.alpha {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            " ALP ",
            Style::default().bg(Color::Green).fg(Color::Black),
        ));
    }
    if !app.status.is_empty() {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    // Expression canvas
    let canvas_block = Block::default().borders(Borders::ALL).title("Expression");
    let inner = canvas_block.inner(chunks[1]);
    let mut canvas = CellCanvas::new(inner.width as usize, inner.height as usize);
    draw(
        &app.expr,
        &mut canvas,
        CHAR_W,
        CHAR_H / 2,
        RenderOptions {
            cursor_visible: app.cursor_visible,
            color_brackets: app.config.color_brackets,
        },
    );
    let mut rows = Vec::new();
    for cy in 0..canvas.height() {
        let mut spans = Vec::new();
        for cx in 0..canvas.width() {
            let cell = canvas.cell(cx, cy);
            spans.push(Span::styled(
                cell.ch.to_string(),
                Style::default().fg(Color::Rgb(cell.color.r, cell.color.g, cell.color.b)),
            ));
        }
        rows.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(rows).block(canvas_block), chunks[1]);

    // LaTeX preview
    let preview = if app.config.show_latex {
        match app.expr.to_latex() {
            Ok(latex) if latex.is_empty() => "(empty)".to_string(),
            Ok(latex) => latex,
            Err(e) => e.to_string(),
        }
    } else {
        "(preview off)".to_string()
    };
    f.render_widget(
        Paragraph::new(preview).block(Block::default().borders(Borders::ALL).title("LaTeX")),
        chunks[2],
    );

    // Send log, most recent first
    let log_lines: Vec<Line> = app
        .send_log
        .iter()
        .rev()
        .take(4)
        .map(|entry| Line::from(entry.clone()))
        .collect();
    f.render_widget(
        Paragraph::new(log_lines).block(Block::default().borders(Borders::ALL).title("Sent")),
        chunks[3],
    );

    // Hint bar
    f.render_widget(
        Paragraph::new(app.hint()).style(Style::default().fg(Color::Gray)),
        chunks[4],
    );
}
