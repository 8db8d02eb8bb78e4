use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::dashboard::{self, DashboardData};
use crate::export;
use crate::metrics;
use crate::model::{Category, RemoteConfig};
use crate::session::SessionStore;
use crate::tui::TuiRunOptions;

mod input;
use input::Input;

mod theme;
use theme::Theme;

pub fn run(opts: TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let mut app = App::load(opts);
    let res = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug)]
struct StatusEntry {
    ts: String,
    kind: StatusKind,
    text: String,
}

struct App {
    store: Option<SessionStore>,
    remote: Option<RemoteConfig>,
    data: Option<DashboardData>,

    input: Input,
    selected: usize,
    theme: Theme,
    updated_at: String,

    status: Option<StatusEntry>,

    quit: bool,
}

impl App {
    fn load(opts: TuiRunOptions) -> Self {
        let mut app = Self {
            store: None,
            remote: None,
            data: None,
            input: Input::default(),
            selected: 0,
            theme: Theme::default(),
            updated_at: now_ts(),
            status: None,
            quit: false,
        };

        let root = match opts.store_root {
            Some(root) => root,
            None => match SessionStore::default_root() {
                Ok(root) => root,
                Err(err) => {
                    app.set_error(format!("{:#}", err));
                    return app;
                }
            },
        };

        let store = match SessionStore::open_or_init(&root) {
            Ok(store) => store,
            Err(err) => {
                app.set_error(format!("{:#}", err));
                return app;
            }
        };

        match dashboard::require_remote(&store) {
            Ok(remote) => app.remote = Some(remote),
            Err(err) => app.set_error(format!("{:#}", err)),
        }
        app.store = Some(store);

        app.reload();
        app
    }

    /// Auth bootstrap + fetch. Failures land in the status line; the shell
    /// stays up with whatever data it already had.
    fn reload(&mut self) {
        let (Some(store), Some(remote)) = (&self.store, &self.remote) else {
            return;
        };
        match dashboard::load(store, remote) {
            Ok(data) => {
                self.data = Some(data);
                self.selected = 0;
                self.updated_at = now_ts();
                self.set_info("loaded categories".to_string());
            }
            Err(err) => self.set_error(format!("{:#}", err)),
        }
    }

    fn export_csv(&mut self) {
        let Some(data) = &self.data else {
            self.set_error("nothing to export (no data loaded)".to_string());
            return;
        };
        let path = std::path::Path::new(export::EXPORT_FILE_NAME);
        match export::write_csv(&data.categories, path) {
            Ok(()) => self.set_info(format!("exported {}", export::EXPORT_FILE_NAME)),
            Err(err) => self.set_error(format!("{:#}", err)),
        }
    }

    /// The currently visible rows: filter applied to the sorted dataset.
    fn visible(&self) -> Vec<Category> {
        match &self.data {
            Some(data) => metrics::filter_by_name(&data.sorted, &self.input.buf),
            None => Vec::new(),
        }
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn move_down(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn set_info(&mut self, text: String) {
        self.status = Some(StatusEntry {
            ts: now_ts(),
            kind: StatusKind::Info,
            text,
        });
    }

    fn set_error(&mut self, text: String) {
        self.status = Some(StatusEntry {
            ts: now_ts(),
            kind: StatusKind::Error,
            text,
        });
    }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw(f, app)).context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.quit = true,
            KeyCode::Char('e') => app.export_csv(),
            KeyCode::Char('t') => {
                app.theme = app.theme.toggle();
                app.set_info(format!("theme: {}", app.theme.label()));
            }
            KeyCode::Char('r') => app.reload(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if !app.input.buf.is_empty() {
                app.input.clear();
                app.selected = 0;
            } else {
                app.quit = true;
            }
        }

        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),

        KeyCode::Backspace => {
            app.input.backspace();
            app.selected = 0;
        }
        KeyCode::Delete => {
            app.input.delete();
            app.selected = 0;
        }

        KeyCode::Char(c) => {
            app.input.insert_char(c);
            app.selected = 0;
        }

        _ => {}
    }
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let visible = app.visible();
    draw_cards(frame, app, &visible, panels[0]);
    draw_chart(frame, app, &visible, panels[1]);

    draw_filter(frame, app, chunks[2]);
    draw_status(frame, app, chunks[3]);
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let theme = app.theme;
    let mut spans = vec![
        Span::styled("Favdash", theme.base().add_modifier(Modifier::REVERSED)),
        Span::raw("  "),
    ];

    match &app.remote {
        Some(remote) => {
            spans.push(Span::styled(remote.base_url.clone(), theme.accent()));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(remote.email.clone(), theme.muted()));
        }
        None => spans.push(Span::styled("(no remote configured)", theme.error())),
    }

    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        format!("updated {}", app.updated_at),
        theme.muted(),
    ));

    let header =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_cards(
    frame: &mut ratatui::Frame,
    app: &App,
    visible: &[Category],
    area: ratatui::layout::Rect,
) {
    let theme = app.theme;
    let stats = app.data.as_ref().map(|d| d.stats).unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Categories", theme.accent()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if visible.is_empty() {
        let note = if app.data.is_none() {
            "(no data)"
        } else if app.input.buf.is_empty() {
            "(no categories)"
        } else {
            "(no match)"
        };
        frame.render_widget(Paragraph::new(note).style(theme.muted()), inner);
        return;
    }

    let mut state = ListState::default();
    state.select(Some(app.selected.min(visible.len() - 1)));

    let rows: Vec<ListItem> = visible
        .iter()
        .map(|c| {
            let top = metrics::is_top(stats, c.favorites);
            let marker = if top { "*" } else { " " };
            let row_style = if top { theme.top() } else { theme.text() };
            let row = format!(
                "{} {} {}  {} favorites ({:.1}%)",
                marker,
                metrics::icon(&c.name),
                c.name,
                c.favorites,
                metrics::share_percent(stats, c.favorites),
            );
            ListItem::new(row).style(row_style)
        })
        .collect();

    let list = List::new(rows).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, inner, &mut state);
}

fn draw_chart(
    frame: &mut ratatui::Frame,
    app: &App,
    visible: &[Category],
    area: ratatui::layout::Rect,
) {
    let theme = app.theme;
    let stats = app.data.as_ref().map(|d| d.stats).unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("Favorites", theme.accent()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if visible.is_empty() {
        frame.render_widget(Paragraph::new("(no data)").style(theme.muted()), inner);
        return;
    }

    // Bars scale against the unfiltered maximum, so a filtered view keeps
    // its bars comparable to the full chart.
    let label_width = 14usize;
    let count_width = 6usize;
    let bar_max_width = (inner.width as usize).saturating_sub(label_width + count_width + 3);

    let mut lines: Vec<Line> = Vec::with_capacity(visible.len());
    for c in visible {
        let filled = if stats.max > 0 {
            (c.favorites as f64 / stats.max as f64 * bar_max_width as f64) as usize
        } else {
            0
        };
        let bar = "█".repeat(filled);
        let rest = "░".repeat(bar_max_width.saturating_sub(filled));

        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:>width$} ", truncate(&c.name, label_width), width = label_width),
                theme.text(),
            ),
            Span::styled(bar, theme.bar()),
            Span::styled(rest, theme.muted()),
            Span::styled(format!(" {:>5}", c.favorites), theme.accent()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_filter(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let theme = app.theme;
    let title = if app.input.buf.is_empty() {
        "filter (type to narrow)".to_string()
    } else {
        format!("filter ({} shown)", app.visible().len())
    };

    let line = Line::from(vec![
        Span::styled("> ", theme.accent()),
        Span::styled(app.input.buf.clone(), theme.text()),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let theme = app.theme;
    let mut lines = Vec::new();

    if let Some(s) = &app.status {
        let style = match s.kind {
            StatusKind::Info => theme.info(),
            StatusKind::Error => theme.error(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", s.ts), theme.muted()),
            Span::styled(s.text.as_str(), style),
        ]));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Esc clear/quit  ↑↓ select  ^E export csv  ^T theme  ^R reload  ^C quit",
        theme.muted(),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}
