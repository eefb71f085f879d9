//! Terminal rendering of the four charts with the two selectors on top.

use std::f64::consts::PI;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols;
use tui::text::{Span, Spans};
use tui::widgets::canvas::{Canvas, Painter, Shape};
use tui::widgets::{BarChart, Block, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};

use crate::age_range::AgeRange;
use crate::charts::{self, ChartKind, ChartSpec};
use crate::dataset::Dataset;
use crate::palette::Rgb;
use crate::selector::{GenderSelector, SelectorState};

enum Event<I> {
    Input(I),
    Tick,
}

/// Per-session state. The dataset is borrowed, the selectors are owned.
pub struct App<'a> {
    dataset: &'a Dataset,
    pub selector: SelectorState,
    pub cursor: usize,
    pub charts: Vec<ChartSpec>,
    pub updated_at: DateTime<Local>,
}

impl<'a> App<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        let selector = SelectorState::default();
        let charts = charts::render(dataset, &selector);
        App {
            dataset,
            selector,
            cursor: 0,
            charts,
            updated_at: Local::now(),
        }
    }

    fn refresh(&mut self) {
        self.charts = charts::render(self.dataset, &self.selector);
        self.updated_at = Local::now();
    }

    /// Applies one key press. Returns `false` when the user asked to quit.
    pub fn on_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('g') | KeyCode::Tab => {
                self.selector.gender = self.selector.gender.next();
                self.refresh();
            }
            KeyCode::Left => {
                self.cursor = (self.cursor + AgeRange::ALL.len() - 1) % AgeRange::ALL.len();
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1) % AgeRange::ALL.len();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.selector.toggle_age_range(AgeRange::ALL[self.cursor]);
                self.refresh();
            }
            KeyCode::Char('a') => {
                self.selector.age_ranges = AgeRange::ALL.iter().copied().collect();
                self.refresh();
            }
            _ => {}
        }
        true
    }
}

pub fn run(dataset: &Dataset) -> io::Result<()> {
    let mut app = App::new(dataset);

    enable_raw_mode()?;

    let (tx, rx) = mpsc::channel();
    let tick_rate = Duration::from_millis(200);
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));

            match event::poll(timeout) {
                Ok(true) => {
                    if let Ok(CEvent::Key(key)) = event::read() {
                        if tx.send(Event::Input(key)).is_err() {
                            return;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => return,
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mpsc::Receiver<Event<event::KeyEvent>>,
) -> io::Result<()> {
    loop {
        terminal.draw(|rect| draw(rect, app))?;

        match rx.recv() {
            Ok(Event::Input(key)) => {
                if !app.on_key(key.code) {
                    return Ok(());
                }
            }
            Ok(Event::Tick) => {}
            Err(_) => return Ok(()),
        }
    }
}

fn draw<B: Backend>(rect: &mut Frame<B>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(rect.size());

    let title = Paragraph::new("Clothing Store Customer Info Dashboard")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    rect.render_widget(title, chunks[0]);

    let selector_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(chunks[1]);
    rect.render_widget(gender_tabs(app), selector_chunks[0]);
    rect.render_widget(age_checklist(app), selector_chunks[1]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[2]);
    for (row, pair) in rows.iter().zip(app.charts.chunks(2)) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
            .split(*row);
        for (area, chart) in cells.iter().zip(pair) {
            draw_chart(rect, *area, chart);
        }
    }

    let status = Paragraph::new(Spans::from(vec![
        Span::styled(
            "g gender | \u{2190}\u{2192} move | space toggle | a all | q quit",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!(
            "   {} of {} records | updated {}",
            app.charts.first().map(|c| c.total()).unwrap_or(0),
            app.dataset.len(),
            app.updated_at.format("%H:%M:%S")
        )),
    ]));
    rect.render_widget(status, chunks[3]);
}

fn gender_tabs(app: &App) -> Tabs<'static> {
    let titles = GenderSelector::OPTIONS
        .iter()
        .map(|o| Spans::from(Span::raw(o.label())))
        .collect();
    let selected = GenderSelector::OPTIONS
        .iter()
        .position(|o| *o == app.selector.gender)
        .unwrap_or(0);
    Tabs::new(titles)
        .select(selected)
        .block(Block::default().title("Gender (g)").borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider(Span::raw("|"))
}

fn age_checklist(app: &App) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (pos, range) in AgeRange::ALL.iter().enumerate() {
        let mark = if app.selector.age_ranges.contains(range) { "x" } else { " " };
        let mut style = Style::default().fg(Color::Green);
        if pos == app.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("[{mark}] {range}"), style));
        spans.push(Span::raw("  "));
    }
    Paragraph::new(Spans::from(spans))
        .block(Block::default().title("Age ranges").borders(Borders::ALL))
}

fn tui_color(rgb: Option<Rgb>) -> Color {
    match rgb {
        Some(Rgb { r, g, b }) => Color::Rgb(r, g, b),
        None => Color::Yellow,
    }
}

fn draw_chart<B: Backend>(rect: &mut Frame<B>, area: Rect, chart: &ChartSpec) {
    let block = Block::default().title(chart.title).borders(Borders::ALL);
    if chart.slices.is_empty() {
        let empty = Paragraph::new("no matching records")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        rect.render_widget(empty, area);
        return;
    }

    match chart.kind {
        ChartKind::Pie { hole } => draw_donut(rect, area, block, chart, hole),
        ChartKind::Bar { .. } if chart.slices.iter().any(|s| s.color.is_some()) => {
            draw_colored_bars(rect, area, block, chart)
        }
        ChartKind::Bar { .. } => {
            let data = chart
                .slices
                .iter()
                .map(|s| (s.label.as_str(), s.count))
                .collect::<Vec<(&str, u64)>>();
            let bars = BarChart::default()
                .block(block)
                .data(&data)
                .bar_width(6)
                .bar_style(Style::default().fg(Color::Yellow))
                .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
            rect.render_widget(bars, area);
        }
    }
}

/// Horizontal bars, one line per category, each in its own color.
fn draw_colored_bars<B: Backend>(rect: &mut Frame<B>, area: Rect, block: Block, chart: &ChartSpec) {
    let label_width = chart.slices.iter().map(|s| s.label.len()).max().unwrap_or(0);
    let bar_room = (area.width as usize).saturating_sub(label_width + 10).max(1);
    let max = chart.max_count().max(1);
    let lines = chart
        .slices
        .iter()
        .map(|s| {
            let len = ((s.count as usize * bar_room) / max as usize).max(1);
            Spans::from(vec![
                Span::raw(format!("{:>width$} ", s.label, width = label_width)),
                Span::styled("\u{2588}".repeat(len), Style::default().fg(tui_color(s.color))),
                Span::raw(format!(" {}", s.count)),
            ])
        })
        .collect::<Vec<_>>();
    rect.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_donut<B: Backend>(
    rect: &mut Frame<B>,
    area: Rect,
    block: Block,
    chart: &ChartSpec,
    hole: f64,
) {
    let inner = block.inner(area);
    rect.render_widget(block, area);
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(inner);

    let total = chart.total().max(1) as f64;
    let segments = chart
        .slices
        .iter()
        .map(|s| (s.count as f64 / total, tui_color(s.color)))
        .collect::<Vec<_>>();
    let donut = Donut {
        segments: &segments,
        hole,
    };
    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| ctx.draw(&donut));
    rect.render_widget(canvas, halves[0]);

    let legend = chart
        .slices
        .iter()
        .map(|s| {
            Spans::from(vec![
                Span::styled("\u{25A0} ", Style::default().fg(tui_color(s.color))),
                Span::raw(format!(
                    "{} {} ({:.1}%)",
                    s.label,
                    s.count,
                    s.count as f64 * 100.0 / total
                )),
            ])
        })
        .collect::<Vec<_>>();
    rect.render_widget(Paragraph::new(legend), halves[1]);
}

/// Ring of slices starting at twelve o'clock, clockwise.
struct Donut<'a> {
    segments: &'a [(f64, Color)],
    hole: f64,
}

impl<'a> Donut<'a> {
    const STEP: f64 = 0.01;

    fn color_at(&self, x: f64, y: f64) -> Option<Color> {
        let radius = (x * x + y * y).sqrt();
        if radius > 1.0 || radius < self.hole {
            return None;
        }
        let mut angle = x.atan2(y);
        if angle < 0.0 {
            angle += 2.0 * PI;
        }
        let fraction = angle / (2.0 * PI);
        let mut acc = 0.0;
        for (share, color) in self.segments {
            acc += share;
            if fraction <= acc {
                return Some(*color);
            }
        }
        self.segments.last().map(|(_, color)| *color)
    }
}

impl<'a> Shape for Donut<'a> {
    fn draw(&self, painter: &mut Painter) {
        let steps = (2.0 / Self::STEP) as i32;
        for i in 0..=steps {
            for j in 0..=steps {
                let x = -1.0 + i as f64 * Self::STEP;
                let y = -1.0 + j as f64 * Self::STEP;
                if let Some(color) = self.color_at(x, y) {
                    if let Some((px, py)) = painter.get_point(x, y) {
                        painter.paint(px, py, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_records;

    const DATA: &str = "\
Age,Gender,Size,Color,Season,Subscription Status,Age Range
25,Male,M,Gold,Winter,Yes,18-27
30,Female,L,Gold,Winter,No,28-37
";

    fn dataset() -> Dataset {
        Dataset::from_records(read_records(DATA.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn keys_drive_the_selectors() {
        let dataset = dataset();
        let mut app = App::new(&dataset);
        assert_eq!(app.charts[0].total(), 2);

        assert!(app.on_key(KeyCode::Char('g')));
        assert_eq!(app.selector.gender.label(), "Male");
        assert_eq!(app.charts[0].total(), 1);

        app.on_key(KeyCode::Char('g'));
        app.on_key(KeyCode::Char('g'));
        app.on_key(KeyCode::Char(' '));
        assert!(!app.selector.age_ranges.contains(&AgeRange::From18To27));
        assert_eq!(app.charts[0].total(), 1);

        app.on_key(KeyCode::Left);
        assert_eq!(app.cursor, AgeRange::ALL.len() - 1);
        app.on_key(KeyCode::Char('a'));
        assert_eq!(app.charts[0].total(), 2);

        assert!(!app.on_key(KeyCode::Char('q')));
    }

    #[test]
    fn donut_splits_the_ring_clockwise_from_the_top() {
        let segments = [(0.25, Color::Red), (0.75, Color::Blue)];
        let donut = Donut {
            segments: &segments,
            hole: 0.2,
        };
        assert_eq!(donut.color_at(0.0, 0.0), None);
        assert_eq!(donut.color_at(0.0, 1.5), None);
        assert_eq!(donut.color_at(0.5, 0.5), Some(Color::Red));
        assert_eq!(donut.color_at(-0.5, 0.5), Some(Color::Blue));
    }
}
