use std::io;

use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::card::{self, Card};
use crate::cursor::{Cursor, foundation_at};
use crate::state::{GameState, TABLEAU_STACKS};

/// Everything a frame shows.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub state: &'a GameState,
    pub cursor: &'a Cursor,
    pub status: &'a str,
    pub show_help: bool,
}

/// Trait that abstracts the rendering layer, so the game loop does not care
/// what it draws on.
pub trait Renderer {
    /// Render the table, cursor and status line.
    fn render(&mut self, view: &View<'_>) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// TUI Renderer
// ---------------------------------------------------------------------------

/// Full-screen ratatui renderer. The binary runs it over crossterm; tests
/// use `TestBackend`.
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TuiRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        TuiRenderer { terminal }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Renderer for TuiRenderer<B> {
    fn render(&mut self, view: &View<'_>) -> io::Result<()> {
        self.terminal.draw(|f| {
            let help_height = if view.show_help { HELP.len() as u16 + 2 } else { 3 };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),           // Status
                    Constraint::Min(10),             // Table
                    Constraint::Length(help_height), // Keys
                ])
                .split(f.area());

            let status = Paragraph::new(view.status.to_string())
                .block(Block::default().borders(Borders::ALL).title(" Solitaire "));
            f.render_widget(status, chunks[0]);

            let table = Paragraph::new(table_lines(view)).block(Block::default().borders(Borders::ALL));
            f.render_widget(table, chunks[1]);

            let keys: Vec<Line> = if view.show_help {
                HELP.iter().map(|l| Line::from(*l)).collect()
            } else {
                vec![Line::from(KEYS_HINT)]
            };
            let keys = Paragraph::new(keys)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(keys, chunks[2]);
        })?;
        Ok(())
    }
}

const KEYS_HINT: &str = "arrows move · space pick/drop · r resolve · a auto · p pile · u undo · ? help · q quit";

const HELP: &[&str] = &[
    "GOAL: build each suit from Ace to King on the four foundations.",
    "Stacks build down in alternating colours; only a King fills an empty stack.",
    "",
    "←↑↓→ / hjkl   move the cursor (while moving: choose the target stack)",
    "space         pick up the card(s) under the cursor / drop them",
    "esc           cancel the move",
    "p             next card in the draw pile",
    "r             send the card under the cursor to its foundation",
    "a             auto-resolve everything that can go up",
    "u             undo",
    "s / o         save / load",
    "n             new game (after a win)",
    "q             quit",
];

/// Width of one table column.
const CELL: usize = 4;

fn card_style(card: Card) -> Style {
    if !card.face_up {
        return Style::default().fg(Color::DarkGray);
    }
    let fg = match card.color() {
        card::Color::Red => Color::Red,
        card::Color::Black => Color::Black,
    };
    Style::default().fg(fg).bg(Color::White)
}

fn cell(text: &str, style: Style, focused: bool) -> Span<'static> {
    let style = if focused {
        style.bg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        style
    };
    Span::styled(format!(" {text:<2} "), style)
}

fn card_cell(card: Option<Card>, focused: bool) -> Span<'static> {
    match card {
        Some(c) => cell(&c.name(), card_style(c), focused),
        None => cell("--", Style::default().fg(Color::DarkGray), focused),
    }
}

fn blank() -> Span<'static> {
    Span::raw(" ".repeat(CELL))
}

fn table_lines(view: &View<'_>) -> Vec<Line<'static>> {
    let state = view.state;
    let cursor = view.cursor;
    let mut lines = Vec::new();

    // ---- Top row: draw pile | foundations ----
    let top: Vec<Span> = (0..TABLEAU_STACKS)
        .map(|x| {
            if x == 0 {
                card_cell(state.current_draw_card(), cursor.is_focused(0, 0))
            } else if let Some(suit) = foundation_at(x) {
                card_cell(state.foundations.top(suit), cursor.is_focused(x, 0))
            } else {
                blank()
            }
        })
        .collect();
    lines.push(Line::from(top));

    let pile_info = format!(
        "pile {}/{}   home {}/52",
        if state.draw_pile.is_empty() { 0 } else { state.draw_cursor + 1 },
        state.draw_pile.len(),
        state.foundations.total()
    );
    lines.push(Line::from(Span::styled(pile_info, Style::default().fg(Color::DarkGray))));

    // ---- Tableau ----
    let max_len = state.tableau.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..max_len {
        let spans: Vec<Span> = state
            .tableau
            .iter()
            .enumerate()
            .map(|(x, stack)| match stack.get(row) {
                Some(&c) => card_cell(Some(c), cursor.is_focused(x, row + 1)),
                None => blank(),
            })
            .collect();
        lines.push(Line::from(spans));
    }

    // ---- Move targets ----
    if cursor.is_moving() {
        lines.push(Line::default());
        let targets: Vec<Span> = (0..TABLEAU_STACKS)
            .map(|x| {
                let style = Style::default().fg(Color::White).bg(Color::Blue);
                cell(&format!("S{}", x + 1), style, cursor.is_target(x))
            })
            .collect();
        lines.push(Line::from(targets));
    }

    if state.is_won() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "  ★ YOU WON ★",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }

    lines
}
