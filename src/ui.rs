//! Layout and drawing: board, sprites, cursor, sidebar, pause and game-over overlays.

use crate::scene::{EXPLODE_SECS, Phase, Scene, Sprite};
use crate::theme::Theme;
use minertui::Color as Jewel;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// One jewel is 4 columns by 2 rows of terminal cells.
const CELL_WIDTH: u16 = 4;
const CELL_HEIGHT: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
const JEWEL_GLYPH: [&str; 2] = ["▗██▖", "▝██▘"];
/// Spin frames for exploding jewels.
const SPIN_GLYPHS: [[&str; 2]; 4] = [
    [" ◢◣ ", " ◥◤ "],
    [" ◣◤ ", " ◢◥ "],
    [" ◤◥ ", " ◣◢ "],
    [" ◥◢ ", " ◤◣ "],
];

/// Board size in terminal cells, border included.
fn board_pixel_size(columns: usize, rows: usize) -> (u16, u16) {
    (
        columns as u16 * CELL_WIDTH + 2,
        rows as u16 * CELL_HEIGHT + 2,
    )
}

/// Max board size (columns, rows) that fits the terminal next to the sidebar.
pub fn max_board_cells_for_terminal(term_cols: u16, term_rows: u16) -> (usize, usize) {
    let w = term_cols.saturating_sub(2).saturating_sub(SIDEBAR_WIDTH) / CELL_WIDTH;
    let h = term_rows.saturating_sub(2) / CELL_HEIGHT;
    (w as usize, h as usize)
}

/// Board rect (with border) and sidebar rect, centred in `area`.
fn game_layout(area: Rect, columns: usize, rows: usize) -> (Rect, Rect) {
    let (pw, ph) = board_pixel_size(columns, rows);
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);
    (inner[0], inner[1])
}

/// Board interior (no border); matches `draw`.
fn board_rect(area: Rect, columns: usize, rows: usize) -> Rect {
    let (outer, _) = game_layout(area, columns, rows);
    Block::default().borders(Borders::ALL).inner(outer)
}

/// Grid cell under a terminal position, for mouse clicks.
pub fn cell_at(area: Rect, columns: usize, rows: usize, x: u16, y: u16) -> Option<(usize, usize)> {
    let board = board_rect(area, columns, rows);
    if !board.contains(Position { x, y }) {
        return None;
    }
    let column = ((x - board.x) / CELL_WIDTH) as usize;
    let row = ((y - board.y) / CELL_HEIGHT) as usize;
    (column < columns && row < rows).then_some((column, row))
}

/// Terminal positions covered by the given grid cells.
fn cell_positions(board: Rect, cells: &[(usize, usize)]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &(c, r) in cells {
        let x0 = board.x + c as u16 * CELL_WIDTH;
        let y0 = board.y + r as u16 * CELL_HEIGHT;
        for dy in 0..CELL_HEIGHT {
            for dx in 0..CELL_WIDTH {
                set.insert((x0 + dx, y0 + dy));
            }
        }
    }
    set
}

/// What the frame shows besides the scene itself.
pub struct Hud<'a> {
    pub theme: &'a Theme,
    pub cursor: (usize, usize),
    pub paused: bool,
    pub no_animation: bool,
}

/// Draw the game, overlays and (unless disabled) the explosion fade.
pub fn draw(
    frame: &mut Frame,
    scene: &Scene,
    hud: &Hud,
    explode_effect: &mut Option<Effect>,
    explode_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let (board_outer, sidebar) = game_layout(area, scene.columns(), scene.rows());
    draw_board(frame, scene, hud, board_outer);
    draw_sidebar(frame, scene, hud.theme, sidebar);

    let exploding = scene.exploding_cells();
    if !exploding.is_empty() && !hud.no_animation {
        let board = board_rect(area, scene.columns(), scene.rows());
        apply_explode_effect(
            frame,
            hud.theme,
            board,
            &exploding,
            explode_effect,
            explode_process_time,
            now,
        );
    }

    if hud.paused {
        draw_pause_overlay(frame, hud.theme, area);
    } else if scene.phase == Phase::Over {
        draw_game_over(frame, scene, hud.theme, board_outer);
    }
}

/// Fade exploding cells to the background (TachyonFX), created once per deletion batch.
fn apply_explode_effect(
    frame: &mut Frame,
    theme: &Theme,
    board: Rect,
    cells: &[(usize, usize)],
    explode_effect: &mut Option<Effect>,
    explode_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = explode_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    *explode_process_time = Some(now);

    if explode_effect.is_none() {
        let exploding_set = cell_positions(board, cells);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            exploding_set.contains(&(pos.x, pos.y))
        }));
        let bg = theme.bg;
        let fade_ms = (EXPLODE_SECS * 1000.0) as u32;
        let effect = fx::fade_to(bg, bg, (fade_ms, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        *explode_effect = Some(effect);
    }

    if let Some(effect) = explode_effect {
        frame.render_effect(effect, board, tfx_delta);
    }
}

fn draw_board(frame: &mut Frame, scene: &Scene, hud: &Hud, outer: Rect) {
    let theme = hud.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Jewel Miner ", Style::default().fg(theme.title)));
    let board = block.inner(outer);
    block.render(outer, frame.buffer_mut());

    let bg = Style::default().bg(theme.bg);
    for y in board.top()..board.bottom() {
        for x in board.left()..board.right() {
            frame.buffer_mut()[(x, y)].set_symbol(" ").set_style(bg);
        }
    }

    for row in 0..scene.rows() {
        for column in 0..scene.columns() {
            if let Some(sprite) = scene.sprite(column, row) {
                draw_sprite(frame, theme, board, column, row, sprite);
            }
        }
    }

    if scene.phase != Phase::Over {
        draw_cursor(frame, theme, board, hud.cursor);
    }
}

/// Draw one jewel at its cell plus animation offset, clipped to the board.
fn draw_sprite(frame: &mut Frame, theme: &Theme, board: Rect, column: usize, row: usize, sprite: &Sprite) {
    if sprite.color == Jewel::None {
        return;
    }
    let fg = theme.jewel_color(sprite.color);
    let bg = if sprite.selected { theme.title } else { theme.bg };
    let mut style = Style::default().fg(fg).bg(bg);
    let glyph = if sprite.is_exploding() {
        style = style.add_modifier(Modifier::BOLD);
        SPIN_GLYPHS[(sprite.spin.floor() as i64).rem_euclid(4) as usize]
    } else {
        JEWEL_GLYPH
    };

    let left = board.x as f32 + (column as f32 + sprite.offset.0) * CELL_WIDTH as f32;
    let top = board.y as f32 + (row as f32 + sprite.offset.1) * CELL_HEIGHT as f32;
    let (left, top) = (left.round() as i32, top.round() as i32);
    for (dy, line) in glyph.iter().enumerate() {
        let y = top + dy as i32;
        if y < board.top() as i32 || y >= board.bottom() as i32 {
            continue;
        }
        for (dx, ch) in line.chars().enumerate() {
            let x = left + dx as i32;
            if x < board.left() as i32 || x >= board.right() as i32 {
                continue;
            }
            frame.buffer_mut()[(x as u16, y as u16)]
                .set_symbol(ch.encode_utf8(&mut [0; 4]))
                .set_style(style);
        }
    }
}

/// Corner marks around the cursor cell; the jewel stays visible.
fn draw_cursor(frame: &mut Frame, theme: &Theme, board: Rect, (column, row): (usize, usize)) {
    let x0 = board.x + column as u16 * CELL_WIDTH;
    let y0 = board.y + row as u16 * CELL_HEIGHT;
    let x1 = x0 + CELL_WIDTH - 1;
    let y1 = y0 + CELL_HEIGHT - 1;
    let style = Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD);
    for (x, y, mark) in [(x0, y0, "┌"), (x1, y0, "┐"), (x0, y1, "└"), (x1, y1, "┘")] {
        if board.contains(Position { x, y }) {
            frame.buffer_mut()[(x, y)].set_symbol(mark).set_style(style);
        }
    }
}

fn draw_sidebar(frame: &mut Frame, scene: &Scene, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Score
            Constraint::Length(1), // gap
            Constraint::Length(4), // Time (label + bar)
            Constraint::Length(1), // gap
            Constraint::Length(4), // Jewels (label + strip)
            Constraint::Length(1), // gap
            Constraint::Length(7), // Keys
        ])
        .split(area);

    // --- Score ---
    let score_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let score_inner = score_block.inner(chunks[0]);
    score_block.render(chunks[0], frame.buffer_mut());
    Paragraph::new(Line::from(vec![
        Span::styled("Score: ", title_style),
        Span::styled(scene.score.to_string(), fg_style),
    ]))
    .render(score_inner, frame.buffer_mut());

    // --- Time ---
    let time_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let time_inner = time_block.inner(chunks[2]);
    time_block.render(chunks[2], frame.buffer_mut());
    let time_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(time_inner);
    let remaining = scene.time_remaining().ceil() as u64;
    Paragraph::new(Line::from(vec![
        Span::styled("Time: ", title_style),
        Span::styled(format!("{:02}:{:02}", remaining / 60, remaining % 60), fg_style),
    ]))
    .render(time_layout[0], frame.buffer_mut());
    let ratio = if scene.time_limit() > 0.0 {
        (scene.time_remaining() / scene.time_limit()).clamp(0.0, 1.0) as f64
    } else {
        0.0
    };
    let bar_color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    };
    Gauge::default()
        .ratio(ratio)
        .label("")
        .gauge_style(Style::default().fg(bar_color))
        .render(time_layout[1], frame.buffer_mut());

    // --- Jewels ---
    let colours_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let colours_inner = colours_block.inner(chunks[4]);
    colours_block.render(chunks[4], frame.buffer_mut());
    let colours_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(colours_inner);
    Paragraph::new(Line::from(Span::styled("Jewels", title_style)))
        .render(colours_layout[0], frame.buffer_mut());
    draw_colour_strip(frame, theme, colours_layout[1]);

    // --- Keys ---
    let keys_block = Block::default().borders(Borders::ALL).border_style(border_style);
    let keys_inner = keys_block.inner(chunks[6]);
    keys_block.render(chunks[6], frame.buffer_mut());
    let hint = Style::default().fg(theme.inactive_fg);
    let keys = vec![
        Line::from(Span::styled("arrows/hjkl  move", hint)),
        Line::from(Span::styled("space/enter  select", hint)),
        Line::from(Span::styled("x  cancel   p  pause", hint)),
        Line::from(Span::styled("n  new game", hint)),
        Line::from(Span::styled("q  quit", hint)),
    ];
    Paragraph::new(ratatui::text::Text::from(keys)).render(keys_inner, frame.buffer_mut());
}

/// One coloured block per playable jewel.
fn draw_colour_strip(frame: &mut Frame, theme: &Theme, area: Rect) {
    let n = Jewel::PLAYABLE.len() as u16;
    let block_w = (area.width / n).max(1);
    for (i, jewel) in Jewel::PLAYABLE.iter().enumerate() {
        let r = Rect {
            x: area.x + i as u16 * block_w,
            y: area.y,
            width: block_w.saturating_sub(1).max(1),
            height: area.height.min(1),
        };
        if r.right() > area.right() {
            break;
        }
        let c = theme.jewel_color(*jewel);
        Paragraph::new("█").style(Style::default().fg(c).bg(c)).render(r, frame.buffer_mut());
    }
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(" P  Resume    Q  Quit ", Style::default().fg(theme.main_fg))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, scene: &Scene, theme: &Theme, board: Rect) {
    let popup_w = 30u16.min(board.width);
    let popup_h = 8u16.min(board.height);
    let popup = Rect {
        x: board.x + board.width.saturating_sub(popup_w) / 2,
        y: board.y + board.height.saturating_sub(popup_h) / 2,
        width: popup_w,
        height: popup_h,
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Time's up! ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(" Score: {} ", scene.score),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled(" N  New game    Q  Quit ", Style::default().fg(theme.main_fg))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .title(Span::styled(" Jewel Miner ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}
