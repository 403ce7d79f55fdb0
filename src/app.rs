//! App: terminal init, main loop, frame update and input handling.

use crate::GameConfig;
use crate::input::{Action, key_to_action};
use crate::scene::{Phase, Scene};
use crate::theme::Theme;
use crate::ui::{self, Hud};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use log::{debug, info};
use minertui::{Engine, Grid};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    config: GameConfig,
    theme: Theme,
    engine: Engine<Scene>,
    cursor: (usize, usize),
    paused: bool,
    should_quit: bool,
    last_frame: Instant,
    /// Last drawn frame area, for mapping mouse clicks to cells.
    area: Rect,
    /// TachyonFX fade over the current batch of exploding jewels.
    explode_effect: Option<Effect>,
    /// Last time we processed the explode effect (for delta).
    explode_effect_process_time: Option<Instant>,
}

/// Engine with a freshly populated board mirrored into a new scene.
fn new_engine(config: &GameConfig) -> Result<Engine<Scene>> {
    let grid = Grid::new(config.columns, config.rows)?;
    let scene = Scene::new(config.columns, config.rows, config.time_limit, config.no_animation);
    let mut engine = Engine::with_config(grid, scene, config.engine)?;
    let (grid, scene) = engine.split();
    scene.acquire(grid);
    Ok(engine)
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Result<Self> {
        let engine = new_engine(&config)?;
        Ok(Self {
            config,
            theme,
            engine,
            cursor: (0, 0),
            paused: false,
            should_quit: false,
            last_frame: Instant::now(),
            area: Rect::default(),
            explode_effect: None,
            explode_effect_process_time: None,
        })
    }

    fn new_game(&mut self) {
        self.engine.populate();
        let (grid, scene) = self.engine.split();
        scene.acquire(grid);
        self.paused = false;
        self.explode_effect = None;
        self.explode_effect_process_time = None;
        info!("new game {}x{}", self.config.columns, self.config.rows);
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
        };

        // Board must fit the terminal; shrink (never below 2x2) when it does not.
        let (term_cols, term_rows) = size()?;
        let (fit_w, fit_h) = ui::max_board_cells_for_terminal(term_cols, term_rows);
        let columns = self.config.columns.min(fit_w).max(2);
        let rows = self.config.rows.min(fit_h).max(2);
        if (columns, rows) != (self.config.columns, self.config.rows) {
            info!(
                "board {}x{} does not fit the terminal, using {}x{}",
                self.config.columns, self.config.rows, columns, rows
            );
            self.config.columns = columns;
            self.config.rows = rows;
            self.engine = new_engine(&self.config)?;
        }

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate.max(1.0));
        self.last_frame = Instant::now();
        while !self.should_quit {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            if !self.paused {
                self.advance(dt);
            }

            let hud = Hud {
                theme: &self.theme,
                cursor: self.cursor,
                paused: self.paused,
                no_animation: self.config.no_animation,
            };
            terminal.draw(|f| {
                self.area = f.area();
                ui::draw(
                    f,
                    self.engine.listener(),
                    &hud,
                    &mut self.explode_effect,
                    &mut self.explode_effect_process_time,
                    now,
                )
            })?;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.apply_action(key_to_action(key))?;
                        }
                        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                            if self.paused {
                                continue;
                            }
                            let scene = self.engine.listener();
                            if let Some(cell) =
                                ui::cell_at(self.area, scene.columns(), scene.rows(), mouse.column, mouse.row)
                            {
                                self.cursor = cell;
                                self.click(cell)?;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Animate, then let the engine take its next step once the scene is at rest.
    fn advance(&mut self, dt: f32) {
        let was_over = self.engine.listener().phase == Phase::Over;
        self.engine.listener_mut().update(dt);
        let scene = self.engine.listener();
        if !was_over && scene.phase == Phase::Over {
            info!("time up, score {}", scene.score);
        }
        if scene.exploding_cells().is_empty() {
            self.explode_effect = None;
            self.explode_effect_process_time = None;
        }
        if scene.settled() && !self.engine.ready() {
            self.engine.step();
        }
    }

    fn apply_action(&mut self, action: Action) -> Result<()> {
        let phase = self.engine.listener().phase;
        match action {
            Action::Quit => self.should_quit = true,
            Action::Pause => {
                if phase != Phase::Over {
                    self.paused = !self.paused;
                }
            }
            _ if self.paused => {}
            Action::NewGame => {
                if phase == Phase::Over && self.engine.ready() {
                    self.new_game();
                }
            }
            Action::Up => self.cursor.1 = self.cursor.1.saturating_sub(1),
            Action::Down => self.cursor.1 = (self.cursor.1 + 1).min(self.config.rows - 1),
            Action::Left => self.cursor.0 = self.cursor.0.saturating_sub(1),
            Action::Right => self.cursor.0 = (self.cursor.0 + 1).min(self.config.columns - 1),
            Action::Select => self.click(self.cursor)?,
            Action::Cancel => self.engine.listener_mut().deselect(),
            Action::None => {}
        }
        Ok(())
    }

    /// First click selects; a second click swaps with an adjacent cell or drops the selection.
    fn click(&mut self, (column, row): (usize, usize)) -> Result<()> {
        let scene = self.engine.listener();
        if scene.phase != Phase::Playing || !scene.settled() || !self.engine.ready() {
            return Ok(());
        }
        let selected = scene.selected;
        match selected {
            None => self.engine.listener_mut().select(column, row),
            Some((sel_col, sel_row)) => {
                if self.engine.can_swap(sel_col, sel_row, column, row) {
                    let scene = self.engine.listener_mut();
                    scene.select(column, row);
                    // both sprites stay marked until swap_ok / swap_failed
                    scene.selected = None;
                    debug!("swap ({sel_col},{sel_row}) <-> ({column},{row})");
                    self.engine.swap(sel_col, sel_row, column, row)?;
                } else {
                    self.engine.listener_mut().deselect();
                }
            }
        }
        Ok(())
    }
}
