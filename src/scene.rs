//! Scene: the animated picture of the board, driven by engine notifications.
//!
//! One sprite per cell, stored row-major like the grid. Sprites slide back to
//! their cell (`offset` → 0) after swaps, falls and refills, and spin for a
//! while before vanishing when deleted. The app only steps the engine once
//! [`Scene::settled`] holds, so cascades play at a watchable pace.

use minertui::{ChangeEvent, Color, Grid, Listener, Target};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Swap slide speed, cells per second.
const SWAP_SPEED: f32 = 4.0;
/// Fall acceleration, cells per second squared.
const GRAVITY: f32 = 24.0;
/// Spin time before a deleted jewel disappears.
pub const EXPLODE_SECS: f32 = 0.6;
/// Spin speed while exploding, frames per second.
const SPIN_FPS: f32 = 12.0;
/// Points per jewel that enters the board after a match.
pub const POINTS_PER_JEWEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first `ready` of a new board (initial matches clear first).
    Settling,
    Playing,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub color: Color,
    /// Distance to its cell in cell units (columns, rows).
    pub offset: (f32, f32),
    speed: f32,
    accel: f32,
    pub selected: bool,
    /// Remaining spin time while exploding.
    exploding: Option<f32>,
    /// Spin angle, in animation frames.
    pub spin: f32,
}

impl Sprite {
    fn new(color: Color) -> Self {
        Self {
            color,
            offset: (0.0, 0.0),
            speed: 0.0,
            accel: 0.0,
            selected: false,
            exploding: None,
            spin: 0.0,
        }
    }

    fn move_from(&mut self, offset: (f32, f32), speed: f32, accel: f32) {
        self.offset = offset;
        self.speed = speed;
        self.accel = accel;
    }

    pub fn is_exploding(&self) -> bool {
        self.exploding.is_some()
    }

    /// Not moving and not exploding.
    pub fn stopped(&self) -> bool {
        self.offset == (0.0, 0.0) && self.exploding.is_none()
    }

    fn update(&mut self, dt: f32, spin_dir: f32) {
        if self.offset != (0.0, 0.0) {
            self.speed += self.accel * dt;
            let step = self.speed * dt;
            let (dx, dy) = self.offset;
            let dist = (dx * dx + dy * dy).sqrt();
            if step >= dist {
                self.offset = (0.0, 0.0);
                self.speed = 0.0;
                self.accel = 0.0;
            } else {
                let k = (dist - step) / dist;
                self.offset = (dx * k, dy * k);
            }
        }
        if let Some(left) = self.exploding {
            self.spin += spin_dir * SPIN_FPS * dt;
            let left = left - dt;
            if left <= 0.0 {
                self.exploding = None;
                self.color = Color::None;
                self.spin = 0.0;
            } else {
                self.exploding = Some(left);
            }
        }
    }

    fn finish(&mut self) {
        self.offset = (0.0, 0.0);
        self.speed = 0.0;
        self.accel = 0.0;
        if self.exploding.take().is_some() {
            self.color = Color::None;
            self.spin = 0.0;
        }
    }
}

#[derive(Debug)]
pub struct Scene {
    columns: usize,
    rows: usize,
    sprites: Vec<Sprite>,
    /// +1 or -1, picked again after every refill.
    spin_dir: f32,
    pub score: u32,
    pub phase: Phase,
    time_limit: f32,
    time_remaining: f32,
    /// Cell picked as the first half of a swap.
    pub selected: Option<(usize, usize)>,
    /// Skip animations: everything lands on the next update.
    instant: bool,
    rng: SmallRng,
}

impl Scene {
    pub fn new(columns: usize, rows: usize, time_limit_secs: u32, instant: bool) -> Self {
        Self {
            columns,
            rows,
            sprites: vec![Sprite::new(Color::None); columns * rows],
            spin_dir: 1.0,
            score: 0,
            phase: Phase::Settling,
            time_limit: time_limit_secs as f32,
            time_remaining: time_limit_secs as f32,
            selected: None,
            instant,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Rebuild every sprite from the grid (new board) and reset the game.
    pub fn acquire(&mut self, grid: &Grid) {
        self.columns = grid.columns();
        self.rows = grid.rows();
        self.sprites = grid.iter().map(|t| Sprite::new(t.color())).collect();
        self.score = 0;
        self.phase = Phase::Settling;
        self.time_remaining = self.time_limit;
        self.selected = None;
    }

    #[inline]
    fn idx(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn sprite(&self, column: usize, row: usize) -> Option<&Sprite> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.sprites.get(self.idx(column, row))
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn time_limit(&self) -> f32 {
        self.time_limit
    }

    /// Cells currently spinning towards deletion.
    pub fn exploding_cells(&self) -> Vec<(usize, usize)> {
        self.sprites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_exploding())
            .map(|(i, _)| (i % self.columns, i / self.columns))
            .collect()
    }

    /// All sprites are at rest; the engine may advance.
    pub fn settled(&self) -> bool {
        self.sprites.iter().all(Sprite::stopped)
    }

    /// Advance clock and animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.phase == Phase::Playing {
            self.time_remaining -= dt;
            if self.time_remaining <= 0.0 {
                self.time_remaining = 0.0;
                self.phase = Phase::Over;
                self.selected = None;
            }
        }
        let spin_dir = self.spin_dir;
        for sprite in &mut self.sprites {
            if self.instant {
                sprite.finish();
            } else {
                sprite.update(dt, spin_dir);
            }
        }
    }

    pub fn select(&mut self, column: usize, row: usize) {
        let i = self.idx(column, row);
        if let Some(s) = self.sprites.get_mut(i) {
            s.selected = true;
        }
        self.selected = Some((column, row));
    }

    fn deselect_cell(&mut self, column: usize, row: usize) {
        let i = self.idx(column, row);
        if let Some(s) = self.sprites.get_mut(i) {
            s.selected = false;
        }
    }

    /// Drop the current selection, if any.
    pub fn deselect(&mut self) {
        if let Some((c, r)) = self.selected.take() {
            self.deselect_cell(c, r);
        }
    }

    /// Exchange two sprites and slide both into their new cells.
    fn swap_sprites(&mut self, col1: usize, row1: usize, col2: usize, row2: usize, speed: f32, accel: f32) {
        let (a, b) = (self.idx(col1, row1), self.idx(col2, row2));
        if a >= self.sprites.len() || b >= self.sprites.len() {
            return;
        }
        self.sprites.swap(a, b);
        let dx = col2 as f32 - col1 as f32;
        let dy = row2 as f32 - row1 as f32;
        // a now holds the sprite that sat at (col2, row2)
        self.sprites[a].move_from((dx, dy), speed, accel);
        self.sprites[b].move_from((-dx, -dy), speed, accel);
    }
}

impl Listener for Scene {
    fn swapped(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.swap_sprites(col1, row1, col2, row2, SWAP_SPEED, 0.0);
    }

    fn swap_ok(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.deselect_cell(col1, row1);
        self.deselect_cell(col2, row2);
    }

    fn swap_failed(&mut self, col1: usize, row1: usize, col2: usize, row2: usize) {
        self.deselect_cell(col1, row1);
        self.deselect_cell(col2, row2);
        self.swap_sprites(col1, row1, col2, row2, SWAP_SPEED, 0.0);
    }

    fn ready(&mut self) {
        if self.phase == Phase::Settling {
            self.phase = Phase::Playing;
        }
    }

    fn insertion(&mut self, event: &ChangeEvent) {
        if self.phase == Phase::Playing {
            self.score += event.size() as u32 * POINTS_PER_JEWEL;
        }
    }

    fn cycle_finished(&mut self) {
        self.spin_dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    }

    fn fall(&mut self, column: usize, row: usize, gaps: usize) {
        self.swap_sprites(column, row, column, row + gaps, 0.0, GRAVITY);
    }

    fn new(&mut self, column: usize, row: usize, color: Color, total_gaps: usize) {
        let i = self.idx(column, row);
        if let Some(s) = self.sprites.get_mut(i) {
            *s = Sprite::new(color);
            s.move_from((0.0, -(total_gaps as f32)), 0.0, GRAVITY);
        }
    }

    fn delete(&mut self, target: Target, line: usize, pos: usize) {
        let (column, row) = match target {
            Target::Column => (line, pos),
            Target::Row => (pos, line),
        };
        let i = self.idx(column, row);
        if let Some(s) = self.sprites.get_mut(i) {
            if !s.is_exploding() {
                s.exploding = Some(EXPLODE_SECS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minertui::{Engine, EngineConfig};

    fn run_until_settled(scene: &mut Scene) {
        for _ in 0..1000 {
            if scene.settled() {
                return;
            }
            scene.update(0.05);
        }
        panic!("scene never settled");
    }

    #[test]
    fn test_swap_slides_back_into_place() {
        let mut scene = Scene::new(2, 1, 60, false);
        scene.sprites[0].color = Color::Red;
        scene.sprites[1].color = Color::Blue;
        scene.swapped(0, 0, 1, 0);
        assert!(!scene.settled());
        assert_eq!(scene.sprite(0, 0).map(|s| s.color), Some(Color::Blue));
        assert_eq!(scene.sprite(0, 0).map(|s| s.offset), Some((1.0, 0.0)));
        run_until_settled(&mut scene);
        assert_eq!(scene.sprite(1, 0).map(|s| s.color), Some(Color::Red));
    }

    #[test]
    fn test_deleted_jewel_vanishes_after_spin() {
        let mut scene = Scene::new(1, 3, 60, false);
        scene.sprites[1].color = Color::Green;
        scene.delete(Target::Column, 0, 1);
        assert_eq!(scene.exploding_cells(), vec![(0, 1)]);
        run_until_settled(&mut scene);
        assert_eq!(scene.sprite(0, 1).map(|s| s.color), Some(Color::None));
    }

    #[test]
    fn test_new_jewel_drops_from_above() {
        let mut scene = Scene::new(1, 2, 60, false);
        Listener::new(&mut scene, 0, 0, Color::Yellow, 2);
        assert_eq!(scene.sprite(0, 0).map(|s| s.offset), Some((0.0, -2.0)));
        run_until_settled(&mut scene);
        assert_eq!(scene.sprite(0, 0).map(|s| s.color), Some(Color::Yellow));
    }

    #[test]
    fn test_instant_mode_settles_in_one_update() {
        let mut scene = Scene::new(1, 2, 60, true);
        Listener::new(&mut scene, 0, 0, Color::Yellow, 2);
        scene.delete(Target::Row, 1, 0);
        scene.update(0.0);
        assert!(scene.settled());
    }

    #[test]
    fn test_clock_starts_on_first_ready_and_ends_game() {
        let mut scene = Scene::new(1, 1, 1, true);
        scene.update(5.0);
        assert_eq!(scene.phase, Phase::Settling);
        scene.ready();
        assert_eq!(scene.phase, Phase::Playing);
        scene.update(0.5);
        assert_eq!(scene.phase, Phase::Playing);
        scene.update(0.6);
        assert_eq!(scene.phase, Phase::Over);
        assert_eq!(scene.time_remaining(), 0.0);
    }

    #[test]
    fn test_scene_mirrors_engine_after_cascades() {
        let mut engine =
            Engine::with_config(Grid::square(6).unwrap(), Scene::new(6, 6, 60, false), EngineConfig::with_seed(3))
                .unwrap();
        let (grid, scene) = engine.split();
        scene.acquire(grid);
        for _ in 0..10_000 {
            if engine.ready() && engine.listener().settled() {
                break;
            }
            engine.listener_mut().update(0.05);
            if engine.listener().settled() && !engine.ready() {
                engine.step();
            }
        }
        assert!(engine.ready());
        let grid = engine.grid();
        for row in 0..6 {
            for col in 0..6 {
                let sprite = engine.listener().sprite(col, row).map(|s| s.color);
                assert_eq!(sprite, grid.get(col, row).ok().map(|t| t.color()));
            }
        }
        assert_eq!(engine.listener().phase, Phase::Playing);
        // matches cleared before play starts do not score
        assert_eq!(engine.listener().score, 0);
    }
}
