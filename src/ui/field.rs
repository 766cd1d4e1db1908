use std::collections::{HashMap, HashSet};

use ratatui::prelude::*;

use rustgalaga::sim::hooks::{Renderer, Sprite, SpriteKind};
use rustgalaga::sim::ship::{EnemyLevel, EntityId, Frame as ShipFrame};
use rustgalaga::GameType;

const EXPLOSION_FRAME_MS: u64 = 100;
const EXPLOSION_FRAMES: u64 = 3;

type DotMap = HashMap<(usize, usize), u8>;

// Sprite shapes, in braille dots relative to the sprite centre.
const PLAYER: &[(i32, i32)] = &[
    (0,-3),
    (0,-2),
    (-1,-1),(0,-1),(1,-1),
    (-3,0),(-1,0),(0,0),(1,0),(3,0),
    (-3,1),(-2,1),(-1,1),(0,1),(1,1),(2,1),(3,1),
    (-3,2),(-1,2),(1,2),(3,2),
];
const BEE: &[(i32, i32)] = &[
    (0,-1),
    (-1,0),(0,0),(1,0),
    (-2,1),(-1,1),(1,1),(2,1),
];
const BUTTERFLY: &[(i32, i32)] = &[
    (-2,-1),(0,-1),(2,-1),
    (-2,0),(-1,0),(0,0),(1,0),(2,0),
    (-1,1),(1,1),
];
const BOSS_A: &[(i32, i32)] = &[
    (-1,-2),(0,-2),(1,-2),
    (-2,-1),(0,-1),(2,-1),
    (-3,0),(-2,0),(-1,0),(0,0),(1,0),(2,0),(3,0),
    (-3,1),(3,1),
];
const BOSS_B: &[(i32, i32)] = &[
    (-1,-2),(0,-2),(1,-2),
    (-2,-1),(0,-1),(2,-1),
    (-3,0),(-2,0),(-1,0),(0,0),(1,0),(2,0),(3,0),
    (-2,1),(2,1),
];
const FLAGSHIP_A: &[(i32, i32)] = &[
    (0,-2),
    (-2,-1),(-1,-1),(0,-1),(1,-1),(2,-1),
    (-3,0),(-1,0),(1,0),(3,0),
    (-2,1),(0,1),(2,1),
    (-3,2),(3,2),
];
const FLAGSHIP_B: &[(i32, i32)] = &[
    (0,-2),
    (-2,-1),(-1,-1),(0,-1),(1,-1),(2,-1),
    (-3,0),(-1,0),(1,0),(3,0),
    (-2,1),(0,1),(2,1),
    (-2,2),(2,2),
];
const SAUCER: &[(i32, i32)] = &[
    (-1,-1),(0,-1),(1,-1),
    (-3,0),(-2,0),(-1,0),(0,0),(1,0),(2,0),(3,0),
    (-4,1),(-2,1),(0,1),(2,1),(4,1),
];
const EXPLOSION: [&[(i32, i32)]; 3] = [
    &[(0,-1),(-1,0),(0,0),(1,0),(0,1)],
    &[(-1,-2),(1,-2),(-2,-1),(2,-1),(-2,1),(2,1),(-1,2),(1,2)],
    &[(-3,-3),(0,-3),(3,-3),(-3,0),(3,0),(-3,3),(0,3),(3,3)],
];

/// Colours for one theme.
pub struct Palette {
    pub bg: Color,
    pub player: Color,
    pub enemies: [Color; 4],
    pub bonus: Color,
    pub player_bullet: Color,
    pub enemy_bullet: Color,
    pub explosion: [Color; 3],
}

impl Palette {
    pub fn for_game(game_type: GameType) -> Self {
        match game_type {
            GameType::Original => Palette {
                bg: Color::Rgb(0, 0, 5),
                player: Color::Rgb(230, 230, 255),
                enemies: [
                    Color::Rgb(80, 160, 255),
                    Color::Rgb(255, 80, 80),
                    Color::Rgb(80, 255, 150),
                    Color::Rgb(200, 120, 255),
                ],
                bonus: Color::Rgb(255, 220, 80),
                player_bullet: Color::Rgb(255, 255, 200),
                enemy_bullet: Color::Rgb(255, 100, 100),
                explosion: [
                    Color::Rgb(255, 255, 200),
                    Color::Rgb(255, 160, 60),
                    Color::Rgb(160, 60, 30),
                ],
            },
            GameType::Holiday => Palette {
                bg: Color::Rgb(5, 10, 20),
                player: Color::Rgb(255, 60, 60),
                enemies: [
                    Color::Rgb(60, 200, 90),
                    Color::Rgb(240, 240, 255),
                    Color::Rgb(255, 215, 0),
                    Color::Rgb(30, 150, 60),
                ],
                bonus: Color::Rgb(255, 60, 60),
                player_bullet: Color::Rgb(255, 255, 255),
                enemy_bullet: Color::Rgb(120, 220, 255),
                explosion: [
                    Color::Rgb(255, 255, 255),
                    Color::Rgb(200, 230, 255),
                    Color::Rgb(100, 140, 200),
                ],
            },
        }
    }

    fn enemy(&self, level: EnemyLevel) -> Color {
        self.enemies[(level.value() as usize).saturating_sub(1).min(3)]
    }
}

struct Explosion {
    sprite: Sprite,
    born_ms: u64,
}

/// Terminal renderer: collects what the session places each frame and
/// draws it as braille dots scaled from canvas units.
pub struct BrailleCanvas {
    width: f32,
    height: f32,
    placed: Vec<Sprite>,
    hidden: HashSet<EntityId>,
    explosions: Vec<Explosion>,
    now_ms: u64,
    palette: Palette,
}

impl BrailleCanvas {
    pub fn new(width: f32, height: f32, game_type: GameType) -> Self {
        Self {
            width,
            height,
            placed: Vec::new(),
            hidden: HashSet::new(),
            explosions: Vec::new(),
            now_ms: 0,
            palette: Palette::for_game(game_type),
        }
    }

    pub fn reset(&mut self, game_type: GameType) {
        self.placed.clear();
        self.hidden.clear();
        self.explosions.clear();
        self.now_ms = 0;
        self.palette = Palette::for_game(game_type);
    }

    /// Forget the last frame's placements and age out finished explosions.
    pub fn begin_frame(&mut self, now_ms: u64) {
        self.placed.clear();
        self.hidden.clear();
        self.now_ms = now_ms;
        self.explosions
            .retain(|e| now_ms.saturating_sub(e.born_ms) < EXPLOSION_FRAME_MS * EXPLOSION_FRAMES);
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    // ── Braille rendering ──────────────────────────────────────────────

    fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (0, 3) => 0x40,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    fn set_dot(map: &mut DotMap, bx: i32, by: i32, bw: i32, bh: i32) {
        if bx < 0 || by < 0 || bx >= bw || by >= bh { return; }
        let (bx, by) = (bx as usize, by as usize);
        *map.entry((bx / 2, by / 4)).or_insert(0) |= Self::braille_bit(bx % 2, by % 4);
    }

    fn stamp(map: &mut DotMap, pixels: &[(i32, i32)], cx: i32, cy: i32, bw: i32, bh: i32) {
        for &(dx, dy) in pixels {
            Self::set_dot(map, cx + dx, cy + dy, bw, bh);
        }
    }

    fn write_layer(grid: &mut [Vec<(char, Style)>], map: &DotMap, color: Color, bg: Color, bold: bool) {
        for (&(cx, cy), &bits) in map {
            let Some(cell) = grid.get_mut(cy).and_then(|row| row.get_mut(cx)) else { continue };
            if bits == 0 { continue; }
            let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
            let mut style = Style::default().fg(color).bg(bg);
            if bold { style = style.add_modifier(Modifier::BOLD); }
            *cell = (ch, style);
        }
    }

    fn sprite_layer(&self, sprite: &Sprite, bw: i32, bh: i32, bsx: f32, bsy: f32) -> (DotMap, Color, bool) {
        let mut map = DotMap::new();
        let c = sprite.bounds.center();
        let (cx, cy) = ((c.x * bsx) as i32, (c.y * bsy) as i32);
        let p = &self.palette;
        let (color, bold) = match sprite.kind {
            SpriteKind::Player => {
                Self::stamp(&mut map, PLAYER, cx, cy, bw, bh);
                (p.player, true)
            }
            SpriteKind::Enemy(level, frame) => {
                let shape = match (level, frame) {
                    (EnemyLevel::One, _) => BEE,
                    (EnemyLevel::Two, _) => BUTTERFLY,
                    (EnemyLevel::Three, ShipFrame::A) => BOSS_A,
                    (EnemyLevel::Three, ShipFrame::B) => BOSS_B,
                    (EnemyLevel::Four, ShipFrame::A) => FLAGSHIP_A,
                    (EnemyLevel::Four, ShipFrame::B) => FLAGSHIP_B,
                };
                Self::stamp(&mut map, shape, cx, cy, bw, bh);
                (p.enemy(level), false)
            }
            SpriteKind::Bonus => {
                Self::stamp(&mut map, SAUCER, cx, cy, bw, bh);
                (p.bonus, true)
            }
            SpriteKind::PlayerBullet => {
                for dy in -1..=1 {
                    Self::set_dot(&mut map, cx, cy + dy, bw, bh);
                }
                (p.player_bullet, true)
            }
            SpriteKind::EnemyBullet => {
                // Zigzag bolt shape
                let zigzag = if (self.now_ms / 64) % 2 == 0 {
                    [(0,-2),(1,-1),(0,0),(-1,1),(0,2)]
                } else {
                    [(0,-2),(-1,-1),(0,0),(1,1),(0,2)]
                };
                Self::stamp(&mut map, &zigzag, cx, cy, bw, bh);
                (p.enemy_bullet, true)
            }
        };
        (map, color, bold)
    }

    /// Draw the field into `width` x `height` terminal cells.
    pub fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let (w, h) = (width, height);
        let bw = (w * 2) as i32;
        let bh = (h * 4) as i32;
        let bsx = bw as f32 / self.width;
        let bsy = bh as f32 / self.height;

        let bg = self.palette.bg;
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(bg)); w]; h];

        for sprite in &self.placed {
            if self.hidden.contains(&sprite.id) { continue; }
            let (map, color, bold) = self.sprite_layer(sprite, bw, bh, bsx, bsy);
            Self::write_layer(&mut grid, &map, color, bg, bold);
        }

        for explosion in &self.explosions {
            let age = self.now_ms.saturating_sub(explosion.born_ms) / EXPLOSION_FRAME_MS;
            let frame = (age as usize).min(EXPLOSION.len() - 1);
            let c = explosion.sprite.bounds.center();
            let mut map = DotMap::new();
            Self::stamp(&mut map, EXPLOSION[frame], (c.x * bsx) as i32, (c.y * bsy) as i32, bw, bh);
            Self::write_layer(&mut grid, &map, self.palette.explosion[frame], bg, true);
        }

        grid.into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Renderer for BrailleCanvas {
    fn place(&mut self, sprite: &Sprite, x: f32, y: f32) {
        let mut placed = *sprite;
        let (dx, dy) = (x - placed.bounds.left, y - placed.bounds.top);
        placed.bounds.left += dx;
        placed.bounds.right += dx;
        placed.bounds.top += dy;
        placed.bounds.bottom += dy;
        self.placed.push(placed);
    }

    fn remove(&mut self, sprite: &Sprite, explode: bool) {
        let is_ship = matches!(
            sprite.kind,
            SpriteKind::Player | SpriteKind::Enemy(..) | SpriteKind::Bonus
        );
        if explode && is_ship {
            self.explosions.push(Explosion {
                sprite: *sprite,
                born_ms: self.now_ms,
            });
        }
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        if visible {
            self.hidden.remove(&id);
        } else {
            self.hidden.insert(id);
        }
    }
}
