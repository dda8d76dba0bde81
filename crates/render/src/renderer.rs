//! Renderer: composites a [`World`] into a [`FrameBuffer`].
//!
//! Layer order, back to front:
//!
//! 1. sky fill
//! 2. level tiles inside `[floor(camera_x), floor(camera_x) + W)`
//! 3. goal pole
//! 4. entities in creation order
//! 5. the player
//! 6. HUD (optional)
//! 7. debug overlay outlines (optional)
//!
//! Everything is clipped to the buffer; nothing wraps. A lost world is drawn as
//! the game-over screen instead.

use crate::core::{Aabb, World};
use crate::hud;
use crate::palette::{Palette, PaletteSlot};
use crate::types::{FrameBuffer, Outcome, PlayerState, Rgb, MATRIX_HEIGHT, MATRIX_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Draw lives and score
    pub hud: bool,
    /// Outline every bounding box after compositing
    pub debug_overlay: bool,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    palette: Palette,
    options: RenderOptions,
    width: u16,
    height: u16,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Palette::default(), RenderOptions::default())
    }
}

impl Renderer {
    /// Renderer for the reference matrix size.
    pub fn new(palette: Palette, options: RenderOptions) -> Self {
        Self {
            palette,
            options,
            width: MATRIX_WIDTH,
            height: MATRIX_HEIGHT,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn set_debug_overlay(&mut self, on: bool) {
        self.options.debug_overlay = on;
    }

    pub fn set_hud(&mut self, on: bool) {
        self.options.hud = on;
    }

    /// A fresh buffer of the renderer's size.
    pub fn new_frame(&self) -> FrameBuffer {
        FrameBuffer::new(self.width, self.height)
    }

    pub fn render(&self, world: &World) -> FrameBuffer {
        let mut fb = self.new_frame();
        self.render_into(world, &mut fb);
        fb
    }

    /// Render into an existing buffer, overwriting every pixel.
    pub fn render_into(&self, world: &World, fb: &mut FrameBuffer) {
        let palette = &self.palette;
        if world.outcome() == Outcome::Lost {
            hud::draw_game_over(fb, palette);
            return;
        }

        fb.fill(palette.get(PaletteSlot::Sky));
        let cam = world.camera_x().floor() as i32;

        self.draw_tiles(world, cam, fb);

        if let Some(goal) = world.level().goal() {
            let height = goal.bottom as i32 - goal.top as i32 + 1;
            fb.fill_rect(
                goal.x as i32 - cam,
                goal.top as i32,
                1,
                height,
                palette.get(PaletteSlot::Goal),
            );
        }

        for e in world.entities().iter().filter(|e| e.active) {
            let color = palette.get(PaletteSlot::for_entity(e.kind));
            fill_box(fb, &e.aabb(), cam, color);
        }

        let player = world.player();
        if player.state() != PlayerState::Dead {
            let flicker = player.is_invincible() && world.tick() % 2 == 1;
            let slot = if flicker {
                PaletteSlot::Flicker
            } else {
                PaletteSlot::for_player(player.state())
            };
            fill_box(fb, &player.body.aabb(), cam, palette.get(slot));
        }

        if self.options.hud {
            hud::draw_hud(fb, player.score(), player.lives(), palette);
        }

        if self.options.debug_overlay {
            let color = palette.get(PaletteSlot::Overlay);
            for e in world.entities().iter().filter(|e| e.active) {
                outline_box(fb, &e.aabb(), cam, color);
            }
            outline_box(fb, &player.body.aabb(), cam, color);
        }
    }

    fn draw_tiles(&self, world: &World, cam: i32, fb: &mut FrameBuffer) {
        let level = world.level();
        let ground = self.palette.get(PaletteSlot::Ground);
        let brick = self.palette.get(PaletteSlot::Brick);
        let rows = fb.height().min(level.height()) as i32;
        for y in 0..rows {
            for sx in 0..fb.width() as i32 {
                let color = match level.tile(cam + sx, y) {
                    crate::core::Tile::Ground => ground,
                    crate::core::Tile::Brick => brick,
                    crate::core::Tile::Empty => continue,
                };
                fb.set(sx, y, color);
            }
        }
    }
}

/// Pixel rectangle covered by `aabb` in screen space.
fn screen_rect(aabb: &Aabb, cam: i32) -> (i32, i32, i32, i32) {
    let x = aabb.x.floor() as i32 - cam;
    let y = aabb.y.floor() as i32;
    let w = aabb.w.round().max(1.0) as i32;
    let h = aabb.h.round().max(1.0) as i32;
    (x, y, w, h)
}

fn fill_box(fb: &mut FrameBuffer, aabb: &Aabb, cam: i32, color: Rgb) {
    let (x, y, w, h) = screen_rect(aabb, cam);
    fb.fill_rect(x, y, w, h, color);
}

fn outline_box(fb: &mut FrameBuffer, aabb: &Aabb, cam: i32, color: Rgb) {
    let (x, y, w, h) = screen_rect(aabb, cam);
    fb.outline_rect(x, y, w, h, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Level, PhysicsConfig, Tile};
    use crate::types::EntityKind;

    fn sky_world() -> World {
        let mut level = Level::empty(100, MATRIX_HEIGHT);
        level.set_player_spawn(5.0, 10.0);
        World::new(level, PhysicsConfig::default())
    }

    #[test]
    fn output_has_matrix_dimensions() {
        let fb = Renderer::default().render(&World::with_default_level(PhysicsConfig::default()));
        assert_eq!(fb.width(), MATRIX_WIDTH);
        assert_eq!(fb.height(), MATRIX_HEIGHT);
        assert_eq!(fb.pixels().len(), MATRIX_WIDTH as usize * MATRIX_HEIGHT as usize);
    }

    #[test]
    fn player_drawn_over_entities() {
        let mut world = sky_world();
        world.spawn(EntityKind::Coin, 5.0, 10.0);
        let r = Renderer::default();
        let fb = r.render(&world);
        let small = r.palette().get(PaletteSlot::PlayerSmall);
        assert_eq!(fb.get(5, 10), Some(small));
        assert_eq!(fb.get(6, 11), Some(small));
        assert_eq!(fb.get(7, 10), Some(r.palette().get(PaletteSlot::Sky)));
    }

    #[test]
    fn tiles_scroll_with_camera() {
        let mut level = Level::empty(100, MATRIX_HEIGHT);
        level.set_tile(50, 27, Tile::Brick);
        level.set_player_spawn(80.0, 0.0);
        let mut world = World::new(level, PhysicsConfig::default());
        let r = Renderer::default();

        world.set_camera_x(40.7);
        let fb = r.render(&world);
        assert_eq!(fb.get(10, 27), Some(r.palette().get(PaletteSlot::Brick)));
        assert_eq!(fb.get(11, 27), Some(r.palette().get(PaletteSlot::Sky)));
    }

    #[test]
    fn partially_visible_entity_is_clipped() {
        let mut world = sky_world();
        world.set_camera_x(0.0);
        world.spawn(EntityKind::Walker, -0.5, 3.0);
        world.spawn(EntityKind::Walker, 35.5, 3.0);
        let r = Renderer::default();
        let fb = r.render(&world);
        let walker = r.palette().get(PaletteSlot::Walker);
        assert_eq!(fb.get(0, 3), Some(r.palette().get(PaletteSlot::Sky)));
        assert_eq!(fb.get(35, 3), Some(walker));
    }

    #[test]
    fn invincible_player_flickers_on_odd_ticks() {
        let mut world = sky_world();
        world.player_mut().set_invincible(1.0);
        let r = Renderer::default();
        let even = r.render(&world);
        world.advance(1.0 / 30.0, &[]);
        let odd = r.render(&world);
        let (x, y) = (
            world.player().body.pos.x.floor() as i32,
            world.player().body.pos.y.floor() as i32,
        );
        assert_eq!(even.get(5, 10), Some(r.palette().get(PaletteSlot::PlayerSmall)));
        assert_eq!(odd.get(x, y), Some(r.palette().get(PaletteSlot::Flicker)));
    }

    #[test]
    fn overlay_outlines_player() {
        let mut level = Level::empty(100, MATRIX_HEIGHT);
        level.set_player_spawn(5.0, 10.0);
        let mut world = World::new(level, PhysicsConfig::default());
        world.player_mut().body.size.x = 3.0;
        world.player_mut().body.size.y = 3.0;
        let mut r = Renderer::default();
        r.set_debug_overlay(true);
        let fb = r.render(&world);
        let overlay = r.palette().get(PaletteSlot::Overlay);
        assert_eq!(fb.get(5, 10), Some(overlay));
        assert_eq!(fb.get(7, 12), Some(overlay));
        assert_eq!(fb.get(6, 11), Some(r.palette().get(PaletteSlot::PlayerSmall)));
    }

    #[test]
    fn lost_world_shows_game_over() {
        let mut world = sky_world();
        let cfg = *world.config();
        for _ in 0..3 {
            world.player_mut().kill(&cfg);
            for _ in 0..20 {
                world.advance(1.0 / 15.0, &[]);
            }
        }
        assert_eq!(world.outcome(), Outcome::Lost);
        let r = Renderer::default();
        let fb = r.render(&world);
        assert_eq!(fb.get(0, 0), Some(r.palette().get(PaletteSlot::GameOver)));
    }

    #[test]
    fn render_into_matches_render() {
        let world = World::with_default_level(PhysicsConfig::default());
        let r = Renderer::new(
            Palette::default(),
            RenderOptions {
                hud: true,
                debug_overlay: true,
            },
        );
        let mut fb = FrameBuffer::filled(MATRIX_WIDTH, MATRIX_HEIGHT, Rgb::WHITE);
        r.render_into(&world, &mut fb);
        assert_eq!(fb, r.render(&world));
    }
}
