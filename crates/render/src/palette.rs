//! Colors keyed by what is being drawn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{EntityKind, PlayerState, Rgb};

/// A named palette entry. Config files override entries by these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSlot {
    Sky,
    Ground,
    Brick,
    Coin,
    Walker,
    Chaser,
    Mushroom,
    FireFlower,
    Fireball,
    Goal,
    PlayerSmall,
    PlayerSuper,
    PlayerFire,
    PlayerDying,
    /// Alternate player color on odd ticks while invincible
    Flicker,
    /// Debug bounding boxes
    Overlay,
    HudScore,
    HudLives,
    GameOver,
    GameOverMark,
}

impl PaletteSlot {
    pub const COUNT: usize = 20;

    pub const ALL: [PaletteSlot; Self::COUNT] = [
        PaletteSlot::Sky,
        PaletteSlot::Ground,
        PaletteSlot::Brick,
        PaletteSlot::Coin,
        PaletteSlot::Walker,
        PaletteSlot::Chaser,
        PaletteSlot::Mushroom,
        PaletteSlot::FireFlower,
        PaletteSlot::Fireball,
        PaletteSlot::Goal,
        PaletteSlot::PlayerSmall,
        PaletteSlot::PlayerSuper,
        PaletteSlot::PlayerFire,
        PaletteSlot::PlayerDying,
        PaletteSlot::Flicker,
        PaletteSlot::Overlay,
        PaletteSlot::HudScore,
        PaletteSlot::HudLives,
        PaletteSlot::GameOver,
        PaletteSlot::GameOverMark,
    ];

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }

    pub fn for_entity(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Walker => PaletteSlot::Walker,
            EntityKind::Chaser => PaletteSlot::Chaser,
            EntityKind::Coin => PaletteSlot::Coin,
            EntityKind::Mushroom => PaletteSlot::Mushroom,
            EntityKind::FireFlower => PaletteSlot::FireFlower,
            EntityKind::Fireball => PaletteSlot::Fireball,
        }
    }

    pub fn for_player(state: PlayerState) -> Self {
        match state {
            PlayerState::Small => PaletteSlot::PlayerSmall,
            PlayerState::Super => PaletteSlot::PlayerSuper,
            PlayerState::Fire => PaletteSlot::PlayerFire,
            PlayerState::Dying | PlayerState::Dead => PaletteSlot::PlayerDying,
        }
    }
}

/// Palette overrides as they appear in config files.
pub type PaletteOverrides = BTreeMap<PaletteSlot, Rgb>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PaletteSlot::COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        let mut colors = [Rgb::BLACK; PaletteSlot::COUNT];
        for slot in PaletteSlot::ALL {
            colors[slot.index()] = default_color(slot);
        }
        Self { colors }
    }
}

fn default_color(slot: PaletteSlot) -> Rgb {
    match slot {
        PaletteSlot::Sky => Rgb::new(135, 206, 235),
        PaletteSlot::Ground => Rgb::new(139, 69, 19),
        PaletteSlot::Brick => Rgb::new(255, 165, 0),
        PaletteSlot::Coin => Rgb::new(255, 255, 0),
        PaletteSlot::Walker => Rgb::new(128, 0, 128),
        PaletteSlot::Chaser => Rgb::new(75, 0, 130),
        PaletteSlot::Mushroom => Rgb::new(255, 105, 180),
        PaletteSlot::FireFlower => Rgb::new(255, 69, 0),
        PaletteSlot::Fireball => Rgb::new(255, 215, 130),
        PaletteSlot::Goal => Rgb::new(0, 160, 0),
        PaletteSlot::PlayerSmall => Rgb::new(255, 0, 0),
        PaletteSlot::PlayerSuper => Rgb::new(200, 0, 40),
        PaletteSlot::PlayerFire => Rgb::new(255, 250, 240),
        PaletteSlot::PlayerDying => Rgb::new(90, 90, 90),
        PaletteSlot::Flicker => Rgb::WHITE,
        PaletteSlot::Overlay => Rgb::new(0, 255, 0),
        PaletteSlot::HudScore => Rgb::BLACK,
        PaletteSlot::HudLives => Rgb::new(255, 0, 0),
        PaletteSlot::GameOver => Rgb::new(64, 0, 0),
        PaletteSlot::GameOverMark => Rgb::BLACK,
    }
}

impl Palette {
    /// Default palette with `overrides` applied.
    pub fn with_overrides(overrides: &PaletteOverrides) -> Self {
        let mut palette = Self::default();
        palette.apply(overrides);
        palette
    }

    pub fn apply(&mut self, overrides: &PaletteOverrides) {
        for (&slot, &color) in overrides {
            self.set(slot, color);
        }
    }

    #[inline(always)]
    pub fn get(&self, slot: PaletteSlot) -> Rgb {
        self.colors[slot.index()]
    }

    pub fn set(&mut self, slot: PaletteSlot, color: Rgb) {
        self.colors[slot.index()] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_slot_in_index_order() {
        for (i, slot) in PaletteSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn overrides_replace_only_named_slots() {
        let mut overrides = PaletteOverrides::new();
        overrides.insert(PaletteSlot::Sky, Rgb::BLACK);
        let palette = Palette::with_overrides(&overrides);
        assert_eq!(palette.get(PaletteSlot::Sky), Rgb::BLACK);
        assert_eq!(palette.get(PaletteSlot::Ground), Rgb::new(139, 69, 19));
    }

    #[test]
    fn overrides_parse_from_json() {
        let overrides: PaletteOverrides =
            serde_json::from_str(r#"{"sky": [0, 0, 32], "player_fire": [255, 128, 0]}"#).unwrap();
        assert_eq!(overrides[&PaletteSlot::Sky], Rgb::new(0, 0, 32));
        assert_eq!(overrides[&PaletteSlot::PlayerFire], Rgb::new(255, 128, 0));
    }
}
