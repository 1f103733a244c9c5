/*
On-Screen Key Layout
====================

Grid geometry for drawing the piano and mapping a click back to a key.
White keys sit side by side at full height; black keys straddle the
boundary after the white key they follow, over the top 3/5:

  ┌──┬─┬┬─┬──┬──┬─┬┬─┬┬─┬──┬──┐
  │  │w││e│  │  │t││y││u│  │  │
  │  └┬┘└┬┘  │  └┬┘└┬┘└┬┘  │  │
  │ a │ s │ d│ f │ g │ h │ j│ k│
  └───┴───┴──┴───┴───┴───┴──┴──┘

Coordinates are character cells, so a host can draw with any toolkit.
*/

use crate::io::{
    input::KeyElement,
    keymap::{Binding, PIANO_LAYOUT},
};

/// Axis-aligned cell rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl KeyRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && (column - self.x) < self.width
            && row >= self.y
            && (row - self.y) < self.height
    }

    /// The part of `self` inside `bounds` (empty when they do not overlap).
    pub fn clip(&self, bounds: &KeyRect) -> KeyRect {
        let x = self.x.max(bounds.x);
        let y = self.y.max(bounds.y);
        let right = self
            .x
            .saturating_add(self.width)
            .min(bounds.x.saturating_add(bounds.width));
        let bottom = self
            .y
            .saturating_add(self.height)
            .min(bounds.y.saturating_add(bounds.height));
        KeyRect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

/// One laid-out key and what it plays.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyArea {
    pub rect: KeyRect,
    pub key: &'static str,
    pub binding: Binding,
    pub black: bool,
}

impl KeyArea {
    /// The element a pointer press on this key reports. The shifted top key
    /// carries its own octave, the others follow the default.
    pub fn element(&self, default_octave: i32) -> KeyElement {
        let element = KeyElement::new(self.key, self.binding.note.name());
        match self.binding.octave_offset {
            Some(_) => element.with_octave(self.binding.octave(default_octave)),
            None => element,
        }
    }
}

/// Lay the piano keys out inside `area`.
pub fn layout_keys(area: KeyRect) -> Vec<KeyArea> {
    let whites = PIANO_LAYOUT
        .iter()
        .filter(|(_, b)| !b.note.is_sharp())
        .count() as u16;
    let white_w = (area.width / whites.max(1)).max(3);
    let black_w = (white_w * 2 / 3).max(1);
    let black_h = (area.height * 3 / 5).max(1);

    let mut keys = Vec::with_capacity(PIANO_LAYOUT.len());
    let mut white_index = 0u16;
    for (key, binding) in PIANO_LAYOUT {
        let black = binding.note.is_sharp();
        let left = area.x.saturating_add(white_index.saturating_mul(white_w));
        let rect = if black {
            KeyRect::new(left.saturating_sub(black_w / 2), area.y, black_w, black_h)
        } else {
            white_index += 1;
            KeyRect::new(left, area.y, white_w, area.height)
        };
        keys.push(KeyArea {
            rect: rect.clip(&area),
            key,
            binding,
            black,
        });
    }
    keys
}

/// Key under the cell at (`column`, `row`); black keys win over white.
pub fn hit_test(keys: &[KeyArea], column: u16, row: u16) -> Option<&KeyArea> {
    let inside = |k: &&KeyArea| k.rect.contains(column, row);
    keys.iter()
        .filter(|k| k.black)
        .find(inside)
        .or_else(|| keys.iter().filter(|k| !k.black).find(inside))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> Vec<KeyArea> {
        layout_keys(KeyRect::new(0, 0, 80, 10))
    }

    fn key<'a>(keys: &'a [KeyArea], name: &str) -> &'a KeyArea {
        keys.iter().find(|k| k.key == name).unwrap()
    }

    #[test]
    fn lays_out_every_piano_key() {
        let keys = keys();
        assert_eq!(keys.len(), 13);
        assert_eq!(keys.iter().filter(|k| k.black).count(), 5);
        assert_eq!(key(&keys, "a").rect, KeyRect::new(0, 0, 10, 10));
        assert_eq!(key(&keys, "k").rect, KeyRect::new(70, 0, 10, 10));
    }

    #[test]
    fn black_keys_take_priority() {
        let keys = keys();
        let black = key(&keys, "w");
        assert_eq!(hit_test(&keys, black.rect.x, black.rect.y).unwrap().key, "w");

        // Below the black keys the white key underneath is hit.
        let right_edge = black.rect.x + black.rect.width - 1;
        assert_eq!(hit_test(&keys, right_edge, 9).unwrap().key, "s");
        assert_eq!(hit_test(&keys, 0, 9).unwrap().key, "a");
    }

    #[test]
    fn misses_outside_the_keyboard() {
        let keys = keys();
        assert!(hit_test(&keys, 80, 0).is_none());
        assert!(hit_test(&keys, 0, 10).is_none());
    }

    #[test]
    fn top_key_reports_its_own_octave() {
        let keys = keys();
        assert_eq!(key(&keys, "k").element(4).octave, Some(5));
        assert_eq!(key(&keys, "a").element(4).octave, None);
        assert_eq!(key(&keys, "w").element(4).note.as_deref(), Some("C#"));
    }

    #[test]
    fn keys_are_clipped_to_narrow_areas() {
        let area = KeyRect::new(2, 1, 12, 4);
        for k in layout_keys(area) {
            assert_eq!(k.rect.clip(&area), k.rect);
        }
    }
}
