// Purpose - host-facing interfaces: input events, key bindings, display surface

pub mod input;
pub mod keymap;
pub mod layout;
pub mod surface;

pub use input::{Command, InputEvent, InputRouter, KeyElement};
pub use keymap::{Binding, KeyBinding, PIANO_LAYOUT};
pub use layout::{hit_test, layout_keys, KeyArea, KeyRect};
pub use surface::{NullSurface, Surface};
