/// The display side of the piano: key highlights and the current-note label.
///
/// The engine only calls into it. A surface without a given key simply
/// ignores calls naming it.
pub trait Surface {
    fn set_pressed(&mut self, key: &str, pressed: bool);

    fn set_current_note(&mut self, label: &str);
}

/// Surface that displays nothing (headless use, benchmarks).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn set_pressed(&mut self, _key: &str, _pressed: bool) {}

    fn set_current_note(&mut self, _label: &str) {}
}
