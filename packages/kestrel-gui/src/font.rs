use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Horizontal pen advance in pixels.
    pub advance: f32,
}

/// Glyph metrics of a rasterized font.
///
/// Decoding font files is the job of the resource loader; the GUI only needs
/// advances, the ascender and the atlas texture the glyphs live in.
#[derive(Debug, Clone, Default)]
pub struct Font {
    ascender: f32,
    texture_id: u32,
    glyphs: FxHashMap<u32, Glyph>,
}

impl Font {
    pub fn new(ascender: f32, texture_id: u32) -> Self {
        Self {
            ascender,
            texture_id,
            glyphs: FxHashMap::default(),
        }
    }

    /// Every char of `chars` gets the same advance.
    pub fn monospace(
        ascender: f32,
        advance: f32,
        texture_id: u32,
        chars: impl IntoIterator<Item = char>,
    ) -> Self {
        let mut font = Self::new(ascender, texture_id);
        for c in chars {
            font.insert_glyph(c, Glyph { advance });
        }
        font
    }

    pub fn insert_glyph(&mut self, code: char, glyph: Glyph) {
        self.glyphs.insert(code as u32, glyph);
    }

    pub fn get_glyph(&self, code: char) -> Option<&Glyph> {
        self.glyphs.get(&(code as u32))
    }

    /// Advance of `code`, zero when the font has no glyph for it.
    pub fn advance(&self, code: char) -> f32 {
        self.get_glyph(code).map_or(0.0, |g| g.advance)
    }

    pub fn text_width(&self, text: impl IntoIterator<Item = char>) -> f32 {
        text.into_iter().map(|c| self.advance(c)).sum()
    }

    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    pub fn texture_id(&self) -> u32 {
        self.texture_id
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
