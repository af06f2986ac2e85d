//! Font catalog and font selection
//!
//! Each font is a precompiled glyph table. Selecting a font links its table
//! into the firmware image; leaving it out only removes that font. Which
//! tables can be linked at all is decided by cargo features (`font-glcd`,
//! `font-2`, ...), see [`FontSet::COMPILED`].

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fonts in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontId {
    /// Font 1, original Adafruit 8 pixel font
    Glcd,
    /// Font 2, small 16 pixel font
    Font2,
    /// Font 4, medium 26 pixel font
    Font4,
    /// Font 6, large 48 pixel font (digits only)
    Font6,
    /// Font 7, 7-segment 48 pixel font (digits only)
    Font7,
    /// Font 8, large 75 pixel font (digits only)
    Font8,
    /// The 48 Adafruit_GFX free fonts FF1 to FF48
    Gfxff,
}

impl FontId {
    pub const ALL: [FontId; 7] = [
        FontId::Glcd,
        FontId::Font2,
        FontId::Font4,
        FontId::Font6,
        FontId::Font7,
        FontId::Font8,
        FontId::Gfxff,
    ];

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Key used in TOML setup files
    pub const fn key(self) -> &'static str {
        match self {
            FontId::Glcd => "glcd",
            FontId::Font2 => "font2",
            FontId::Font4 => "font4",
            FontId::Font6 => "font6",
            FontId::Font7 => "font7",
            FontId::Font8 => "font8",
            FontId::Gfxff => "gfxff",
        }
    }

    /// Preprocessor define loading this font in setup headers
    pub const fn define(self) -> &'static str {
        match self {
            FontId::Glcd => "LOAD_GLCD",
            FontId::Font2 => "LOAD_FONT2",
            FontId::Font4 => "LOAD_FONT4",
            FontId::Font6 => "LOAD_FONT6",
            FontId::Font7 => "LOAD_FONT7",
            FontId::Font8 => "LOAD_FONT8",
            FontId::Gfxff => "LOAD_GFXFF",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    pub fn from_define(define: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.define() == define)
    }

    /// Glyph height in pixels, `None` for the free font family
    pub const fn height_px(self) -> Option<u8> {
        match self {
            FontId::Glcd => Some(8),
            FontId::Font2 => Some(16),
            FontId::Font4 => Some(26),
            FontId::Font6 | FontId::Font7 => Some(48),
            FontId::Font8 => Some(75),
            FontId::Gfxff => None,
        }
    }

    /// Approximate FLASH bytes taken by the glyph table
    ///
    /// The free fonts are only linked when referenced, so they count as zero.
    pub const fn flash_bytes(self) -> u32 {
        match self {
            FontId::Glcd => 1820,
            FontId::Font2 => 3534,
            FontId::Font4 => 5848,
            FontId::Font6 => 2666,
            FontId::Font7 => 2438,
            FontId::Font8 => 3256,
            FontId::Gfxff => 0,
        }
    }

    /// Short description for generated headers
    pub const fn description(self) -> &'static str {
        match self {
            FontId::Glcd => "Font 1. Original Adafruit 8 pixel font",
            FontId::Font2 => "Font 2. Small 16 pixel high font",
            FontId::Font4 => "Font 4. Medium 26 pixel high font",
            FontId::Font6 => "Font 6. Large 48 pixel font",
            FontId::Font7 => "Font 7. 7 segment 48 pixel font",
            FontId::Font8 => "Font 8. Large 75 pixel font",
            FontId::Gfxff => "FreeFonts. Adafruit_GFX free fonts FF1 to FF48",
        }
    }

    /// Whether this crate was built with the glyph table available
    pub const fn is_compiled(self) -> bool {
        FontSet::COMPILED.contains(self)
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.define())
    }
}

/// Set of fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontSet(u8);

impl FontSet {
    pub const EMPTY: Self = Self(0);

    /// Every font in the catalog
    pub const ALL: Self = Self::EMPTY
        .with(FontId::Glcd)
        .with(FontId::Font2)
        .with(FontId::Font4)
        .with(FontId::Font6)
        .with(FontId::Font7)
        .with(FontId::Font8)
        .with(FontId::Gfxff);

    /// Fonts whose glyph tables were enabled at compile time
    pub const COMPILED: Self = Self::EMPTY
        .with_if(FontId::Glcd, cfg!(feature = "font-glcd"))
        .with_if(FontId::Font2, cfg!(feature = "font-2"))
        .with_if(FontId::Font4, cfg!(feature = "font-4"))
        .with_if(FontId::Font6, cfg!(feature = "font-6"))
        .with_if(FontId::Font7, cfg!(feature = "font-7"))
        .with_if(FontId::Font8, cfg!(feature = "font-8"))
        .with_if(FontId::Gfxff, cfg!(feature = "font-gfxff"));

    /// Whether the smooth (anti-aliased) font path was compiled in
    pub const SMOOTH_COMPILED: bool = cfg!(feature = "smooth-font");

    /// Add a font
    pub const fn with(self, font: FontId) -> Self {
        Self(self.0 | font.bit())
    }

    const fn with_if(self, font: FontId, enabled: bool) -> Self {
        if enabled {
            self.with(font)
        } else {
            self
        }
    }

    pub fn insert(&mut self, font: FontId) {
        self.0 |= font.bit();
    }

    pub fn remove(&mut self, font: FontId) {
        self.0 &= !font.bit();
    }

    pub const fn contains(&self, font: FontId) -> bool {
        self.0 & font.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Fonts in this set that are not in `other`
    pub const fn difference(&self, other: FontSet) -> FontSet {
        FontSet(self.0 & !other.0)
    }

    /// Iterate over fonts in catalog order
    ///
    /// The iterator owns a copy of the set.
    pub fn iter(self) -> impl Iterator<Item = FontId> {
        FontId::ALL.into_iter().filter(move |&f| self.contains(f))
    }

    /// Approximate FLASH bytes taken by all selected glyph tables
    pub fn flash_footprint(&self) -> u32 {
        self.iter().map(FontId::flash_bytes).sum()
    }
}

impl FromIterator<FontId> for FontSet {
    fn from_iter<I: IntoIterator<Item = FontId>>(iter: I) -> Self {
        let mut set = FontSet::EMPTY;
        for font in iter {
            set.insert(font);
        }
        set
    }
}
