use ab_glyph::{Font, FontArc, FontVec, PxScale};
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{AnnotatorError, Result};

pub const DEFAULT_FONT: &str = "Sans 12";
const DEFAULT_SIZE: f32 = 12.0;
pub const MIN_FONT_SIZE: f32 = 6.0;
pub const MAX_FONT_SIZE: f32 = 96.0;

const PROPORTIONAL_FACE: &str = "Ubuntu-Light";
const MONOSPACE_FACE: &str = "Hack";

/// Words that describe a style rather than a family in a descriptor
/// such as `"DejaVu Sans Bold Italic 14"`.
const STYLE_WORDS: &[&str] = &[
    "bold", "italic", "oblique", "light", "medium", "regular", "normal", "book", "thin",
    "heavy", "black", "condensed", "semi-bold", "ultra-bold", "ultra-light", "semi-light",
];

/// A font descriptor: family name plus size in pixels per em.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::parse(DEFAULT_FONT)
    }
}

impl FontSpec {
    /// Sizes are kept within [`MIN_FONT_SIZE`]..=[`MAX_FONT_SIZE`]; a
    /// non-positive or non-finite size becomes 12.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_SIZE
        };
        Self { family: family.into(), size }
    }

    /// Parse a descriptor of the form `"<family> [style...] [size]"`.
    ///
    /// Style words are dropped, a missing or non-positive size falls back to
    /// 12 and an empty family becomes `"Sans"`.
    pub fn parse(descriptor: &str) -> Self {
        let mut words: Vec<&str> = descriptor.split_whitespace().collect();

        let mut size = DEFAULT_SIZE;
        if let Some(last) = words.last() {
            if let Ok(value) = last.trim_end_matches("px").parse::<f32>() {
                words.pop();
                size = value;
            }
        }

        while let Some(last) = words.last() {
            if STYLE_WORDS.contains(&last.to_lowercase().as_str()) {
                words.pop();
            } else {
                break;
            }
        }

        let family = if words.is_empty() {
            "Sans".to_owned()
        } else {
            words.join(" ")
        };

        Self::new(family, size)
    }

    pub fn is_monospace(&self) -> bool {
        let family = self.family.to_lowercase();
        ["mono", "courier", "hack"].iter().any(|needle| family.contains(needle))
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size.fract() == 0.0 {
            write!(f, "{} {}", self.family, self.size as u32)
        } else {
            write!(f, "{} {}", self.family, self.size)
        }
    }
}

/// A resolved font at a concrete size, ready to rasterize text.
#[derive(Clone)]
pub struct TextFace {
    font: FontArc,
    size: f32,
}

impl fmt::Debug for TextFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFace")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl TextFace {
    pub fn new(font: FontArc, size: f32) -> Self {
        Self { font, size }
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Glyph scale for which one em spans `size` pixels.
    pub fn scale(&self) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(self.size * self.font.height_unscaled() / units_per_em)
    }
}

/// Resolves font descriptors to loaded faces and keeps them around.
///
/// Families are looked up among the installed fonts, falling back to the
/// faces bundled with egui. A configured font file is used for every family.
#[derive(Default)]
pub struct FontBook {
    font_file: Option<PathBuf>,
    cache: HashMap<String, FontArc>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("font_file", &self.font_file)
            .field("cached", &self.cache.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FontBook {
    pub fn new(font_file: Option<PathBuf>) -> Self {
        Self {
            font_file,
            cache: HashMap::new(),
        }
    }

    pub fn face(&mut self, spec: &FontSpec) -> Result<TextFace> {
        let key = match &self.font_file {
            Some(path) => path.display().to_string(),
            None => spec.family.to_lowercase(),
        };

        if let Some(font) = self.cache.get(&key) {
            return Ok(TextFace::new(font.clone(), spec.size));
        }

        let (bytes, index) = self.face_data(spec)?;
        let font = FontVec::try_from_vec_and_index(bytes, index)
            .map(FontArc::new)
            .map_err(|err| AnnotatorError::Font(format!("{key}: {err}")))?;
        log::debug!("Loaded font face for {}", key);
        self.cache.insert(key, font.clone());
        Ok(TextFace::new(font, spec.size))
    }

    /// Raw font bytes and face index for `spec`.
    fn face_data(&self, spec: &FontSpec) -> Result<(Vec<u8>, u32)> {
        if let Some(path) = &self.font_file {
            let bytes = std::fs::read(path).map_err(|source| AnnotatorError::Io {
                path: path.clone(),
                source,
            })?;
            return Ok((bytes, 0));
        }

        if let Some(data) = system_face_data(&spec.family) {
            return Ok(data);
        }

        let name = if spec.is_monospace() {
            MONOSPACE_FACE
        } else {
            PROPORTIONAL_FACE
        };
        log::debug!("No installed font for {}, using bundled {}", spec.family, name);
        bundled_font_bytes(name)
            .map(|bytes| (bytes, 0))
            .ok_or_else(|| AnnotatorError::Font(format!("bundled face {name} missing")))
    }
}

fn family_name(family: &str) -> FamilyName {
    match family.to_lowercase().as_str() {
        "sans" | "sans-serif" | "sans serif" => FamilyName::SansSerif,
        "serif" => FamilyName::Serif,
        "mono" | "monospace" => FamilyName::Monospace,
        "cursive" => FamilyName::Cursive,
        "fantasy" => FamilyName::Fantasy,
        _ => FamilyName::Title(family.to_owned()),
    }
}

/// Best installed match for `family`, if the system has one.
fn system_face_data(family: &str) -> Option<(Vec<u8>, u32)> {
    let handle = match SystemSource::new().select_best_match(&[family_name(family)], &Properties::new()) {
        Ok(handle) => handle,
        Err(err) => {
            log::debug!("Font lookup for {} failed: {}", family, err);
            return None;
        }
    };

    match handle {
        Handle::Path { path, font_index } => match std::fs::read(&path) {
            Ok(bytes) => Some((bytes, font_index)),
            Err(err) => {
                log::debug!("Cannot read font {}: {}", path.display(), err);
                None
            }
        },
        Handle::Memory { bytes, font_index } => Some((bytes.to_vec(), font_index)),
    }
}

fn bundled_font_bytes(name: &str) -> Option<Vec<u8>> {
    egui::FontDefinitions::default()
        .font_data
        .get(name)
        .map(|data| data.font.to_vec())
}
