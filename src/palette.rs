//! Named discrete color palettes and category-to-color assignment.
//!
//! Palettes are stepped through entry by entry rather than sampled, and
//! wrap around when there are more categories than colors.

use anyhow::{bail, Result};
use plotters::style::RGBColor;
use std::collections::HashMap;

pub const DEFAULT_PALETTE: &str = "Vega10";

const TAB10: &[RGBColor] = &[
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const TAB20: &[RGBColor] = &[
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xae, 0xc7, 0xe8),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0xff, 0xbb, 0x78),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0x98, 0xdf, 0x8a),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0xff, 0x98, 0x96),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0xc5, 0xb0, 0xd5),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xc4, 0x9c, 0x94),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0xf7, 0xb6, 0xd2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xc7, 0xc7, 0xc7),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0xdb, 0xdb, 0x8d),
    RGBColor(0x17, 0xbe, 0xcf),
    RGBColor(0x9e, 0xda, 0xe5),
];

const SET1: &[RGBColor] = &[
    RGBColor(0xe4, 0x1a, 0x1c),
    RGBColor(0x37, 0x7e, 0xb8),
    RGBColor(0x4d, 0xaf, 0x4a),
    RGBColor(0x98, 0x4e, 0xa3),
    RGBColor(0xff, 0x7f, 0x00),
    RGBColor(0xff, 0xff, 0x33),
    RGBColor(0xa6, 0x56, 0x28),
    RGBColor(0xf7, 0x81, 0xbf),
    RGBColor(0x99, 0x99, 0x99),
];

const SET2: &[RGBColor] = &[
    RGBColor(0x66, 0xc2, 0xa5),
    RGBColor(0xfc, 0x8d, 0x62),
    RGBColor(0x8d, 0xa0, 0xcb),
    RGBColor(0xe7, 0x8a, 0xc3),
    RGBColor(0xa6, 0xd8, 0x54),
    RGBColor(0xff, 0xd9, 0x2f),
    RGBColor(0xe5, 0xc4, 0x94),
    RGBColor(0xb3, 0xb3, 0xb3),
];

const SET3: &[RGBColor] = &[
    RGBColor(0x8d, 0xd3, 0xc7),
    RGBColor(0xff, 0xff, 0xb3),
    RGBColor(0xbe, 0xba, 0xda),
    RGBColor(0xfb, 0x80, 0x72),
    RGBColor(0x80, 0xb1, 0xd3),
    RGBColor(0xfd, 0xb4, 0x62),
    RGBColor(0xb3, 0xde, 0x69),
    RGBColor(0xfc, 0xcd, 0xe5),
    RGBColor(0xd9, 0xd9, 0xd9),
    RGBColor(0xbc, 0x80, 0xbd),
    RGBColor(0xcc, 0xeb, 0xc5),
    RGBColor(0xff, 0xed, 0x6f),
];

const PASTEL1: &[RGBColor] = &[
    RGBColor(0xfb, 0xb4, 0xae),
    RGBColor(0xb3, 0xcd, 0xe3),
    RGBColor(0xcc, 0xeb, 0xc5),
    RGBColor(0xde, 0xcb, 0xe4),
    RGBColor(0xfe, 0xd9, 0xa6),
    RGBColor(0xff, 0xff, 0xcc),
    RGBColor(0xe5, 0xd8, 0xbd),
    RGBColor(0xfd, 0xda, 0xec),
    RGBColor(0xf2, 0xf2, 0xf2),
];

const PASTEL2: &[RGBColor] = &[
    RGBColor(0xb3, 0xe2, 0xcd),
    RGBColor(0xfd, 0xcd, 0xac),
    RGBColor(0xcb, 0xd5, 0xe8),
    RGBColor(0xf4, 0xca, 0xe4),
    RGBColor(0xe6, 0xf5, 0xc9),
    RGBColor(0xff, 0xf2, 0xae),
    RGBColor(0xf1, 0xe2, 0xcc),
    RGBColor(0xcc, 0xcc, 0xcc),
];

const DARK2: &[RGBColor] = &[
    RGBColor(0x1b, 0x9e, 0x77),
    RGBColor(0xd9, 0x5f, 0x02),
    RGBColor(0x75, 0x70, 0xb3),
    RGBColor(0xe7, 0x29, 0x8a),
    RGBColor(0x66, 0xa6, 0x1e),
    RGBColor(0xe6, 0xab, 0x02),
    RGBColor(0xa6, 0x76, 0x1d),
    RGBColor(0x66, 0x66, 0x66),
];

const ACCENT: &[RGBColor] = &[
    RGBColor(0x7f, 0xc9, 0x7f),
    RGBColor(0xbe, 0xae, 0xd4),
    RGBColor(0xfd, 0xc0, 0x86),
    RGBColor(0xff, 0xff, 0x99),
    RGBColor(0x38, 0x6c, 0xb0),
    RGBColor(0xf0, 0x02, 0x7f),
    RGBColor(0xbf, 0x5b, 0x17),
    RGBColor(0x66, 0x66, 0x66),
];

const PAIRED: &[RGBColor] = &[
    RGBColor(0xa6, 0xce, 0xe3),
    RGBColor(0x1f, 0x78, 0xb4),
    RGBColor(0xb2, 0xdf, 0x8a),
    RGBColor(0x33, 0xa0, 0x2c),
    RGBColor(0xfb, 0x9a, 0x99),
    RGBColor(0xe3, 0x1a, 0x1c),
    RGBColor(0xfd, 0xbf, 0x6f),
    RGBColor(0xff, 0x7f, 0x00),
    RGBColor(0xca, 0xb2, 0xd6),
    RGBColor(0x6a, 0x3d, 0x9a),
    RGBColor(0xff, 0xff, 0x99),
    RGBColor(0xb1, 0x59, 0x28),
];

/// Palette names accepted by [`ColorPalette::named`] (aliases included).
pub const PALETTE_NAMES: &[&str] = &[
    "Vega10", "tab10", "Vega20", "tab20", "Set1", "Set2", "Set3", "Pastel1", "Pastel2", "Dark2",
    "Accent", "Paired",
];

/// An ordered, finite list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn new(colors: Vec<RGBColor>) -> Self {
        Self { colors }
    }

    /// Look up a palette by name. A `_r` suffix yields the reversed palette.
    pub fn named(name: &str) -> Result<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };

        let colors = match base {
            "Vega10" | "tab10" => TAB10,
            "Vega20" | "tab20" => TAB20,
            "Set1" => SET1,
            "Set2" => SET2,
            "Set3" => SET3,
            "Pastel1" => PASTEL1,
            "Pastel2" => PASTEL2,
            "Dark2" => DARK2,
            "Accent" => ACCENT,
            "Paired" => PAIRED,
            _ => bail!(
                "Unknown palette '{}' (available: {})",
                name,
                PALETTE_NAMES.join(", ")
            ),
        };

        let mut colors = colors.to_vec();
        if reversed {
            colors.reverse();
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[RGBColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::new(TAB10.to_vec())
    }
}

/// One color per category, kept in the order the categories were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryColors {
    entries: Vec<(String, RGBColor)>,
    index: HashMap<String, usize>,
}

impl CategoryColors {
    pub fn get(&self, category: &str) -> Option<RGBColor> {
        self.index.get(category).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RGBColor)> {
        self.entries.iter().map(|(c, color)| (c.as_str(), *color))
    }
}

/// Pair each category with the palette color at the same position, cycling
/// through the palette once it runs out. A repeated category keeps its first
/// position and takes the color of its last occurrence.
pub fn category_colors<S: AsRef<str>>(
    palette: &ColorPalette,
    categories: &[S],
) -> Result<CategoryColors> {
    if palette.is_empty() && !categories.is_empty() {
        bail!("Cannot assign colors from an empty palette");
    }

    let mut entries = Vec::with_capacity(categories.len());
    let mut index = HashMap::with_capacity(categories.len());
    for (category, color) in categories.iter().zip(palette.colors().iter().cycle()) {
        let category = category.as_ref();
        if let Some(&i) = index.get(category) {
            entries[i] = (category.to_string(), *color);
            continue;
        }
        index.insert(category.to_string(), entries.len());
        entries.push((category.to_string(), *color));
    }

    Ok(CategoryColors { entries, index })
}

/// Resolve a palette by name and assign its colors to `categories`.
pub fn category_colordict<S: AsRef<str>>(
    palette_name: &str,
    categories: &[S],
) -> Result<CategoryColors> {
    let palette = ColorPalette::named(palette_name)?;
    category_colors(&palette, categories)
}
