//! Program category table

/// Category names indexed by the header's category byte
pub static CATEGORIES: [&str; 12] = [
    "Acoustic", "Arpeggio", "Bass", "Classic", "Drum", "Fantasy", "FX", "Lead", "Organ", "Pad",
    "Piano", "Synth",
];

pub fn category_name(category: u8) -> Option<&'static str> {
    CATEGORIES.get(category as usize).copied()
}
