//! Folder color palette
//! Fixed set of oklch values; new folders take the first unused entry

use crate::vault::Folder;

/// Palette order is assignment order.
pub const FOLDER_COLORS: [&str; 7] = [
    "oklch(0.78 0.16 65)",  // amber
    "oklch(0.65 0.18 170)", // mint
    "oklch(0.70 0.16 330)", // rose
    "oklch(0.65 0.17 250)", // sky
    "oklch(0.72 0.16 140)", // leaf
    "oklch(0.68 0.15 30)",  // coral
    "oklch(0.74 0.14 280)", // indigo
];

/// Pick a color for a new folder: the first palette entry no existing
/// folder uses, falling back to the first entry once all are taken.
pub fn assign_next_color(existing: &[Folder]) -> String {
    FOLDER_COLORS
        .iter()
        .find(|color| !existing.iter().any(|f| f.color == **color))
        .unwrap_or(&FOLDER_COLORS[0])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(color: &str) -> Folder {
        Folder {
            id: format!("folder:{}", color),
            name: "f".to_string(),
            parent_id: None,
            color: color.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn skips_used_entries() {
        let existing = vec![folder(FOLDER_COLORS[0]), folder(FOLDER_COLORS[1])];
        assert_eq!(assign_next_color(&existing), FOLDER_COLORS[2]);
    }

    #[test]
    fn restarts_at_first_entry_when_palette_exhausted() {
        let existing: Vec<Folder> = FOLDER_COLORS.iter().map(|c| folder(c)).collect();
        assert_eq!(assign_next_color(&existing), FOLDER_COLORS[0]);
    }
}
