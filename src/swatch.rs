//! Position-based labels for the curated color list of an artwork export.

use serde::Serialize;

use crate::color::ExtractedColor;

/// `COLOR CODE A - SWATCH 01` for index 0; letters wrap after `Z`.
pub fn swatch_label(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("COLOR CODE {letter} - SWATCH {:02}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swatch {
    pub label: String,
    pub hex: String,
    pub pct: f64,
}

pub fn label_swatches(colors: &[ExtractedColor]) -> Vec<Swatch> {
    colors
        .iter()
        .enumerate()
        .map(|(i, c)| Swatch {
            label: swatch_label(i),
            hex: c.hex.clone(),
            pct: c.pct,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_position() {
        assert_eq!(swatch_label(0), "COLOR CODE A - SWATCH 01");
        assert_eq!(swatch_label(25), "COLOR CODE Z - SWATCH 26");
        assert_eq!(swatch_label(26), "COLOR CODE A - SWATCH 27");
        assert_eq!(swatch_label(119), "COLOR CODE P - SWATCH 120");
    }

    #[test]
    fn swatches_keep_color_order() {
        let colors = vec![
            ExtractedColor { hex: "#ff0000".into(), pct: 66.67 },
            ExtractedColor { hex: "#0000ff".into(), pct: 33.33 },
        ];
        let swatches = label_swatches(&colors);
        assert_eq!(swatches[1].label, "COLOR CODE B - SWATCH 02");
        assert_eq!(swatches[1].hex, "#0000ff");
        assert_eq!(swatches[0].pct, 66.67);
    }
}
