use layoutforge_core::presets::{design_preset, DESIGN_PRESET_NAMES, STYLE_PRESETS};

use crate::terminal_output::{render_table, Column, BOLD, RESET};

fn style_rows() -> Vec<Vec<String>> {
    STYLE_PRESETS
        .iter()
        .map(|p| vec![p.name.to_string(), p.prompt.to_string()])
        .collect()
}

fn design_rows() -> Vec<Vec<String>> {
    DESIGN_PRESET_NAMES
        .iter()
        .filter_map(|name| design_preset(name).map(|d| (name, d)))
        .map(|(name, d)| {
            vec![
                name.to_string(),
                d.theme_name,
                d.layout_type.to_string(),
                d.highlight_color,
                d.base_font_size,
            ]
        })
        .collect()
}

pub fn run() {
    println!("{BOLD}Style presets{RESET} (use with --preset)");
    let columns = [Column::left("Name"), Column::left("Prompt").max_width(72)];
    print!("{}", render_table(&columns, &style_rows()));

    println!();
    println!("{BOLD}Design presets{RESET} (use with export --preset)");
    let columns = [
        Column::left("Name"),
        Column::left("Theme"),
        Column::left("Layout"),
        Column::right("Accent"),
        Column::right("Size"),
    ];
    print!("{}", render_table(&columns, &design_rows()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_preset() {
        assert_eq!(style_rows().len(), STYLE_PRESETS.len());
        let designs = design_rows();
        assert_eq!(designs.len(), DESIGN_PRESET_NAMES.len());
        assert!(designs.iter().all(|row| row[3].starts_with('#')));
    }
}
