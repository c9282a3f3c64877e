// Theme selector - a closed table from config key to theme descriptor
// Selection is total: every input, known or not, maps to something

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    RegularDark,
    ArcDark,
    OneDark,
    MaterialDark,
    Dracula,
    Nord,
    Gruvbox,
    Vuesion,
    RegularLight,
    Solarized,
    Monokai,
    MaterialLighter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flavor {
    Dark,
    Light,
}

/// Everything the UI seam needs to apply a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeDescriptor {
    pub theme: Theme,
    pub config_key: &'static str,
    pub display_name: &'static str,
    pub flavor: Flavor,
}

pub const DEFAULT_THEME: Theme = Theme::RegularDark;

/// The whole catalog. Adding a theme means adding a row here, nothing else.
pub const THEMES: &[ThemeDescriptor] = &[
    ThemeDescriptor { theme: Theme::RegularDark, config_key: "dark", display_name: "Regular Dark", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::ArcDark, config_key: "arcdark", display_name: "Arc Dark", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::OneDark, config_key: "onedark", display_name: "One Dark", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::MaterialDark, config_key: "material", display_name: "Material Dark", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::Dracula, config_key: "dracula", display_name: "Dracula", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::Nord, config_key: "nord", display_name: "Nord", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::Gruvbox, config_key: "gruvbox", display_name: "Gruvbox", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::Vuesion, config_key: "vuesion", display_name: "Vuesion", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::RegularLight, config_key: "regularlight", display_name: "Regular Light", flavor: Flavor::Light },
    ThemeDescriptor { theme: Theme::Solarized, config_key: "solarized", display_name: "Solarized", flavor: Flavor::Light },
    ThemeDescriptor { theme: Theme::Monokai, config_key: "monokai", display_name: "Monokai", flavor: Flavor::Dark },
    ThemeDescriptor { theme: Theme::MaterialLighter, config_key: "materiallighter", display_name: "Material Lighter", flavor: Flavor::Light },
];

impl Theme {
    /// Case-sensitive lookup against the catalog; anything unmatched falls
    /// back to the canonical dark theme.
    pub fn select(name: &str) -> Theme {
        THEMES
            .iter()
            .find(|d| d.config_key == name)
            .map(|d| d.theme)
            .unwrap_or(DEFAULT_THEME)
    }

    pub fn descriptor(self) -> &'static ThemeDescriptor {
        THEMES
            .iter()
            .find(|d| d.theme == self)
            .unwrap_or(&THEMES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_key_selects_its_theme() {
        for descriptor in THEMES {
            assert_eq!(Theme::select(descriptor.config_key), descriptor.theme);
        }
    }

    #[test]
    fn test_unknown_keys_fall_back_to_default() {
        assert_eq!(Theme::select("solarised"), DEFAULT_THEME);
        assert_eq!(Theme::select("DRACULA"), DEFAULT_THEME); // case-sensitive
        assert_eq!(Theme::select(""), DEFAULT_THEME);
    }

    #[test]
    fn test_every_theme_has_a_descriptor() {
        for descriptor in THEMES {
            assert_eq!(descriptor.theme.descriptor().config_key, descriptor.config_key);
        }
    }
}
