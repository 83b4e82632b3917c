//! Named color themes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    /// Default node fill (and stroke) before category colors are applied.
    pub node_fill: &'static str,
    pub text: &'static str,
    pub root_fill: &'static str,
    /// Root label color; the root fill is bright in every theme.
    pub root_text: &'static str,
    pub edge: &'static str,
}

pub const DEFAULT_THEME: &str = "dark";

pub const THEMES: &[Theme] = &[
    Theme {
        name: "dark",
        background: "#191825",
        node_fill: "#2A2A2A",
        text: "white",
        root_fill: "#00FF9C",
        root_text: "white",
        edge: "#666666",
    },
    Theme {
        name: "light",
        background: "#FFFFFF",
        node_fill: "#F0F0F0",
        text: "#333333",
        root_fill: "#00FF9C",
        root_text: "white",
        edge: "#AAAAAA",
    },
    Theme {
        name: "green",
        background: "#191825",
        node_fill: "#2A2A2A",
        text: "#00FF9C",
        root_fill: "#00FF9C",
        root_text: "white",
        // Translucent: Graphviz accepts #RRGGBBAA.
        edge: "#00FF9C50",
    },
];

/// Looks a theme up by name (case-insensitive, surrounding whitespace ignored).
pub fn theme_by_name(name: &str) -> Option<&'static Theme> {
    let name = name.trim();
    THEMES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|t| t.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_registered() {
        assert_eq!(default_theme().name, DEFAULT_THEME);
        assert_eq!(theme_by_name(DEFAULT_THEME), Some(default_theme()));
    }

    #[test]
    fn lookup_is_forgiving() {
        assert_eq!(theme_by_name(" Light ").map(|t| t.name), Some("light"));
        assert_eq!(theme_by_name("GREEN").map(|t| t.name), Some("green"));
        assert_eq!(theme_by_name("solarized"), None);
    }

    #[test]
    fn names_are_unique() {
        let names: Vec<_> = theme_names().collect();
        assert_eq!(names, vec!["dark", "light", "green"]);
    }
}
