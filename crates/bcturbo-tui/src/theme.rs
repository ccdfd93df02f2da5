//! Theme integration: resolve the active ftui theme palette into the
//! concrete colors the cockpit chrome and screens use.

use ftui::PackedRgba;
use ftui_extras::theme::{self, ThemeId};

/// Resolved cockpit color palette derived from the active ftui theme.
#[derive(Debug, Clone, Copy)]
pub struct CockpitPalette {
    // ── Tab bar / secondary nav ──────────────────────────────────
    pub tab_active_bg: PackedRgba,
    pub tab_active_fg: PackedRgba,
    pub tab_inactive_bg: PackedRgba,
    pub tab_inactive_fg: PackedRgba,
    pub tab_key_fg: PackedRgba,

    // ── Status line ──────────────────────────────────────────────
    pub status_bg: PackedRgba,
    pub status_fg: PackedRgba,
    pub status_accent: PackedRgba,
    pub status_good: PackedRgba,
    pub status_warn: PackedRgba,

    // ── Form fields ──────────────────────────────────────────────
    pub field_label_fg: PackedRgba,
    pub field_value_fg: PackedRgba,
    pub field_focused_bg: PackedRgba,
    pub field_loading_fg: PackedRgba,
    pub field_disabled_fg: PackedRgba,

    // ── Dashboard ────────────────────────────────────────────────
    pub card_title_fg: PackedRgba,
    pub card_value_fg: PackedRgba,
    pub table_header_fg: PackedRgba,
    pub saving_fg: PackedRgba,
    pub badge_ok_fg: PackedRgba,
    pub badge_warn_fg: PackedRgba,

    // ── Help overlay ─────────────────────────────────────────────
    pub help_bg: PackedRgba,
    pub help_fg: PackedRgba,
    pub help_key_fg: PackedRgba,
    pub help_border_fg: PackedRgba,
}

impl CockpitPalette {
    /// Resolve a palette from a specific theme ID.
    #[must_use]
    pub fn for_theme(id: ThemeId) -> Self {
        let p = theme::palette(id);
        Self {
            tab_active_bg: p.bg_surface,
            tab_active_fg: p.fg_primary,
            tab_inactive_bg: p.bg_base,
            tab_inactive_fg: p.fg_muted,
            tab_key_fg: p.accent_primary,

            status_bg: p.bg_deep,
            status_fg: p.fg_secondary,
            status_accent: p.accent_primary,
            status_good: p.accent_success,
            status_warn: p.accent_warning,

            field_label_fg: p.fg_muted,
            field_value_fg: p.fg_primary,
            field_focused_bg: p.bg_surface,
            field_loading_fg: p.accent_warning,
            field_disabled_fg: p.fg_muted,

            card_title_fg: p.fg_muted,
            card_value_fg: p.fg_primary,
            table_header_fg: p.accent_primary,
            saving_fg: p.accent_success,
            badge_ok_fg: p.accent_success,
            badge_warn_fg: p.accent_warning,

            help_bg: p.bg_deep,
            help_fg: p.fg_primary,
            help_key_fg: p.accent_primary,
            help_border_fg: p.fg_muted,
        }
    }

    /// Resolve a palette from the currently active ftui theme.
    #[must_use]
    pub fn current() -> Self {
        Self::for_theme(theme::current_theme())
    }
}

/// Set the active theme and return its display name.
pub fn set_theme_and_get_name(id: ThemeId) -> &'static str {
    theme::set_theme(id);
    theme::current_theme_name()
}

/// Map a configured theme name to an ftui `ThemeId`. Unknown names fall
/// back to the default theme.
#[must_use]
pub fn theme_id_for_name(name: &str) -> ThemeId {
    match name.trim().to_ascii_lowercase().as_str() {
        "high-contrast" | "high_contrast" => ThemeId::HighContrast,
        _ => ThemeId::CyberpunkAurora,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_resolves_for_known_themes() {
        let _ = CockpitPalette::for_theme(ThemeId::CyberpunkAurora);
        let _ = CockpitPalette::for_theme(ThemeId::HighContrast);
    }

    #[test]
    fn unknown_theme_name_falls_back() {
        assert_eq!(theme_id_for_name("nope"), ThemeId::CyberpunkAurora);
        assert_eq!(theme_id_for_name("High-Contrast"), ThemeId::HighContrast);
    }
}
