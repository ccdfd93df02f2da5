//! Module (tab) abstraction and registry for the cockpit.
//!
//! Each module implements [`CockpitScreen`] and is identified by a
//! [`ModuleId`]. The [`MODULE_REGISTRY`] provides static metadata used by
//! the chrome shell (tab bar, secondary nav, help overlay). Secondary-nav
//! visibility is a pure function of the module's family: input modules
//! hide the bar, dashboard modules show it.

pub mod dashboard;
pub mod qme;

use ftui::layout::Rect;
use ftui_runtime::program::Cmd;

use crate::state::UiSharedState;

// Re-export the Event type that screens use
pub use ftui::Event;

// ──────────────────────────────────────────────────────────────────────
// ModuleId — type-safe module identifiers
// ──────────────────────────────────────────────────────────────────────

/// Identifies a cockpit module (tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    Qme,
    Freq,
    Emb,
    Veh,
    Fluxo,
    Trip,
    Waiting,
    Stact,
    Dash,
}

/// All module IDs in display order.
pub const ALL_MODULE_IDS: &[ModuleId] = &[
    ModuleId::Qme,
    ModuleId::Freq,
    ModuleId::Emb,
    ModuleId::Veh,
    ModuleId::Fluxo,
    ModuleId::Trip,
    ModuleId::Waiting,
    ModuleId::Stact,
    ModuleId::Dash,
];

impl ModuleId {
    /// Returns the 0-based display index.
    #[must_use]
    pub fn index(self) -> usize {
        ALL_MODULE_IDS
            .iter()
            .position(|&id| id == self)
            .unwrap_or(0)
    }

    /// Return the next module in tab order (wraps).
    #[must_use]
    pub fn next(self) -> Self {
        let idx = self.index();
        ALL_MODULE_IDS[(idx + 1) % ALL_MODULE_IDS.len()]
    }

    /// Return the previous module in tab order (wraps).
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = self.index();
        let len = ALL_MODULE_IDS.len();
        ALL_MODULE_IDS[(idx + len - 1) % len]
    }

    /// Look up a module by its slug. Unknown slugs yield `None`, which
    /// callers treat as a no-op — exactly the legacy `switchTab` contract.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        MODULE_REGISTRY
            .iter()
            .find(|meta| meta.slug == slug)
            .map(|meta| meta.id)
    }

    /// Look up a module by its direct jump key (`1`-`9`).
    #[must_use]
    pub fn from_jump_key(key: char) -> Option<Self> {
        let n = key.to_digit(10)? as usize;
        if n == 0 || n > ALL_MODULE_IDS.len() {
            None
        } else {
            Some(ALL_MODULE_IDS[n - 1])
        }
    }

    /// Whether the secondary navigation bar is visible for this module.
    ///
    /// Pure function of the module's family: the input modules hide it,
    /// the dashboard-family modules show it.
    #[must_use]
    pub fn secondary_nav_visible(self) -> bool {
        module_meta(self).family == ModuleFamily::Dashboard
    }
}

// ──────────────────────────────────────────────────────────────────────
// HelpEntry — keybinding documentation
// ──────────────────────────────────────────────────────────────────────

/// A keybinding entry for the help overlay.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub key: &'static str,
    pub action: &'static str,
}

// ──────────────────────────────────────────────────────────────────────
// CockpitScreen trait — module abstraction
// ──────────────────────────────────────────────────────────────────────

/// The screen abstraction for the cockpit.
///
/// Each module implements this trait and plugs into
/// [`crate::app::CockpitModel`], which dispatches events to the active
/// module after processing global keybindings.
pub trait CockpitScreen {
    /// Handle a terminal event, returning a command.
    fn update(&mut self, event: &Event, state: &UiSharedState) -> Cmd<ScreenMsg>;

    /// Render the module into the given area.
    fn view(&self, frame: &mut ftui::Frame<'_>, area: Rect, state: &UiSharedState);

    /// Called on each tick (~100 ms) with the global tick count.
    fn tick(&mut self, _tick_count: u64, _state: &UiSharedState) {}

    /// Return module-specific keybindings for the help overlay.
    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![]
    }

    /// Whether this module is currently consuming text input. When true,
    /// single-character global shortcuts are suppressed.
    fn consumes_text_input(&self) -> bool {
        false
    }

    /// Title shown in the help overlay header.
    fn title(&self) -> &'static str;

    /// Short label for tab bar display.
    fn tab_label(&self) -> &'static str {
        self.title()
    }
}

/// Messages produced by individual modules, wrapped by the app message.
#[derive(Debug, Clone)]
pub enum ScreenMsg {
    /// No action needed.
    Noop,
    /// Request navigation to another module.
    Navigate(ModuleId),
}

// ──────────────────────────────────────────────────────────────────────
// Module Registry — static metadata
// ──────────────────────────────────────────────────────────────────────

/// Module family, driving secondary-nav visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFamily {
    /// Data-entry modules: QME form, frequency, packaging.
    Input,
    /// Dashboard-family modules: analysis panels plus the results view.
    Dashboard,
}

/// Static metadata for a module.
#[derive(Debug, Clone)]
pub struct ModuleMeta {
    pub id: ModuleId,
    pub slug: &'static str,
    pub title: &'static str,
    pub short_label: &'static str,
    pub family: ModuleFamily,
    pub description: &'static str,
}

/// Static registry of all modules with their metadata.
pub const MODULE_REGISTRY: &[ModuleMeta] = &[
    ModuleMeta {
        id: ModuleId::Qme,
        slug: "qme",
        title: "Simulação QME",
        short_label: "QME",
        family: ModuleFamily::Input,
        description: "Formulário de simulação com auto-busca SAP/IMS",
    },
    ModuleMeta {
        id: ModuleId::Freq,
        slug: "freq",
        title: "Frequência",
        short_label: "Freq",
        family: ModuleFamily::Input,
        description: "Frequência de abastecimento por rota",
    },
    ModuleMeta {
        id: ModuleId::Emb,
        slug: "emb",
        title: "Embalagens",
        short_label: "Emb",
        family: ModuleFamily::Input,
        description: "Parâmetros de embalagem por PN",
    },
    ModuleMeta {
        id: ModuleId::Veh,
        slug: "veh",
        title: "Veículos",
        short_label: "Veíc",
        family: ModuleFamily::Dashboard,
        description: "Painel de ocupação por veículo",
    },
    ModuleMeta {
        id: ModuleId::Fluxo,
        slug: "fluxo",
        title: "Fluxos",
        short_label: "Fluxo",
        family: ModuleFamily::Dashboard,
        description: "Painel de fluxos logísticos",
    },
    ModuleMeta {
        id: ModuleId::Trip,
        slug: "trip",
        title: "Viagens",
        short_label: "Viag",
        family: ModuleFamily::Dashboard,
        description: "Painel de viagens por período",
    },
    ModuleMeta {
        id: ModuleId::Waiting,
        slug: "waiting",
        title: "Espera",
        short_label: "Espera",
        family: ModuleFamily::Dashboard,
        description: "Painel de tempos de espera",
    },
    ModuleMeta {
        id: ModuleId::Stact,
        slug: "stact",
        title: "Status Atual",
        short_label: "Status",
        family: ModuleFamily::Dashboard,
        description: "Painel de status atual da malha",
    },
    ModuleMeta {
        id: ModuleId::Dash,
        slug: "dash",
        title: "Dashboard",
        short_label: "Dash",
        family: ModuleFamily::Dashboard,
        description: "Resultados da simulação com detalhe por PN",
    },
];

/// Look up metadata for a module ID.
#[must_use]
pub fn module_meta(id: ModuleId) -> &'static ModuleMeta {
    MODULE_REGISTRY
        .iter()
        .find(|m| m.id == id)
        .expect("all module IDs must be in registry")
}

// ──────────────────────────────────────────────────────────────────────
// Placeholder screen for panel modules without bespoke content
// ──────────────────────────────────────────────────────────────────────

/// Placeholder module rendering a centered label.
pub struct PlaceholderScreen {
    id: ModuleId,
}

impl PlaceholderScreen {
    #[must_use]
    pub const fn new(id: ModuleId) -> Self {
        Self { id }
    }
}

impl CockpitScreen for PlaceholderScreen {
    fn update(&mut self, _event: &Event, _state: &UiSharedState) -> Cmd<ScreenMsg> {
        Cmd::None
    }

    fn view(&self, frame: &mut ftui::Frame<'_>, area: Rect, _state: &UiSharedState) {
        use ftui::widgets::Widget;
        use ftui::widgets::paragraph::Paragraph;
        let meta = module_meta(self.id);
        let text = format!("{} — {}", meta.title, meta.description);
        let p = Paragraph::new(text);
        p.render(area, frame);
    }

    fn title(&self) -> &'static str {
        module_meta(self.id).title
    }

    fn tab_label(&self) -> &'static str {
        module_meta(self.id).short_label
    }
}

// ──────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn all_module_ids_in_registry() {
        for &id in ALL_MODULE_IDS {
            let meta = module_meta(id);
            assert_eq!(meta.id, id);
            assert!(!meta.title.is_empty());
            assert!(!meta.slug.is_empty());
        }
    }

    #[test]
    fn module_count_matches() {
        assert_eq!(ALL_MODULE_IDS.len(), MODULE_REGISTRY.len());
        assert_eq!(ALL_MODULE_IDS.len(), 9);
    }

    #[test]
    fn next_prev_wraps() {
        let first = ALL_MODULE_IDS[0];
        let last = *ALL_MODULE_IDS.last().unwrap();
        assert_eq!(last.next(), first);
        assert_eq!(first.prev(), last);
    }

    #[test]
    fn next_prev_round_trip() {
        for &id in ALL_MODULE_IDS {
            assert_eq!(id.next().prev(), id);
            assert_eq!(id.prev().next(), id);
        }
    }

    #[test]
    fn from_slug_covers_the_enumerated_set() {
        assert_eq!(ModuleId::from_slug("qme"), Some(ModuleId::Qme));
        assert_eq!(ModuleId::from_slug("fluxo"), Some(ModuleId::Fluxo));
        assert_eq!(ModuleId::from_slug("dash"), Some(ModuleId::Dash));
        for meta in MODULE_REGISTRY {
            assert_eq!(ModuleId::from_slug(meta.slug), Some(meta.id));
        }
    }

    #[test]
    fn from_slug_unknown_is_none() {
        assert_eq!(ModuleId::from_slug("unknown"), None);
        assert_eq!(ModuleId::from_slug(""), None);
        assert_eq!(ModuleId::from_slug("QME"), None);
    }

    #[test]
    fn from_jump_key_maps_digits() {
        assert_eq!(ModuleId::from_jump_key('1'), Some(ModuleId::Qme));
        assert_eq!(ModuleId::from_jump_key('9'), Some(ModuleId::Dash));
        assert_eq!(ModuleId::from_jump_key('0'), None);
        assert_eq!(ModuleId::from_jump_key('x'), None);
    }

    #[test]
    fn secondary_nav_policy_table() {
        // Input family hides the bar.
        assert!(!ModuleId::Qme.secondary_nav_visible());
        assert!(!ModuleId::Freq.secondary_nav_visible());
        assert!(!ModuleId::Emb.secondary_nav_visible());
        // Dashboard family shows it.
        assert!(ModuleId::Veh.secondary_nav_visible());
        assert!(ModuleId::Fluxo.secondary_nav_visible());
        assert!(ModuleId::Trip.secondary_nav_visible());
        assert!(ModuleId::Waiting.secondary_nav_visible());
        assert!(ModuleId::Stact.secondary_nav_visible());
        assert!(ModuleId::Dash.secondary_nav_visible());
    }

    #[test]
    fn index_is_consistent() {
        for (i, &id) in ALL_MODULE_IDS.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn placeholder_screen_title_matches_meta() {
        for &id in &[ModuleId::Freq, ModuleId::Veh, ModuleId::Stact] {
            let screen = PlaceholderScreen::new(id);
            let meta = module_meta(id);
            assert_eq!(screen.title(), meta.title);
            assert_eq!(screen.tab_label(), meta.short_label);
            assert!(!screen.consumes_text_input());
            assert!(screen.keybindings().is_empty());
        }
    }

    proptest! {
        /// Arbitrary slugs that are not in the registry never resolve.
        #[test]
        fn arbitrary_unknown_slugs_are_noops(slug in "[a-z]{1,12}") {
            let known = MODULE_REGISTRY.iter().any(|m| m.slug == slug);
            prop_assume!(!known);
            prop_assert_eq!(ModuleId::from_slug(&slug), None);
        }
    }
}
