//! Top-level application model for the cockpit.
//!
//! [`CockpitModel`] implements the `ftui_runtime` `Model` trait: it owns
//! all module instances, routes global keybindings, drains the bridge
//! reply queue on each tick, turns notices into toasts, and enforces the
//! navigation invariant (exactly one active module, secondary nav derived
//! from it).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ftui::widgets::notification_queue::NotificationStack;
use ftui::widgets::Widget;
use ftui::widgets::{NotificationQueue, QueueConfig, Toast, ToastIcon};
use ftui::{Event, Frame, KeyCode, KeyEventKind, Modifiers};
use ftui_runtime::program::{Cmd, Model};

use bcturbo_bridge::BridgeReply;
use bcturbo_core::Config;
use bcturbo_core::models::{CalculateReply, ExportReply, FolderKind};

use crate::chrome;
use crate::screens::{
    ALL_MODULE_IDS, CockpitScreen, HelpEntry, ModuleId, PlaceholderScreen, ScreenMsg,
    dashboard::DashScreen, qme::QmeScreen,
};
use crate::state::{Notice, NoticeSeverity, UiSharedState};

/// How often the TUI ticks (100 ms); also the debounce clock resolution.
pub const TICK_INTERVAL_MS: u64 = 100;

/// Tick interval as a [`Duration`].
pub const TICK_INTERVAL: Duration = Duration::from_millis(TICK_INTERVAL_MS);

// ──────────────────────────────────────────────────────────────────────
// CockpitMsg — top-level message type
// ──────────────────────────────────────────────────────────────────────

/// Top-level message type for the cockpit application.
#[derive(Debug, Clone)]
pub enum CockpitMsg {
    /// Terminal event (keyboard, mouse, resize, tick).
    Terminal(Event),
    /// Forwarded module-level message.
    Screen(ScreenMsg),
    /// Switch to a specific module.
    SwitchModule(ModuleId),
    /// Toggle the help overlay.
    ToggleHelp,
    /// Request application quit.
    Quit,
}

impl From<Event> for CockpitMsg {
    fn from(event: Event) -> Self {
        Self::Terminal(event)
    }
}

// ──────────────────────────────────────────────────────────────────────
// CockpitModel
// ──────────────────────────────────────────────────────────────────────

/// The top-level TUI application model.
pub struct CockpitModel {
    state: Arc<UiSharedState>,
    screens: HashMap<ModuleId, Box<dyn CockpitScreen>>,
    active: ModuleId,
    notifications: NotificationQueue,
    help_visible: bool,
    tick_count: u64,
    toast_info_secs: u64,
    toast_warn_secs: u64,
    toast_error_secs: u64,
    toast_muted: bool,
}

impl CockpitModel {
    /// Build the model with all nine modules registered.
    #[must_use]
    pub fn new(state: Arc<UiSharedState>, config: &Config) -> Self {
        let mut screens: HashMap<ModuleId, Box<dyn CockpitScreen>> = HashMap::new();
        screens.insert(ModuleId::Qme, Box::new(QmeScreen::new(config)));
        screens.insert(ModuleId::Dash, Box::new(DashScreen::new()));
        for &id in ALL_MODULE_IDS {
            screens
                .entry(id)
                .or_insert_with(|| Box::new(PlaceholderScreen::new(id)));
        }

        let max_visible = if config.tui_toast_enabled {
            config.tui_toast_max_visible.max(1)
        } else {
            0
        };
        let notifications = NotificationQueue::new(
            QueueConfig::default()
                .max_visible(max_visible)
                .default_duration(Duration::from_secs(config.tui_toast_info_dismiss_secs.max(1))),
        );

        Self {
            state,
            screens,
            active: ModuleId::Qme,
            notifications,
            help_visible: false,
            tick_count: 0,
            toast_info_secs: config.tui_toast_info_dismiss_secs.max(1),
            toast_warn_secs: config.tui_toast_warn_dismiss_secs.max(1),
            toast_error_secs: config.tui_toast_error_dismiss_secs.max(1),
            toast_muted: !config.tui_toast_enabled,
        }
    }

    /// The active module. Exactly one module is active at any time by
    /// construction.
    #[must_use]
    pub const fn active_module(&self) -> ModuleId {
        self.active
    }

    /// Whether the secondary nav bar is currently shown.
    #[must_use]
    pub fn secondary_nav_visible(&self) -> bool {
        self.active.secondary_nav_visible()
    }

    /// Switch the active module. The sole mutation point for navigation
    /// state.
    pub fn switch_module(&mut self, id: ModuleId) {
        self.active = id;
    }

    /// Switch by slug; unknown slugs are a no-op (legacy `switchTab`
    /// contract).
    pub fn switch_module_slug(&mut self, slug: &str) {
        if let Some(id) = ModuleId::from_slug(slug) {
            self.switch_module(id);
        }
    }

    fn active_screen(&self) -> Option<&dyn CockpitScreen> {
        self.screens.get(&self.active).map(AsRef::as_ref)
    }

    fn notify(&mut self, notice: &Notice) {
        if self.toast_muted {
            return;
        }
        let (icon, secs) = match notice.severity {
            NoticeSeverity::Info => (ToastIcon::Info, self.toast_info_secs),
            NoticeSeverity::Success => (ToastIcon::Success, self.toast_info_secs),
            NoticeSeverity::Warning => (ToastIcon::Warning, self.toast_warn_secs),
            NoticeSeverity::Error => (ToastIcon::Error, self.toast_error_secs),
        };
        self.notifications.notify(
            Toast::new(notice.text.clone())
                .icon(icon)
                .duration(Duration::from_secs(secs)),
        );
    }

    /// Route raw bridge replies: folder and export outcomes become
    /// notices, lookup/import replies land in the screen mailboxes, and a
    /// successful calculation stores the snapshot and navigates to the
    /// dashboard.
    fn drain_bridge(&mut self) {
        for reply in self.state.drain_bridge_replies() {
            match reply {
                BridgeReply::Folder { kind, outcome } => self.handle_folder_reply(kind, outcome),
                BridgeReply::Lookup { seq, outcome } => {
                    self.state.deliver_lookup_reply(seq, outcome);
                }
                BridgeReply::Calculation { seq, outcome } => {
                    self.handle_calculation_reply(seq, outcome);
                }
                BridgeReply::Import { outcome } => {
                    self.state.deliver_import_reply(outcome);
                }
                BridgeReply::Export { outcome } => self.handle_export_reply(outcome),
            }
        }
    }

    fn handle_folder_reply(
        &mut self,
        kind: FolderKind,
        outcome: bcturbo_core::Result<bcturbo_core::models::FolderSelection>,
    ) {
        if kind == FolderKind::Db {
            self.state.clear_db_select_in_flight();
        }
        match outcome {
            Ok(selection) => {
                let selected = selection.is_selected();
                self.state.set_folder(kind, selection);
                match (kind, selected) {
                    (FolderKind::Db, true) => {
                        self.state.push_notice(
                            NoticeSeverity::Success,
                            "Database carregada e pronta!",
                        );
                    }
                    (FolderKind::Db, false) => {
                        self.state.push_notice(
                            NoticeSeverity::Warning,
                            "Nenhuma pasta selecionada",
                        );
                    }
                    (FolderKind::Result, _) => {}
                }
            }
            Err(err) => {
                self.state.push_notice(
                    NoticeSeverity::Error,
                    format!("Erro ao carregar database: {err}"),
                );
            }
        }
    }

    fn handle_calculation_reply(
        &mut self,
        seq: u64,
        outcome: bcturbo_core::Result<CalculateReply>,
    ) {
        self.state.clear_calc_in_flight();
        if !self.state.calculation_is_latest(seq) {
            tracing::debug!(seq, "discarding stale calculation reply");
            return;
        }
        match outcome {
            Ok(CalculateReply::Success(result)) => {
                let message = if result.message.is_empty() {
                    "Simulação concluída.".to_string()
                } else {
                    result.message.clone()
                };
                // Overwrite the snapshot wholesale, then jump to the
                // dashboard — the legacy auto-switch on success.
                self.state.set_simulation(result);
                self.state.push_notice(NoticeSeverity::Success, message);
                self.switch_module(ModuleId::Dash);
            }
            Ok(CalculateReply::Error { message }) => {
                self.state.push_notice(NoticeSeverity::Error, message);
            }
            Err(err) => {
                self.state
                    .push_notice(NoticeSeverity::Error, format!("Erro na simulação: {err}"));
            }
        }
    }

    fn handle_export_reply(&mut self, outcome: bcturbo_core::Result<ExportReply>) {
        match outcome {
            Ok(ExportReply::Success { message, .. }) => {
                self.state.push_notice(NoticeSeverity::Success, message);
            }
            Ok(ExportReply::Error { message }) => {
                self.state.push_notice(NoticeSeverity::Error, message);
            }
            Err(err) => {
                self.state
                    .push_notice(NoticeSeverity::Error, format!("Erro ao exportar: {err}"));
            }
        }
    }

    fn on_tick(&mut self) {
        self.tick_count += 1;
        self.drain_bridge();

        let tick_count = self.tick_count;
        for screen in self.screens.values_mut() {
            screen.tick(tick_count, &self.state);
        }

        let notices = self.state.take_notices();
        for notice in &notices {
            self.notify(notice);
        }
        self.notifications.tick(TICK_INTERVAL);
    }

    fn handle_key(&mut self, event: &Event) -> Option<Cmd<CockpitMsg>> {
        let Event::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return Some(Cmd::none());
        }
        let ctrl = key.modifiers.contains(Modifiers::CTRL);

        // Quit and help are global regardless of text focus.
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => return Some(Cmd::quit()),
            KeyCode::F(1) => {
                self.help_visible = !self.help_visible;
                return Some(Cmd::none());
            }
            KeyCode::Escape if self.help_visible => {
                self.help_visible = false;
                return Some(Cmd::none());
            }
            KeyCode::Tab => {
                self.switch_module(self.active.next());
                return Some(Cmd::none());
            }
            KeyCode::BackTab => {
                self.switch_module(self.active.prev());
                return Some(Cmd::none());
            }
            _ => {}
        }

        // While the help overlay is open, swallow remaining keys.
        if self.help_visible {
            return Some(Cmd::none());
        }

        // Direct jump keys only when the active module is not consuming
        // text input.
        let text_mode = self
            .active_screen()
            .is_some_and(|screen| screen.consumes_text_input());
        if !text_mode {
            if let KeyCode::Char(c) = key.code {
                if let Some(id) = ModuleId::from_jump_key(c) {
                    self.switch_module(id);
                    return Some(Cmd::none());
                }
            }
        }
        None
    }
}

impl Model for CockpitModel {
    type Message = CockpitMsg;

    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::tick(TICK_INTERVAL)
    }

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
        match msg {
            CockpitMsg::Terminal(Event::Tick) => {
                self.on_tick();
                Cmd::tick(TICK_INTERVAL)
            }
            CockpitMsg::Terminal(ref event) => {
                if let Some(cmd) = self.handle_key(event) {
                    return cmd;
                }
                // Forward unhandled events to the active module.
                let active = self.active;
                let state = Arc::clone(&self.state);
                if let Some(screen) = self.screens.get_mut(&active) {
                    let cmd = screen.update(event, &state);
                    map_screen_cmd(cmd)
                } else {
                    Cmd::none()
                }
            }
            CockpitMsg::Screen(ScreenMsg::Navigate(id)) | CockpitMsg::SwitchModule(id) => {
                self.switch_module(id);
                Cmd::none()
            }
            CockpitMsg::Screen(ScreenMsg::Noop) => Cmd::none(),
            CockpitMsg::ToggleHelp => {
                self.help_visible = !self.help_visible;
                Cmd::none()
            }
            CockpitMsg::Quit => Cmd::quit(),
        }
    }

    fn view(&self, frame: &mut Frame<'_>) {
        let area = ftui::layout::Rect::new(0, 0, frame.width(), frame.height());
        if area.height < 3 || area.width < 20 {
            return;
        }
        let areas = chrome::chrome_layout(area, self.secondary_nav_visible());

        chrome::render_tab_bar(self.active, frame, areas.tab_bar);
        if let Some(nav_area) = areas.secondary_nav {
            chrome::render_secondary_nav(self.active, frame, nav_area);
        }
        if let Some(screen) = self.active_screen() {
            screen.view(frame, areas.content, &self.state);
        }
        chrome::render_status_line(&self.state, self.active, frame, areas.status_line);

        NotificationStack::new(&self.notifications)
            .margin(1)
            .render(areas.content, frame);

        if self.help_visible {
            let bindings: Vec<HelpEntry> = self
                .active_screen()
                .map(|screen| screen.keybindings())
                .unwrap_or_default();
            let title = self
                .active_screen()
                .map_or("", |screen| screen.title());
            chrome::render_help_overlay(title, &bindings, frame, areas.content);
        }
    }
}

/// Map a `Cmd<ScreenMsg>` into a `Cmd<CockpitMsg>`.
fn map_screen_cmd(cmd: Cmd<ScreenMsg>) -> Cmd<CockpitMsg> {
    match cmd {
        Cmd::None => Cmd::none(),
        Cmd::Quit => Cmd::quit(),
        Cmd::Msg(m) => Cmd::msg(CockpitMsg::Screen(m)),
        Cmd::Tick(d) => Cmd::tick(d),
        Cmd::Batch(cmds) => Cmd::batch(cmds.into_iter().map(map_screen_cmd).collect()),
        _ => Cmd::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcturbo_bridge::{BridgeClient, DemoBackend};
    use bcturbo_core::models::{FolderSelection, SimulationRequest};

    fn test_model() -> CockpitModel {
        let bridge = BridgeClient::spawn(Arc::new(DemoBackend::bare()));
        let state = UiSharedState::new(bridge);
        CockpitModel::new(state, &Config::default())
    }

    fn key(code: KeyCode) -> CockpitMsg {
        CockpitMsg::Terminal(Event::Key(ftui::KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers: Modifiers::empty(),
        }))
    }

    fn ctrl_key(code: KeyCode) -> CockpitMsg {
        CockpitMsg::Terminal(Event::Key(ftui::KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers: Modifiers::CTRL,
        }))
    }

    #[test]
    fn initial_module_is_qme_with_hidden_nav() {
        let model = test_model();
        assert_eq!(model.active_module(), ModuleId::Qme);
        assert!(!model.secondary_nav_visible());
    }

    #[test]
    fn all_modules_are_registered() {
        let model = test_model();
        for &id in ALL_MODULE_IDS {
            assert!(model.screens.contains_key(&id), "missing screen {id:?}");
        }
    }

    #[test]
    fn switch_module_slug_valid_and_invalid() {
        let mut model = test_model();
        model.switch_module_slug("dash");
        assert_eq!(model.active_module(), ModuleId::Dash);
        assert!(model.secondary_nav_visible());

        // Unknown slug: previous state unchanged.
        model.switch_module_slug("nope");
        assert_eq!(model.active_module(), ModuleId::Dash);
        assert!(model.secondary_nav_visible());
    }

    #[test]
    fn every_slug_activates_exactly_one_module() {
        let mut model = test_model();
        for meta in crate::screens::MODULE_REGISTRY {
            model.switch_module_slug(meta.slug);
            assert_eq!(model.active_module(), meta.id);
            assert_eq!(
                model.secondary_nav_visible(),
                meta.id.secondary_nav_visible()
            );
        }
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let mut model = test_model();
        for _ in 0..ALL_MODULE_IDS.len() {
            let _ = model.update(key(KeyCode::Tab));
        }
        assert_eq!(model.active_module(), ModuleId::Qme);
        let _ = model.update(key(KeyCode::BackTab));
        assert_eq!(model.active_module(), ModuleId::Dash);
    }

    #[test]
    fn jump_keys_suppressed_while_form_consumes_text() {
        let mut model = test_model();
        // QME form consumes text input: '9' types into the field instead
        // of jumping to the dashboard.
        let _ = model.update(key(KeyCode::Char('9')));
        assert_eq!(model.active_module(), ModuleId::Qme);

        // The dashboard does not consume text: '1' jumps back to QME.
        model.switch_module(ModuleId::Dash);
        let _ = model.update(key(KeyCode::Char('1')));
        assert_eq!(model.active_module(), ModuleId::Qme);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut model = test_model();
        let cmd = model.update(ctrl_key(KeyCode::Char('q')));
        assert!(matches!(cmd, Cmd::Quit));
    }

    #[test]
    fn f1_toggles_help_and_swallows_keys() {
        let mut model = test_model();
        let _ = model.update(key(KeyCode::F(1)));
        assert!(model.help_visible);
        // Jump keys are swallowed while help is open.
        let _ = model.update(key(KeyCode::Char('9')));
        assert_eq!(model.active_module(), ModuleId::Qme);
        let _ = model.update(key(KeyCode::Escape));
        assert!(!model.help_visible);
    }

    #[test]
    fn tick_returns_tick_cmd_and_increments() {
        let mut model = test_model();
        let cmd = model.update(CockpitMsg::Terminal(Event::Tick));
        assert!(matches!(cmd, Cmd::Tick(_)));
        assert_eq!(model.tick_count, 1);
    }

    #[test]
    fn successful_calculation_navigates_to_dashboard() {
        let mut model = test_model();
        // Load data and run the calculation through the real bridge.
        model.state.request_import();
        model.state.request_calculate(SimulationRequest {
            qme_tobe: "100".into(),
            ..SimulationRequest::default()
        });

        // Tick until both replies have been routed.
        for _ in 0..100 {
            let _ = model.update(CockpitMsg::Terminal(Event::Tick));
            if model.state.simulation_snapshot().is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(model.state.simulation_snapshot().is_some());
        assert_eq!(model.active_module(), ModuleId::Dash);
        assert!(!model.state.calc_in_flight());
    }

    #[test]
    fn calculation_error_keeps_current_module() {
        let mut model = test_model();
        // No import first: the demo backend answers with the
        // AS-IS-not-loaded error envelope.
        model.state.request_calculate(SimulationRequest::default());
        for _ in 0..100 {
            let _ = model.update(CockpitMsg::Terminal(Event::Tick));
            if !model.state.calc_in_flight() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(model.active_module(), ModuleId::Qme);
        assert!(model.state.simulation_snapshot().is_none());
    }

    #[test]
    fn folder_reply_updates_state_and_notifies() {
        let bridge = BridgeClient::spawn(Arc::new(
            DemoBackend::bare().with_database_folder("/data/sap".into()),
        ));
        let state = UiSharedState::new(bridge);
        let mut model = CockpitModel::new(state, &Config::default());

        model.state.request_folder(FolderKind::Db);
        for _ in 0..100 {
            let _ = model.update(CockpitMsg::Terminal(Event::Tick));
            if model.state.database_selected() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(model.state.database_selected());
        assert!(!model.state.db_select_in_flight());
        assert_eq!(model.state.folders().database.label, "sap");
    }

    #[test]
    fn direct_folder_set_enables_lookup_precondition() {
        let model = test_model();
        model
            .state
            .set_folder(FolderKind::Db, FolderSelection::selected("/x".into()));
        assert!(model.state.database_selected());
    }

    #[test]
    fn view_renders_each_module_without_panic() {
        let mut model = test_model();
        let mut pool = ftui::GraphemePool::new();
        for &id in ALL_MODULE_IDS {
            model.switch_module(id);
            let mut frame = Frame::new(120, 36, &mut pool);
            model.view(&mut frame);
        }
    }

    #[test]
    fn view_renders_help_overlay_without_panic() {
        let mut model = test_model();
        let _ = model.update(key(KeyCode::F(1)));
        let mut pool = ftui::GraphemePool::new();
        let mut frame = Frame::new(120, 36, &mut pool);
        model.view(&mut frame);
    }

    #[test]
    fn view_survives_tiny_terminal() {
        let model = test_model();
        let mut pool = ftui::GraphemePool::new();
        let mut frame = Frame::new(10, 2, &mut pool);
        model.view(&mut frame);
    }
}
