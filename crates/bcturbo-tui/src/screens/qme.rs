//! QME simulation form — manual inputs, SAP/IMS auto-fill, AS-IS import.
//!
//! The code field drives the debounced lookup: every keystroke re-arms a
//! single-slot scheduler; when the quiet period elapses the request is
//! built from the *current* field values, so the plant/origin/destination
//! fields may be edited during the quiet window. The database folder is a
//! hard precondition — without it the manual inputs are gated and a code
//! keystroke clears the field and warns instead of scheduling.

use ftui::layout::Rect;
use ftui::text::{Line, Span, Text};
use ftui::widgets::Widget;
use ftui::widgets::block::Block;
use ftui::widgets::borders::BorderType;
use ftui::widgets::paragraph::Paragraph;
use ftui::{Event, Frame, KeyCode, KeyEventKind, Modifiers, Style};
use ftui_runtime::program::Cmd;
use ftui_widgets::input::TextInput;

use bcturbo_core::Config;
use bcturbo_core::models::{LookupReply, LookupRequest, SimulationRequest, lookup_keys};

use crate::debounce::{DebounceSlot, quiet_ticks};
use crate::import_model::ImportPanel;
use crate::screens::{CockpitScreen, HelpEntry, ScreenMsg};
use crate::state::{NoticeSeverity, UiSharedState};
use crate::theme::CockpitPalette;

/// Placeholder shown in the auto-fill fields while a lookup is in flight.
pub const LOADING_PLACEHOLDER: &str = "Carregando…";

/// Warning surfaced when the database folder precondition fails.
const DB_REQUIRED_WARNING: &str = "Por favor, selecione a pasta Database primeiro!";

/// The form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    CodProjeto,
    CodSap,
    Planta,
    Origem,
    Destino,
    Fornecedor,
    Transportadora,
    Uf,
    Veiculo,
    Fluxo,
    QmeTobe,
}

/// Display order of the form fields.
const FIELD_ORDER: [FieldId; 11] = [
    FieldId::CodProjeto,
    FieldId::CodSap,
    FieldId::Planta,
    FieldId::Origem,
    FieldId::Destino,
    FieldId::Fornecedor,
    FieldId::Transportadora,
    FieldId::Uf,
    FieldId::Veiculo,
    FieldId::Fluxo,
    FieldId::QmeTobe,
];

impl FieldId {
    const fn label(self) -> &'static str {
        match self {
            Self::CodProjeto => "Código do Projeto",
            Self::CodSap => "Código SAP/IMS",
            Self::Planta => "Planta",
            Self::Origem => "Cidade de Origem",
            Self::Destino => "Destino",
            Self::Fornecedor => "Fornecedor",
            Self::Transportadora => "Transportadora",
            Self::Uf => "UF Fornecedor",
            Self::Veiculo => "Veículo",
            Self::Fluxo => "Tipo de Fluxo",
            Self::QmeTobe => "QME TO BE",
        }
    }

    /// Manual inputs gated on the database folder being selected.
    const fn gated(self) -> bool {
        matches!(
            self,
            Self::CodProjeto | Self::CodSap | Self::Planta | Self::Origem | Self::Destino
        )
    }

    /// Auto-fill fields that show the loading placeholder while a lookup
    /// is in flight.
    const fn shows_loading(self) -> bool {
        matches!(
            self,
            Self::Fornecedor | Self::Transportadora | Self::Veiculo | Self::Fluxo
        )
    }

    fn index(self) -> usize {
        FIELD_ORDER
            .iter()
            .position(|&f| f == self)
            .unwrap_or_default()
    }
}

/// Lookup-reply key → form field, applied independently per present key.
const LOOKUP_FILL_MAP: [(&str, FieldId); 7] = [
    (lookup_keys::SUPPLIER, FieldId::Fornecedor),
    (lookup_keys::CARRIER, FieldId::Transportadora),
    (lookup_keys::SUPPLIER_STATE, FieldId::Uf),
    (lookup_keys::VEHICLE, FieldId::Veiculo),
    (lookup_keys::ORIGIN_CITY, FieldId::Origem),
    (lookup_keys::DESTINATION, FieldId::Destino),
    (lookup_keys::FLOW_TYPE, FieldId::Fluxo),
];

/// The QME simulation form screen.
pub struct QmeScreen {
    inputs: Vec<TextInput>,
    loading: Vec<bool>,
    focus: usize,
    lookup_slot: DebounceSlot,
    quiet: u64,
    last_tick: u64,
    import_panel: ImportPanel,
}

impl QmeScreen {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut inputs: Vec<TextInput> = FIELD_ORDER
            .iter()
            .map(|field| TextInput::new().with_placeholder(field.label()).with_focused(false))
            .collect();
        inputs[0].set_focused(true);
        Self {
            inputs,
            loading: vec![false; FIELD_ORDER.len()],
            focus: 0,
            lookup_slot: DebounceSlot::new(),
            quiet: quiet_ticks(config.lookup_debounce_ms, crate::app::TICK_INTERVAL_MS),
            last_tick: 0,
            import_panel: ImportPanel::Hidden,
        }
    }

    #[must_use]
    pub fn value(&self, field: FieldId) -> &str {
        self.inputs[field.index()].value()
    }

    pub fn set_value(&mut self, field: FieldId, value: &str) {
        self.inputs[field.index()].set_value(value);
    }

    #[must_use]
    pub const fn lookup_pending(&self) -> bool {
        self.lookup_slot.is_pending()
    }

    #[must_use]
    pub const fn import_panel(&self) -> &ImportPanel {
        &self.import_panel
    }

    fn focused_field(&self) -> FieldId {
        FIELD_ORDER[self.focus]
    }

    fn move_focus(&mut self, delta: isize) {
        self.inputs[self.focus].set_focused(false);
        let len = FIELD_ORDER.len() as isize;
        let next = (self.focus as isize + delta).rem_euclid(len);
        self.focus = next as usize;
        self.inputs[self.focus].set_focused(true);
    }

    /// The code-field input handler: precondition gate, empty check, and
    /// the replace-style debounce arm.
    fn on_code_input(&mut self, state: &UiSharedState) {
        if !state.database_selected() {
            self.inputs[FieldId::CodSap.index()].clear();
            state.push_notice(NoticeSeverity::Warning, DB_REQUIRED_WARNING);
            return;
        }
        let code = self.value(FieldId::CodSap).trim().to_string();
        if code.is_empty() {
            // Neither schedule nor cancel: an already-pending timer stays
            // live and the blank-at-fire-time guard will skip it.
            return;
        }
        self.lookup_slot.arm(self.last_tick, self.quiet);
    }

    /// Build the request from the field values current at fire time.
    fn fire_lookup(&mut self, state: &UiSharedState) {
        let request = LookupRequest {
            code: self.value(FieldId::CodSap).trim().to_string(),
            plant: self.value(FieldId::Planta).to_string(),
            origin: self.value(FieldId::Origem).to_string(),
            destination: self.value(FieldId::Destino).to_string(),
        };
        if request.is_blank() {
            return;
        }
        self.set_loading_placeholders();
        let _seq = state.request_lookup(request);
    }

    fn set_loading_placeholders(&mut self) {
        for (idx, field) in FIELD_ORDER.iter().enumerate() {
            if field.shows_loading() {
                self.inputs[idx].set_value(LOADING_PLACEHOLDER);
                self.loading[idx] = true;
            }
        }
    }

    /// Clear placeholders to empty (never revert) once the call settles.
    fn clear_loading_placeholders(&mut self) {
        for (idx, field) in FIELD_ORDER.iter().enumerate() {
            if field.shows_loading() {
                if self.inputs[idx].value() == LOADING_PLACEHOLDER {
                    self.inputs[idx].clear();
                }
                self.loading[idx] = false;
            }
        }
    }

    /// Populate fields from a (possibly partial) reply map. Absent keys
    /// leave the corresponding field untouched.
    fn apply_lookup_data(&mut self, data: &std::collections::BTreeMap<String, String>) {
        for (key, field) in LOOKUP_FILL_MAP {
            if let Some(value) = data.get(key) {
                let idx = field.index();
                self.inputs[idx].set_value(value);
                self.loading[idx] = false;
            }
        }
    }

    fn handle_lookup_replies(&mut self, state: &UiSharedState) {
        for (seq, outcome) in state.take_lookup_replies() {
            if !state.lookup_is_latest(seq) {
                tracing::debug!(seq, "discarding stale lookup reply");
                continue;
            }
            self.clear_loading_placeholders();
            match outcome {
                Ok(LookupReply::Success { data }) => {
                    self.apply_lookup_data(&data);
                    state.push_notice(NoticeSeverity::Success, "Dados carregados com sucesso!");
                }
                Ok(LookupReply::NotFound { message }) => {
                    state.push_notice(NoticeSeverity::Warning, message);
                }
                Ok(LookupReply::Error { message }) => {
                    state.push_notice(NoticeSeverity::Error, message);
                }
                Err(err) => {
                    state.push_notice(
                        NoticeSeverity::Error,
                        format!("Erro ao buscar dados: {err}"),
                    );
                }
            }
        }
    }

    fn run_simulation(&self, state: &UiSharedState) {
        if state.calc_in_flight() {
            return;
        }
        let request = SimulationRequest {
            cod_projeto: self.value(FieldId::CodProjeto).to_string(),
            cod_sap: self.value(FieldId::CodSap).to_string(),
            fornecedor: self.value(FieldId::Fornecedor).to_string(),
            planta: self.value(FieldId::Planta).to_string(),
            origem: self.value(FieldId::Origem).to_string(),
            destino: self.value(FieldId::Destino).to_string(),
            uf: self.value(FieldId::Uf).to_string(),
            fluxo: self.value(FieldId::Fluxo).to_string(),
            transportadora: self.value(FieldId::Transportadora).to_string(),
            veiculo: self.value(FieldId::Veiculo).to_string(),
            qme_tobe: self.value(FieldId::QmeTobe).to_string(),
        };
        state.request_calculate(request);
    }

    fn render_form(&self, frame: &mut Frame<'_>, area: Rect, state: &UiSharedState) {
        let tp = CockpitPalette::current();
        let db_selected = state.database_selected();

        let mut lines: Vec<Line> = Vec::with_capacity(FIELD_ORDER.len() + 2);
        if !db_selected {
            lines.push(Line::from_spans(vec![Span::styled(
                "Selecione a pasta Database (Ctrl+D) para habilitar os campos",
                Style::default().fg(tp.status_warn),
            )]));
        }
        for (idx, field) in FIELD_ORDER.iter().enumerate() {
            let focused = idx == self.focus;
            let gated_off = field.gated() && !db_selected;
            let value = self.inputs[idx].value();

            let label_style = Style::default().fg(tp.field_label_fg);
            let value_style = if self.loading[idx] {
                Style::default().fg(tp.field_loading_fg)
            } else if gated_off {
                Style::default().fg(tp.field_disabled_fg)
            } else if focused {
                Style::default().fg(tp.field_value_fg).bg(tp.field_focused_bg)
            } else {
                Style::default().fg(tp.field_value_fg)
            };

            let marker = if focused { "> " } else { "  " };
            let shown = if value.is_empty() && !focused {
                "—".to_string()
            } else {
                value.to_string()
            };
            lines.push(Line::from_spans(vec![
                Span::styled(marker, Style::default().fg(tp.status_accent)),
                Span::styled(format!("{:<18}", field.label()), label_style),
                Span::styled(shown, value_style),
            ]));
        }

        let block = Block::default()
            .title("Simulação QME")
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        block.render(area, frame);
        Paragraph::new(Text::from_lines(lines)).render(inner, frame);
    }

    fn render_side_panel(&self, frame: &mut Frame<'_>, area: Rect, state: &UiSharedState) {
        let tp = CockpitPalette::current();
        let folders = state.folders();

        let folder_style = |selected: bool| {
            if selected {
                Style::default().fg(tp.status_good)
            } else {
                Style::default().fg(tp.field_disabled_fg)
            }
        };

        let mut lines: Vec<Line> = vec![
            Line::from_spans(vec![
                Span::styled("Database: ", Style::default().fg(tp.field_label_fg)),
                Span::styled(
                    folders.database.label.clone(),
                    folder_style(folders.database.is_selected()),
                ),
            ]),
            Line::from_spans(vec![
                Span::styled("Resultados: ", Style::default().fg(tp.field_label_fg)),
                Span::styled(
                    folders.result.label.clone(),
                    folder_style(folders.result.is_selected()),
                ),
            ]),
            Line::from_spans(vec![Span::styled(
                String::new(),
                Style::default(),
            )]),
        ];

        match &self.import_panel {
            ImportPanel::Hidden => {}
            ImportPanel::Success {
                file_line,
                asis_lines,
                tobe_lines,
                sample_line,
            } => {
                lines.push(Line::from_spans(vec![Span::styled(
                    file_line.clone(),
                    Style::default().fg(tp.status_good),
                )]));
                if !asis_lines.is_empty() {
                    lines.push(Line::from_spans(vec![Span::styled(
                        "AS IS".to_string(),
                        Style::default().fg(tp.card_title_fg).bold(),
                    )]));
                    for stat in asis_lines {
                        lines.push(Line::from_spans(vec![Span::styled(
                            format!("  {stat}"),
                            Style::default().fg(tp.field_value_fg),
                        )]));
                    }
                }
                if !tobe_lines.is_empty() {
                    lines.push(Line::from_spans(vec![Span::styled(
                        "TO BE".to_string(),
                        Style::default().fg(tp.card_title_fg).bold(),
                    )]));
                    for stat in tobe_lines {
                        lines.push(Line::from_spans(vec![Span::styled(
                            format!("  {stat}"),
                            Style::default().fg(tp.field_value_fg),
                        )]));
                    }
                }
                if let Some(sample) = sample_line {
                    lines.push(Line::from_spans(vec![Span::styled(
                        sample.clone(),
                        Style::default().fg(tp.field_label_fg),
                    )]));
                }
            }
            ImportPanel::Error { message } => {
                lines.push(Line::from_spans(vec![Span::styled(
                    format!("Erro: {message}"),
                    Style::default().fg(tp.badge_warn_fg),
                )]));
            }
            ImportPanel::Cancelled => {
                lines.push(Line::from_spans(vec![Span::styled(
                    crate::import_model::CANCELLED_NOTICE.to_string(),
                    Style::default().fg(tp.status_warn),
                )]));
            }
        }

        let block = Block::default()
            .title("Arquivos")
            .border_type(BorderType::Rounded);
        let inner = block.inner(area);
        block.render(area, frame);
        Paragraph::new(Text::from_lines(lines)).render(inner, frame);
    }
}

impl CockpitScreen for QmeScreen {
    fn update(&mut self, event: &Event, state: &UiSharedState) -> Cmd<ScreenMsg> {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return Cmd::None;
            }
            let ctrl = key.modifiers.contains(Modifiers::CTRL);
            match key.code {
                KeyCode::F(5) => {
                    self.run_simulation(state);
                    return Cmd::None;
                }
                KeyCode::Char('d') if ctrl => {
                    state.request_folder(bcturbo_core::models::FolderKind::Db);
                    return Cmd::None;
                }
                KeyCode::Char('r') if ctrl => {
                    state.request_folder(bcturbo_core::models::FolderKind::Result);
                    return Cmd::None;
                }
                KeyCode::Char('o') if ctrl => {
                    state.request_import();
                    return Cmd::None;
                }
                KeyCode::Down => {
                    self.move_focus(1);
                    return Cmd::None;
                }
                KeyCode::Up => {
                    self.move_focus(-1);
                    return Cmd::None;
                }
                KeyCode::Enter => {
                    self.move_focus(1);
                    return Cmd::None;
                }
                _ => {}
            }

            let field = self.focused_field();
            let is_edit_key = matches!(
                key.code,
                KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete
            );

            // Gated manual inputs (other than the code field, which clears
            // itself below) warn instead of accepting input.
            if is_edit_key && field.gated() && field != FieldId::CodSap && !state.database_selected()
            {
                state.push_notice(NoticeSeverity::Warning, DB_REQUIRED_WARNING);
                return Cmd::None;
            }

            let before = self.inputs[self.focus].value().to_string();
            self.inputs[self.focus].handle_event(event);
            if field == FieldId::CodSap && self.inputs[self.focus].value() != before {
                self.on_code_input(state);
            }
        }
        Cmd::None
    }

    fn tick(&mut self, tick_count: u64, state: &UiSharedState) {
        self.last_tick = tick_count;
        self.handle_lookup_replies(state);
        for outcome in state.take_import_replies() {
            self.import_panel = ImportPanel::from_outcome(&outcome);
        }
        if self.lookup_slot.fire_if_due(tick_count) {
            self.fire_lookup(state);
        }
    }

    fn view(&self, frame: &mut Frame<'_>, area: Rect, state: &UiSharedState) {
        if area.height < 4 || area.width < 40 {
            return;
        }
        let side_width = (area.width / 3).clamp(24, 48);
        let form_area = Rect::new(area.x, area.y, area.width - side_width, area.height);
        let side_area = Rect::new(
            area.x + area.width - side_width,
            area.y,
            side_width,
            area.height,
        );
        self.render_form(frame, form_area, state);
        self.render_side_panel(frame, side_area, state);
    }

    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![
            HelpEntry {
                key: "Up/Down",
                action: "Navegar entre campos",
            },
            HelpEntry {
                key: "F5",
                action: "Executar simulação",
            },
            HelpEntry {
                key: "Ctrl+D",
                action: "Selecionar pasta Database",
            },
            HelpEntry {
                key: "Ctrl+R",
                action: "Selecionar pasta de resultados",
            },
            HelpEntry {
                key: "Ctrl+O",
                action: "Importar arquivo AS IS/TO BE",
            },
        ]
    }

    fn consumes_text_input(&self) -> bool {
        true
    }

    fn title(&self) -> &'static str {
        "Simulação QME"
    }

    fn tab_label(&self) -> &'static str {
        "QME"
    }
}
