//! Results dashboard — summary cards, monthly aggregation, detail table.
//!
//! The screen is a thin painter over [`DashboardView`]: everything it
//! shows is a pure function of the latest simulation snapshot, so a
//! response that lands after the user navigated away simply refreshes
//! the snapshot the next render reads. The detail table starts hidden
//! and is toggled by a single visibility flag.

use ftui::layout::{Constraint, Rect};
use ftui::text::{Line, Span, Text};
use ftui::widgets::StatefulWidget;
use ftui::widgets::Widget;
use ftui::widgets::block::Block;
use ftui::widgets::borders::BorderType;
use ftui::widgets::paragraph::Paragraph;
use ftui::widgets::table::{Row, Table, TableState};
use ftui::{Event, Frame, KeyCode, KeyEventKind, Modifiers, Style};
use ftui_runtime::program::Cmd;

use bcturbo_core::format::MONTHS_SHORT;

use crate::dashboard_model::{DashboardView, StatusBadge};
use crate::screens::{CockpitScreen, HelpEntry, ScreenMsg};
use crate::state::UiSharedState;
use crate::theme::CockpitPalette;

/// Placeholder shown before the first simulation run.
const PLACEHOLDER_TEXT: &str =
    "Nenhuma simulação executada ainda. Preencha o formulário QME e pressione F5.";

/// The results dashboard screen.
pub struct DashScreen {
    show_details: bool,
    table_state: TableState,
}

impl DashScreen {
    #[must_use]
    pub fn new() -> Self {
        Self {
            show_details: false,
            table_state: TableState::default(),
        }
    }

    #[must_use]
    pub const fn details_visible(&self) -> bool {
        self.show_details
    }

    fn render_summary_cards(frame: &mut Frame<'_>, area: Rect, view: &DashboardView) {
        let tp = CockpitPalette::current();
        let cards: [(&str, &str, ftui::PackedRgba); 4] = [
            ("Linhas", view.total_rows.as_str(), tp.card_value_fg),
            ("PNs casados", view.matched_rows.as_str(), tp.badge_ok_fg),
            ("PNs sem par", view.unmatched_rows.as_str(), tp.badge_warn_fg),
            ("Saving 12 meses", view.annual_saving.as_str(), tp.saving_fg),
        ];
        let card_width = area.width / 4;
        for (i, (title, value, color)) in cards.iter().enumerate() {
            let x = area.x + card_width * i as u16;
            let width = if i == 3 {
                area.width - card_width * 3
            } else {
                card_width
            };
            let card_area = Rect::new(x, area.y, width, area.height);
            let block = Block::default()
                .title(*title)
                .border_type(BorderType::Rounded);
            let inner = block.inner(card_area);
            block.render(card_area, frame);
            Paragraph::new(Text::from_lines([Line::from_spans(vec![Span::styled(
                (*value).to_string(),
                Style::default().fg(*color).bold(),
            )])]))
            .render(inner, frame);
        }
    }

    fn render_monthly_table(frame: &mut Frame<'_>, area: Rect, view: &DashboardView) {
        let tp = CockpitPalette::current();
        let mut header_cells: Vec<String> = Vec::with_capacity(14);
        header_cells.push(String::new());
        header_cells.extend(MONTHS_SHORT.iter().map(|m| (*m).to_string()));
        header_cells.push("Total Anual".to_string());
        let header = Row::new(header_cells).style(Style::default().fg(tp.table_header_fg).bold());

        let mut asis_cells = vec!["QME AS IS".to_string()];
        asis_cells.extend(view.monthly_qme_asis.iter().cloned());
        asis_cells.push(view.total_qme_asis.clone());

        let mut tobe_cells = vec!["QME TO BE".to_string()];
        tobe_cells.extend(view.monthly_qme_tobe.iter().cloned());
        tobe_cells.push(view.total_qme_tobe.clone());

        let mut saving_cells = vec!["ECONOMIA MENSAL".to_string()];
        saving_cells.extend(view.monthly_saving.iter().cloned());
        saving_cells.push(view.total_saving.clone());

        let rows = vec![
            Row::new(asis_cells),
            Row::new(tobe_cells),
            Row::new(saving_cells).style(Style::default().fg(tp.saving_fg)),
        ];

        let mut widths = vec![Constraint::Percentage(10.0)];
        widths.extend((0..12).map(|_| Constraint::Percentage(6.5)));
        widths.push(Constraint::Percentage(12.0));

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title("Agregação Mensal")
                .border_type(BorderType::Rounded),
        );
        let mut ts = TableState::default();
        StatefulWidget::render(&table, area, frame, &mut ts);
    }

    fn render_detail_table(
        frame: &mut Frame<'_>,
        area: Rect,
        view: &DashboardView,
        table_state: &TableState,
    ) {
        let tp = CockpitPalette::current();
        let header = Row::new([
            "#", "PN", "QME AS IS", "MDR AS IS", "QME TO BE", "MDR TO BE", "Vol AS IS",
            "Vol TO BE", "Saving", "Status",
        ])
        .style(Style::default().fg(tp.table_header_fg).bold());

        let rows: Vec<Row> = view
            .detail_rows
            .iter()
            .map(|row| {
                let status_style = match row.badge {
                    StatusBadge::Ok => Style::default().fg(tp.badge_ok_fg),
                    StatusBadge::Warning => Style::default().fg(tp.badge_warn_fg),
                };
                Row::new([
                    row.row.clone(),
                    row.pn.clone(),
                    row.qme_asis.clone(),
                    row.mdr_asis.clone(),
                    row.qme_tobe.clone(),
                    row.mdr_tobe.clone(),
                    row.vol_asis.clone(),
                    row.vol_tobe.clone(),
                    row.savings.clone(),
                    row.status_label.clone(),
                ])
                .style(status_style)
            })
            .collect();

        let widths = [
            Constraint::Percentage(4.0),
            Constraint::Percentage(14.0),
            Constraint::Percentage(10.0),
            Constraint::Percentage(10.0),
            Constraint::Percentage(10.0),
            Constraint::Percentage(10.0),
            Constraint::Percentage(9.0),
            Constraint::Percentage(9.0),
            Constraint::Percentage(12.0),
            Constraint::Percentage(12.0),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title("Detalhes por PN (v para ocultar)")
                .border_type(BorderType::Rounded),
        );
        let mut ds = table_state.clone();
        StatefulWidget::render(&table, area, frame, &mut ds);
    }
}

impl Default for DashScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl CockpitScreen for DashScreen {
    fn update(&mut self, event: &Event, state: &UiSharedState) -> Cmd<ScreenMsg> {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('v') => {
                        // Single boolean flip; no other state changes.
                        self.show_details = !self.show_details;
                    }
                    KeyCode::Char('e') if key.modifiers.contains(Modifiers::CTRL) => {
                        state.request_export();
                    }
                    _ => {}
                }
            }
        }
        Cmd::None
    }

    fn view(&self, frame: &mut Frame<'_>, area: Rect, state: &UiSharedState) {
        if area.height < 4 || area.width < 40 {
            return;
        }

        let Some(result) = state.simulation_snapshot() else {
            // Placeholder visible only while no results exist.
            let block = Block::default()
                .title("Dashboard")
                .border_type(BorderType::Rounded);
            let inner = block.inner(area);
            block.render(area, frame);
            Paragraph::new(PLACEHOLDER_TEXT).render(inner, frame);
            return;
        };

        let view = DashboardView::from_result(&result);

        let cards_h = 3_u16.min(area.height);
        let cards_area = Rect::new(area.x, area.y, area.width, cards_h);
        Self::render_summary_cards(frame, cards_area, &view);

        let remaining_y = area.y + cards_h;
        let remaining_h = area.height.saturating_sub(cards_h);
        if remaining_h == 0 {
            return;
        }

        if self.show_details {
            let monthly_h = (remaining_h / 2).max(6).min(remaining_h);
            let monthly_area = Rect::new(area.x, remaining_y, area.width, monthly_h);
            Self::render_monthly_table(frame, monthly_area, &view);

            let detail_h = remaining_h.saturating_sub(monthly_h);
            if detail_h > 0 {
                let detail_area =
                    Rect::new(area.x, remaining_y + monthly_h, area.width, detail_h);
                Self::render_detail_table(frame, detail_area, &view, &self.table_state);
            }
        } else {
            let monthly_area = Rect::new(area.x, remaining_y, area.width, remaining_h);
            Self::render_monthly_table(frame, monthly_area, &view);
        }
    }

    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![
            HelpEntry {
                key: "v",
                action: "Mostrar/ocultar detalhes por PN",
            },
            HelpEntry {
                key: "Ctrl+E",
                action: "Exportar resultados",
            },
        ]
    }

    fn title(&self) -> &'static str {
        "Dashboard"
    }

    fn tab_label(&self) -> &'static str {
        "Dash"
    }
}
