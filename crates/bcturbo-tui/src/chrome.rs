//! Chrome shell for the cockpit: tab bar, secondary nav, status line,
//! help overlay.
//!
//! Layout: `[tab_bar(1)] [secondary_nav(0|1)] [content(fill)]
//! [status_line(1)]` — the secondary nav row exists only for the
//! dashboard-family modules, per the navigation policy.

use ftui::layout::Rect;
use ftui::text::{Line, Span, Text};
use ftui::widgets::Widget;
use ftui::widgets::block::Block;
use ftui::widgets::borders::BorderType;
use ftui::widgets::paragraph::Paragraph;
use ftui::{Frame, Style};

use crate::screens::{HelpEntry, MODULE_REGISTRY, ModuleFamily, ModuleId, module_meta};
use crate::state::UiSharedState;
use crate::theme::CockpitPalette;

// ──────────────────────────────────────────────────────────────────────
// Chrome layout
// ──────────────────────────────────────────────────────────────────────

/// The regions of the chrome layout.
pub struct ChromeAreas {
    pub tab_bar: Rect,
    pub secondary_nav: Option<Rect>,
    pub content: Rect,
    pub status_line: Rect,
}

/// Split the terminal area into chrome regions. The secondary nav row is
/// allocated only when `secondary_nav_visible` is set.
#[must_use]
pub fn chrome_layout(area: Rect, secondary_nav_visible: bool) -> ChromeAreas {
    let nav_h: u16 = u16::from(secondary_nav_visible);
    let content_h = area.height.saturating_sub(2 + nav_h);
    let tab_bar = Rect::new(area.x, area.y, area.width, 1.min(area.height));
    let secondary_nav = if secondary_nav_visible {
        Some(Rect::new(area.x, area.y + 1, area.width, 1))
    } else {
        None
    };
    let content = Rect::new(area.x, area.y + 1 + nav_h, area.width, content_h);
    let status_line = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(1),
        area.width,
        1.min(area.height),
    );
    ChromeAreas {
        tab_bar,
        secondary_nav,
        content,
        status_line,
    }
}

// ──────────────────────────────────────────────────────────────────────
// Tab bar
// ──────────────────────────────────────────────────────────────────────

/// Render the tab bar into a 1-row area. Exactly one tab is highlighted.
pub fn render_tab_bar(active: ModuleId, frame: &mut Frame<'_>, area: Rect) {
    let tp = CockpitPalette::current();

    // Fill background
    Paragraph::new("")
        .style(Style::default().bg(tp.tab_inactive_bg))
        .render(area, frame);

    let compact = area.width < 80;
    let mut x = area.x;
    for (i, meta) in MODULE_REGISTRY.iter().enumerate() {
        let number = i + 1;
        let label = if compact { meta.short_label } else { meta.title };
        let is_active = meta.id == active;

        let key_str = format!("{number}");
        let tab_width = u16::try_from(1 + key_str.len() + 1 + label.chars().count() + 1)
            .unwrap_or(u16::MAX);
        if x + tab_width > area.x + area.width {
            break;
        }

        let (fg, bg) = if is_active {
            (tp.tab_active_fg, tp.tab_active_bg)
        } else {
            (tp.tab_inactive_fg, tp.tab_inactive_bg)
        };
        let spans = vec![
            Span::styled(" ", Style::default().bg(bg)),
            Span::styled(key_str, Style::default().fg(tp.tab_key_fg).bg(bg)),
            Span::styled(":", Style::default().fg(tp.tab_inactive_fg).bg(bg)),
            Span::styled(label, Style::default().fg(fg).bg(bg)),
            Span::styled(" ", Style::default().bg(bg)),
        ];
        let tab_area = Rect::new(x, area.y, tab_width, 1);
        Paragraph::new(Text::from_lines([Line::from_spans(spans)])).render(tab_area, frame);
        x += tab_width;
    }
}

// ──────────────────────────────────────────────────────────────────────
// Secondary nav
// ──────────────────────────────────────────────────────────────────────

/// Render the secondary navigation bar listing the dashboard-family
/// modules as quick links.
pub fn render_secondary_nav(active: ModuleId, frame: &mut Frame<'_>, area: Rect) {
    let tp = CockpitPalette::current();
    let mut spans = vec![Span::styled(
        " Painéis: ",
        Style::default().fg(tp.status_accent).bg(tp.status_bg),
    )];
    for meta in MODULE_REGISTRY
        .iter()
        .filter(|m| m.family == ModuleFamily::Dashboard)
    {
        let style = if meta.id == active {
            Style::default().fg(tp.tab_active_fg).bg(tp.status_bg).bold()
        } else {
            Style::default().fg(tp.tab_inactive_fg).bg(tp.status_bg)
        };
        spans.push(Span::styled(format!("{} ", meta.short_label), style));
    }
    Paragraph::new(Text::from_lines([Line::from_spans(spans)]))
        .style(Style::default().bg(tp.status_bg))
        .render(area, frame);
}

// ──────────────────────────────────────────────────────────────────────
// Status line
// ──────────────────────────────────────────────────────────────────────

/// Render the status line: folder labels, in-flight indicator, key legend.
pub fn render_status_line(
    state: &UiSharedState,
    active: ModuleId,
    frame: &mut Frame<'_>,
    area: Rect,
) {
    let tp = CockpitPalette::current();
    let folders = state.folders();
    let meta = module_meta(active);

    let folder_span = |label: &str, selected: bool| {
        let color = if selected { tp.status_good } else { tp.status_warn };
        Span::styled(label.to_string(), Style::default().fg(color).bg(tp.status_bg))
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", meta.title),
            Style::default().fg(tp.status_accent).bg(tp.status_bg),
        ),
        Span::styled("| DB: ", Style::default().fg(tp.status_fg).bg(tp.status_bg)),
        folder_span(&folders.database.label, folders.database.is_selected()),
        Span::styled(
            " | Result: ",
            Style::default().fg(tp.status_fg).bg(tp.status_bg),
        ),
        folder_span(&folders.result.label, folders.result.is_selected()),
    ];
    if state.calc_in_flight() {
        spans.push(Span::styled(
            " | simulando…",
            Style::default().fg(tp.status_warn).bg(tp.status_bg),
        ));
    }
    if state.db_select_in_flight() {
        spans.push(Span::styled(
            " | carregando database…",
            Style::default().fg(tp.status_warn).bg(tp.status_bg),
        ));
    }
    spans.push(Span::styled(
        " | Tab troca módulo | F1 ajuda | Ctrl+Q sai",
        Style::default().fg(tp.status_fg).bg(tp.status_bg),
    ));

    Paragraph::new(Text::from_lines([Line::from_spans(spans)]))
        .style(Style::default().bg(tp.status_bg))
        .render(area, frame);
}

// ──────────────────────────────────────────────────────────────────────
// Help overlay
// ──────────────────────────────────────────────────────────────────────

/// Global keybindings shown at the top of the help overlay.
const GLOBAL_BINDINGS: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Próximo / módulo anterior"),
    ("1-9", "Ir direto ao módulo (fora de campos de texto)"),
    ("F1", "Mostrar/ocultar esta ajuda"),
    ("Ctrl+Q / Ctrl+C", "Sair"),
];

/// Render the help overlay centered over `area`.
pub fn render_help_overlay(
    active_title: &str,
    screen_bindings: &[HelpEntry],
    frame: &mut Frame<'_>,
    area: Rect,
) {
    let tp = CockpitPalette::current();
    let width = area.width.min(64);
    let height = area
        .height
        .min((GLOBAL_BINDINGS.len() + screen_bindings.len() + 6) as u16);
    if width < 20 || height < 5 {
        return;
    }
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let overlay = Rect::new(x, y, width, height);

    let help_title = format!("Ajuda — {active_title}");
    let block = Block::default()
        .title(help_title.as_str())
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(tp.help_border_fg));
    let inner = block.inner(overlay);
    Paragraph::new("")
        .style(Style::default().bg(tp.help_bg))
        .render(overlay, frame);
    block.render(overlay, frame);

    let mut lines: Vec<Line> = Vec::new();
    for (key, action) in GLOBAL_BINDINGS {
        lines.push(Line::from_spans(vec![
            Span::styled(
                format!("{key:>16}  "),
                Style::default().fg(tp.help_key_fg).bg(tp.help_bg),
            ),
            Span::styled(
                (*action).to_string(),
                Style::default().fg(tp.help_fg).bg(tp.help_bg),
            ),
        ]));
    }
    if !screen_bindings.is_empty() {
        lines.push(Line::from_spans(vec![Span::styled(
            String::new(),
            Style::default().bg(tp.help_bg),
        )]));
        for entry in screen_bindings {
            lines.push(Line::from_spans(vec![
                Span::styled(
                    format!("{:>16}  ", entry.key),
                    Style::default().fg(tp.help_key_fg).bg(tp.help_bg),
                ),
                Span::styled(
                    entry.action.to_string(),
                    Style::default().fg(tp.help_fg).bg(tp.help_bg),
                ),
            ]));
        }
    }
    Paragraph::new(Text::from_lines(lines))
        .style(Style::default().bg(tp.help_bg))
        .render(inner, frame);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_without_secondary_nav() {
        let areas = chrome_layout(Rect::new(0, 0, 100, 30), false);
        assert_eq!(areas.tab_bar.height, 1);
        assert!(areas.secondary_nav.is_none());
        assert_eq!(areas.content.y, 1);
        assert_eq!(areas.content.height, 28);
        assert_eq!(areas.status_line.y, 29);
    }

    #[test]
    fn layout_with_secondary_nav() {
        let areas = chrome_layout(Rect::new(0, 0, 100, 30), true);
        let nav = areas.secondary_nav.expect("nav row");
        assert_eq!(nav.y, 1);
        assert_eq!(areas.content.y, 2);
        assert_eq!(areas.content.height, 27);
    }

    #[test]
    fn layout_survives_tiny_terminal() {
        let areas = chrome_layout(Rect::new(0, 0, 10, 1), true);
        assert_eq!(areas.content.height, 0);
        assert_eq!(areas.tab_bar.height, 1);
    }

    #[test]
    fn tab_bar_renders_without_panic() {
        let mut pool = ftui::GraphemePool::new();
        {
            let mut frame = Frame::new(120, 1, &mut pool);
            render_tab_bar(ModuleId::Qme, &mut frame, Rect::new(0, 0, 120, 1));
        }
        // Narrow terminal takes the compact path.
        let mut frame = Frame::new(40, 1, &mut pool);
        render_tab_bar(ModuleId::Dash, &mut frame, Rect::new(0, 0, 40, 1));
    }

    #[test]
    fn secondary_nav_lists_dashboard_family() {
        let mut pool = ftui::GraphemePool::new();
        let mut frame = Frame::new(120, 1, &mut pool);
        render_secondary_nav(ModuleId::Dash, &mut frame, Rect::new(0, 0, 120, 1));
    }

    #[test]
    fn help_overlay_renders_without_panic() {
        let mut pool = ftui::GraphemePool::new();
        let mut frame = Frame::new(100, 30, &mut pool);
        let bindings = vec![HelpEntry {
            key: "v",
            action: "Alternar detalhes",
        }];
        render_help_overlay("Dashboard", &bindings, &mut frame, Rect::new(0, 0, 100, 30));
    }
}
