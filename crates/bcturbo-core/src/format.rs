//! pt-BR display formatting for quantities and currency.
//!
//! The original front-end leaned on `toLocaleString('pt-BR')`; these
//! helpers reproduce the same shapes: `.` as the thousands separator,
//! `,` as the decimal separator, `R$` currency prefix.

/// Calendar months in display order, as the backend keys its monthly maps.
pub const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Abbreviated month labels for narrow table columns.
pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Format a value with pt-BR separators and a fixed number of decimals.
///
/// `format_decimal_br(1234.5, 2)` → `"1.234,50"`.
#[must_use]
pub fn format_decimal_br(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rounded.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit);
    }

    let mut out = String::new();
    if negative && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Format a currency value: `format_brl(1234.5)` → `"R$ 1.234,50"`.
#[must_use]
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal_br(value, 2))
}

/// Format a quantity with zero decimals and no grouping, mirroring the
/// original dashboard's `toFixed(0)` cells.
#[must_use]
pub fn format_qty(value: f64) -> String {
    format!("{value:.0}")
}
