use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::money;
use crate::models::TxnType;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const CREDIT_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const DEBIT_STYLE: Style = Style::new().fg(Color::Red);
pub const UNKNOWN_STYLE: Style = Style::new().fg(Color::Gray);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const WARNING_STYLE: Style = Style::new().fg(Color::Yellow);

pub fn type_style(txn_type: TxnType) -> Style {
    match txn_type {
        TxnType::Debit => DEBIT_STYLE,
        TxnType::Credit => CREDIT_STYLE,
        TxnType::Unknown => UNKNOWN_STYLE,
    }
}

/// Amount colored by transaction type (red for money out, green for money in).
pub fn money_span(amount: f64, txn_type: TxnType) -> Span<'static> {
    Span::styled(money(amount), type_style(txn_type))
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}
