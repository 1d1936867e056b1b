use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::cli::{process_file, ModelArgs};
use crate::error::Result;
use crate::export::{export_csv, DEFAULT_EXPORT_NAME};
use crate::fmt::{compact, percent};
use crate::models::{Transaction, TransactionTable, TxnType};
use crate::reports::{self, category_advice, CategoryTotal, FilterSelection, Snapshot, SpendBand};
use crate::tui::{
    money_span, type_style, wrap_text, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE, WARNING_STYLE,
};

const FILTER_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Types,
    Categories,
}

pub struct Dashboard {
    source: String,
    table: TransactionTable,
    types: Vec<TxnType>,
    type_on: Vec<bool>,
    categories: Vec<String>,
    category_on: Vec<bool>,
    focus: Focus,
    type_cursor: usize,
    category_cursor: usize,
    snapshot: Snapshot,
    show_list: bool,
    list_offset: usize,
    export_path: PathBuf,
    status_message: Option<String>,
}

impl Dashboard {
    pub fn new(source: String, table: TransactionTable, export_path: PathBuf) -> Self {
        let all = FilterSelection::all(&table);
        let mut dash = Self {
            source,
            type_on: vec![true; all.types.len()],
            types: all.types,
            category_on: vec![true; all.categories.len()],
            categories: all.categories,
            table,
            focus: Focus::Types,
            type_cursor: 0,
            category_cursor: 0,
            snapshot: reports::snapshot(&[]),
            show_list: false,
            list_offset: 0,
            export_path,
            status_message: None,
        };
        dash.refresh();
        dash
    }

    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            types: self
                .types
                .iter()
                .zip(&self.type_on)
                .filter(|(_, on)| **on)
                .map(|(t, _)| *t)
                .collect(),
            categories: self
                .categories
                .iter()
                .zip(&self.category_on)
                .filter(|(_, on)| **on)
                .map(|(c, _)| c.clone())
                .collect(),
        }
    }

    fn filtered(&self) -> Vec<&Transaction> {
        reports::filter(&self.table, &self.selection())
    }

    /// Recompute the snapshot from scratch for the current selection.
    fn refresh(&mut self) {
        let snap = reports::snapshot(&self.filtered());
        self.snapshot = snap;
        self.list_offset = 0;
    }

    fn toggle_current(&mut self) {
        match self.focus {
            Focus::Types => {
                if let Some(on) = self.type_on.get_mut(self.type_cursor) {
                    *on = !*on;
                }
            }
            Focus::Categories => {
                if let Some(on) = self.category_on.get_mut(self.category_cursor) {
                    *on = !*on;
                }
            }
        }
        self.refresh();
    }

    fn set_all(&mut self, value: bool) {
        match self.focus {
            Focus::Types => self.type_on.iter_mut().for_each(|on| *on = value),
            Focus::Categories => self.category_on.iter_mut().for_each(|on| *on = value),
        }
        self.refresh();
    }

    fn move_cursor(&mut self, down: bool) {
        let (cursor, len) = match self.focus {
            Focus::Types => (&mut self.type_cursor, self.types.len()),
            Focus::Categories => (&mut self.category_cursor, self.categories.len()),
        };
        if down {
            *cursor = (*cursor + 1).min(len.saturating_sub(1));
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    fn export(&mut self) {
        let msg = {
            let rows = self.filtered();
            match export_csv(&rows, &self.export_path) {
                Ok(()) => format!(
                    "Wrote {} transactions to {}",
                    rows.len(),
                    self.export_path.display()
                ),
                Err(e) => format!("Export failed: {e}"),
            }
        };
        self.status_message = Some(msg);
    }

    /// Returns true when the dashboard should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        self.status_message = None;
        if self.show_list {
            match code {
                KeyCode::Up => self.list_offset = self.list_offset.saturating_sub(1),
                KeyCode::Down => {
                    self.list_offset = (self.list_offset + 1).min(self.snapshot.count.saturating_sub(1))
                }
                KeyCode::Char('l') | KeyCode::Esc => self.show_list = false,
                KeyCode::Char('e') => self.export(),
                KeyCode::Char('q') => return true,
                _ => {}
            }
            return false;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Types => Focus::Categories,
                    Focus::Categories => Focus::Types,
                }
            }
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('a') => self.set_all(true),
            KeyCode::Char('n') => self.set_all(false),
            KeyCode::Char('l') => {
                self.show_list = true;
                self.list_offset = 0;
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);
        let filter_height = (self.types.len().max(self.categories.len()).min(FILTER_ROWS) + 1) as u16;

        let [header_area, sep1, metrics_area, sep2, body_area, sep3, filter_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(filter_height),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(format!(
                " smsfin: {} transactions from {}",
                self.table.len(),
                self.source
            ))
            .style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(border_style);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget, sep3);

        self.draw_metrics(frame, metrics_area);

        if self.show_list {
            self.draw_list(frame, body_area);
        } else if self.snapshot.is_empty() {
            frame.render_widget(
                Paragraph::new(" No transactions match the selected filters.").style(WARNING_STYLE),
                body_area,
            );
        } else {
            let [chart_area, advisor_area] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(body_area);
            self.draw_chart(frame, chart_area);
            self.draw_advisor(frame, advisor_area);
        }

        self.draw_filters(frame, filter_area);

        let footer = if let Some(msg) = &self.status_message {
            Paragraph::new(format!(" {msg}")).style(WARNING_STYLE)
        } else if self.show_list {
            Paragraph::new(" Up/Down=scroll  l/Esc=back  e=export  q=quit").style(FOOTER_STYLE)
        } else {
            Paragraph::new(
                " Tab=switch filter  Up/Down=move  Space=toggle  a=all  n=none  l=list  e=export  q=quit",
            )
            .style(FOOTER_STYLE)
        };
        frame.render_widget(footer, footer_area);
    }

    fn draw_metrics(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" Total Spent "),
            money_span(self.snapshot.total_spent, TxnType::Debit),
            Span::raw("    Total Credited "),
            money_span(self.snapshot.total_credited, TxnType::Credit),
            Span::raw("    Top Category "),
            Span::styled(
                self.snapshot.top_category.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect) {
        let bars: Vec<Bar> = self
            .snapshot
            .categories
            .iter()
            .map(|c| {
                Bar::default()
                    .value(c.total.max(0.0).round() as u64)
                    .label(Line::from(c.name.clone()))
                    .text_value(format!("{} ({:.0}%)", compact(c.total), c.pct))
            })
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title("Spending by Category")
                    .title_style(Style::default().add_modifier(Modifier::BOLD))
                    .borders(Borders::NONE),
            )
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_advisor(&self, frame: &mut Frame, area: Rect) {
        let [title_area, legend_area, gauge_area, text_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(if self.snapshot.spend_ratio.is_some() { 2 } else { 0 }),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Smart Savings Advisor",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            title_area,
        );
        frame.render_widget(
            Paragraph::new(breakdown_legend(&self.snapshot.categories)).style(FOOTER_STYLE),
            legend_area,
        );

        let mut text = String::new();
        if let (Some(ratio), Some(band)) = (self.snapshot.spend_ratio, self.snapshot.band()) {
            let color = match band {
                SpendBand::Over80 => Color::Red,
                SpendBand::Between60And80 => Color::Yellow,
                SpendBand::Healthy => Color::Green,
            };
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(format!("Spending to Income Ratio: {}", percent(ratio)));
            frame.render_widget(gauge, gauge_area);
            text.push_str(band.message());
            text.push_str("\n\n");
        }
        text.push_str(category_advice(&self.snapshot.top_category));

        let width = text_area.width as usize;
        let wrapped: Vec<String> = text
            .split('\n')
            .map(|para| wrap_text(para, width).0)
            .collect();
        frame.render_widget(Paragraph::new(wrapped.join("\n")), text_area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .filtered()
            .into_iter()
            .skip(self.list_offset)
            .map(|t| {
                Row::new(vec![
                    Cell::from(t.sms.clone()),
                    Cell::from(money_span(t.amount, t.txn_type)),
                    Cell::from(Span::styled(t.txn_type.as_str(), type_style(t.txn_type))),
                    Cell::from(t.category.clone()),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Fill(1),
                Constraint::Length(14),
                Constraint::Length(8),
                Constraint::Length(16),
            ],
        )
        .header(Row::new(vec!["SMS", "Amount", "Type", "Category"]).style(HEADER_STYLE));
        frame.render_widget(table, area);
    }

    fn draw_filters(&self, frame: &mut Frame, area: Rect) {
        let [type_area, cat_area] =
            Layout::horizontal([Constraint::Percentage(30), Constraint::Percentage(70)])
                .areas(area);

        let type_labels: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
        frame.render_widget(
            Paragraph::new(filter_lines(
                "Transaction Type",
                &type_labels,
                &self.type_on,
                self.type_cursor,
                self.focus == Focus::Types,
            )),
            type_area,
        );
        frame.render_widget(
            Paragraph::new(filter_lines(
                "Category",
                &self.categories,
                &self.category_on,
                self.category_cursor,
                self.focus == Focus::Categories,
            )),
            cat_area,
        );
    }
}

/// Checkbox list, scrolled so the cursor stays within FILTER_ROWS lines.
fn filter_lines(
    title: &str,
    labels: &[String],
    on: &[bool],
    cursor: usize,
    focused: bool,
) -> Vec<Line<'static>> {
    let title_style = if focused {
        HEADER_STYLE
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(format!(" {title}"), title_style))];
    let start = (cursor + 1).saturating_sub(FILTER_ROWS);
    for (i, (label, checked)) in labels.iter().zip(on).enumerate().skip(start).take(FILTER_ROWS) {
        let mark = if *checked { "[x]" } else { "[ ]" };
        let style = if focused && i == cursor {
            SELECTED_STYLE
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!(" {mark} {label}"), style)));
    }
    lines
}

/// Run the interactive dashboard. Sets up the terminal, event loop,
/// and panic hook, then restores the terminal on exit.
pub fn run(file: &str, model: &ModelArgs) -> Result<()> {
    let processed = process_file(file, model)?;
    let mut dash = Dashboard::new(
        file.to_string(),
        processed.table,
        PathBuf::from(DEFAULT_EXPORT_NAME),
    );
    if !processed.warnings.is_empty() {
        let joined: Vec<String> = processed.warnings.iter().map(|w| w.to_string()).collect();
        dash.status_message = Some(format!("Warning: {}", joined.join(" ")));
    }

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| dash.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break Ok(());
                }
                if dash.handle_key(key.code) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

/// Expense breakdown as one line of category shares, largest first.
fn breakdown_legend(categories: &[CategoryTotal]) -> String {
    if categories.is_empty() {
        return "Breakdown: no data".to_string();
    }
    let parts: Vec<String> = categories
        .iter()
        .map(|c| format!("{} {:.0}%", c.name, c.pct))
        .collect();
    format!("Breakdown: {}", parts.join(" | "))
}
