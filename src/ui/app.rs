use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, TableState, Wrap};
use ratatui::Frame;

use crate::db::RecordStore;
use crate::models::Record;
use crate::nav::{NavBar, NavItem};

use super::forms::{RecordField, RecordForm};
use super::helpers::{centered_rect, surface_error};
use super::table;

/// Header space reserved for the navigation row.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Fine-grained input modes. Keeping this explicit makes it easy to reason
/// about which overlay is on screen and what keyboard input should do.
enum Mode {
    Normal,
    AddingRecord(RecordForm),
    Menu(MenuState),
    RecordDetails { index: usize },
}

/// State of the compact menu overlay. Built once from the loaded navigation
/// entries the first time the menu opens, then stashed between toggles so
/// the selection survives.
struct MenuState {
    items: Vec<NavItem>,
    selected: usize,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the record store
/// outright; the rendering side only ever sees `store.records()`.
pub struct App {
    store: RecordStore,
    navbar: NavBar,
    route: String,
    mode: Mode,
    menu: Option<MenuState>,
    status: Option<StatusMessage>,
    table: TableState,
}

impl App {
    pub fn new(store: RecordStore, navbar: NavBar, route: String) -> Self {
        let mut table = TableState::default();
        if !store.is_empty() {
            table.select(Some(0));
        }
        Self {
            store,
            navbar,
            route,
            mode: Mode::Normal,
            menu: None,
            status: None,
            table,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingRecord(form) => self.handle_add_record(code, form)?,
            Mode::Menu(menu) => self.handle_menu(code, menu)?,
            Mode::RecordDetails { index } => self.handle_details(code, index)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('a') | KeyCode::Char('+') => {
                return Ok(Mode::AddingRecord(RecordForm::default()));
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if let Some(index) = self.table.selected().filter(|i| *i < self.store.len()) {
                    return Ok(Mode::RecordDetails { index });
                }
                self.set_status("No entry selected.", StatusKind::Error);
            }
            KeyCode::Char('m') => {
                if let Some(menu) = self.open_menu() {
                    return Ok(Mode::Menu(menu));
                }
            }
            KeyCode::Char('n') => {
                self.set_status("Notifications feature coming soon!", StatusKind::Info);
            }
            _ => {}
        }

        Ok(Mode::Normal)
    }

    fn handle_add_record(&mut self, code: KeyCode, mut form: RecordForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add entry cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_record(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingRecord(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_menu(&mut self, code: KeyCode, mut menu: MenuState) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('m') => {
                self.menu = Some(menu);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                menu.selected = menu.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if menu.selected + 1 < menu.items.len() {
                    menu.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(item) = menu.items.get(menu.selected) {
                    self.route = item.target.clone();
                    self.set_status(format!("Switched to {}.", item.label), StatusKind::Info);
                }
                self.menu = Some(menu);
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        Ok(Mode::Menu(menu))
    }

    fn handle_details(&mut self, code: KeyCode, index: usize) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Ok(Mode::Normal),
            _ => Ok(Mode::RecordDetails { index }),
        }
    }

    /// Validate the form, stamp a fresh record, and persist it. The table
    /// picks the new entry up on the next draw since every frame rebuilds
    /// from the store.
    fn save_new_record(&mut self, form: &RecordForm) -> Result<()> {
        let (reel_code, weight, zone) = form.parse_inputs()?;
        let record = Record::new(reel_code, weight, zone);
        let reel = record.reel_code.clone();
        self.store.append(record)?;
        self.table.select(Some(self.store.len() - 1));
        self.set_status(format!("Entry for reel {reel} saved."), StatusKind::Info);
        Ok(())
    }

    /// Hand back the stashed menu, or build it from the navigation entries
    /// on first use. With nothing loaded there is nothing to build.
    fn open_menu(&mut self) -> Option<MenuState> {
        if let Some(menu) = self.menu.take() {
            return Some(menu);
        }
        let items = self.navbar.items();
        if items.is_empty() {
            self.set_status("Navigation menu is not available.", StatusKind::Error);
            return None;
        }
        Some(MenuState {
            items: items.to_vec(),
            selected: 0,
        })
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.store.len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + offset).clamp(0, len as isize - 1) as usize;
        self.table.select(Some(next));
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Whether the header should carry its scrolled accent. Mirrors the
    /// page-shadow rule: accented while the table sits past the top.
    fn header_accented(&self) -> bool {
        self.table.offset() > 0
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        table::render(frame, chunks[1], self.store.records(), &mut self.table);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingRecord(form) => self.draw_record_form(frame, area, form),
            Mode::Menu(menu) => self.draw_menu(frame, area, menu),
            Mode::RecordDetails { index } => self.draw_details(frame, area, *index),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title("Inward Register");
        if self.header_accented() {
            block = block.border_type(BorderType::Thick);
        }

        let line = match &self.navbar {
            NavBar::Failed { message } => Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
            NavBar::Loaded { items } => {
                if items.is_empty() {
                    Line::from(Span::styled(
                        "(no navigation entries)",
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut spans = Vec::with_capacity(items.len() * 2);
                    for (idx, item) in items.iter().enumerate() {
                        if idx > 0 {
                            spans.push(Span::raw("   "));
                        }
                        let style = if item.is_active(&self.route) {
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                        } else {
                            Style::default()
                        };
                        spans.push(Span::styled(item.label.clone(), style));
                    }
                    Line::from(spans)
                }
            }
        };

        let paragraph = Paragraph::new(line)
            .alignment(Alignment::Left)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = Line::from(Span::styled(
            "a: add entry  ↑/↓: scroll  Enter: details  m: menu  n: notifications  q: quit",
            Style::default().fg(Color::DarkGray),
        ));

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_record_form(&self, frame: &mut Frame, area: Rect, form: &RecordForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Inward Entry").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let reel_line = form.build_line("Reel code", RecordField::ReelCode);
        let weight_line = form.build_line("Weight", RecordField::Weight);
        let zone_line = form.build_line("Zone", RecordField::Zone);

        let mut lines = vec![reel_line, weight_line, zone_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            RecordField::ReelCode => ("Reel code: ".len() as u16, 0),
            RecordField::Weight => ("Weight: ".len() as u16, 1),
            RecordField::Zone => ("Zone: ".len() as u16, 2),
        };
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect, menu: &MenuState) {
        let popup_area = centered_rect(40, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Menu").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = menu
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let mut style = if item.is_active(&self.route) {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                if idx == menu.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(item.label.clone(), style))
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to open • Esc to close",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, index: usize) {
        let Some(record) = self.store.records().get(index) else {
            return;
        };

        let popup_area = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Entry Details").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Date:      {}", record.date)),
            Line::from(format!("Time:      {}", record.time)),
            Line::from(format!("Reel code: {}", record.reel_code)),
            Line::from(format!("Weight:    {}", record.weight_display())),
            Line::from(format!("Zone:      {}", record.zone)),
            Line::from(vec![
                Span::raw("Status:    "),
                Span::styled(
                    record.status.to_string(),
                    table::status_style(&record.status),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Esc to close",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;
    use crate::models::Status;
    use rusqlite::Connection;

    fn empty_app(navbar: NavBar) -> App {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        App::new(RecordStore::open(conn), navbar, "/inward.html".to_string())
    }

    fn loaded_navbar() -> NavBar {
        NavBar::Loaded {
            items: vec![
                NavItem {
                    label: "Dashboard".to_string(),
                    target: "/".to_string(),
                },
                NavItem {
                    label: "Inward".to_string(),
                    target: "/inward.html".to_string(),
                },
            ],
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn form_submission_appends_a_pending_record() {
        let mut app = empty_app(loaded_navbar());

        app.handle_key(KeyCode::Char('a')).unwrap();
        type_text(&mut app, "R1");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "12.5");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "A");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.store.len(), 1);
        let record = &app.store.records()[0];
        assert_eq!(record.reel_code, "R1");
        assert_eq!(record.weight, 12.5);
        assert_eq!(record.zone, "A");
        assert_eq!(record.status, Status::Pending);
        assert_eq!(record.weight_display(), "12.5 kg");
    }

    #[test]
    fn invalid_form_stays_open_with_an_error() {
        let mut app = empty_app(loaded_navbar());

        app.handle_key(KeyCode::Char('a')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::AddingRecord(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open on invalid input"),
        }
        assert_eq!(app.store.len(), 0);
    }

    #[test]
    fn menu_is_built_lazily_and_stashed_between_toggles() {
        let mut app = empty_app(loaded_navbar());
        assert!(app.menu.is_none());

        app.handle_key(KeyCode::Char('m')).unwrap();
        let Mode::Menu(_) = &app.mode else {
            panic!("menu should open");
        };

        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(matches!(app.mode, Mode::Normal));

        // Reopening hands back the same state, selection included.
        app.handle_key(KeyCode::Char('m')).unwrap();
        match &app.mode {
            Mode::Menu(menu) => assert_eq!(menu.selected, 1),
            _ => panic!("menu should reopen"),
        }
    }

    #[test]
    fn menu_toggle_reports_when_nothing_loaded() {
        let mut app = empty_app(NavBar::Failed {
            message: "Error: Could not load navigation bar.".to_string(),
        });

        app.handle_key(KeyCode::Char('m')).unwrap();
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.status.is_some());
    }

    #[test]
    fn menu_selection_switches_the_active_route() {
        let mut app = empty_app(loaded_navbar());

        app.handle_key(KeyCode::Char('m')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.route, "/");
    }

    #[test]
    fn header_accent_follows_table_scroll() {
        let mut app = empty_app(loaded_navbar());
        assert!(!app.header_accented());

        app.table = TableState::default().with_offset(3);
        assert!(app.header_accented());
    }
}
