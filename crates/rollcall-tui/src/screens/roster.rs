//! Roster screen — the full activity catalog plus the signup form.
//!
//! Render state is rebuilt wholesale from every catalog snapshot: the
//! row list, the signup selector, and the withdraw parameters carried
//! by participant rows are all derived from the latest `RosterLoaded`
//! and nothing survives from the previous snapshot. That is the whole
//! synchronization contract — there are no stale bindings to manage
//! because there are no retained bindings at all.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use rollcall_api::Catalog;

use crate::action::{Action, PendingWithdraw};
use crate::component::Component;
use crate::theme;
use crate::widgets::availability::{availability_span, spots_label};
use crate::widgets::input::apply_key;

/// One rendered row in the roster list.
///
/// Participant rows carry the owning activity name and the participant
/// email — the two opaque parameters the withdraw command needs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RosterRow {
    Activity(String),
    Participant { activity: String, email: String },
    NoParticipants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    /// Startup, before the first snapshot has arrived.
    Loading,
    Loaded,
    /// The last fetch failed; the previous snapshot was discarded.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Email,
    Activity,
}

pub struct RosterScreen {
    focused: bool,
    catalog: Arc<Catalog>,
    rows: Vec<RosterRow>,
    list_state: ListState,
    load_state: LoadState,
    refreshing: bool,
    // Signup form
    form_active: bool,
    form_field: FormField,
    email: Input,
    open_activities: Vec<String>,
    choice: usize,
    signup_in_flight: bool,
    throbber: throbber_widgets_tui::ThrobberState,
}

/// Flatten a catalog snapshot into render rows, in server order.
fn build_rows(catalog: &Catalog) -> Vec<RosterRow> {
    let mut rows = Vec::new();
    for (name, activity) in catalog {
        rows.push(RosterRow::Activity(name.clone()));
        if activity.participants.is_empty() {
            rows.push(RosterRow::NoParticipants);
        } else {
            for email in &activity.participants {
                rows.push(RosterRow::Participant {
                    activity: name.clone(),
                    email: email.clone(),
                });
            }
        }
    }
    rows
}

/// The signup selector population: activity names with strictly
/// positive remaining capacity, in catalog order.
fn open_activity_names(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .filter(|(_, activity)| activity.is_selectable())
        .map(|(name, _)| name.clone())
        .collect()
}

impl RosterScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            catalog: Arc::new(Catalog::default()),
            rows: Vec::new(),
            list_state: ListState::default(),
            load_state: LoadState::Loading,
            refreshing: false,
            form_active: false,
            form_field: FormField::Email,
            email: Input::default(),
            open_activities: Vec::new(),
            choice: 0,
            signup_in_flight: false,
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        if self.rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(idx.min(self.rows.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = isize::try_from(self.selected_index()).unwrap_or(0);
        let max = isize::try_from(self.rows.len()).unwrap_or(isize::MAX) - 1;
        let next = (current + delta).clamp(0, max);
        self.select(usize::try_from(next).unwrap_or(0));
    }

    /// Replace all render state with a fresh snapshot. Whatever arrives
    /// last owns the list and the selector.
    fn apply_snapshot(&mut self, catalog: Arc<Catalog>) {
        self.refreshing = false;
        self.load_state = LoadState::Loaded;
        self.rows = build_rows(&catalog);
        self.open_activities = open_activity_names(&catalog);
        self.catalog = catalog;
        if self.open_activities.is_empty() {
            self.choice = 0;
        } else {
            self.choice = self.choice.min(self.open_activities.len() - 1);
        }
        self.select(self.selected_index());
    }

    /// Discard everything after a failed fetch: the roster area shows a
    /// single generic notice, never partial state.
    fn apply_failure(&mut self) {
        self.refreshing = false;
        self.load_state = LoadState::Failed;
        self.catalog = Arc::new(Catalog::default());
        self.rows.clear();
        self.open_activities.clear();
        self.choice = 0;
        self.list_state.select(None);
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => {
                self.form_active = false;
                Ok(None)
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.form_field = match self.form_field {
                    FormField::Email => FormField::Activity,
                    FormField::Activity => FormField::Email,
                };
                Ok(None)
            }
            KeyCode::Enter => Ok(self.submit()),
            KeyCode::Up if self.form_field == FormField::Activity => {
                if self.choice > 0 {
                    self.choice -= 1;
                }
                Ok(None)
            }
            KeyCode::Down if self.form_field == FormField::Activity => {
                if !self.open_activities.is_empty() {
                    self.choice = (self.choice + 1).min(self.open_activities.len() - 1);
                }
                Ok(None)
            }
            _ => {
                if self.form_field == FormField::Email {
                    apply_key(&mut self.email, key);
                }
                Ok(None)
            }
        }
    }

    /// Submit the signup form. Presence is the only client-side
    /// constraint on the email; the service is the validator of record.
    fn submit(&mut self) -> Option<Action> {
        let email = self.email.value().trim().to_owned();
        if email.is_empty() {
            return None;
        }
        let activity = self.open_activities.get(self.choice)?.clone();
        self.signup_in_flight = true;
        Some(Action::SubmitSignup { activity, email })
    }

    fn line_for_row(&self, row: &RosterRow) -> Line<'static> {
        match row {
            RosterRow::Activity(name) => {
                let availability = self
                    .catalog
                    .get(name)
                    .map(rollcall_api::Activity::availability);
                let mut spans = vec![Span::styled(name.clone(), theme::activity_name())];
                if let Some(availability) = availability {
                    spans.push(Span::raw("  "));
                    spans.push(availability_span(availability));
                }
                Line::from(spans)
            }
            RosterRow::Participant { email, .. } => Line::from(Span::styled(
                format!("    • {email}"),
                theme::list_row(),
            )),
            RosterRow::NoParticipants => Line::from(Span::styled(
                "      (no participants yet)",
                theme::placeholder(),
            )),
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // list
            Constraint::Length(1), // hints
        ])
        .split(area);

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| ListItem::new(self.line_for_row(row)))
            .collect();

        let list = List::new(items).highlight_style(theme::list_selected());

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("move  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("withdraw  ", theme::key_hint()),
            Span::styled("s ", theme::key_hint_key()),
            Span::styled("sign up  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let throbber = throbber_widgets_tui::Throbber::default()
            .label("Loading activities...")
            .style(theme::key_hint());
        let mut state = self.throbber.clone();
        let line = Rect {
            height: 1.min(area.height),
            ..area
        };
        frame.render_stateful_widget(throbber, line, &mut state);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Sign Up ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.form_active {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let email_active = self.form_active && self.form_field == FormField::Email;
        let selector_active = self.form_active && self.form_field == FormField::Activity;

        let mut lines = vec![
            Line::from(Span::styled(
                " Email",
                if email_active {
                    theme::title_style()
                } else {
                    theme::key_hint()
                },
            )),
            Line::from(vec![
                Span::styled(format!("   {}", self.email.value()), theme::list_row()),
                Span::styled(if email_active { "▏" } else { "" }, theme::tab_active()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " Activity",
                if selector_active {
                    theme::title_style()
                } else {
                    theme::key_hint()
                },
            )),
        ];

        if self.open_activities.is_empty() {
            lines.push(Line::from(Span::styled(
                "   (no open activities)",
                theme::placeholder(),
            )));
        } else {
            for (i, name) in self.open_activities.iter().enumerate() {
                let marker = if i == self.choice { " ▸ " } else { "   " };
                let spots = self
                    .catalog
                    .get(name)
                    .map(|a| spots_label(a.availability()))
                    .unwrap_or_default();
                let style = if i == self.choice {
                    theme::list_selected()
                } else {
                    theme::list_row()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("{marker}{name}"), style),
                    Span::styled(format!("  ·  {spots}"), theme::key_hint()),
                ]));
            }
        }

        lines.push(Line::from(""));
        if self.signup_in_flight {
            lines.push(Line::from(Span::styled(
                " Submitting...",
                theme::key_hint(),
            )));
        } else if self.form_active {
            lines.push(Line::from(vec![
                Span::styled(" Tab ", theme::key_hint_key()),
                Span::styled("field  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("submit  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(" s ", theme::key_hint_key()),
                Span::styled("to open the form", theme::key_hint()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

/// The single generic failure notice. All-or-nothing rendering: a
/// failed fetch never leaves partial rows behind it.
fn render_failure(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Could not load activities.",
            theme::status_error(),
        )),
        Line::from(Span::styled(
            "  The sign-up service may be offline.",
            theme::list_row(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  r ", theme::key_hint_key()),
            Span::styled("retry", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

impl Component for RosterScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form_active {
            return self.handle_form_key(key);
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Ok(None)
            }
            KeyCode::Char('g') => {
                self.select(0);
                Ok(None)
            }
            KeyCode::Char('G') => {
                if !self.rows.is_empty() {
                    self.select(self.rows.len() - 1);
                }
                Ok(None)
            }
            KeyCode::Char('r') => Ok(Some(Action::RefreshRoster)),
            KeyCode::Char('s') => {
                self.form_active = true;
                self.form_field = FormField::Email;
                Ok(None)
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                match self.rows.get(self.selected_index()) {
                    Some(RosterRow::Participant { activity, email }) => {
                        Ok(Some(Action::ShowConfirm(PendingWithdraw {
                            activity: activity.clone(),
                            email: email.clone(),
                        })))
                    }
                    _ => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RefreshRoster => self.refreshing = true,
            Action::RosterLoaded(catalog) => self.apply_snapshot(Arc::clone(catalog)),
            Action::RosterFailed => self.apply_failure(),
            Action::SignupSucceeded { .. } => {
                // Success resets the form; failure leaves the user's
                // in-progress input alone.
                self.signup_in_flight = false;
                self.email.reset();
                self.choice = 0;
            }
            Action::SignupFailed { .. } => self.signup_in_flight = false,
            Action::Tick => {
                if self.refreshing
                    || self.signup_in_flight
                    || self.load_state == LoadState::Loading
                {
                    self.throbber.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let panes = Layout::horizontal([Constraint::Min(44), Constraint::Length(38)]).split(area);

        let count = self.catalog.len();
        let title = match self.load_state {
            LoadState::Loaded if self.refreshing => format!(" Activities ({count}) · refreshing "),
            LoadState::Loaded => format!(" Activities ({count}) "),
            LoadState::Loading | LoadState::Failed => " Activities ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused && !self.form_active {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(panes[0]);
        frame.render_widget(block, panes[0]);

        match self.load_state {
            LoadState::Loading => self.render_loading(frame, inner),
            LoadState::Failed => render_failure(frame, inner),
            LoadState::Loaded => self.render_list(frame, inner),
        }

        self.render_form(frame, panes[1]);
    }

    fn capturing_input(&self) -> bool {
        self.form_active
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "Roster"
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rollcall_api::Activity;

    use super::*;

    fn activity(max: u32, participants: &[&str]) -> Activity {
        Activity {
            description: "desc".into(),
            schedule: "sched".into(),
            max_participants: max,
            participants: participants.iter().map(|&p| p.to_owned()).collect(),
        }
    }

    fn catalog() -> Arc<Catalog> {
        let mut map = IndexMap::new();
        map.insert("Chess Club".to_owned(), activity(12, &["michael@mergington.edu"]));
        map.insert("Robotics Workshop".to_owned(), activity(2, &["alice@mergington.edu"]));
        map.insert(
            "Drama Club".to_owned(),
            activity(2, &["maya@mergington.edu", "leo@mergington.edu"]),
        );
        map.insert("Art Studio".to_owned(), activity(18, &[]));
        Arc::new(map)
    }

    #[test]
    fn selector_contains_exactly_the_open_activities_in_order() {
        let names = open_activity_names(&catalog());
        // Drama Club is full (2/2) and must not be offered.
        assert_eq!(names, vec!["Chess Club", "Robotics Workshop", "Art Studio"]);
    }

    #[test]
    fn rows_carry_withdraw_parameters_and_placeholders() {
        let rows = build_rows(&catalog());
        assert_eq!(rows[0], RosterRow::Activity("Chess Club".into()));
        assert_eq!(
            rows[1],
            RosterRow::Participant {
                activity: "Chess Club".into(),
                email: "michael@mergington.edu".into(),
            }
        );
        // Empty roster renders the placeholder instead of nothing.
        assert_eq!(rows.last(), Some(&RosterRow::NoParticipants));
    }

    #[test]
    fn snapshot_replaces_everything_and_clamps_the_choice() {
        let mut screen = RosterScreen::new();
        screen.apply_snapshot(catalog());
        assert_eq!(screen.open_activities.len(), 3);

        screen.choice = 2;
        let mut small = IndexMap::new();
        small.insert("Chess Club".to_owned(), activity(12, &[]));
        screen.apply_snapshot(Arc::new(small));

        assert_eq!(screen.open_activities, vec!["Chess Club"]);
        assert_eq!(screen.choice, 0);
    }

    #[test]
    fn failed_fetch_discards_the_previous_snapshot() {
        let mut screen = RosterScreen::new();
        screen.apply_snapshot(catalog());
        assert!(!screen.rows.is_empty());

        screen.apply_failure();

        assert!(screen.rows.is_empty());
        assert!(screen.open_activities.is_empty());
        assert_eq!(screen.load_state, LoadState::Failed);
        assert_eq!(screen.list_state.selected(), None);
    }

    #[test]
    fn submit_requires_an_email_and_an_open_activity() {
        let mut screen = RosterScreen::new();
        screen.apply_snapshot(catalog());

        assert!(screen.submit().is_none());

        screen.email = Input::new("newkid@mergington.edu".into());
        match screen.submit() {
            Some(Action::SubmitSignup { activity, email }) => {
                assert_eq!(activity, "Chess Club");
                assert_eq!(email, "newkid@mergington.edu");
            }
            other => panic!("expected SubmitSignup, got: {other:?}"),
        }
        assert!(screen.signup_in_flight);
    }

    #[test]
    fn signup_outcome_drives_the_form_reset() {
        let mut screen = RosterScreen::new();
        screen.apply_snapshot(catalog());
        screen.email = Input::new("newkid@mergington.edu".into());

        screen
            .update(&Action::SignupFailed {
                message: "Student already signed up".into(),
            })
            .unwrap();
        assert_eq!(screen.email.value(), "newkid@mergington.edu");

        screen
            .update(&Action::SignupSucceeded {
                message: "Signed up".into(),
            })
            .unwrap();
        assert_eq!(screen.email.value(), "");
    }

    #[test]
    fn withdraw_only_triggers_on_participant_rows() {
        let mut screen = RosterScreen::new();
        screen.apply_snapshot(catalog());

        // Row 0 is the Chess Club activity row.
        screen.select(0);
        let key = KeyEvent::from(KeyCode::Char('d'));
        assert!(screen.handle_key_event(key).unwrap().is_none());

        // Row 1 is michael's participant row.
        screen.select(1);
        match screen.handle_key_event(key).unwrap() {
            Some(Action::ShowConfirm(pending)) => {
                assert_eq!(pending.activity, "Chess Club");
                assert_eq!(pending.email, "michael@mergington.edu");
            }
            other => panic!("expected ShowConfirm, got: {other:?}"),
        }
    }
}
