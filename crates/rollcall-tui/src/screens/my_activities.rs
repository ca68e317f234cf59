//! Membership lookup screen — which activities is this student in?
//!
//! Read-only and fully independent of the roster view: results render
//! in this panel, errors render inline in this panel, and nothing here
//! ever touches the shared status line or triggers a roster refresh.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use rollcall_api::MyActivities;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone)]
enum LookupState {
    /// No lookup performed yet.
    Idle,
    Loading {
        email: String,
    },
    Loaded {
        email: String,
        activities: Arc<MyActivities>,
    },
    /// Inline, panel-local failure.
    Failed {
        message: String,
    },
}

pub struct MyActivitiesScreen {
    focused: bool,
    email: Input,
    editing: bool,
    state: LookupState,
}

/// Count wording with exact singular/plural handling.
fn count_label(n: usize) -> String {
    if n == 1 {
        "1 activity".into()
    } else {
        format!("{n} activities")
    }
}

impl MyActivitiesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            email: Input::default(),
            editing: false,
            state: LookupState::Idle,
        }
    }

    /// Submit the lookup. Presence is the only client-side check.
    fn submit(&mut self) -> Option<Action> {
        let email = self.email.value().trim().to_owned();
        if email.is_empty() {
            return None;
        }
        self.state = LookupState::Loading {
            email: email.clone(),
        };
        Some(Action::SubmitLookup { email })
    }

    fn result_lines(&self) -> Vec<Line<'static>> {
        match &self.state {
            LookupState::Idle => vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(" Press ", theme::key_hint()),
                    Span::styled("e", theme::key_hint_key()),
                    Span::styled(
                        " to enter an email and look up its registrations.",
                        theme::key_hint(),
                    ),
                ]),
            ],
            LookupState::Loading { email } => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" Looking up {email}..."),
                    theme::key_hint(),
                )),
            ],
            LookupState::Loaded { email, activities } if activities.is_empty() => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {email} is not registered for any activities yet."),
                    theme::placeholder(),
                )),
            ],
            LookupState::Loaded { email, activities } => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(vec![
                        Span::styled(format!(" {email} "), theme::list_row()),
                        Span::styled(
                            format!("is registered for {}:", count_label(activities.len())),
                            theme::title_style(),
                        ),
                    ]),
                ];
                for (name, summary) in activities.iter() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("   {name}"),
                        theme::activity_name(),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("     {}", summary.description),
                        theme::list_row(),
                    )));
                    lines.push(Line::from(Span::styled(
                        format!("     {}", summary.schedule),
                        theme::key_hint(),
                    )));
                }
                lines
            }
            LookupState::Failed { message } => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {message}"),
                    theme::status_error(),
                )),
            ],
        }
    }
}

impl Component for MyActivitiesScreen {
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            return match key.code {
                KeyCode::Esc => {
                    self.editing = false;
                    Ok(None)
                }
                KeyCode::Enter => Ok(self.submit()),
                _ => {
                    crate::widgets::input::apply_key(&mut self.email, key);
                    Ok(None)
                }
            };
        }

        match key.code {
            KeyCode::Char('e' | '/') => {
                self.editing = true;
                Ok(None)
            }
            KeyCode::Enter => Ok(self.submit()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LookupLoaded { email, activities } => {
                // Last response to arrive owns the panel, even if an
                // earlier lookup is still outstanding.
                self.state = LookupState::Loaded {
                    email: email.clone(),
                    activities: Arc::clone(activities),
                };
            }
            Action::LookupFailed { message } => {
                self.state = LookupState::Failed {
                    message: message.clone(),
                };
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" My Activities ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(Span::styled(
                " Email",
                if self.editing {
                    theme::title_style()
                } else {
                    theme::key_hint()
                },
            )),
            Line::from(vec![
                Span::styled(format!("   {}", self.email.value()), theme::list_row()),
                Span::styled(if self.editing { "▏" } else { "" }, theme::tab_active()),
            ]),
            Line::from(if self.editing {
                vec![
                    Span::styled(" Enter ", theme::key_hint_key()),
                    Span::styled("look up  ", theme::key_hint()),
                    Span::styled("Esc ", theme::key_hint_key()),
                    Span::styled("done", theme::key_hint()),
                ]
            } else {
                vec![
                    Span::styled(" e ", theme::key_hint_key()),
                    Span::styled("edit email  ", theme::key_hint()),
                    Span::styled("Enter ", theme::key_hint_key()),
                    Span::styled("look up", theme::key_hint()),
                ]
            }),
        ];
        lines.extend(self.result_lines());

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn capturing_input(&self) -> bool {
        self.editing
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "MyActivities"
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rollcall_api::ActivitySummary;

    use super::*;

    #[test]
    fn count_wording_is_exact_at_one() {
        assert_eq!(count_label(0), "0 activities");
        assert_eq!(count_label(1), "1 activity");
        assert_eq!(count_label(2), "2 activities");
    }

    #[test]
    fn submit_requires_a_non_empty_email() {
        let mut screen = MyActivitiesScreen::new();
        assert!(screen.submit().is_none());
        assert!(matches!(screen.state, LookupState::Idle));

        screen.email = Input::new("zoe@mergington.edu".into());
        match screen.submit() {
            Some(Action::SubmitLookup { email }) => assert_eq!(email, "zoe@mergington.edu"),
            other => panic!("expected SubmitLookup, got: {other:?}"),
        }
        assert!(matches!(screen.state, LookupState::Loading { .. }));
    }

    #[test]
    fn empty_result_renders_the_not_registered_affordance() {
        let mut screen = MyActivitiesScreen::new();
        screen
            .update(&Action::LookupLoaded {
                email: "loner@mergington.edu".into(),
                activities: Arc::new(IndexMap::new()),
            })
            .unwrap();

        let text: String = screen
            .result_lines()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(text.contains("loner@mergington.edu is not registered for any activities yet"));
    }

    #[test]
    fn loaded_result_is_count_prefixed() {
        let mut screen = MyActivitiesScreen::new();
        let mut activities = IndexMap::new();
        for name in ["Chess Club", "Debate Team"] {
            activities.insert(
                name.to_owned(),
                ActivitySummary {
                    description: "desc".into(),
                    schedule: "sched".into(),
                },
            );
        }
        screen
            .update(&Action::LookupLoaded {
                email: "zoe@mergington.edu".into(),
                activities: Arc::new(activities),
            })
            .unwrap();

        let text: String = screen
            .result_lines()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert!(text.contains("is registered for 2 activities:"));
        assert!(text.contains("Chess Club"));
        assert!(text.contains("Debate Team"));
    }

    #[test]
    fn lookup_results_replace_the_panel_state() {
        let mut screen = MyActivitiesScreen::new();

        let mut activities = IndexMap::new();
        activities.insert(
            "Chess Club".to_owned(),
            ActivitySummary {
                description: "desc".into(),
                schedule: "sched".into(),
            },
        );
        screen
            .update(&Action::LookupLoaded {
                email: "zoe@mergington.edu".into(),
                activities: Arc::new(activities),
            })
            .unwrap();
        assert!(matches!(screen.state, LookupState::Loaded { .. }));

        screen
            .update(&Action::LookupFailed {
                message: "Unable to reach the sign-up service. Please try again.".into(),
            })
            .unwrap();
        match &screen.state {
            LookupState::Failed { message } => {
                assert!(message.contains("sign-up service"));
            }
            other => panic!("expected Failed, got: {other:?}"),
        }
    }
}
