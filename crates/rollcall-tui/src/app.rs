//! Application core — event loop, action dispatch, command execution.
//!
//! Every network call is spawned off the UI task and completes by
//! sending an action back through the app channel, so the loop never
//! blocks on the service. Mutations follow one rule: on success, set
//! the status line and re-fetch the authoritative catalog; on failure,
//! set the status line and leave everything else exactly as it was.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use rollcall_api::ActivitiesClient;

use crate::action::{Action, Notification, NotifyKind, PendingWithdraw};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a status message stays visible. Fixed; a newer message
/// restarts the window rather than extending it.
const STATUS_VISIBLE: Duration = Duration::from_secs(5);

/// Shown when the service could not be reached at all, or rejected a
/// command without saying why. The log carries the real error.
const FALLBACK_FAILURE: &str = "Unable to reach the sign-up service. Please try again.";

/// User-facing text for a failed command: the server's `detail` when
/// the service rejected the request, otherwise the fixed fallback.
fn failure_text(err: &rollcall_api::Error) -> String {
    err.detail().map_or_else(|| FALLBACK_FAILURE.to_owned(), ToOwned::to_owned)
}

/// The transient status line shared by the signup and withdraw commands.
#[derive(Debug)]
struct StatusLine {
    notification: Notification,
    shown_at: Instant,
}

impl StatusLine {
    fn new(notification: Notification, shown_at: Instant) -> Self {
        Self {
            notification,
            shown_at,
        }
    }

    fn visible_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < STATUS_VISIBLE
    }
}

/// Top-level application state and event loop.
pub struct App {
    client: Arc<ActivitiesClient>,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    /// Whether the app should keep running.
    running: bool,
    /// Withdraw waiting on the confirmation overlay.
    pending_confirm: Option<PendingWithdraw>,
    /// Transient status line, if one is currently visible.
    status: Option<StatusLine>,
    /// Action sender — screens and spawned commands dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(client: ActivitiesClient) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            client: Arc::new(client),
            active_screen: ScreenId::Roster,
            screens,
            running: true,
            pending_confirm: None,
            status: None,
            action_tx,
            action_rx,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        // First paint needs data.
        self.action_tx.send(Action::RefreshRoster)?;

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("event loop ended");
        Ok(())
    }

    /// Map a key event to an action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // The confirmation overlay owns the keyboard while visible.
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        // A screen with an active text field sees every key; global
        // bindings would swallow the characters being typed.
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.capturing_input() {
                return screen.handle_key_event(key);
            }
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='2')) => {
                let n = c as u8 - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            _ => {}
        }

        // Delegate to the active screen
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    /// Process a single action — app-level effects first, then the
    /// screen fan-out. Snapshot- and result-carrying actions go to
    /// every screen so background screens never hold stale state.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) | Action::Render => {}

            Action::Tick => self.expire_status(),

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} -> {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            // ── Command spawn points ──────────────────────────────
            Action::RefreshRoster => self.spawn_refresh(),

            Action::SubmitSignup { activity, email } => {
                self.spawn_signup(activity.clone(), email.clone());
            }

            Action::SubmitLookup { email } => self.spawn_lookup(email.clone()),

            // ── Withdraw confirmation ─────────────────────────────
            Action::ShowConfirm(pending) => self.pending_confirm = Some(pending.clone()),

            Action::ConfirmYes => {
                if let Some(pending) = self.pending_confirm.take() {
                    self.spawn_withdraw(pending);
                }
            }

            // Declining aborts with no side effects of any kind.
            Action::ConfirmNo => self.pending_confirm = None,

            // ── Command outcomes ──────────────────────────────────
            // Success: status, then re-fetch authoritative state.
            // Failure: status only; the roster stays as it was.
            Action::SignupSucceeded { message } | Action::WithdrawSucceeded { message } => {
                self.action_tx
                    .send(Action::Notify(Notification::success(message.clone())))?;
                self.action_tx.send(Action::RefreshRoster)?;
            }

            Action::SignupFailed { message } | Action::WithdrawFailed { message } => {
                self.action_tx
                    .send(Action::Notify(Notification::error(message.clone())))?;
            }

            Action::Notify(notification) => {
                self.status = Some(StatusLine::new(notification.clone(), Instant::now()));
            }

            _ => {}
        }

        // Screen fan-out
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }

        Ok(())
    }

    fn expire_status(&mut self) {
        if let Some(status) = &self.status {
            if !status.visible_at(Instant::now()) {
                self.status = None;
            }
        }
    }

    // ── Spawned API calls ────────────────────────────────────────────
    //
    // Each command runs to completion in its own task and reports back
    // as an action. Nothing is de-duplicated: overlapping refreshes are
    // allowed and the last snapshot to arrive wins the render targets.

    fn spawn_refresh(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match client.activities().await {
                Ok(catalog) => {
                    let _ = tx.send(Action::RosterLoaded(Arc::new(catalog)));
                }
                Err(err) => {
                    warn!(error = %err, "roster refresh failed");
                    let _ = tx.send(Action::RosterFailed);
                }
            }
        });
    }

    fn spawn_signup(&self, activity: String, email: String) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match client.signup(&activity, &email).await {
                Ok(msg) => {
                    let _ = tx.send(Action::SignupSucceeded {
                        message: msg.message,
                    });
                }
                Err(err) => {
                    warn!(error = %err, %activity, "signup failed");
                    let _ = tx.send(Action::SignupFailed {
                        message: failure_text(&err),
                    });
                }
            }
        });
    }

    fn spawn_withdraw(&self, pending: PendingWithdraw) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match client.unregister(&pending.activity, &pending.email).await {
                Ok(msg) => {
                    let _ = tx.send(Action::WithdrawSucceeded {
                        message: msg.message,
                    });
                }
                Err(err) => {
                    warn!(error = %err, activity = %pending.activity, "withdraw failed");
                    let _ = tx.send(Action::WithdrawFailed {
                        message: failure_text(&err),
                    });
                }
            }
        });
    }

    fn spawn_lookup(&self, email: String) {
        let client = Arc::clone(&self.client);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match client.my_activities(&email).await {
                Ok(mine) => {
                    let _ = tx.send(Action::LookupLoaded {
                        email,
                        activities: Arc::new(mine),
                    });
                }
                Err(err) => {
                    warn!(error = %err, "membership lookup failed");
                    let _ = tx.send(Action::LookupFailed {
                        message: failure_text(&err),
                    });
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status line
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some(pending) = &self.pending_confirm {
            render_confirm_overlay(frame, area, pending);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// The shared status region: the latest command outcome while its
    /// window is open, key hints otherwise.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.notification.kind {
                    NotifyKind::Success => theme::status_success(),
                    NotifyKind::Error => theme::status_error(),
                };
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(status.notification.message.clone(), style),
                ])
            }
            None => Line::from(vec![
                Span::raw(" "),
                Span::styled("Tab ", theme::key_hint_key()),
                Span::styled("screen  ", theme::key_hint()),
                Span::styled("q ", theme::key_hint_key()),
                Span::styled("quit", theme::key_hint()),
            ]),
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Centered confirmation overlay naming both the participant and the
/// activity about to lose them.
fn render_confirm_overlay(frame: &mut Frame, area: Rect, pending: &PendingWithdraw) {
    let width = 64u16.min(area.width.saturating_sub(4));
    let height = 7u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        overlay,
    );

    let block = Block::default()
        .title(" Confirm Withdrawal ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {pending}"), theme::activity_name())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("remove   ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("keep", theme::key_hint()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rollcall_api::TransportConfig;

    use super::*;

    fn test_app() -> App {
        // Points at a closed port; tests below never let a spawned
        // command complete, they only exercise the dispatch logic.
        let client = ActivitiesClient::new(
            "http://127.0.0.1:9".parse().expect("static URL"),
            &TransportConfig::default(),
        )
        .expect("client builds");
        App::new(client)
    }

    #[test]
    fn declining_confirmation_has_no_side_effects() {
        let mut app = test_app();

        app.process_action(&Action::ShowConfirm(PendingWithdraw {
            activity: "Chess Club".into(),
            email: "michael@mergington.edu".into(),
        }))
        .unwrap();
        assert!(app.pending_confirm.is_some());

        app.process_action(&Action::ConfirmNo).unwrap();

        assert!(app.pending_confirm.is_none());
        assert!(app.status.is_none());
        // No follow-up actions: no network call, no status, no refresh.
        assert!(app.action_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn confirming_consumes_the_pending_withdraw() {
        let mut app = test_app();
        app.pending_confirm = Some(PendingWithdraw {
            activity: "Chess Club".into(),
            email: "michael@mergington.edu".into(),
        });

        app.process_action(&Action::ConfirmYes).unwrap();

        assert!(app.pending_confirm.is_none());
        // A second ConfirmYes with nothing pending is a no-op.
        app.process_action(&Action::ConfirmYes).unwrap();
    }

    #[test]
    fn success_notifies_then_refreshes_but_failure_only_notifies() {
        let mut app = test_app();

        app.process_action(&Action::SignupSucceeded {
            message: "Signed up zoe@mergington.edu for Chess Club".into(),
        })
        .unwrap();

        match app.action_rx.try_recv() {
            Ok(Action::Notify(n)) => {
                assert_eq!(n.kind, NotifyKind::Success);
                assert_eq!(n.message, "Signed up zoe@mergington.edu for Chess Club");
            }
            other => panic!("expected Notify first, got: {other:?}"),
        }
        assert!(matches!(app.action_rx.try_recv(), Ok(Action::RefreshRoster)));

        app.process_action(&Action::WithdrawFailed {
            message: "Participant not found".into(),
        })
        .unwrap();

        match app.action_rx.try_recv() {
            Ok(Action::Notify(n)) => assert_eq!(n.kind, NotifyKind::Error),
            other => panic!("expected Notify, got: {other:?}"),
        }
        // Failure must not trigger a refresh.
        assert!(app.action_rx.try_recv().is_err());
    }

    #[test]
    fn status_window_is_five_seconds_and_restarts_per_message() {
        let t0 = Instant::now();
        let first = StatusLine::new(Notification::success("first"), t0);

        assert!(first.visible_at(t0 + Duration::from_secs(4)));
        assert!(!first.visible_at(t0 + Duration::from_secs(5)));

        // A replacement message at T+4 runs its own full window.
        let second = StatusLine::new(Notification::error("second"), t0 + Duration::from_secs(4));
        assert!(second.visible_at(t0 + Duration::from_secs(8)));
        assert!(!second.visible_at(t0 + Duration::from_secs(9)));
    }

    #[test]
    fn tick_hides_an_expired_status() {
        let mut app = test_app();

        app.process_action(&Action::Notify(Notification::success("done")))
            .unwrap();
        assert!(app.status.is_some());

        // Still visible on an immediate tick.
        app.process_action(&Action::Tick).unwrap();
        assert!(app.status.is_some());

        if let Some(status) = app.status.as_mut() {
            status.shown_at -= Duration::from_secs(6);
        }
        app.process_action(&Action::Tick).unwrap();
        assert!(app.status.is_none());
    }

    #[test]
    fn failure_text_prefers_the_server_detail() {
        let with_detail = rollcall_api::Error::Api {
            status: 400,
            detail: Some("Student already signed up".into()),
        };
        assert_eq!(failure_text(&with_detail), "Student already signed up");

        let without_detail = rollcall_api::Error::Api {
            status: 500,
            detail: None,
        };
        assert_eq!(failure_text(&without_detail), FALLBACK_FAILURE);
    }
}
