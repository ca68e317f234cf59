//! Component trait — the building block for every UI element.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Every screen implements Component.
///
/// Lifecycle: `init` → (`handle_key_event` | `update` | `render`)*
pub trait Component: Send {
    /// Called once when the component is mounted.
    /// Receives the action sender for dispatching actions to the app loop.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    ///
    /// Snapshot-carrying actions are delivered to every screen, not
    /// just the active one, so a screen's state never goes stale while
    /// it is in the background.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether this screen currently holds input focus.
    #[allow(dead_code)]
    fn focused(&self) -> bool {
        false
    }

    /// Whether this screen currently owns the keyboard.
    ///
    /// While true, the app loop delivers every key straight to the
    /// screen and skips the global bindings; a text field must be able
    /// to receive `q`, `1`, or Tab without quitting or switching
    /// screens. The screen is responsible for providing an exit
    /// (conventionally Esc).
    fn capturing_input(&self) -> bool {
        false
    }

    /// Set focus state.
    fn set_focused(&mut self, _focused: bool) {}

    /// Unique identifier for this component.
    #[allow(dead_code)]
    fn id(&self) -> &str;
}
