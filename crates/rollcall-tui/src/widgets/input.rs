//! Key handling for `tui_input` text fields.
//!
//! Maps crossterm key events onto `InputRequest`s instead of using the
//! crate's own crossterm backend, which keeps the field behavior
//! independent of the exact crossterm version in the tree.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::{Input, InputRequest};

/// Apply one key press to a text input. Unmapped keys are ignored.
pub fn apply_key(input: &mut Input, key: KeyEvent) {
    let request = match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(InputRequest::DeleteLine),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => Some(InputRequest::DeletePrevWord),
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            Some(InputRequest::InsertChar(c))
        }
        (_, KeyCode::Backspace) => Some(InputRequest::DeletePrevChar),
        (_, KeyCode::Delete) => Some(InputRequest::DeleteNextChar),
        (_, KeyCode::Left) => Some(InputRequest::GoToPrevChar),
        (_, KeyCode::Right) => Some(InputRequest::GoToNextChar),
        (_, KeyCode::Home) => Some(InputRequest::GoToStart),
        (_, KeyCode::End) => Some(InputRequest::GoToEnd),
        _ => None,
    };

    if let Some(request) = request {
        input.handle(request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut Input, code: KeyCode) {
        apply_key(input, KeyEvent::from(code));
    }

    #[test]
    fn typing_and_deleting() {
        let mut input = Input::default();
        for c in "zoe@x".chars() {
            press(&mut input, KeyCode::Char(c));
        }
        assert_eq!(input.value(), "zoe@x");

        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "zoe@");

        apply_key(
            &mut input,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert_eq!(input.value(), "");
    }
}
