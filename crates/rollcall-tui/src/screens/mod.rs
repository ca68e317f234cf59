//! Screen implementations, one module per primary screen.

pub mod my_activities;
pub mod roster;

use crate::component::Component;
use crate::screen::ScreenId;

/// Construct every screen, keyed for the app's screen map.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Roster, Box::new(roster::RosterScreen::new())),
        (
            ScreenId::Lookup,
            Box::new(my_activities::MyActivitiesScreen::new()),
        ),
    ]
}
