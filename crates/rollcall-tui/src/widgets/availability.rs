//! Availability tier rendering — ●/◐ markers with color mapping.

use ratatui::text::Span;
use rollcall_api::Availability;

use crate::theme;

/// Returns a styled `Span` for an activity's availability tier.
///
/// Full and last-spot activities get distinct markers; everything else
/// renders the plain count.
pub fn availability_span(availability: Availability) -> Span<'static> {
    match availability {
        Availability::Full => Span::styled("● full", theme::tier_full()),
        Availability::Low => Span::styled("◐ 1 spot left", theme::tier_low()),
        Availability::Open(n) => Span::styled(format!("{n} spots left"), theme::tier_open()),
    }
}

/// Plain-text spots label for the signup selector.
pub fn spots_label(availability: Availability) -> String {
    match availability {
        Availability::Full => "full".into(),
        Availability::Low => "1 spot left".into(),
        Availability::Open(n) => format!("{n} spots left"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_wording() {
        assert_eq!(availability_span(Availability::Full).content, "● full");
        assert_eq!(availability_span(Availability::Low).content, "◐ 1 spot left");
        assert_eq!(availability_span(Availability::Open(7)).content, "7 spots left");
        assert_eq!(spots_label(Availability::Low), "1 spot left");
        assert_eq!(spots_label(Availability::Open(2)), "2 spots left");
    }
}
