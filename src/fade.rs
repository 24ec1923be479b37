//! Hue walk along the RGB cube's hue hexagon.
//!
//! The hexagon is the closed path red → yellow → green → cyan → blue →
//! magenta → red over the cube surface. On every edge one channel is pinned
//! at 255, one at 0 and the third moves, so a position can be recognized
//! from its saturation pattern alone.

use crate::colors::Rgb8;
use palette::Srgb;

/// One edge of the hue hexagon, named by where it starts and ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    RedToYellow,
    YellowToGreen,
    GreenToCyan,
    CyanToBlue,
    BlueToMagenta,
    MagentaToRed,
}

const MAX: u8 = u8::MAX;

/// Finds the edge `color` sits on. Vertices resolve to the edge leaving
/// them, so walking forward never stalls.
pub fn segment(color: Rgb8) -> Option<Segment> {
    let (r, g, b) = (color.red, color.green, color.blue);
    if r == MAX && g < MAX && b == 0 {
        Some(Segment::RedToYellow)
    } else if r > 0 && g == MAX && b == 0 {
        Some(Segment::YellowToGreen)
    } else if r == 0 && g == MAX && b < MAX {
        Some(Segment::GreenToCyan)
    } else if r == 0 && g > 0 && b == MAX {
        Some(Segment::CyanToBlue)
    } else if r < MAX && g == 0 && b == MAX {
        Some(Segment::BlueToMagenta)
    } else if r == MAX && g == 0 && b > 0 {
        Some(Segment::MagentaToRed)
    } else {
        None
    }
}

/// Advances `color` by `amount` channel units along the hexagon.
///
/// Off-hexagon points (the initial color, or anything a caller set) take a
/// recovery step instead: the highest channel rises and the lowest falls,
/// which lands on an edge within `255 / amount` steps. Channels are clamped
/// to `0..=255` after every step.
pub fn walk(color: Rgb8, amount: u8) -> Rgb8 {
    let mut channels = [
        i16::from(color.red),
        i16::from(color.green),
        i16::from(color.blue),
    ];
    let amount = i16::from(amount);

    match segment(color) {
        Some(Segment::RedToYellow) => channels[1] += amount,
        Some(Segment::YellowToGreen) => channels[0] -= amount,
        Some(Segment::GreenToCyan) => channels[2] += amount,
        Some(Segment::CyanToBlue) => channels[1] -= amount,
        Some(Segment::BlueToMagenta) => channels[0] += amount,
        Some(Segment::MagentaToRed) => channels[2] -= amount,
        None => {
            let (highest, lowest) = extremes(&channels);
            channels[highest] += amount;
            channels[lowest] -= amount;
        }
    }

    let [r, g, b] = channels.map(|c| c.clamp(0, i16::from(MAX)) as u8);
    Srgb::new(r, g, b)
}

/// Walks `units` channel units along the hexagon. Whatever overshoots a
/// vertex continues on the next edge, so a run of small steps ends where
/// one large step would.
pub fn advance(mut color: Rgb8, mut units: u32) -> Rgb8 {
    while units > 0 {
        let room = segment(color).map_or(MAX, |edge| to_vertex(color, edge));
        let step = room.min(units.min(u32::from(MAX)) as u8);
        color = walk(color, step);
        units -= u32::from(step);
    }
    color
}

/// Units left before the end of `edge`. Never zero, since vertices belong to
/// the edge leaving them.
fn to_vertex(color: Rgb8, edge: Segment) -> u8 {
    match edge {
        Segment::RedToYellow => MAX - color.green,
        Segment::YellowToGreen => color.red,
        Segment::GreenToCyan => MAX - color.blue,
        Segment::CyanToBlue => color.green,
        Segment::BlueToMagenta => MAX - color.red,
        Segment::MagentaToRed => color.blue,
    }
}

/// Index of the first maximum and the last minimum. On a gray point the two
/// differ (red rises, blue falls), so recovery always makes progress.
fn extremes(channels: &[i16; 3]) -> (usize, usize) {
    let mut highest = 0;
    let mut lowest = 2;
    for i in 0..3 {
        if channels[i] > channels[highest] {
            highest = i;
        }
        if channels[2 - i] < channels[lowest] {
            lowest = 2 - i;
        }
    }
    (highest, lowest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLUE, CYAN, GREEN, HUE_STATES, MAGENTA, RED, YELLOW};

    #[test]
    fn vertices_leave_forward() {
        assert_eq!(segment(RED), Some(Segment::RedToYellow));
        assert_eq!(segment(YELLOW), Some(Segment::YellowToGreen));
        assert_eq!(segment(GREEN), Some(Segment::GreenToCyan));
        assert_eq!(segment(CYAN), Some(Segment::CyanToBlue));
        assert_eq!(segment(BLUE), Some(Segment::BlueToMagenta));
        assert_eq!(segment(MAGENTA), Some(Segment::MagentaToRed));
    }

    #[test]
    fn red_moves_toward_yellow() {
        assert_eq!(walk(RED, 4), Srgb::new(255, 4, 0));
    }

    #[test]
    fn overshoot_clamps_onto_vertex() {
        assert_eq!(walk(Srgb::new(255, 253, 0), 4), YELLOW);
        assert_eq!(walk(Srgb::new(255, 0, 2), 4), RED);
    }

    #[test]
    fn advance_carries_past_vertex() {
        assert_eq!(advance(Srgb::new(255, 252, 0), 5), Srgb::new(253, 255, 0));
        assert_eq!(advance(RED, 255), YELLOW);
        assert_eq!(advance(RED, 2 * 255 + 10), Srgb::new(0, 255, 10));
        assert_eq!(advance(RED, 6 * 255), RED);
    }

    #[test]
    fn advance_in_pieces_matches_one_step() {
        let mut color = Srgb::new(255, 200, 0);
        for _ in 0..30 {
            color = advance(color, 7);
        }
        assert_eq!(color, advance(Srgb::new(255, 200, 0), 210));
    }

    #[test]
    fn full_lap_visits_every_hue_state() {
        let mut color = RED;
        let mut visited = [false; 6];
        for _ in 0..(6 * 255) {
            if let Some(i) = HUE_STATES.iter().position(|c| *c == color) {
                visited[i] = true;
            }
            color = walk(color, 1);
        }
        assert_eq!(color, RED);
        assert!(visited.iter().all(|v| *v));
    }

    #[test]
    fn gray_recovers_onto_hexagon() {
        let mut color = Srgb::new(150, 150, 150);
        let mut steps = 0;
        while segment(color).is_none() {
            color = walk(color, 1);
            steps += 1;
            assert!(steps <= 255);
        }
        assert_eq!(color, Srgb::new(255, 150, 0));
    }

    #[test]
    fn black_and_white_recover() {
        assert_eq!(walk(Srgb::new(0, 0, 0), 10), Srgb::new(10, 0, 0));
        assert_eq!(walk(Srgb::new(255, 255, 255), 10), Srgb::new(255, 255, 245));
    }
}
