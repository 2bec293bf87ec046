//! Pointer mapping: screen pixels to logical coordinates, lanes and cards.

use crate::game::catalog::CATALOG;
use crate::game::lane::{FIELD_HEIGHT, LANES, LOGICAL_HEIGHT, LOGICAL_WIDTH, UI_HEIGHT};
use crate::game::LaneId;

/// Horizontal padding of the card strip.
const CARD_PAD_X: f32 = 24.0;
/// Offset of the cards below the top of the UI strip.
const CARD_TOP: f32 = 40.0;
/// Space below the cards.
const CARD_BOTTOM_MARGIN: f32 = 54.0;
/// Inset of a card inside its slot.
const CARD_INSET: f32 = 6.0;

/// Letterboxed fit of the logical canvas into a pixel surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per logical unit.
    pub scale: f32,
    /// Left letterbox in pixels.
    pub off_x: f32,
    /// Top letterbox in pixels.
    pub off_y: f32,
}

impl Viewport {
    /// Fit the logical canvas into `width × height` pixels, keeping aspect.
    #[must_use]
    pub fn fit(width: f32, height: f32) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let scale = (width / LOGICAL_WIDTH).min(height / LOGICAL_HEIGHT);
        Self {
            scale,
            off_x: ((width - LOGICAL_WIDTH * scale) / 2.0).floor(),
            off_y: ((height - LOGICAL_HEIGHT * scale) / 2.0).floor(),
        }
    }

    /// Convert a pixel position to logical coordinates.
    #[must_use]
    pub fn to_logical(&self, px: f32, py: f32) -> (f32, f32) {
        ((px - self.off_x) / self.scale, (py - self.off_y) / self.scale)
    }
}

/// What a tap landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    /// The field, over the given lane.
    Lane(LaneId),
    /// A card, by index into the catalog.
    Card(usize),
    /// The card band, between cards.
    CardStrip,
    /// Off the canvas or on UI chrome.
    Outside,
}

/// An axis-aligned rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Whether the point lies inside, edges included.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// Hit areas of the logical canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout;

impl Layout {
    fn band() -> (f32, f32) {
        let top = FIELD_HEIGHT + CARD_TOP;
        (top, top + UI_HEIGHT - CARD_BOTTOM_MARGIN)
    }

    /// Rectangle of the card at `index`.
    #[must_use]
    pub fn card_rect(index: usize) -> Rect {
        let (top, bottom) = Self::band();
        #[allow(clippy::cast_precision_loss)]
        let slot = (LOGICAL_WIDTH - CARD_PAD_X * 2.0) / CATALOG.len() as f32;
        #[allow(clippy::cast_precision_loss)]
        let x = CARD_PAD_X + index as f32 * slot;
        Rect {
            x: x + CARD_INSET,
            y: top,
            w: slot - CARD_INSET * 2.0,
            h: bottom - top - CARD_INSET * 2.0,
        }
    }

    /// Lane whose column is closest to `x`.
    #[must_use]
    pub fn lane_at(x: f32) -> LaneId {
        let left = (LANES[0].x + LANES[1].x) * 0.5;
        let right = (LANES[1].x + LANES[2].x) * 0.5;
        let index = if x < left {
            0
        } else if x > right {
            2
        } else {
            1
        };
        LaneId::new(index).unwrap_or(LaneId::CONTESTED)
    }

    /// Classify a tap at logical coordinates.
    #[must_use]
    pub fn classify(x: f32, y: f32) -> Tap {
        if !(0.0..=LOGICAL_WIDTH).contains(&x) || !(0.0..=LOGICAL_HEIGHT).contains(&y) {
            return Tap::Outside;
        }
        if y < FIELD_HEIGHT {
            return Tap::Lane(Self::lane_at(x));
        }
        let (top, bottom) = Self::band();
        if y < top || y > bottom {
            return Tap::Outside;
        }
        (0..CATALOG.len())
            .find(|&i| Self::card_rect(i).contains(x, y))
            .map_or(Tap::CardStrip, Tap::Card)
    }
}
