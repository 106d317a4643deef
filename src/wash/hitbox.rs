//! Body-part hit regions on the wash sprite's 16x16 grid.

use glam::Vec2;

/// Edge length of the wash sprite, and of each row cell in its sheet.
pub const WASH_SPRITE_SIZE: u32 = 192;
pub const GRID_SIZE: i32 = 16;
pub const CELL_SIZE: f32 = WASH_SPRITE_SIZE as f32 / GRID_SIZE as f32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

const fn cell(x: i32, y: i32) -> GridCell {
    GridCell { x, y }
}

/// `N` cells filling a rectangle `width` cells wide, row by row.
const fn rect<const N: usize>(x0: i32, y0: i32, width: i32) -> [GridCell; N] {
    let mut cells = [cell(0, 0); N];
    let mut i = 0;
    while i < N {
        cells[i] = cell(x0 + i as i32 % width, y0 + i as i32 / width);
        i += 1;
    }
    cells
}

const HEAD: [GridCell; 12] = [
    cell(2, 3),
    cell(2, 4),
    cell(3, 4),
    cell(1, 5),
    cell(2, 5),
    cell(3, 5),
    cell(1, 6),
    cell(2, 6),
    cell(3, 6),
    cell(1, 7),
    cell(2, 7),
    cell(3, 7),
];
// x 4..=11, y 6..=9
const TORSO: [GridCell; 32] = rect(4, 6, 8);
const FRONT_LEG: [GridCell; 4] = [cell(4, 10), cell(4, 11), cell(3, 12), cell(4, 12)];
const BACK_LEG: [GridCell; 5] = [
    cell(10, 10),
    cell(11, 10),
    cell(11, 11),
    cell(10, 12),
    cell(11, 12),
];
const TAIL: [GridCell; 5] = [
    cell(12, 6),
    cell(13, 7),
    cell(13, 8),
    cell(13, 9),
    cell(13, 10),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Head,
    Torso,
    FrontLeg,
    BackLeg,
    Tail,
}

impl BodyPart {
    /// Cleaning order.
    pub const SEQUENCE: [BodyPart; 5] = [
        Self::Head,
        Self::Torso,
        Self::FrontLeg,
        Self::BackLeg,
        Self::Tail,
    ];

    pub fn next(self) -> Option<BodyPart> {
        match self {
            Self::Head => Some(Self::Torso),
            Self::Torso => Some(Self::FrontLeg),
            Self::FrontLeg => Some(Self::BackLeg),
            Self::BackLeg => Some(Self::Tail),
            Self::Tail => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::FrontLeg => "front leg",
            Self::BackLeg => "back leg",
            Self::Tail => "tail",
        }
    }

    pub fn cells(self) -> &'static [GridCell] {
        match self {
            Self::Head => &HEAD,
            Self::Torso => &TORSO,
            Self::FrontLeg => &FRONT_LEG,
            Self::BackLeg => &BACK_LEG,
            Self::Tail => &TAIL,
        }
    }

    /// Share of the part's cells that must be traced. Large parts allow a
    /// partial trace.
    pub fn completion_ratio(self) -> f32 {
        match self {
            Self::Head | Self::Torso => 0.75,
            Self::FrontLeg | Self::BackLeg | Self::Tail => 1.0,
        }
    }

    /// Distinct cells needed to finish this part (rounded up).
    pub fn required_hits(self) -> usize {
        (self.cells().len() as f32 * self.completion_ratio()).ceil() as usize
    }
}

/// Grid cell under a point in sprite pixels.
pub fn grid_cell(pos: Vec2) -> GridCell {
    GridCell {
        x: (pos.x / CELL_SIZE).floor() as i32,
        y: (pos.y / CELL_SIZE).floor() as i32,
    }
}

/// Body part owning `cell`, if any.
pub fn part_at(cell: GridCell) -> Option<BodyPart> {
    BodyPart::SEQUENCE
        .into_iter()
        .find(|part| part.cells().contains(&cell))
}

// ---------------------------------------------------------------------------
// Sprite rows
// ---------------------------------------------------------------------------

pub const ROW_ALL_CLEAN: u32 = 0;
pub const ROW_ALL_DIRTY: u32 = 1;

/// Sheet row showing the cat with exactly `completed` clean. Anything other
/// than a prefix of the cleaning order falls back to the dirty row.
pub fn sprite_row(completed: &[BodyPart]) -> u32 {
    let n = completed.len();
    if n > BodyPart::SEQUENCE.len() || completed != &BodyPart::SEQUENCE[..n] {
        return ROW_ALL_DIRTY;
    }
    match n {
        0 => ROW_ALL_DIRTY,
        5 => ROW_ALL_CLEAN,
        // head-clean 2 .. head+torso+front-leg+back-leg 5
        milestone => milestone as u32 + 1,
    }
}
