//! Tile collision for axis-aligned bodies.
//!
//! Motion is resolved one axis at a time, vertical first. Each axis sweeps the
//! union of the current and displaced rectangle and stops at the nearest solid
//! cell in the direction of travel, leaving a small clearance gap.

use bitflags::bitflags;
use glam::Vec2;
use std::ops::RangeInclusive;
use tilecraft_world::TileGrid;

/// Gap left between a body and the cell it was snapped against.
pub const DEFAULT_CLEARANCE: f32 = 0.01;

bitflags! {
    /// Sides of the body that touched something this step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Contacts: u8 {
        /// Landed on top of a cell.
        const GROUND = 1 << 0;
        /// Hit the underside of a cell.
        const CEILING = 1 << 1;
        /// Blocked while moving left.
        const LEFT = 1 << 2;
        /// Blocked while moving right.
        const RIGHT = 1 << 3;
    }
}

impl Contacts {
    /// Any vertical contact.
    pub fn vertical(self) -> bool {
        self.intersects(Contacts::GROUND | Contacts::CEILING)
    }

    /// Any horizontal contact.
    pub fn horizontal(self) -> bool {
        self.intersects(Contacts::LEFT | Contacts::RIGHT)
    }
}

/// Result of [`resolve_motion`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Corrected top-left position.
    pub position: Vec2,
    /// Sides that were blocked.
    pub contacts: Contacts,
}

/// Move a `size` rectangle at `position` by `displacement`, stopping at solid cells.
///
/// `position` must not overlap any solid cell. The returned position keeps
/// that property. The world's left and right edges behave like walls.
pub fn resolve_motion(
    grid: &TileGrid,
    position: Vec2,
    size: Vec2,
    displacement: Vec2,
    clearance: f32,
) -> Resolution {
    let ts = grid.tile_size();
    let mut pos = position;
    let mut contacts = Contacts::empty();

    if displacement.y != 0.0 {
        let target = pos.y + displacement.y;
        let cols = cell_span(pos.x, pos.x + size.x, ts);
        let rows = cell_span(pos.y.min(target), (pos.y + size.y).max(target + size.y), ts);
        let bottom = pos.y + size.y;

        if displacement.y > 0.0 {
            let floor = solid_edges(grid, cols, rows, |row| row as f32 * ts)
                .filter(|&top| top >= bottom)
                .reduce(f32::min);
            match floor {
                Some(top) => {
                    pos.y = top - clearance - size.y;
                    contacts |= Contacts::GROUND;
                }
                None => pos.y = target,
            }
        } else {
            let ceiling = solid_edges(grid, cols, rows, |row| (row + 1) as f32 * ts)
                .filter(|&underside| underside <= pos.y)
                .reduce(f32::max);
            match ceiling {
                Some(underside) => {
                    pos.y = underside + clearance;
                    contacts |= Contacts::CEILING;
                }
                None => pos.y = target,
            }
        }
    }

    if displacement.x != 0.0 {
        let target = pos.x + displacement.x;
        let rows = cell_span(pos.y, pos.y + size.y, ts);
        let cols = cell_span(pos.x.min(target), (pos.x + size.x).max(target + size.x), ts);
        let right = pos.x + size.x;
        let world_width = grid.pixel_size().x;

        if displacement.x > 0.0 {
            let wall = transpose_edges(grid, rows, cols, |col| col as f32 * ts)
                .filter(|&left| left >= right)
                .chain(std::iter::once(world_width).filter(|&edge| edge >= right))
                .reduce(f32::min);
            match wall {
                Some(left) if target + size.x > left - clearance => {
                    pos.x = left - clearance - size.x;
                    contacts |= Contacts::RIGHT;
                }
                _ => pos.x = target,
            }
        } else {
            let wall = transpose_edges(grid, rows, cols, |col| (col + 1) as f32 * ts)
                .filter(|&edge| edge <= pos.x)
                .chain(std::iter::once(0.0).filter(|&edge| edge <= pos.x))
                .reduce(f32::max);
            match wall {
                Some(edge) if target < edge + clearance => {
                    pos.x = edge + clearance;
                    contacts |= Contacts::LEFT;
                }
                _ => pos.x = target,
            }
        }
    }

    Resolution {
        position: pos,
        contacts,
    }
}

/// Cells strictly overlapped by the interval `[min, max]`.
fn cell_span(min: f32, max: f32, tile_size: f32) -> RangeInclusive<i32> {
    let first = (min / tile_size).floor() as i32;
    let last = (max / tile_size).ceil() as i32 - 1;
    first..=last
}

/// Edge coordinate (chosen by `edge` from the row index) of every solid cell
/// in `cols x rows`.
fn solid_edges<'a>(
    grid: &'a TileGrid,
    cols: RangeInclusive<i32>,
    rows: RangeInclusive<i32>,
    edge: impl Fn(i32) -> f32 + 'a,
) -> impl Iterator<Item = f32> + 'a {
    rows.flat_map(move |row| cols.clone().map(move |col| (col, row)))
        .filter(move |&(col, row)| grid.is_solid_at(col, row))
        .map(move |(_, row)| edge(row))
}

/// Like [`solid_edges`] but the edge is chosen from the column index.
fn transpose_edges<'a>(
    grid: &'a TileGrid,
    rows: RangeInclusive<i32>,
    cols: RangeInclusive<i32>,
    edge: impl Fn(i32) -> f32 + 'a,
) -> impl Iterator<Item = f32> + 'a {
    cols.flat_map(move |col| rows.clone().map(move |row| (col, row)))
        .filter(move |&(col, row)| grid.is_solid_at(col, row))
        .map(move |(col, _)| edge(col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecraft_world::WorldRect;

    const TS: f32 = 32.0;
    const BODY: Vec2 = Vec2::new(20.0, 40.0);

    fn grid(layout: &str) -> TileGrid {
        TileGrid::from_ascii(layout, TS).expect("valid layout")
    }

    fn overlaps_solid(grid: &TileGrid, pos: Vec2) -> bool {
        let rect = WorldRect::from_origin_size(pos, BODY);
        (0..grid.height() as i32).any(|row| {
            (0..grid.width() as i32).any(|col| {
                grid.is_solid_at(col, row)
                    && grid
                        .cell_rect(tilecraft_world::TilePos::new(col, row))
                        .overlaps(&rect)
            })
        })
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let g = grid(
            "
            ....
            ....
            ....
            ssss
            ",
        );
        let start = Vec2::new(10.0, 50.0);
        let res = resolve_motion(&g, start, BODY, Vec2::new(0.0, 12.0), DEFAULT_CLEARANCE);
        assert_eq!(res.contacts, Contacts::GROUND);
        assert!((res.position.y + BODY.y - (96.0 - DEFAULT_CLEARANCE)).abs() < 1e-4);
        assert!(!overlaps_solid(&g, res.position));
    }

    #[test]
    fn free_fall_moves_fully() {
        let g = grid(
            "
            ....
            ....
            ....
            ....
            ",
        );
        let res = resolve_motion(&g, Vec2::new(10.0, 0.0), BODY, Vec2::new(0.0, 5.0), DEFAULT_CLEARANCE);
        assert_eq!(res.position, Vec2::new(10.0, 5.0));
        assert!(res.contacts.is_empty());
    }

    #[test]
    fn nearest_cell_wins_over_later_rows() {
        // Two floors inside the sweep: the body must stop on the upper one.
        let g = grid(
            "
            ....
            ....
            s...
            s...
            ",
        );
        let res = resolve_motion(&g, Vec2::new(4.0, 20.0), BODY, Vec2::new(0.0, 70.0), DEFAULT_CLEARANCE);
        assert!(res.contacts.contains(Contacts::GROUND));
        assert!(res.position.y + BODY.y < 64.0);
        assert!(!overlaps_solid(&g, res.position));
    }

    #[test]
    fn rising_body_hits_ceiling() {
        let g = grid(
            "
            ssss
            ....
            ....
            ....
            ",
        );
        let res = resolve_motion(&g, Vec2::new(10.0, 40.0), BODY, Vec2::new(0.0, -9.5), DEFAULT_CLEARANCE);
        assert_eq!(res.contacts, Contacts::CEILING);
        assert!((res.position.y - (32.0 + DEFAULT_CLEARANCE)).abs() < 1e-4);
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let g = grid(
            "
            ..s.
            ..s.
            ....
            ",
        );
        let res = resolve_motion(&g, Vec2::new(42.0, 2.0), BODY, Vec2::new(4.0, 0.0), DEFAULT_CLEARANCE);
        assert_eq!(res.contacts, Contacts::RIGHT);
        assert!((res.position.x + BODY.x - (64.0 - DEFAULT_CLEARANCE)).abs() < 1e-4);

        let res = resolve_motion(&g, Vec2::new(98.0, 2.0), BODY, Vec2::new(-4.0, 0.0), DEFAULT_CLEARANCE);
        assert_eq!(res.contacts, Contacts::LEFT);
        assert!((res.position.x - (96.0 + DEFAULT_CLEARANCE)).abs() < 1e-4);
    }

    #[test]
    fn world_edges_act_as_walls() {
        let g = grid(
            "
            ....
            ....
            ",
        );
        let res = resolve_motion(&g, Vec2::new(1.0, 0.0), BODY, Vec2::new(-4.0, 0.0), DEFAULT_CLEARANCE);
        assert!(res.contacts.contains(Contacts::LEFT));
        assert!(res.position.x >= 0.0);

        let res = resolve_motion(&g, Vec2::new(106.0, 0.0), BODY, Vec2::new(4.0, 0.0), DEFAULT_CLEARANCE);
        assert!(res.contacts.contains(Contacts::RIGHT));
        assert!(res.position.x + BODY.x <= 128.0);
    }

    #[test]
    fn walking_along_floor_does_not_snag() {
        let g = grid(
            "
            ....
            ....
            ssss
            ",
        );
        let resting_y = 64.0 - DEFAULT_CLEARANCE - BODY.y;
        let res = resolve_motion(&g, Vec2::new(10.0, resting_y), BODY, Vec2::new(4.0, 0.5), DEFAULT_CLEARANCE);
        assert_eq!(res.contacts, Contacts::GROUND);
        assert_eq!(res.position.x, 14.0);
    }

    #[test]
    fn touching_span_is_exclusive() {
        assert_eq!(cell_span(0.0, 32.0, 32.0), 0..=0);
        assert_eq!(cell_span(31.0, 33.0, 32.0), 0..=1);
        assert_eq!(cell_span(-1.0, 10.0, 32.0), -1..=0);
    }
}
