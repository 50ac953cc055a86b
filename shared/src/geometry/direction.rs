use std::f32::consts::FRAC_PI_4;

use super::vector::Vec2;

/// Compass direction in screen space: North is toward negative `y`.
///
/// On an obstacle this names the side it blocks from; `None` means it blocks
/// from every side. On a moving object it is the heading of this tick's
/// movement, `None` when the object did not move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Headings indexed by 45 degree sector, counter-clockwise from East.
    const SECTORS: [Direction; 8] = [
        Direction::East,
        Direction::NorthEast,
        Direction::North,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    pub fn from_movement(movement: Vec2) -> Self {
        if movement.is_zero() || !movement.is_finite() {
            return Direction::None;
        }
        let angle = (-movement.y).atan2(movement.x);
        let sector = (angle / FRAC_PI_4).round() as i32;
        Self::SECTORS[sector.rem_euclid(8) as usize]
    }

    pub fn is_northern(&self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::NorthWest
        )
    }

    pub fn is_southern(&self) -> bool {
        matches!(
            self,
            Direction::South | Direction::SouthEast | Direction::SouthWest
        )
    }

    /// Whether an obstacle blocking from `self` stops an object travelling
    /// along `travel`. An obstacle only blocks arrivals heading into the side
    /// it names.
    pub fn blocks_arrival(&self, travel: Direction) -> bool {
        match self {
            Direction::None => true,
            Direction::North | Direction::NorthEast | Direction::NorthWest => {
                travel.is_southern()
            }
            Direction::South | Direction::SouthEast | Direction::SouthWest => {
                travel.is_northern()
            }
            Direction::East => travel == Direction::West,
            Direction::West => travel == Direction::East,
        }
    }
}
