use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DlError;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial hex coordinate. The third cube component is derived as `s = -q - r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    /// Column axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

/// The six neighbor directions of a pointy-top hex, counter-clockwise from east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexDirection {
    /// `(+1, 0)`
    East,
    /// `(+1, -1)`
    NorthEast,
    /// `(0, -1)`
    NorthWest,
    /// `(-1, 0)`
    West,
    /// `(-1, +1)`
    SouthWest,
    /// `(0, +1)`
    SouthEast,
}

impl HexDirection {
    /// All directions in ring-walk order.
    pub const ALL: [HexDirection; 6] = [
        Self::East,
        Self::NorthEast,
        Self::NorthWest,
        Self::West,
        Self::SouthWest,
        Self::SouthEast,
    ];

    /// The axial offset of one step in this direction.
    pub fn offset(self) -> HexCoord {
        match self {
            Self::East => HexCoord::new(1, 0),
            Self::NorthEast => HexCoord::new(1, -1),
            Self::NorthWest => HexCoord::new(0, -1),
            Self::West => HexCoord::new(-1, 0),
            Self::SouthWest => HexCoord::new(-1, 1),
            Self::SouthEast => HexCoord::new(0, 1),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::West => Self::East,
            Self::SouthWest => Self::NorthEast,
            Self::SouthEast => Self::NorthWest,
        }
    }
}

impl HexCoord {
    /// The center of the labyrinth, where the player spawns.
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    /// Create a coordinate from its axial components.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The derived third cube component.
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Number of steps between two hexes.
    pub fn distance(self, other: HexCoord) -> u32 {
        let d = self - other;
        (d.q.unsigned_abs() + d.r.unsigned_abs() + d.s().unsigned_abs()) / 2
    }

    /// Distance from the origin.
    pub fn length(self) -> u32 {
        self.distance(Self::ORIGIN)
    }

    /// The adjacent hex in the given direction.
    pub fn neighbor(self, direction: HexDirection) -> HexCoord {
        self + direction.offset()
    }

    /// All six neighbors in [`HexDirection::ALL`] order.
    pub fn neighbors(self) -> [HexCoord; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }

    /// World-space center `(x, z)` of this hex for a pointy-top layout of the given size.
    pub fn to_world(self, size: f64) -> (f64, f64) {
        let q = f64::from(self.q);
        let r = f64::from(self.r);
        let x = size * SQRT_3 * (q + r / 2.0);
        let z = size * 1.5 * r;
        (x, z)
    }

    /// The hex containing a world-space point, using cube rounding.
    pub fn from_world(x: f64, z: f64, size: f64) -> HexCoord {
        let fq = (SQRT_3 / 3.0 * x - z / 3.0) / size;
        let fr = (2.0 / 3.0 * z) / size;
        Self::round(fq, fr)
    }

    /// Round fractional axial coordinates to the nearest hex.
    pub fn round(fq: f64, fr: f64) -> HexCoord {
        let fs = -fq - fr;
        let mut q = fq.round();
        let mut r = fr.round();
        let s = fs.round();

        let dq = (q - fq).abs();
        let dr = (r - fr).abs();
        let ds = (s - fs).abs();

        // The component with the largest rounding error is rebuilt from the other two.
        if dq > dr && dq > ds {
            q = -r - s;
        } else if dr > ds {
            r = -q - s;
        }
        HexCoord::new(q as i32, r as i32)
    }

    /// Hexes at exactly `radius` steps from this one, walking the ring counter-clockwise.
    pub fn ring(self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![self];
        }
        let radius_i = radius as i32;
        let mut results = Vec::with_capacity(6 * radius as usize);
        let start = HexDirection::SouthWest.offset();
        let mut hex = self + HexCoord::new(start.q * radius_i, start.r * radius_i);
        for direction in HexDirection::ALL {
            for _ in 0..radius {
                results.push(hex);
                hex = hex.neighbor(direction);
            }
        }
        results
    }

    /// Every hex within `radius` steps, center first, then ring by ring.
    pub fn within(self, radius: u32) -> Vec<HexCoord> {
        (0..=radius).flat_map(|k| self.ring(k)).collect()
    }
}

/// Number of hexes within `radius` steps of a center, inclusive.
pub fn hex_count(radius: u32) -> usize {
    let r = radius as usize;
    3 * r * (r + 1) + 1
}

impl Add for HexCoord {
    type Output = HexCoord;

    fn add(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for HexCoord {
    type Output = HexCoord;

    fn sub(self, rhs: HexCoord) -> HexCoord {
        HexCoord::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl FromStr for HexCoord {
    type Err = DlError;

    /// Parses `q,r`, tolerating whitespace and surrounding parentheses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (q, r) = trimmed
            .split_once(',')
            .ok_or_else(|| DlError::InvalidCoordinate(s.to_string()))?;
        let q = q
            .trim()
            .parse()
            .map_err(|_| DlError::InvalidCoordinate(s.to_string()))?;
        let r = r
            .trim()
            .parse()
            .map_err(|_| DlError::InvalidCoordinate(s.to_string()))?;
        Ok(HexCoord::new(q, r))
    }
}
