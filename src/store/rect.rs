/* src/store/rect.rs */

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer rectangle, stored as `x,y,width,height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32,
}

impl Rect {
	pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}
}

impl fmt::Display for Rect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRectError {
	#[error("expected 4 comma-separated integers, found {0} fields")]
	FieldCount(usize),

	#[error("invalid integer: {0}")]
	Int(#[from] ParseIntError),
}

impl FromStr for Rect {
	type Err = ParseRectError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let fields: Vec<&str> = s.split(',').map(str::trim).collect();
		let [x, y, width, height] = fields.as_slice() else {
			return Err(ParseRectError::FieldCount(fields.len()));
		};

		Ok(Self {
			x: x.parse()?,
			y: y.parse()?,
			width: width.parse()?,
			height: height.parse()?,
		})
	}
}
