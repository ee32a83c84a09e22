//! Plain value types carried by journaled fields
//!
//! These are the copyable payloads the undo layer snapshots besides the
//! scalar primitives: 2D/3D points, an RGBA color, and a UTC timestamp.

pub mod color;
pub mod point;

pub use color::Color;
pub use point::{Point2, Point3};

/// Timestamp payload for journaled date fields.
pub type Date = chrono::DateTime<chrono::Utc>;
