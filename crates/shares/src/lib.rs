//! `landshare-engine`: Kila/Kanal/Marla/Sarshai conversion and khewat
//! share allocation.
//!
//! Pure engine crate: receives already-structured khewat records, returns a
//! fully computed owner/khewat report or the invariant that failed. All
//! arithmetic is exact; rounding happens only when an area is displayed.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod allocate;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parse;
pub mod quantity;
pub mod report;
pub mod units;
pub mod validate;

pub use config::{ShareRequest, ValidationConfig, ValidationMode};
pub use engine::{run, run_parcels, RunStage};
pub use error::{Result, ShareError};
pub use model::{OwnerSummaries, OwnerSummary, Parcel, ShareReport, ValidationReport};
pub use parse::parse_fraction_or_decimal;
pub use quantity::{Quantity, Rational};
pub use units::{from_area, from_mixed_radix, to_mixed_radix, MixedRadixArea};
