#![no_std] // Result records stay usable without std; storage needs it.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod morphology;

pub use ids::RecordId;
pub use morphology::*;

pub mod model;
pub use model::*;

#[cfg(feature = "std")]
pub mod storage;
