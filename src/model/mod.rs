//! Catalog data model.
//!
//! `Plant` is the only stored entity. `NewPlant` and `PlantPatch` are the
//! create and update payloads; the store turns them into documents and
//! enforces the collection schema on every write.

mod id;
mod plant;

pub use id::{IdGenerator, PlantId};
pub use plant::{now, NewPlant, Plant, PlantPatch, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};
