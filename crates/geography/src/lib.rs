//! `refdata-geography` — territorial referential records.
//!
//! Region ⊃ City ⊃ (Sector, Corridor). Each record follows the common
//! lifecycle (create / update / patch / disable / activate); cross-record
//! rules (a city cannot vanish under its sectors) live in the registry.

pub mod city;
pub mod corridor;
pub mod region;
pub mod sector;

pub use city::{City, CityFilter, CityId, CityPatch};
pub use corridor::{Corridor, CorridorFilter, CorridorId, CorridorPatch};
pub use region::{Region, RegionFilter, RegionId, RegionPatch};
pub use sector::{Sector, SectorFilter, SectorId, SectorPatch};
