//! `refdata-network` — distribution-network referential records.

pub mod agency;
pub mod agency_tier;
pub mod partner;

pub use agency::{Agency, AgencyFilter, AgencyId, AgencyPatch};
pub use agency_tier::{AgencyTier, AgencyTierFilter, AgencyTierId, AgencyTierPatch};
pub use partner::{Partner, PartnerFilter, PartnerId, PartnerPatch};
