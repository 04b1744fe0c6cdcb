pub mod client;
pub mod documents;
pub mod errors;
pub mod types;

pub use client::{LensClient, LensClientOpts, ManagedProfileMutations, ProfilesManagedApi};
pub use errors::{GraphQlError, LensError};
pub use types::{
    EvmAddress, HideManagedProfileRequest, ManagedProfileVisibility, PaginatedProfileResult,
    PaginatedResultInfo, Profile, ProfileId, ProfilesManagedData, ProfilesManagedVariables,
    UnhideManagedProfileRequest,
};
