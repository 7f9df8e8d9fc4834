// devbuilder-common: Devfile domain types and field validators shared
// across the devbuilder workspace.

pub mod types;
pub mod validate;
