// devbuilder-session: form-state reconciliation over the devstate gateway.
//
// A draft is a disposable local copy of one entity being created or
// edited. Field mutations revalidate it; submitting it may first create
// dependent entities (a new volume referenced from a container form, a
// new container referenced from an exec command form) strictly in order,
// then creates or updates the primary entity. The session controller
// owns the single authoritative document snapshot and replaces it
// wholesale after every confirmed mutation.

pub mod controller;
pub mod draft;
pub mod orchestrate;
pub mod project;
