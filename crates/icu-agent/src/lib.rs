//! `icu-agent`: the two kinds of agent in the ICU simulation.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`patient`]     | `Patient`, `PatientState`, `PatientEvent`, `DischargeRecord` |
//! | [`department`]  | `Department`, `BedSlot`, `BedKind`, `BedSelector`, `pick_random_free_slot` |
//! | [`store`]       | `PatientStore` (active patients keyed by `PatientId`)       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                          |
//! |---------|-----------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on slots, states and records. |
//!
//! # Patient lifecycle (summary)
//!
//! ```text
//! Unassigned ──(front desk allocates a bed)──▶ EnRoute
//! EnRoute    ──(next step)───────────────────▶ InIcu   (admission time recorded)
//! InIcu      ──(remaining stay ≤ 0)──────────▶ Discharged (record emitted, bed freed)
//! ```

pub mod department;
pub mod patient;
pub mod store;

#[cfg(test)]
mod tests;

pub use department::{BedKind, BedSelector, BedSlot, Department, pick_random_free_slot};
pub use patient::{DischargeRecord, Patient, PatientEvent, PatientState};
pub use store::PatientStore;
