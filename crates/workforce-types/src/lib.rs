//! Shared type definitions for the workforce simulation engine.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. API-facing types flow downstream to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers (run, event, employee, scenario, plan design)
//! - [`enums`] -- Closed enumerations (event types, stages, statuses, bands)
//! - [`events`] -- The immutable [`SimulationEvent`] and its payloads
//! - [`structs`] -- Census rows, accumulated state, contributions, snapshots,
//!   checkpoints
//! - [`calendar`] -- Year bounds, ages, tenures and anniversaries
//! - [`error`] -- The structured error surface ([`StructuredError`])

pub mod calendar;
pub mod enums;
pub mod error;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use calendar::CalendarError;
pub use enums::{
    AgeBand, DetailedStatus, EmploymentStatus, EnrollmentMethod, EnrollmentStatus, EventType,
    PipelineStage, Provenance, TenureBand, TerminationKind,
};
pub use error::{ErrorCode, StructuredError, ToStructured};
pub use events::{
    DeferralEscalationDetails, EligibilityDetails, EnrollmentDetails, EventPayload, HireDetails,
    OptOutDetails, PromotionDetails, RaiseDetails, SimulationEvent, TerminationDetails,
};
pub use ids::{EmployeeId, EventId, PlanDesignId, RunId, ScenarioId};
pub use structs::{
    BaselineEmployee, Checkpoint, ContributionRecord, EmployeeYearState,
    StateAccumulatorContract, WorkforceSnapshotRow, WorkforceSummary,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::RunId::export_all();
        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::EmployeeId::export_all();
        let _ = crate::ids::ScenarioId::export_all();
        let _ = crate::ids::PlanDesignId::export_all();

        // Enums
        let _ = crate::enums::EventType::export_all();
        let _ = crate::enums::TerminationKind::export_all();
        let _ = crate::enums::EnrollmentMethod::export_all();
        let _ = crate::enums::EnrollmentStatus::export_all();
        let _ = crate::enums::Provenance::export_all();
        let _ = crate::enums::EmploymentStatus::export_all();
        let _ = crate::enums::DetailedStatus::export_all();
        let _ = crate::enums::PipelineStage::export_all();
        let _ = crate::enums::AgeBand::export_all();
        let _ = crate::enums::TenureBand::export_all();
        let _ = crate::error::ErrorCode::export_all();

        // Structs
        let _ = crate::events::SimulationEvent::export_all();
        let _ = crate::events::EventPayload::export_all();
        let _ = crate::structs::BaselineEmployee::export_all();
        let _ = crate::structs::StateAccumulatorContract::export_all();
        let _ = crate::structs::ContributionRecord::export_all();
        let _ = crate::structs::WorkforceSnapshotRow::export_all();
        let _ = crate::structs::WorkforceSummary::export_all();
        let _ = crate::structs::Checkpoint::export_all();
        let _ = crate::error::StructuredError::export_all();
    }
}
