//! Data models for Custodia

pub mod assignment;
pub mod custody;
pub mod enums;
pub mod equipment;
pub mod holder;
pub mod staff;

// Re-export commonly used types
pub use assignment::Assignment;
pub use custody::{CustodyTransfer, CustodyTransferDetails, CustodyTransferItem};
pub use enums::{
    AssignmentState, EquipmentStatus, HolderKind, OwnershipType, ProgramState, StaffRole,
    TransferState,
};
pub use equipment::{Equipment, EquipmentDetails, LoanState};
pub use holder::{Patient, Professional};
pub use staff::{Staff, StaffClaims};
