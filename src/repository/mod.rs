//! Repository layer for database operations

pub mod assignments;
pub mod custody;
pub mod equipment;
pub mod holders;
pub mod sequences;
pub mod staff;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub equipment: equipment::EquipmentRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub custody: custody::CustodyRepository,
    pub patients: holders::PatientsRepository,
    pub professionals: holders::ProfessionalsRepository,
    pub staff: staff::StaffRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            custody: custody::CustodyRepository::new(pool.clone()),
            patients: holders::PatientsRepository::new(pool.clone()),
            professionals: holders::ProfessionalsRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            pool,
        }
    }
}
