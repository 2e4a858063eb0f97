//! Business logic services

pub mod assignments;
pub mod auth;
pub mod custody;
pub mod equipment;
pub mod holders;

use crate::{
    config::{AuthConfig, InventoryConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub equipment: equipment::EquipmentService,
    pub assignments: assignments::AssignmentsService,
    pub custody: custody::CustodyService,
    pub holders: holders::HoldersService,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(
        repository: Repository,
        auth_config: AuthConfig,
        inventory_config: InventoryConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(
                repository.clone(),
                inventory_config.code_prefix,
            ),
            assignments: assignments::AssignmentsService::new(repository.clone()),
            custody: custody::CustodyService::new(repository.clone()),
            holders: holders::HoldersService::new(repository),
        })
    }
}
