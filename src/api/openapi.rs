//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assignments, auth, custody, equipment, health, patients, professionals, staff};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Custodia API",
        version = "0.3.0",
        description = "Home-care biomedical equipment loan and custody management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Staff
        staff::list_staff,
        staff::create_staff,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::register_equipment,
        equipment::update_equipment_status,
        equipment::equipment_history,
        // Patients
        patients::list_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::release_patient,
        patients::patient_assignments,
        // Professionals
        professionals::list_professionals,
        professionals::get_professional,
        professionals::create_professional,
        professionals::professional_assignments,
        // Assignments
        assignments::create_assignment,
        assignments::get_assignment,
        assignments::return_assignment,
        // Custody transfers
        custody::list_transfers,
        custody::get_transfer,
        custody::create_transfer,
        custody::accept_transfer,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::StaffInfo,
            // Staff
            crate::models::staff::Staff,
            crate::models::staff::CreateStaff,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::RegisterEquipment,
            crate::models::equipment::UpdateEquipmentStatus,
            crate::models::equipment::OwnerContact,
            // Patients
            crate::models::holder::Patient,
            crate::models::holder::CreatePatient,
            crate::models::holder::UpdatePatient,
            patients::ReleaseResponse,
            // Professionals
            crate::models::holder::Professional,
            crate::models::holder::CreateProfessional,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::assignment::CreateAssignment,
            crate::models::assignment::ReturnAssignment,
            assignments::AssignmentResponse,
            // Custody transfers
            crate::models::custody::CustodyTransfer,
            crate::models::custody::CustodyTransferItem,
            crate::models::custody::CustodyTransferDetails,
            crate::models::custody::CreateCustodyTransfer,
            crate::models::custody::AcceptCustodyTransfer,
            // Enums
            crate::models::enums::EquipmentStatus,
            crate::models::enums::OwnershipType,
            crate::models::enums::HolderKind,
            crate::models::enums::AssignmentState,
            crate::models::enums::TransferState,
            crate::models::enums::ProgramState,
            crate::models::enums::StaffRole,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "staff", description = "Staff account management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "patients", description = "Home-care patients"),
        (name = "professionals", description = "Staff professionals"),
        (name = "assignments", description = "Delivery and return actas"),
        (name = "custody", description = "Custody transfer workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
