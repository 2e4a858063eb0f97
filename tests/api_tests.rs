//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so repeated runs do not collide on logins/documents
fn run_tag() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{:x}", nanos)
}

async fn login(client: &Client, login: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": login, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success(), "login failed for {}", login);

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin").await
}

/// Create a staff account and return (id, token)
async fn create_staff(client: &Client, admin: &str, role: &str, tag: &str) -> (String, String) {
    let staff_login = format!("{}-{}", role, tag);
    let response = client
        .post(format!("{}/staff", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "login": staff_login,
            "full_name": format!("Test {}", role),
            "role": role,
            "password": "test-password",
        }))
        .send()
        .await
        .expect("Failed to create staff");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    let token = login(client, &staff_login, "test-password").await;
    (id, token)
}

async fn register_equipment(client: &Client, token: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name, "ownership": "owned" }))
        .send()
        .await
        .expect("Failed to register equipment");
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

async fn create_patient(client: &Client, token: &str, tag: &str, n: u32) -> Value {
    let response = client
        .post(format!("{}/patients", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "document_id": format!("doc-{}-{}", tag, n),
            "full_name": format!("Patient {}", n),
        }))
        .send()
        .await
        .expect("Failed to create patient");
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

async fn get_equipment(client: &Client, token: &str, id: &str) -> Value {
    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get equipment");
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "login": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "unauthenticated");
}

#[tokio::test]
#[ignore]
async fn test_equipment_requires_auth() {
    let client = Client::new();

    let response = client
        .get(format!("{}/equipment", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

/// The full custody-then-loan lifecycle of one unit
#[tokio::test]
#[ignore]
async fn test_custody_and_assignment_lifecycle() {
    let client = Client::new();
    let tag = run_tag();
    let admin = admin_token(&client).await;

    let (_tech_id, tech_token) = create_staff(&client, &admin, "technical", &tag).await;
    let (recv_id, recv_token) = create_staff(&client, &admin, "administrative", &tag).await;

    let e1 = register_equipment(&client, &admin, "Oxygen concentrator").await;
    let e1_id = e1["id"].as_str().unwrap();
    assert_eq!(e1["loan_gate_open"], true);
    assert_eq!(e1["status"], "available");

    let p1 = create_patient(&client, &admin, &tag, 1).await;
    let p1_id = p1["id"].as_str().unwrap();
    let p2 = create_patient(&client, &admin, &tag, 2).await;
    let p2_id = p2["id"].as_str().unwrap();

    // 1. Send the unit into custody transfer: gate closes
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [e1_id],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let transfer: Value = response.json().await.unwrap();
    let t1_id = transfer["id"].as_str().unwrap();
    assert_eq!(transfer["state"], "sent");
    assert_eq!(transfer["items"].as_array().unwrap().len(), 1);

    let locked = get_equipment(&client, &admin, e1_id).await;
    assert_eq!(locked["loan_gate_open"], false);
    assert_eq!(locked["pending_transfer_id"], t1_id);

    // 2. Loan while the gate is closed fails
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "equipment_id": e1_id,
            "holder_id": p1_id,
            "holder_kind": "patient",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "failed-precondition");

    // Only the designated receiver can accept
    let response = client
        .post(format!("{}/custody-transfers/{}/accept", BASE_URL, t1_id))
        .bearer_auth(&admin)
        .json(&json!({ "receiver_signature": "sig:receiver" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // 3. Acceptance releases the unit to the receiver
    let response = client
        .post(format!("{}/custody-transfers/{}/accept", BASE_URL, t1_id))
        .bearer_auth(&recv_token)
        .json(&json!({ "receiver_signature": "sig:receiver" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let accepted: Value = response.json().await.unwrap();
    assert_eq!(accepted["state"], "accepted");

    let released = get_equipment(&client, &admin, e1_id).await;
    assert_eq!(released["loan_gate_open"], true);
    assert_eq!(released["custodian_id"], recv_id.as_str());
    assert!(released["pending_transfer_id"].is_null());
    assert_eq!(released["effective_status"], "available");

    // Accepting twice fails and changes nothing
    let response = client
        .post(format!("{}/custody-transfers/{}/accept", BASE_URL, t1_id))
        .bearer_auth(&recv_token)
        .json(&json!({ "receiver_signature": "sig:again" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // 4. Loan to P1 succeeds, as the receiver holding custody
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&recv_token)
        .json(&json!({
            "equipment_id": e1_id,
            "holder_id": p1_id,
            "holder_kind": "patient",
            "delivery_notes": "delivered to home",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let a1: Value = response.json().await.unwrap();
    let a1_id = a1["id"].as_str().unwrap();
    assert_eq!(a1["state"], "active");

    let on_loan = get_equipment(&client, &admin, e1_id).await;
    assert_eq!(on_loan["effective_status"], "on_loan");

    // 5. A second concurrent holder is rejected
    let response = client
        .post(format!("{}/assignments", BASE_URL))
        .bearer_auth(&recv_token)
        .json(&json!({
            "equipment_id": e1_id,
            "holder_id": p2_id,
            "holder_kind": "patient",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // Program exit is blocked while the patient holds the unit
    let response = client
        .post(format!("{}/patients/{}/release", BASE_URL, p1_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // 6. Return with a maintenance condition
    let response = client
        .post(format!("{}/assignments/{}/return", BASE_URL, a1_id))
        .bearer_auth(&recv_token)
        .json(&json!({
            "return_notes": "power supply damaged",
            "final_condition": "maintenance",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let finalized: Value = response.json().await.unwrap();
    assert_eq!(finalized["state"], "finalized");
    assert!(finalized["returned_at"].is_string());

    let after_return = get_equipment(&client, &admin, e1_id).await;
    assert_eq!(after_return["effective_status"], "maintenance");

    // Double return is rejected, the reported condition stands
    let response = client
        .post(format!("{}/assignments/{}/return", BASE_URL, a1_id))
        .bearer_auth(&recv_token)
        .json(&json!({ "final_condition": "available" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let still = get_equipment(&client, &admin, e1_id).await;
    assert_eq!(still["effective_status"], "maintenance");

    // With nothing on loan the patient can exit
    let response = client
        .post(format!("{}/patients/{}/release", BASE_URL, p1_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/patients/{}", BASE_URL, p1_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let exited: Value = response.json().await.unwrap();
    assert_eq!(exited["program_state"], "exited");

    // The audit trail keeps the finalized acta
    let response = client
        .get(format!("{}/equipment/{}/assignments", BASE_URL, e1_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let history: Value = response.json().await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
}

/// One already-locked unit poisons the whole transfer batch
#[tokio::test]
#[ignore]
async fn test_custody_transfer_atomicity() {
    let client = Client::new();
    let tag = run_tag();
    let admin = admin_token(&client).await;

    let (_tech_id, tech_token) = create_staff(&client, &admin, "technical", &tag).await;
    let (recv_id, _recv_token) = create_staff(&client, &admin, "administrative", &tag).await;

    let e_locked = register_equipment(&client, &admin, "Infusion pump").await;
    let e_free = register_equipment(&client, &admin, "Nebulizer").await;
    let locked_id = e_locked["id"].as_str().unwrap();
    let free_id = e_free["id"].as_str().unwrap();

    // Lock the first unit into a transfer
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [locked_id],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // A batch containing it must fail without touching the other unit
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [locked_id, free_id],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "failed-precondition");

    let untouched = get_equipment(&client, &admin, free_id).await;
    assert_eq!(untouched["loan_gate_open"], true);
    assert!(untouched["pending_transfer_id"].is_null());
}

/// Validation rejections happen before any write
#[tokio::test]
#[ignore]
async fn test_custody_transfer_validation() {
    let client = Client::new();
    let tag = run_tag();
    let admin = admin_token(&client).await;

    let (_tech_id, tech_token) = create_staff(&client, &admin, "technical", &tag).await;
    let (recv_id, _recv_token) = create_staff(&client, &admin, "administrative", &tag).await;
    let unit = register_equipment(&client, &admin, "Wheelchair").await;
    let unit_id = unit["id"].as_str().unwrap();

    // Empty batch
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Blank signature
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [unit_id],
            "sender_signature": "  ",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // Non-technical sender
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "receiver_id": &recv_id,
            "equipment_ids": [unit_id],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Receiver without the administrative role
    let (tech2_id, _tech2_token) = create_staff(&client, &admin, "technical", &format!("{}b", tag)).await;
    let response = client
        .post(format!("{}/custody-transfers", BASE_URL))
        .bearer_auth(&tech_token)
        .json(&json!({
            "receiver_id": &tech2_id,
            "equipment_ids": [unit_id],
            "sender_signature": "sig:sender",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);

    // None of the rejections locked the unit
    let untouched = get_equipment(&client, &admin, unit_id).await;
    assert_eq!(untouched["loan_gate_open"], true);
    assert!(untouched["pending_transfer_id"].is_null());
}

/// Equipment codes and acta numbers are monotonic and zero-padded
#[tokio::test]
#[ignore]
async fn test_sequence_numbering() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let first = register_equipment(&client, &admin, "Monitor A").await;
    let second = register_equipment(&client, &admin, "Monitor B").await;

    // other tests may register units concurrently, so only strict growth
    // is guaranteed from here
    let first_number = first["code_number"].as_i64().unwrap();
    let second_number = second["code_number"].as_i64().unwrap();
    assert!(second_number > first_number);

    let code = first["code"].as_str().unwrap();
    let (_prefix, digits) = code.rsplit_once('-').unwrap();
    assert!(digits.len() >= 3, "code digits are zero-padded: {}", code);
}

/// Direct writes of on_loan are rejected; maintenance overrides apply
#[tokio::test]
#[ignore]
async fn test_status_override() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let unit = register_equipment(&client, &admin, "Suction machine").await;
    let unit_id = unit["id"].as_str().unwrap();

    let response = client
        .put(format!("{}/equipment/{}/status", BASE_URL, unit_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "on_loan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .put(format!("{}/equipment/{}/status", BASE_URL, unit_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "maintenance" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let updated = get_equipment(&client, &admin, unit_id).await;
    assert_eq!(updated["effective_status"], "maintenance");
}
