mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{create_test_app, token_for, TestApp};
use field_service::models::UserRole;

fn task_body(title: &str, location: &str, assignee: Option<&str>) -> Value {
    json!({
        "title": title,
        "location": location,
        "assignedToId": assignee,
        "status": "pending",
        "priority": "high",
        "customerName": "Acme Telekom",
        "customerPhone": "+90 212 555 0000",
        "vehiclePlate": "34 NET 01",
        "scheduledDate": "2024-05-15T09:00:00Z",
        "scheduledStartTime": "09:00",
        "scheduledEndTime": "11:30"
    })
}

fn report_body(task_id: Option<&str>, status: &str) -> Value {
    json!({
        "taskId": task_id,
        "location": "Kadıköy",
        "vehiclePlate": "34 NET 01",
        "operationType": "installation",
        "customerName": "Acme Telekom",
        "details": "ONT installed and tested",
        "photos": ["photos/1.jpg", "photos/2.jpg"],
        "reportDate": "2024-05-15",
        "reportTime": "14:30",
        "status": status
    })
}

async fn create_task(app: &TestApp, admin: &str, title: &str, location: &str, assignee: Option<&str>) -> Value {
    let response = app.post("/api/field-tasks", admin, task_body(title, location, assignee)).await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.json());
    response.json()
}

fn timestamp(value: &Value) -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339(value.as_str().expect("timestamp string")).expect("rfc3339")
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = create_test_app().await;

    let response = app.request(Method::GET, "/api/field-tasks", None, None).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({"message": "Unauthorized"}));

    let response = app.get("/api/field-tasks", "not-a-jwt").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = create_test_app().await;
    let token = app.technician("u1").await;
    let response = app.get("/api/nope", &token).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.json()["message"].is_string());
}

#[tokio::test]
async fn test_wrong_domain_is_denied_everywhere_even_for_admins() {
    let app = create_test_app().await;
    let admin = app.admin("boss").await;
    let task = create_task(&app, &admin, "Splice", "Kadıköy", None).await;
    let task_uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    app.seed_user("outsider", "outsider@gmail.com", UserRole::Admin).await;
    let token = token_for("outsider", "outsider@gmail.com");

    let calls: Vec<(Method, String, Option<Value>)> = vec![
        (Method::GET, "/api/auth/user".into(), None),
        (Method::POST, "/api/auth/login".into(), None),
        (Method::GET, "/api/field-tasks?all=true".into(), None),
        (Method::GET, task_uri.clone(), None),
        (Method::POST, "/api/field-tasks".into(), Some(task_body("x", "y", None))),
        (Method::PATCH, task_uri.clone(), Some(json!({"status": "completed"}))),
        (Method::DELETE, task_uri, None),
        (Method::GET, "/api/field-reports?all=true".into(), None),
        (Method::POST, "/api/field-reports".into(), Some(report_body(None, "draft"))),
        (Method::GET, "/api/analytics/user-stats".into(), None),
        (Method::GET, "/api/admin/users".into(), None),
        (Method::PATCH, "/api/admin/users/boss".into(), Some(json!({"role": "technician"}))),
        (Method::GET, "/api/admin/recent-activities".into(), None),
    ];

    for (method, uri, body) in calls {
        let response = app.request(method.clone(), &uri, Some(&token), body).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(response.json()["message"], "Access denied");
    }
}

#[tokio::test]
async fn test_current_user_requires_a_user_row() {
    let app = create_test_app().await;
    let token = token_for("newcomer", "newcomer@netmon.com.tr");

    let response = app.get("/api/auth/user", &token).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // Sin fila de usuario el resto de endpoints deniega
    let response = app.get("/api/field-tasks", &token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_upserts_and_keeps_role() {
    let app = create_test_app().await;
    let token = token_for("u1", "u1@netmon.com.tr");

    let response = app.post("/api/auth/login", &token, json!({})).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["role"], "technician");
    assert_eq!(response.json()["firstName"], "U1");

    let admin = app.admin("boss").await;
    let response = app.patch("/api/admin/users/u1", &admin, json!({"role": "admin"})).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.post("/api/auth/login", &token, json!({})).await;
    assert_eq!(response.json()["role"], "admin");

    let response = app.get("/api/auth/user", &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["id"], "u1");
    assert_eq!(response.json()["email"], "u1@netmon.com.tr");
}

#[tokio::test]
async fn test_task_visibility_scenario() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let u2 = app.technician("u2").await;

    let t1 = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let t1_id = t1["id"].as_str().unwrap().to_string();
    assert_eq!(t1["status"], "pending");
    assert_eq!(t1["assignedToId"], "u1");

    let mine = app.get("/api/field-tasks", &u1).await.json();
    assert_eq!(ids(&mine), vec![t1_id.clone()]);
    assert_eq!(mine[0]["assignedTo"]["id"], "u1");
    assert_eq!(mine[0]["location"], "Kadıköy");

    let theirs = app.get("/api/field-tasks", &u2).await.json();
    assert!(ids(&theirs).is_empty());

    // all=true no amplía la vista de un técnico
    let theirs = app.get("/api/field-tasks?all=true", &u2).await.json();
    assert!(ids(&theirs).is_empty());

    let own_admin = app.get("/api/field-tasks", &admin).await.json();
    assert!(ids(&own_admin).is_empty());

    let everything = app.get("/api/field-tasks?all=true", &admin).await.json();
    assert_eq!(ids(&everything), vec![t1_id.clone()]);

    let uri = format!("/api/field-tasks/{t1_id}");
    assert_eq!(app.get(&uri, &u1).await.status_code(), StatusCode::OK);
    assert_eq!(app.get(&uri, &u2).await.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.get(&uri, &admin).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_unassigned_task_has_null_assignee() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let task = create_task(&app, &admin, "Survey", "Maltepe", None).await;

    let response = app
        .get(&format!("/api/field-tasks/{}", task["id"].as_str().unwrap()), &admin)
        .await;
    let body = response.json();
    assert!(body.get("assignedTo").is_some());
    assert!(body["assignedTo"].is_null());
    assert!(body["assignedToId"].is_null());
}

#[tokio::test]
async fn test_only_admins_create_and_delete_tasks() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;

    let response = app.post("/api/field-tasks", &u1, task_body("x", "y", Some("u1"))).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let task = create_task(&app, &admin, "Repair", "Şişli", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    assert_eq!(app.delete(&uri, &u1).await.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&uri, &admin).await.status_code(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri, &admin).await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri, &admin).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_and_missing_ids_are_not_found() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;

    let response = app.get("/api/field-tasks/not-a-uuid", &admin).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json()["message"], "Task not found");

    let missing = "/api/field-tasks/550e8400-e29b-41d4-a716-446655440000";
    assert_eq!(app.get(missing, &admin).await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        app.patch(missing, &admin, json!({"status": "completed"})).await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.get("/api/field-reports/xyz", &admin).await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_status_changes_only_status_and_updated_at() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let before = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", before["id"].as_str().unwrap());

    let response = app.patch(&uri, &u1, json!({"status": "completed"})).await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    let after = response.json();

    assert_eq!(after["status"], "completed");
    assert!(timestamp(&after["updatedAt"]) >= timestamp(&before["updatedAt"]));
    for (key, value) in before.as_object().unwrap() {
        if key == "status" || key == "updatedAt" {
            continue;
        }
        assert_eq!(&after[key], value, "field {key} changed");
    }
}

#[tokio::test]
async fn test_patch_null_clears_and_other_technicians_are_denied() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let u2 = app.technician("u2").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    let response = app.patch(&uri, &u2, json!({"status": "completed"})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app
        .patch(&uri, &admin, json!({"customerPhone": null, "vehiclePlate": ""}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json();
    assert!(body["customerPhone"].is_null());
    assert!(body["vehiclePlate"].is_null());
    assert_eq!(body["customerName"], "Acme Telekom");
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected_without_writes() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;

    let response = app
        .post(
            "/api/field-tasks",
            &admin,
            json!({"title": "", "location": "Kadıköy", "scheduledStartTime": "9am"}),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["message"], "Validation error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"scheduledStartTime"));

    let response = app
        .post("/api/field-tasks", &admin, json!({"title": "x", "location": "y", "status": "done"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/field-tasks", &admin, json!({"title": "x", "location": "y", "hacker": true}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/field-tasks", &admin, task_body("x", "y", Some("ghost")))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "assignedToId");

    let all = app.get("/api/field-tasks?all=true", &admin).await.json();
    assert!(ids(&all).is_empty());
}

#[tokio::test]
async fn test_invalid_patch_leaves_task_untouched() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", None).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    let response = app
        .patch(&uri, &admin, json!({"title": "New title", "priority": "urgent"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let current = app.get(&uri, &admin).await.json();
    assert_eq!(current["title"], "Fiber install");
    assert_eq!(current["updatedAt"], task["updatedAt"]);
}

#[tokio::test]
async fn test_authorization_runs_before_body_validation() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let u2 = app.technician("u2").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    let response = app.post("/api/field-tasks", &u1, json!({"title": ""})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json(), json!({"message": "Access denied"}));

    let response = app.patch(&uri, &u2, json!({"priority": "urgent"})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert!(response.json().get("errors").is_none());

    let missing = "/api/field-tasks/550e8400-e29b-41d4-a716-446655440000";
    let response = app.patch(missing, &admin, json!({"priority": "urgent"})).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let report = app.post("/api/field-reports", &u1, report_body(None, "draft")).await.json();
    let report_uri = format!("/api/field-reports/{}", report["id"].as_str().unwrap());
    let response = app.patch(&report_uri, &u2, json!({"status": "archived"})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.patch("/api/admin/users/u2", &u1, json!({"role": "owner"})).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let response = app.patch("/api/admin/users/ghost", &admin, json!({"role": "owner"})).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_body_errors_name_the_field() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", None).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());

    let response = app.patch(&uri, &admin, json!({"priority": "urgent"})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "priority");
    assert_eq!(response.json()["errors"][0]["code"], "invalid_body");

    let response = app.post("/api/field-tasks", &admin, json!({"location": "Şişli"})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "title");

    let response = app
        .post("/api/field-reports", &admin, json!({"location": "Şişli", "photos": "one.jpg"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "photos");
}

#[tokio::test]
async fn test_assignee_outside_domain_is_rejected() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    app.technician("u1").await;
    app.seed_user("ext", "ext@gmail.com", UserRole::Technician).await;

    let response = app.post("/api/field-tasks", &admin, task_body("x", "y", Some("ext"))).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "assignedToId");
    assert_eq!(response.json()["errors"][0]["code"], "outside_domain");

    let task = create_task(&app, &admin, "Repair", "Şişli", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());
    let response = app.patch(&uri, &admin, json!({"assignedToId": "ext"})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "assignedToId");

    let all = app.get("/api/field-tasks?all=true", &admin).await.json();
    assert_eq!(ids(&all), vec![task["id"].as_str().unwrap().to_string()]);
    assert_eq!(all[0]["assignedTo"]["id"], "u1");
}

#[tokio::test]
async fn test_search_matches_title_location_or_customer() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;

    let by_title = create_task(&app, &admin, "FIBER splice", "Beşiktaş", None).await;
    let by_location = create_task(&app, &admin, "Cabinet", "Fiberpark Plaza", None).await;
    let mut body = task_body("Modem swap", "Ataşehir", None);
    body["customerName"] = json!("SuperFiber Ltd");
    let by_customer = app.post("/api/field-tasks", &admin, body).await.json();
    let mut body = task_body("Pole check", "Üsküdar", None);
    body["customerName"] = json!("Copper Co");
    app.post("/api/field-tasks", &admin, body).await;

    let found = app.get("/api/field-tasks?all=true&search=fiber", &admin).await.json();
    let mut found = ids(&found);
    found.sort();
    let mut expected: Vec<String> = [by_title, by_location, by_customer]
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    expected.sort();
    assert_eq!(found, expected);

    let literal = app.get("/api/field-tasks?all=true&search=%25", &admin).await.json();
    assert!(ids(&literal).is_empty());
}

#[tokio::test]
async fn test_status_and_date_filters() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;

    let on_day = create_task(&app, &admin, "A", "Kadıköy", None).await;
    let mut body = task_body("B", "Kadıköy", None);
    body["scheduledDate"] = json!("2024-05-16T00:00:00Z");
    body["status"] = json!("in_progress");
    let next_day = app.post("/api/field-tasks", &admin, body).await.json();

    let day = app.get("/api/field-tasks?all=true&date=2024-05-15", &admin).await.json();
    assert_eq!(ids(&day), vec![on_day["id"].as_str().unwrap().to_string()]);

    let in_progress = app.get("/api/field-tasks?all=true&status=in_progress", &admin).await.json();
    assert_eq!(ids(&in_progress), vec![next_day["id"].as_str().unwrap().to_string()]);

    let empty_values = app.get("/api/field-tasks?all=true&status=&date=&search=", &admin).await.json();
    assert_eq!(ids(&empty_values).len(), 2);

    // Orden: fecha programada más reciente primero
    let all = app.get("/api/field-tasks?all=true", &admin).await.json();
    assert_eq!(all[0]["id"], next_day["id"]);

    let response = app.get("/api/field-tasks?status=finished", &admin).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let response = app.get("/api/field-tasks?date=tomorrow", &admin).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_draft_then_submit_preserves_fields() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let task_id = task["id"].as_str().unwrap();

    let mut body = report_body(Some(task_id), "draft");
    body["userId"] = json!("someone-else");
    let response = app.post("/api/field-reports", &u1, body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED, "{}", response.json());
    let draft = response.json();
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["userId"], "u1");

    let uri = format!("/api/field-reports/{}", draft["id"].as_str().unwrap());
    let response = app.patch(&uri, &u1, json!({"status": "submitted"})).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let submitted = response.json();

    assert_eq!(submitted["status"], "submitted");
    for (key, value) in draft.as_object().unwrap() {
        if key == "status" || key == "updatedAt" {
            continue;
        }
        assert_eq!(&submitted[key], value, "field {key} changed");
    }

    let view = app.get(&uri, &u1).await.json();
    assert_eq!(view["task"]["id"], task["id"]);
    assert_eq!(view["user"]["id"], "u1");
}

#[tokio::test]
async fn test_reports_are_author_scoped() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let u2 = app.technician("u2").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let task_id = task["id"].as_str().unwrap();

    let r1 = app.post("/api/field-reports", &u1, report_body(Some(task_id), "submitted")).await.json();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let r2 = app.post("/api/field-reports", &u2, report_body(None, "draft")).await.json();

    let mine = app.get("/api/field-reports?all=true", &u1).await.json();
    assert_eq!(ids(&mine), vec![r1["id"].as_str().unwrap().to_string()]);
    assert!(mine
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["userId"] == "u1"));

    let all = app.get("/api/field-reports?all=true", &admin).await.json();
    assert_eq!(ids(&all).len(), 2);
    // Más reciente primero
    assert_eq!(all[0]["id"], r2["id"]);
    assert!(all[0]["task"].is_null());

    let by_task = app
        .get(&format!("/api/field-reports?all=true&taskId={task_id}"), &admin)
        .await
        .json();
    assert_eq!(ids(&by_task), vec![r1["id"].as_str().unwrap().to_string()]);

    let drafts = app.get("/api/field-reports?all=true&status=draft", &admin).await.json();
    assert_eq!(ids(&drafts), vec![r2["id"].as_str().unwrap().to_string()]);

    let r1_uri = format!("/api/field-reports/{}", r1["id"].as_str().unwrap());
    assert_eq!(app.get(&r1_uri, &u2).await.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
        app.patch(&r1_uri, &u2, json!({"status": "draft"})).await.status_code(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.patch(&r1_uri, &admin, json!({"details": null})).await.status_code(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_report_with_unknown_task_is_rejected() {
    let app = create_test_app().await;
    let u1 = app.technician("u1").await;

    let response = app
        .post(
            "/api/field-reports",
            &u1,
            report_body(Some("550e8400-e29b-41d4-a716-446655440000"), "draft"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["errors"][0]["field"], "taskId");
}

#[tokio::test]
async fn test_deleting_a_task_detaches_its_reports() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let report = app
        .post("/api/field-reports", &u1, report_body(Some(task["id"].as_str().unwrap()), "submitted"))
        .await
        .json();

    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());
    assert_eq!(app.delete(&uri, &admin).await.status_code(), StatusCode::NO_CONTENT);

    let view = app
        .get(&format!("/api/field-reports/{}", report["id"].as_str().unwrap()), &u1)
        .await
        .json();
    assert!(view["taskId"].is_null());
    assert!(view["task"].is_null());
}

#[tokio::test]
async fn test_stats_for_user_without_tasks_are_zero() {
    let app = create_test_app().await;
    let u1 = app.technician("u1").await;

    let response = app.get("/api/analytics/user-stats", &u1).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"todayTasks": 0, "completedTasks": 0, "pendingTasks": 0, "weeklyTasks": 0})
    );
}

#[tokio::test]
async fn test_stats_count_own_tasks() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;

    let today = chrono::Utc::now().to_rfc3339();
    for status in ["pending", "completed", "pending"] {
        let mut body = task_body("Job", "Kadıköy", Some("u1"));
        body["status"] = json!(status);
        body["scheduledDate"] = json!(today);
        app.post("/api/field-tasks", &admin, body).await;
    }
    create_task(&app, &admin, "Other", "Kadıköy", Some("admin")).await;

    let stats = app.get("/api/analytics/user-stats", &u1).await.json();
    assert_eq!(stats["todayTasks"], 3);
    assert_eq!(stats["completedTasks"], 1);
    assert_eq!(stats["pendingTasks"], 2);
    assert_eq!(stats["weeklyTasks"], 3);
}

#[tokio::test]
async fn test_recent_activity_feed() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("u1").await;
    let task = create_task(&app, &admin, "Fiber install", "Kadıköy", Some("u1")).await;
    let uri = format!("/api/field-tasks/{}", task["id"].as_str().unwrap());
    app.patch(&uri, &u1, json!({"status": "completed"})).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let report = app
        .post("/api/field-reports", &u1, report_body(Some(task["id"].as_str().unwrap()), "submitted"))
        .await
        .json();

    let response = app.get("/api/admin/recent-activities", &u1).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.get("/api/admin/recent-activities", &admin).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let feed = response.json();
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert!(feed.len() <= 10);

    assert_eq!(feed[0]["type"], "report");
    assert_eq!(feed[0]["id"], report["id"]);
    assert_eq!(feed[0]["action"], "submitted");
    assert_eq!(feed[0]["user"]["id"], "u1");

    assert_eq!(feed[1]["type"], "task");
    assert_eq!(feed[1]["action"], "completed");
    assert_eq!(feed[1]["location"], "Kadıköy");
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = create_test_app().await;
    let admin = app.admin("admin").await;
    let u1 = app.technician("zeynep").await;
    app.technician("ahmet").await;
    app.seed_user("outsider", "outsider@gmail.com", UserRole::Technician).await;

    assert_eq!(app.get("/api/admin/users", &u1).await.status_code(), StatusCode::FORBIDDEN);

    let users = app.get("/api/admin/users", &admin).await.json();
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["firstName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ADMIN", "AHMET", "ZEYNEP"]);

    let response = app
        .patch("/api/admin/users/zeynep", &admin, json!({"role": "admin", "lastName": "Kaya"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["role"], "admin");
    assert_eq!(response.json()["lastName"], "Kaya");

    let response = app.patch("/api/admin/users/ghost", &admin, json!({"role": "admin"})).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.patch("/api/admin/users/zeynep", &admin, json!({"role": "owner"})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
