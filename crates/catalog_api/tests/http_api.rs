use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use catalog_api::{router, AppState};
use catalog_core::db::open_db;
use catalog_core::{
    InstitutionRepository, InstitutionType, NewInstitution, SqliteInstitutionRepository,
};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    db_path: std::path::PathBuf,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("catalog.sqlite3");
        // Opening once applies migrations so seeding can write directly.
        drop(open_db(&db_path).unwrap());
        let app = router(AppState::new(db_path.clone()));
        Self {
            _dir: dir,
            db_path,
            app,
        }
    }

    fn seed_institution(&self, name: &str, city: Option<&str>) -> i64 {
        seed_institution(&self.db_path, name, city)
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get_page(&self, uri: &str) -> (StatusCode, String, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

fn seed_institution(db_path: &Path, name: &str, city: Option<&str>) -> i64 {
    let conn = open_db(db_path).unwrap();
    SqliteInstitutionRepository::new(&conn)
        .create_institution(&NewInstitution {
            name: name.to_string(),
            kind: Some(InstitutionType::Universite),
            city: city.map(str::to_string),
            country: Some("Maroc".to_string()),
        })
        .unwrap()
        .id
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn search_without_or_with_short_query_returns_empty_array() {
    let app = TestApp::new();
    app.seed_institution("Alpha", Some("Agadir"));

    let (status, body) = app.get("/api/institutions/search").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));

    let (status, body) = app.get("/api/institutions/search?q=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn search_returns_summaries_with_type_name() {
    let app = TestApp::new();
    let id = app.seed_institution("Université Moulay Ismail", Some("Meknès"));
    app.seed_institution("Lycée Ibn Sina", Some("Rabat"));

    let (status, body) = app.get("/api/institutions/search?q=mekn%C3%A8s").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        parse(&body),
        json!([{
            "id": id,
            "name": "Université Moulay Ismail",
            "type": "UNIVERSITE",
            "city": "Meknès",
            "country": "Maroc"
        }])
    );
}

#[tokio::test]
async fn search_caps_results_at_ten() {
    let app = TestApp::new();
    for index in 0..13 {
        app.seed_institution(&format!("Springfield Campus {index}"), None);
    }

    let (_, body) = app.get("/api/institutions/search?q=springfield").await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn hierarchy_can_be_built_and_read_back() {
    let app = TestApp::new();
    let inst = app.seed_institution("Faculté", None);

    let (status, body) = app
        .post_json(
            &format!("/api/institutions/{inst}/programs"),
            json!({ "name": "  Informatique  " }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let program = parse(&body);
    assert_eq!(program["name"], "Informatique");
    assert_eq!(program["institutionId"], inst);
    let program_id = program["id"].as_i64().unwrap();

    let (status, body) = app
        .post_json(
            &format!("/api/programs/{program_id}/levels"),
            json!({ "label": "L1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let level_id = parse(&body)["id"].as_i64().unwrap();

    for name in ["Réseaux", "Algorithmique"] {
        let (status, _) = app
            .post_json(
                &format!("/api/levels/{level_id}/subjects"),
                json!({ "name": name }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app.get(&format!("/api/institutions/{inst}/subjects")).await;
    let names: Vec<String> = parse(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|subject| subject["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Algorithmique", "Réseaux"]);

    let (_, body) = app
        .get(&format!("/api/institutions/{inst}/programs/count"))
        .await;
    assert_eq!(parse(&body), json!({ "count": 1 }));

    let (_, body) = app
        .get(&format!(
            "/api/institutions/{inst}/structure?programId={program_id}"
        ))
        .await;
    let structure = parse(&body);
    assert_eq!(structure["selectedProgramId"], program_id);
    assert_eq!(structure["levels"].as_array().unwrap().len(), 1);
    assert_eq!(structure["subjects"], Value::Null);
}

#[tokio::test]
async fn blank_name_is_rejected_with_400_and_not_found_view() {
    let app = TestApp::new();
    let inst = app.seed_institution("Validation", None);

    let (status, body) = app
        .post_json(
            &format!("/api/institutions/{inst}/programs"),
            json!({ "name": "   " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("data-view=\"error/404\""));
    assert!(body.contains("name must not be blank"));

    let (_, body) = app
        .get(&format!("/api/institutions/{inst}/programs"))
        .await;
    assert_eq!(parse(&body), json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_validation_failure() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/programs/1/levels")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("error/404"));
}

#[tokio::test]
async fn missing_subject_renders_not_found_page() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/subjects/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("data-view=\"error/404\""));
    assert!(body.contains("subject not found: 4242"));
}

#[tokio::test]
async fn dangling_parent_renders_internal_error_page() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/levels/999/subjects", json!({ "name": "Orphan" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("data-view=\"error/500\""));
    assert!(body.contains("FOREIGN KEY"));
}

#[tokio::test]
async fn unparseable_subject_id_renders_internal_error_page() {
    let app = TestApp::new();

    let (status, content_type, body) = app.get_page("/api/subjects/abc").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type.starts_with("text/html"));
    assert!(body.contains("data-view=\"error/500\""));
}

#[tokio::test]
async fn rejected_query_strings_render_html_error_pages() {
    let app = TestApp::new();
    let inst = app.seed_institution("Université Hassan II", Some("Casablanca"));

    for uri in [
        "/api/institutions/search?q=ab&q=cd".to_string(),
        format!("/api/institutions/{inst}/structure?programId=x"),
    ] {
        let (status, content_type, body) = app.get_page(&uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(content_type.starts_with("text/html"), "{uri}");
        assert!(body.contains("data-view=\"error/500\""), "{uri}");
    }
}
