//! # REST API Interface Layer
//!
//! HTTP endpoints of the taxi service. Handlers log the request, call one domain
//! service, and translate the outcome:
//!
//! - successful form submissions answer `302 Found` with a `Location` header and the
//!   affected record as JSON body
//! - invalid submissions answer `400` with `{"errors": {field: [messages]}}`
//! - unknown ids answer `404`
//! - requests without a live session are redirected to the login page
//!
//! ## Endpoints
//!
//! - `/accounts/login/`, `/accounts/logout/`
//! - `/manufacturers/...`, `/drivers/...`, `/cars/...` (list, create, detail, update, delete)
//! - `/cars/:id/toggle-assign/`
//! - `/` for the fleet counters

pub mod auth;
pub mod auth_apis;
pub mod car_apis;
pub mod driver_apis;
pub mod index_apis;
pub mod manufacturer_apis;
pub mod mappers;
pub mod responses;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::commands::drivers::CreateDriverCommand;
    use crate::storage::DbConnection;
    use crate::{create_router, AppConfig, AppState};

    async fn setup_test() -> (Router, AppState) {
        let config = AppConfig {
            password_iterations: 1_000,
            ..AppConfig::default()
        };
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let state = AppState::new(db, &config);
        let app = create_router(state.clone(), &config).expect("Failed to create router");
        (app, state)
    }

    async fn create_driver(state: &AppState, username: &str, license_number: &str) -> i64 {
        state
            .driver_service
            .create_driver(CreateDriverCommand {
                username: username.to_string(),
                password1: "12345dimka".to_string(),
                password2: "12345dimka".to_string(),
                license_number: license_number.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    fn request(method: &str, uri: &str, session: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = session {
            builder = builder.header(header::COOKIE, format!("sessionid={}", key));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    /// Log in as `username` and return the session key from the cookie
    async fn login(app: &Router, username: &str) -> String {
        let response = send(
            app,
            request(
                "POST",
                "/accounts/login/",
                None,
                Some(json!({"username": username, "password": "12345dimka"})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        cookie
            .split(';')
            .next()
            .and_then(|pair| pair.strip_prefix("sessionid="))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_list_endpoints_require_login() {
        let (app, _) = setup_test().await;

        for uri in ["/manufacturers/", "/drivers/", "/cars/", "/"] {
            let response = send(&app, request("GET", uri, None, None)).await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(location(&response), format!("/accounts/login/?next={}", uri));
        }

        let response = send(&app, request("GET", "/cars/", Some("forged"), None)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_follows_next() {
        let (app, state) = setup_test().await;
        create_driver(&state, "dimka", "ABC12345").await;

        let response = send(
            &app,
            request(
                "POST",
                "/accounts/login/?next=/cars/",
                None,
                Some(json!({"username": "dimka", "password": "12345dimka"})),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/cars/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
        assert!(cookie.starts_with("sessionid="));
        assert!(cookie.contains("HttpOnly"));
        assert_eq!(body_json(response).await["driver"]["username"], "dimka");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let (app, state) = setup_test().await;
        create_driver(&state, "dimka", "ABC12345").await;

        let response = send(
            &app,
            request(
                "POST",
                "/accounts/login/",
                None,
                Some(json!({"username": "dimka", "password": "nope"})),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = body_json(response).await;
        assert_eq!(
            body["errors"]["__all__"][0],
            "Please enter a correct username and password. Note that both fields may be case-sensitive."
        );
    }

    #[tokio::test]
    async fn test_index_counts_visits() {
        let (app, state) = setup_test().await;
        create_driver(&state, "dimka", "ABC12345").await;
        let session = login(&app, "dimka").await;

        let first = body_json(send(&app, request("GET", "/", Some(&session), None)).await).await;
        assert_eq!(first["num_drivers"], 1);
        assert_eq!(first["num_cars"], 0);
        assert_eq!(first["num_visits"], 1);

        let second = body_json(send(&app, request("GET", "/", Some(&session), None)).await).await;
        assert_eq!(second["num_visits"], 2);
    }

    #[tokio::test]
    async fn test_manufacturer_create_and_search() {
        let (app, state) = setup_test().await;
        create_driver(&state, "dimka", "ABC12345").await;
        let session = login(&app, "dimka").await;

        let invalid = send(
            &app,
            request("POST", "/manufacturers/create/", Some(&session), Some(json!({"name": "BMW"}))),
        )
        .await;
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(invalid).await["errors"]["country"][0], "This field is required.");

        for (name, country) in [("Alfa Romeo", "Italy"), ("BMW", "Germany")] {
            let response = send(
                &app,
                request(
                    "POST",
                    "/manufacturers/create/",
                    Some(&session),
                    Some(json!({"name": name, "country": country})),
                ),
            )
            .await;
            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(location(&response), "/manufacturers/");
        }

        let found = body_json(send(&app, request("GET", "/manufacturers/?name=Alfa", Some(&session), None)).await).await;
        let names: Vec<&str> = found["manufacturer_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alfa Romeo"]);
        assert_eq!(found["search"], "Alfa");

        let none = body_json(send(&app, request("GET", "/manufacturers/?name=zaz", Some(&session), None)).await).await;
        assert!(none["manufacturer_list"].as_array().unwrap().is_empty());

        let missing = send(&app, request("GET", "/manufacturers/999/", Some(&session), None)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_driver_create_and_license_update() {
        let (app, state) = setup_test().await;
        create_driver(&state, "admin", "ADM00001").await;
        let session = login(&app, "admin").await;

        let invalid = send(
            &app,
            request(
                "POST",
                "/drivers/create/",
                Some(&session),
                Some(json!({"username": "dimka", "password1": "12345dimka", "password2": "12345dimka"})),
            ),
        )
        .await;
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(invalid).await["errors"]["license_number"].is_array());

        let created = send(
            &app,
            request(
                "POST",
                "/drivers/create/",
                Some(&session),
                Some(json!({
                    "username": "dimka",
                    "password1": "12345dimka",
                    "password2": "12345dimka",
                    "license_number": "ABC12345",
                })),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::FOUND);
        assert_eq!(location(&created), "/drivers/");
        let body = body_json(created).await;
        assert!(body.get("password_hash").is_none());
        let id = body["id"].as_i64().unwrap();

        let driver = state.driver_service.get_driver(id).await.unwrap();
        assert!(driver.check_password("12345dimka"));
        assert_eq!(driver.license_number, "ABC12345");

        let updated = send(
            &app,
            request(
                "POST",
                &format!("/drivers/{}/update/", id),
                Some(&session),
                Some(json!({"license_number": "XYZ98765"})),
            ),
        )
        .await;
        assert_eq!(updated.status(), StatusCode::FOUND);
        assert_eq!(location(&updated), format!("/drivers/{}/", id));

        let detail = body_json(send(&app, request("GET", &format!("/drivers/{}/", id), Some(&session), None)).await).await;
        assert_eq!(detail["driver"]["license_number"], "XYZ98765");
        assert!(detail["cars"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_driver_search_by_username() {
        let (app, state) = setup_test().await;
        create_driver(&state, "test1user", "ABC12345").await;
        create_driver(&state, "test2user", "DEF67890").await;
        let session = login(&app, "test1user").await;

        let response = send(&app, request("GET", "/drivers/?username=test1", Some(&session), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let found = body_json(response).await;
        let usernames: Vec<&str> = found["driver_list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["username"].as_str().unwrap())
            .collect();
        assert_eq!(usernames, vec!["test1user"]);
        assert_eq!(found["search"], "test1");

        let all = body_json(send(&app, request("GET", "/drivers/?username=", Some(&session), None)).await).await;
        assert_eq!(all["driver_list"].as_array().unwrap().len(), 2);
        assert!(all["search"].is_null());
    }

    #[tokio::test]
    async fn test_car_create_and_toggle_assignment() {
        let (app, state) = setup_test().await;
        let admin_id = create_driver(&state, "admin", "ADM00001").await;
        let other_id = create_driver(&state, "bob", "BOB00001").await;
        let session = login(&app, "admin").await;

        let manufacturer = body_json(
            send(
                &app,
                request(
                    "POST",
                    "/manufacturers/create/",
                    Some(&session),
                    Some(json!({"name": "BMW", "country": "Germany"})),
                ),
            )
            .await,
        )
        .await;
        let manufacturer_id = manufacturer["id"].as_i64().unwrap();

        let without_drivers = send(
            &app,
            request(
                "POST",
                "/cars/create/",
                Some(&session),
                Some(json!({"model": "X5", "manufacturer": manufacturer_id})),
            ),
        )
        .await;
        assert_eq!(without_drivers.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(without_drivers).await["errors"]["drivers"].is_array());

        let created = send(
            &app,
            request(
                "POST",
                "/cars/create/",
                Some(&session),
                Some(json!({"model": "X5", "manufacturer": manufacturer_id, "drivers": [other_id]})),
            ),
        )
        .await;
        assert_eq!(created.status(), StatusCode::FOUND);
        let car = body_json(created).await;
        assert_eq!(car["display"], "BMW X5");
        let car_id = car["id"].as_i64().unwrap();

        let toggle_uri = format!("/cars/{}/toggle-assign/", car_id);
        let assigned = send(&app, request("POST", &toggle_uri, Some(&session), None)).await;
        assert_eq!(assigned.status(), StatusCode::FOUND);
        assert_eq!(location(&assigned), format!("/cars/{}/", car_id));
        let drivers = body_json(assigned).await["drivers"].as_array().unwrap().len();
        assert_eq!(drivers, 2);

        send(&app, request("POST", &toggle_uri, Some(&session), None)).await;
        let car = state.car_service.get_car(car_id).await.unwrap();
        assert!(!car.has_driver(admin_id));
        assert!(car.has_driver(other_id));

        let filtered = body_json(send(&app, request("GET", "/cars/?model=x", Some(&session), None)).await).await;
        assert_eq!(filtered["car_list"].as_array().unwrap().len(), 1);

        let deleted = send(&app, request("POST", &format!("/manufacturers/{}/delete/", manufacturer_id), Some(&session), None)).await;
        assert_eq!(deleted.status(), StatusCode::FOUND);
        let cars = body_json(send(&app, request("GET", "/cars/", Some(&session), None)).await).await;
        assert!(cars["car_list"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app, state) = setup_test().await;
        create_driver(&state, "dimka", "ABC12345").await;
        let session = login(&app, "dimka").await;

        let response = send(&app, request("POST", "/accounts/logout/", Some(&session), None)).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/accounts/login/");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let after = send(&app, request("GET", "/drivers/", Some(&session), None)).await;
        assert_eq!(after.status(), StatusCode::FOUND);
    }
}
