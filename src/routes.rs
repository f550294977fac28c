use std::sync::Arc;

use actix_session::Session;
use actix_web::{get, web, HttpResponse};

use crate::db::{parse_id, EntityStore};
use crate::error::Error;
use crate::handler::{serialize_admin, serialize_buyer, serialize_influencer};
use crate::session::Principal;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_session)
        .service(me)
        .service(public_influencer);
}

#[get("/session")]
async fn current_session(session: Session) -> Result<HttpResponse, Error> {
    let principal = Principal::read(&session)?;

    Ok(HttpResponse::Ok().json(principal))
}

#[get("/me")]
async fn me(data: web::Data<AppState>, session: Session) -> Result<HttpResponse, Error> {
    let principal = Principal::read(&session)?;

    let response = match &principal {
        Principal::Anonymous => HttpResponse::Ok().json(serde_json::Value::Null),
        Principal::Buyer(id) => {
            let buyer = data.store.find_buyer(parse_id(id)?).await?;
            HttpResponse::Ok().json(serialize_buyer(buyer.as_ref()))
        }
        Principal::Influencer(id) => {
            let influencer = data.store.find_influencer(parse_id(id)?).await?;
            HttpResponse::Ok().json(serialize_influencer(influencer.as_ref()))
        }
        Principal::Admin(id) => {
            let admin = data.store.find_admin(parse_id(id)?).await?;
            HttpResponse::Ok().json(serialize_admin(admin.as_ref()))
        }
    };

    Ok(response)
}

#[get("/influencers/{id}")]
async fn public_influencer(
    data: web::Data<AppState>,
    path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();
    let influencer = data.store.find_influencer(id).await?;

    if influencer.is_none() {
        log::debug!("Influencer {} not found", id);
    }

    Ok(HttpResponse::Ok().json(serialize_influencer(influencer.as_ref())))
}

#[cfg(test)]
mod tests {
    use actix_session::storage::CookieSessionStore;
    use actix_session::SessionMiddleware;
    use actix_web::cookie::{Cookie, Key};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::model::{Admin, Buyer, Influencer, PasswordHash};
    use crate::session::SessionData;

    /// In-memory rows; `failing` makes every lookup return a database error.
    #[derive(Default)]
    struct MemoryStore {
        buyers: Vec<Buyer>,
        influencers: Vec<Influencer>,
        admins: Vec<Admin>,
        failing: bool,
    }

    impl MemoryStore {
        fn seeded() -> Self {
            MemoryStore {
                buyers: vec![Buyer {
                    id: 5,
                    name: "alice".to_string(),
                    email: "a@b.com".to_string(),
                    password: PasswordHash::from_hash("hash123"),
                }],
                influencers: vec![Influencer {
                    id: 2,
                    name: "xavier".to_string(),
                    email: "x@y.com".to_string(),
                    password: PasswordHash::from_hash("h2"),
                    handle: Some("@xavier".to_string()),
                }],
                admins: vec![Admin {
                    id: 1,
                    name: "root".to_string(),
                    email: "root@market.io".to_string(),
                    password: PasswordHash::from_hash("h1"),
                }],
                failing: false,
            }
        }

        fn check(&self) -> Result<(), Error> {
            if self.failing {
                return Err(Error::Db(sqlx::Error::PoolTimedOut));
            }

            Ok(())
        }
    }

    #[async_trait]
    impl EntityStore for MemoryStore {
        async fn find_buyer(&self, id: u64) -> Result<Option<Buyer>, Error> {
            self.check()?;
            Ok(self.buyers.iter().find(|b| b.id == id).cloned())
        }

        async fn find_influencer(&self, id: u64) -> Result<Option<Influencer>, Error> {
            self.check()?;
            Ok(self.influencers.iter().find(|i| i.id == id).cloned())
        }

        async fn find_admin(&self, id: u64) -> Result<Option<Admin>, Error> {
            self.check()?;
            Ok(self.admins.iter().find(|a| a.id == id).cloned())
        }
    }

    #[get("/test/principal/{role}/{id}")]
    async fn sign_in(
        session: Session,
        path: web::Path<(String, String)>,
    ) -> Result<HttpResponse, Error> {
        let (role, id) = path.into_inner();
        let principal = match role.as_str() {
            "admin" => Principal::Admin(id),
            "influencer" => Principal::Influencer(id),
            _ => Principal::Buyer(id),
        };
        principal.store(&session)?;

        Ok(HttpResponse::Ok().finish())
    }

    #[get("/test/conflicting")]
    async fn sign_in_twice(session: Session) -> Result<HttpResponse, Error> {
        SessionData {
            admin_id: Some("1".to_string()),
            user_id: Some("2".to_string()),
            ..Default::default()
        }
        .write(&session)?;

        Ok(HttpResponse::Ok().finish())
    }

    macro_rules! test_app {
        ($store:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState {
                        store: Arc::new($store),
                    }))
                    .configure(configure)
                    .service(sign_in)
                    .service(sign_in_twice)
                    .wrap(
                        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                            .cookie_secure(false)
                            .build(),
                    ),
            )
            .await
        };
        () => {
            test_app!(MemoryStore::seeded())
        };
    }

    fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
        response
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned()
    }

    /// Sign in through the helper route and return the resulting session cookie.
    macro_rules! signed_in {
        ($app:expr, $path:expr) => {{
            let request = test::TestRequest::get().uri($path).to_request();
            let response = test::call_service($app, request).await;
            session_cookie(&response)
        }};
    }

    mod session_route {
        use super::*;

        #[actix_web::test]
        async fn anonymous_session_reports_anonymous() {
            let app = test_app!();

            let request = test::TestRequest::get().uri("/session").to_request();
            let body: Value = test::call_and_read_body_json(&app, request).await;

            assert_eq!(body, json!({ "role": "anonymous" }));
        }

        #[actix_web::test]
        async fn stored_principal_is_reported() {
            let app = test_app!();
            let cookie = signed_in!(&app, "/test/principal/buyer/7");

            let request = test::TestRequest::get()
                .uri("/session")
                .cookie(cookie)
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, request).await;

            assert_eq!(body, json!({ "role": "buyer", "id": "7" }));
        }

        #[actix_web::test]
        async fn conflicting_session_is_a_bad_request() {
            let app = test_app!();
            let cookie = signed_in!(&app, "/test/conflicting");

            let request = test::TestRequest::get()
                .uri("/session")
                .cookie(cookie)
                .to_request();
            let response = test::call_service(&app, request).await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(
                body,
                json!({ "error": "Your session is invalid, please sign in again." })
            );
        }
    }

    mod me_route {
        use super::*;

        async fn me_as(path: &str) -> (StatusCode, Value) {
            let app = test_app!();
            let cookie = signed_in!(&app, path);

            let request = test::TestRequest::get().uri("/me").cookie(cookie).to_request();
            let response = test::call_service(&app, request).await;
            let status = response.status();

            (status, test::read_body_json(response).await)
        }

        #[actix_web::test]
        async fn anonymous_is_null() {
            let app = test_app!();

            let request = test::TestRequest::get().uri("/me").to_request();
            let response = test::call_service(&app, request).await;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(body, Value::Null);
        }

        #[actix_web::test]
        async fn buyer_row_is_returned_without_password() {
            let (status, body) = me_as("/test/principal/buyer/5").await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "id": 5, "name": "alice", "email": "a@b.com" }));
        }

        #[actix_web::test]
        async fn influencer_row_is_returned_without_password() {
            let (status, body) = me_as("/test/principal/influencer/2").await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body,
                json!({ "id": 2, "name": "xavier", "email": "x@y.com", "handle": "@xavier" })
            );
        }

        #[actix_web::test]
        async fn admin_row_is_returned_without_password() {
            let (status, body) = me_as("/test/principal/admin/1").await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "id": 1, "name": "root", "email": "root@market.io" }));
        }

        #[actix_web::test]
        async fn missing_row_is_null() {
            let (status, body) = me_as("/test/principal/buyer/99").await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, Value::Null);
        }

        #[actix_web::test]
        async fn non_numeric_id_is_a_bad_request() {
            let (status, body) = me_as("/test/principal/buyer/u1").await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "The requested identifier is not valid." }));
        }

        #[actix_web::test]
        async fn store_failure_is_an_internal_error() {
            let app = test_app!(MemoryStore {
                failing: true,
                ..Default::default()
            });
            let cookie = signed_in!(&app, "/test/principal/buyer/5");

            let request = test::TestRequest::get().uri("/me").cookie(cookie).to_request();
            let response = test::call_service(&app, request).await;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = test::read_body_json(response).await;
            assert_eq!(body, json!({ "error": "Internal server error" }));
        }
    }

    mod influencer_route {
        use super::*;

        #[actix_web::test]
        async fn existing_influencer_is_returned_without_password() {
            let app = test_app!();

            let request = test::TestRequest::get().uri("/influencers/2").to_request();
            let response = test::call_service(&app, request).await;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = test::read_body_json(response).await;
            assert!(body.get("password").is_none());
            assert_eq!(body["handle"], "@xavier");
            assert_eq!(body["email"], "x@y.com");
        }

        #[actix_web::test]
        async fn missing_influencer_is_null() {
            let app = test_app!();

            let request = test::TestRequest::get().uri("/influencers/404").to_request();
            let body: Value = test::call_and_read_body_json(&app, request).await;

            assert_eq!(body, Value::Null);
        }
    }
}
