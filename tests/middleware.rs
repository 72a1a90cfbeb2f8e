use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use flowcrm::middleware::RedirectUnauthorized;

#[actix_web::test]
async fn redirects_unauthorized_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

// Mirrors the server layout: the JSON api scope is registered without the
// redirect middleware, so clients get a bare 401 while page requests are
// sent to the sign-in form.
#[actix_web::test]
async fn api_scope_keeps_plain_401_while_pages_redirect() {
    let app = test::init_service(
        App::new()
            .service(
                web::scope("/api").route(
                    "/v1/contacts",
                    web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
                ),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .route(
                        "/contacts",
                        web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
                    ),
            ),
    )
    .await;

    let api_req = test::TestRequest::get().uri("/api/v1/contacts").to_request();
    let api_resp = test::call_service(&app, api_req).await;
    assert_eq!(api_resp.status(), StatusCode::UNAUTHORIZED);
    assert!(api_resp.headers().get(header::LOCATION).is_none());

    let page_req = test::TestRequest::get().uri("/contacts").to_request();
    let page_resp = test::call_service(&app, page_req).await;
    assert_eq!(page_resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        page_resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}
