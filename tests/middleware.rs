use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use franchise_intranet::middleware::{RedirectUnauthorized, SIGNIN_PATH};

#[actix_web::test]
async fn unauthorized_page_redirects_to_signin() {
    let app = test::init_service(
        App::new().service(
            web::scope("")
                .wrap(RedirectUnauthorized)
                .route(
                    "/branches",
                    web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
                ),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/branches").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), SIGNIN_PATH);
}

#[actix_web::test]
async fn forbidden_and_ok_responses_pass_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
            .route(
                "/forbidden",
                web::get().to(|| async { HttpResponse::Forbidden().finish() }),
            ),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/forbidden").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get(header::LOCATION).is_none());
}

#[actix_web::test]
async fn api_scope_without_middleware_keeps_401() {
    let app = test::init_service(
        App::new()
            .service(web::scope("/api").route(
                "/v1/news",
                web::get().to(|| async { HttpResponse::Unauthorized().finish() }),
            ))
            .service(web::scope("").wrap(RedirectUnauthorized)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/news").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
