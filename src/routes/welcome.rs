use actix_web::{get, HttpResponse};

const WELCOME_PAGE: &str = include_str!("../../static/welcome.html");

/// Landing page shown before a chat is opened.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(WELCOME_PAGE)
}
