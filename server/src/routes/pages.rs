use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::Responder;

use crate::auth::AdminPage;
use crate::error::QueueError;

const DISPLAY_HTML: &str = include_str!("../../static/display.html");
const ADMIN_HTML: &str = include_str!("../../static/admin.html");

#[derive(Responder)]
enum AdminResponse {
    Page(RawHtml<&'static str>),
    #[response(status = 401, content_type = "text/plain")]
    Challenge(&'static str, Header<'static>),
    Failed(QueueError),
}

#[get("/")]
fn index() -> RawHtml<&'static str> {
    RawHtml(DISPLAY_HTML)
}

#[get("/display")]
fn display() -> RawHtml<&'static str> {
    RawHtml(DISPLAY_HTML)
}

#[get("/admin")]
fn admin(auth: Result<AdminPage, QueueError>) -> AdminResponse {
    match auth {
        Ok(AdminPage) => AdminResponse::Page(RawHtml(ADMIN_HTML)),
        Err(QueueError::Auth) => AdminResponse::Challenge(
            "authentication required",
            Header::new("WWW-Authenticate", "Basic realm=\"karaqueue\""),
        ),
        Err(other) => AdminResponse::Failed(other),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, display, admin]
}
