pub mod filters;
pub mod page_handler;
pub mod profile_handler;
pub mod static_files;

use std::convert::Infallible;

use log::error;
use persistance::RequestContext;
use render::{
    escape_html, html_page::HtmlPage, menu::MainMenu, template::FileTemplates, RenderError,
};
use warp::{
    http::StatusCode,
    reply::{self, Response},
    Rejection, Reply,
};

use crate::AppState;

pub const SITE_STYLESHEET: &str = "static/css/roster.css";

/// Shows the page with the configured theme, or a plain 500 if the theme
/// cannot be rendered.
pub fn show_page(ctx: &RequestContext, page: HtmlPage, status: StatusCode) -> Response {
    let general = &ctx.config.general;
    let root = persistance::fs::utils::parse_location(&general.root);
    let mut templates = FileTemplates::for_theme(&root, &general.theme);
    let mut menu = MainMenu::with_overview(ctx.config.base_url());
    into_response(page.show(&mut templates, &mut menu), status)
}

fn into_response(rendered: Result<String, RenderError>, status: StatusCode) -> Response {
    match rendered {
        Ok(html) => reply::with_status(reply::html(html), status).into_response(),
        Err(e) => {
            error!("could not render page: {}", e);
            reply::with_status(
                "Internal Server Error",
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    }
}

/// A page that only shows a message below its headline. The message is
/// escaped.
pub fn message_page(state: &AppState, headline: &str, msg: &str, status: StatusCode) -> Response {
    let ctx = RequestContext::new(&state.config);
    let mut page = HtmlPage::new(&ctx, headline);
    page.add_css_file(SITE_STYLESHEET);
    page.add_html(&format!(
        "<div class=\"message\"><p>{}</p></div>",
        escape_html(msg)
    ));
    page.set_url_previous_page(&format!("{}/", ctx.config.base_url()));
    show_page(&ctx, page, status)
}

pub async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed".to_string(),
        )
    } else {
        error!("unhandled error: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error".to_string(),
        )
    };

    Ok(reply::with_status(message, code))
}
