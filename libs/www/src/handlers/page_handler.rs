use std::{collections::HashMap, sync::Arc};

use log::warn;
use persistance::RequestContext;
use render::{escape_html, html_page::HtmlPage};
use warp::{filters::BoxedFilter, http::StatusCode, reply::Response, Filter, Reply};

use super::{filters::with_state, message_page, show_page, SITE_STYLESHEET};
use crate::{handlers::profile_handler::MODE_VCARD, AppState};

struct Runner {}

impl Runner {
    pub fn overview(state: &AppState, query_params: HashMap<String, String>) -> Response {
        let ctx = RequestContext::new(&state.config);
        let org = &ctx.organization;
        let base_url = ctx.config.base_url();
        let mut page = HtmlPage::new(&ctx, "Overview");
        page.add_css_file(SITE_STYLESHEET);
        page.add_javascript_file("static/js/roster.js");
        page.add_rss_file(
            &format!("{}/feeds/announcements.xml", base_url),
            &format!("{} - Announcements", org.shortname),
        );
        page.add_javascript("roster.highlightMembers('#member-list');", true);
        page.has_navbar();

        match query_params.get("print").map(String::as_str) {
            Some("1") | Some("true") => page.set_print_mode(),
            _ => {
                if let Some("1") | Some("true") = query_params.get("inline").map(String::as_str) {
                    page.set_inline_mode();
                }
            }
        }
        if let Some(back) = query_params.get("back") {
            page.set_url_previous_page(back);
        }

        if let Err(e) = page.add_page_functions_menu_item(
            "menu-item-print",
            "Print",
            &format!("{}/?print=1", base_url),
            "fas fa-print",
            "",
            0,
            "Show a print version of this page",
        ) {
            warn!("{}", e);
        }

        let mut users: Vec<_> = state.users.iter().collect();
        users.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        let mut list = String::from("<ul id=\"member-list\" class=\"members\">");
        for user in users {
            list.push_str(&format!(
                "<li>{} <a href=\"{}/profile/profile_function?mode={}&amp;user_id={}\">vCard</a></li>",
                escape_html(&user.full_name()),
                base_url,
                MODE_VCARD,
                user.id
            ));
        }
        list.push_str("</ul>");
        page.add_html(&format!("<h2>{}</h2>", escape_html(&org.longname)));
        page.add_html(&list);

        show_page(&ctx, page, StatusCode::OK)
    }

    pub fn show_error(state: &AppState, params: HashMap<String, String>) -> Response {
        let msg = params
            .get("msg")
            .map(String::as_str)
            .unwrap_or("Error could not be determined.");
        message_page(state, "Note", msg, StatusCode::OK)
    }
}

pub struct PageRouter {
    state: Arc<AppState>,
}

impl PageRouter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn routes(&self) -> BoxedFilter<(impl Reply,)> {
        self.error().or(self.overview()).boxed()
    }

    fn overview(&self) -> BoxedFilter<(impl Reply,)> {
        warp::get()
            .and(warp::path::end())
            .and(with_state(self.state.clone()))
            .and(warp::query::<HashMap<String, String>>())
            .map(|state: Arc<AppState>, query_params: HashMap<String, String>| {
                Runner::overview(&state, query_params)
            })
            .boxed()
    }

    fn error(&self) -> BoxedFilter<(impl Reply,)> {
        warp::get()
            .and(warp::path("error"))
            .and(warp::path::end())
            .and(with_state(self.state.clone()))
            .and(warp::query::<HashMap<String, String>>())
            .map(|state: Arc<AppState>, params: HashMap<String, String>| {
                Runner::show_error(&state, params)
            })
            .boxed()
    }
}
