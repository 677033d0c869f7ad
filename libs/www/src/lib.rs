pub mod handlers;

use std::{path::PathBuf, sync::Arc};

use handlers::{
    handle_rejection, page_handler::PageRouter, profile_handler::ProfileRouter,
    static_files::StaticFileRouter,
};
use log::info;
use persistance::{
    fs::{config::Config, utils::parse_location},
    users::UserStore,
};
use warp::{filters::BoxedFilter, Filter, Reply};

/// Read-only state shared by all requests.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
}

impl AppState {
    pub fn new(config: Config, users: UserStore) -> Self {
        Self { config, users }
    }

    pub fn root(&self) -> PathBuf {
        parse_location(&self.config.general.root)
    }
}

pub fn routes(state: Arc<AppState>) -> BoxedFilter<(impl Reply,)> {
    let static_files = StaticFileRouter { root: state.root() };
    let profile = ProfileRouter::new(state.clone());
    let pages = PageRouter::new(state);
    static_files
        .routes()
        .or(profile.routes())
        .or(pages.routes())
        .recover(handle_rejection)
        .boxed()
}

pub async fn server(config: Config, users: UserStore) {
    let port = config.general.port;
    let state = Arc::new(AppState::new(config, users));
    info!("Starting Server at: http://0.0.0.0:{}", port);
    warp::serve(routes(state)).run(([0, 0, 0, 0], port)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistance::fs::config::DEFAULT_CONFIG;
    use warp::http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    };

    const USERS: &str = r#"
        [[users]]
        id = 1
        login = "admin"
        first_name = "Paul"
        last_name = "Webmaster"

        [[users]]
        id = 2
        login = "jdoe"
        first_name = "Jane"
        last_name = "Doe"
        email = "jane@example.org"
        birthday = "1990-05-17"
    "#;

    fn state() -> Arc<AppState> {
        let mut config = Config::parse(DEFAULT_CONFIG).unwrap();
        // the theme and assets shipped with the repository
        config.general.root = concat!(env!("CARGO_MANIFEST_DIR"), "/../..").to_string();
        Arc::new(AppState::new(config, UserStore::parse(USERS).unwrap()))
    }

    async fn get(path: &str) -> warp::http::Response<String> {
        warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes(state()))
            .await
            .map(|body| String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn exports_vcard() {
        let res = get("/profile/profile_function?user_id=2&mode=1").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[CONTENT_TYPE], "text/x-vcard");
        assert_eq!(
            res.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"Jane Doe.vcf\""
        );
        let expected = state().users.get(2).unwrap().vcard();
        assert_eq!(res.body(), &expected);
    }

    #[tokio::test]
    async fn rejects_invalid_profile_requests() {
        for query in [
            "user_id=2&mode=0",
            "user_id=2&mode=2",
            "user_id=2&mode=vcard",
            "user_id=jane&mode=1",
            "mode=1",
        ] {
            let res = get(&format!("/profile/profile_function?{}", query)).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", query);
            assert!(res.headers().get(CONTENT_DISPOSITION).is_none(), "{}", query);
            assert!(res.body().contains("Invalid page call!"), "{}", query);
        }
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let res = get("/profile/profile_function?user_id=99&mode=1").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert!(res.headers().get(CONTENT_DISPOSITION).is_none());
        assert!(res.body().contains("The requested user does not exist."));
    }

    #[tokio::test]
    async fn renders_overview_with_full_template() {
        let res = get("/").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.body();
        assert!(body.contains("<title>Demo Organization - Overview</title>"));
        assert!(body.contains("<nav class=\"sidebar\">"));
        assert!(body.contains("id=\"menu-item-print\""));
        assert!(body.contains("href=\"http://localhost:6683/static/css/roster.min.css\""));
        assert!(body.contains("src=\"http://localhost:6683/static/js/roster.min.js\""));
        assert!(body.contains("title=\"DEMO - Announcements\""));
        assert!(body.contains("<div class=\"layout has-navbar\">"));
        assert!(body.contains("id=\"cookie-note\""));
        assert!(body.contains("user_id=2\">vCard</a>"));
        assert!(!body.contains("<%"));
    }

    #[tokio::test]
    async fn print_view_uses_reduced_template() {
        let res = get("/?print=1").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.body();
        assert!(body.contains("<body class=\"reduced\">"));
        assert!(body.contains("/themes/simple/css/print.css"));
        assert!(!body.contains("<nav class=\"sidebar\">"));
    }

    #[tokio::test]
    async fn inline_view_uses_reduced_template() {
        let res = get("/?inline=1").await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.body();
        assert!(body.contains("<body class=\"reduced\">"));
        assert!(!body.contains("<nav class=\"sidebar\">"));
        assert!(!body.contains("/themes/simple/css/print.css"));
        assert!(body.contains("user_id=2\">vCard</a>"));
    }

    #[tokio::test]
    async fn error_page_escapes_message() {
        let res = get("/error?msg=%3Cb%3Eoops%3C%2Fb%3E").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.body().contains("<p>&lt;b&gt;oops&lt;/b&gt;</p>"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let res = get("/does/not/exist").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
