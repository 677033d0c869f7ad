//! Per-request page composition.
//!
//! An [`HtmlPage`] collects everything a page shows (head metadata, css, js
//! and rss includes, inline scripts, content, the page functions menu) and
//! hands it to a [`TemplateRenderer`] when [`HtmlPage::show`] is called.
//!
//! ```ignore
//! let mut page = HtmlPage::new(&ctx, "A simple page");
//! page.add_javascript_file("static/js/members.js");
//! page.add_html("<strong>This is a simple page!</strong>");
//! let body = page.show(&mut templates, &mut menu)?;
//! ```

use std::path::PathBuf;

use log::{debug, warn};
use persistance::{fs::utils::parse_location, RequestContext};

use crate::{
    assets::{is_absolute_url, resolve_asset_path},
    menu::{MainMenu, MenuError, MenuNode},
    PageTemplate, RenderError, TemplateRenderer,
};

pub const PAGE_FUNCTIONS_MENU_ID: &str = "menu-page-functions";
pub const BROWSER_UPDATE_SCRIPT: &str = "static/js/browser-update.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: Option<String>,
    pub url: String,
}

pub struct HtmlPage<'a> {
    ctx: &'a RequestContext,
    root: PathBuf,
    title: String,
    headline: String,
    header: String,
    content: String,
    javascript: String,
    javascript_on_load: String,
    css_files: Vec<String>,
    js_files: Vec<String>,
    rss_files: Vec<Feed>,
    url_previous_page: String,
    page_functions: MenuNode,
    show_menu: bool,
    show_theme_html: bool,
    has_navbar: bool,
    print_view: bool,
    inline_mode: bool,
}

impl<'a> HtmlPage<'a> {
    pub fn new(ctx: &'a RequestContext, headline: &str) -> Self {
        let mut page = Self {
            ctx,
            root: parse_location(&ctx.config.general.root),
            title: String::new(),
            headline: String::new(),
            header: String::new(),
            content: String::new(),
            javascript: String::new(),
            javascript_on_load: String::new(),
            css_files: Vec::new(),
            js_files: Vec::new(),
            rss_files: Vec::new(),
            url_previous_page: String::new(),
            page_functions: MenuNode::new(PAGE_FUNCTIONS_MENU_ID, headline),
            show_menu: true,
            show_theme_html: true,
            has_navbar: false,
            print_view: false,
            inline_mode: false,
        };
        if !headline.is_empty() {
            page.set_headline(headline);
        }
        if ctx.settings.has("system_browser_update_check")
            && ctx.settings.get_bool("system_browser_update_check")
        {
            page.add_javascript_file(BROWSER_UPDATE_SCRIPT);
        }
        page
    }

    fn resolve(&self, reference: &str) -> String {
        if is_absolute_url(reference) {
            reference.to_owned()
        } else {
            resolve_asset_path(
                &self.root,
                self.ctx.config.base_url(),
                reference,
                self.ctx.debug(),
            )
        }
    }

    /// `css_file` is either an absolute url or a path relative to the site root.
    pub fn add_css_file(&mut self, css_file: &str) {
        let resolved = self.resolve(css_file);
        if !self.css_files.contains(&resolved) {
            self.css_files.push(resolved);
        }
    }

    pub fn add_javascript_file(&mut self, js_file: &str) {
        let resolved = self.resolve(js_file);
        if !self.js_files.contains(&resolved) {
            self.js_files.push(resolved);
        }
    }

    /// A titled feed replaces an earlier feed with the same title in place.
    pub fn add_rss_file(&mut self, rss_file: &str, title: &str) {
        if !title.is_empty() {
            match self
                .rss_files
                .iter_mut()
                .find(|feed| feed.title.as_deref() == Some(title))
            {
                Some(feed) => feed.url = rss_file.to_owned(),
                None => self.rss_files.push(Feed {
                    title: Some(title.to_owned()),
                    url: rss_file.to_owned(),
                }),
            }
        } else if !self
            .rss_files
            .iter()
            .any(|feed| feed.title.is_none() && feed.url == rss_file)
        {
            self.rss_files.push(Feed {
                title: None,
                url: rss_file.to_owned(),
            });
        }
    }

    pub fn add_javascript(&mut self, javascript_code: &str, execute_after_page_load: bool) {
        let buffer = if execute_after_page_load {
            &mut self.javascript_on_load
        } else {
            &mut self.javascript
        };
        buffer.push_str(javascript_code);
        buffer.push('\n');
    }

    /// Raw markup for the html head. Not escaped.
    pub fn add_header(&mut self, header: &str) {
        self.header.push_str(header);
    }

    /// Raw markup for the page body, placed below everything added before.
    pub fn add_html(&mut self, html: &str) {
        self.content.push_str(html);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_page_functions_menu_item(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        icon: &str,
        parent_menu_item_id: &str,
        badge_count: u32,
        description: &str,
    ) -> Result<(), MenuError> {
        self.page_functions.add_item(
            id,
            name,
            url,
            icon,
            parent_menu_item_id,
            badge_count,
            description,
        )
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn css_files(&self) -> &[String] {
        &self.css_files
    }

    pub fn js_files(&self) -> &[String] {
        &self.js_files
    }

    pub fn rss_files(&self) -> &[Feed] {
        &self.rss_files
    }

    pub fn url_previous_page(&self) -> &str {
        &self.url_previous_page
    }

    pub fn is_inline_mode(&self) -> bool {
        self.inline_mode
    }

    pub fn is_print_view(&self) -> bool {
        self.print_view
    }

    pub fn html_css_files(&self) -> String {
        let mut html = String::new();
        for css_file in &self.css_files {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" />\n",
                css_file
            ));
        }
        html
    }

    pub fn html_js_files(&self) -> String {
        let mut html = String::new();
        for js_file in &self.js_files {
            html.push_str(&format!(
                "<script type=\"text/javascript\" src=\"{}\"></script>\n",
                js_file
            ));
        }
        html
    }

    pub fn html_rss_files(&self) -> String {
        let mut html = String::new();
        for feed in &self.rss_files {
            match &feed.title {
                Some(title) => {
                    html.push_str(&format!(
                        "<link rel=\"alternate\" type=\"application/rss+xml\" title=\"{}\" href=\"{}\" />\n",
                        title, feed.url
                    ));
                }
                None => {
                    html.push_str(&format!(
                        "<link rel=\"alternate\" type=\"application/rss+xml\" href=\"{}\" />\n",
                        feed.url
                    ));
                }
            }
        }
        html
    }

    /// Raw header markup followed by the css, js and rss tags.
    pub fn html_additional_header(&self) -> String {
        let mut header = self.header.clone();
        header.push_str(&self.html_css_files());
        header.push_str(&self.html_js_files());
        header.push_str(&self.html_rss_files());
        header
    }

    pub fn has_navbar(&mut self) {
        self.has_navbar = true;
    }

    pub fn hide_menu(&mut self) {
        self.show_menu = false;
    }

    /// Leaves out the theme's custom header and body decoration.
    pub fn hide_theme_html(&mut self) {
        self.show_theme_html = false;
    }

    /// Sets the headline and, if no title was set yet, the title as well.
    pub fn set_headline(&mut self, headline: &str) {
        if self.title.is_empty() {
            self.set_title(headline);
        }
        self.headline = headline.to_owned();
    }

    /// Renders with the reduced template, without header and sidebar menu.
    pub fn set_inline_mode(&mut self) {
        self.inline_mode = true;
    }

    pub fn set_title(&mut self, title: &str) {
        let organization = &self.ctx.organization.longname;
        self.title = if title.is_empty() {
            organization.clone()
        } else {
            format!("{} - {}", organization, title)
        };
    }

    /// Print pages use the reduced template with print styles.
    pub fn set_print_mode(&mut self) {
        self.set_inline_mode();
        self.print_view = true;
    }

    /// Only http(s) urls and site-relative paths are accepted; anything else
    /// is dropped and the back link stays empty.
    pub fn set_url_previous_page(&mut self, url: &str) {
        let url = url.trim();
        let accepted = url.starts_with("http://")
            || url.starts_with("https://")
            || (url.starts_with('/') && !url.starts_with("//"));
        if accepted && !url.contains(|c| matches!(c, '"' | '<' | '>')) {
            self.url_previous_page = url.to_owned();
        } else {
            warn!("ignoring invalid previous page url {:?}", url);
            self.url_previous_page.clear();
        }
    }

    pub fn template(&self) -> PageTemplate {
        if self.inline_mode {
            PageTemplate::Reduced
        } else {
            PageTemplate::Full
        }
    }

    /// Fills the renderer's variables and renders the page layout.
    pub fn show<R: TemplateRenderer>(
        self,
        renderer: &mut R,
        menu: &mut MainMenu,
    ) -> Result<String, RenderError> {
        let ctx = self.ctx;
        let config = &ctx.config;
        let settings = &ctx.settings;
        let template = self.template();

        menu.add_functions_node(self.page_functions.clone());

        renderer.assign("additionalHeaderData", self.html_additional_header());
        if self.title.is_empty() {
            renderer.assign("title", ctx.organization.longname.as_str());
        } else {
            renderer.assign("title", self.title.as_str());
        }
        renderer.assign("headline", self.headline.as_str());
        renderer.assign("urlPreviousPage", self.url_previous_page.as_str());
        renderer.assign("organizationName", ctx.organization.longname.as_str());
        renderer.assign("urlRoot", config.base_url());
        renderer.assign("urlTheme", config.theme_url());
        renderer.assign("javascriptContent", self.javascript.as_str());
        renderer.assign(
            "javascriptContentExecuteAtPageLoad",
            self.javascript_on_load.as_str(),
        );
        renderer.assign("language", ctx.language.as_str());

        renderer.assign("userId", ctx.user_id());
        renderer.assign("validLogin", ctx.valid_login());
        renderer.assign("debug", ctx.debug());
        renderer.assign(
            "registrationEnabled",
            settings.get_bool("registration_enable_module"),
        );

        renderer.assign("printView", self.print_view);
        renderer.assign("showMenu", self.show_menu);
        renderer.assign("showThemeHtml", self.show_theme_html);
        renderer.assign("hasNavbar", self.has_navbar);
        renderer.assign("menuSidebar", menu.to_html());
        renderer.assign("content", self.content.as_str());

        let url_imprint = settings.non_empty("system_url_imprint").unwrap_or_default();
        let url_data_protection = settings.non_empty("system_url_data_protection");
        renderer.assign("urlImprint", url_imprint);
        renderer.assign(
            "urlDataProtection",
            url_data_protection.clone().unwrap_or_default(),
        );

        if settings.has("system_cookie_note") && settings.get_bool("system_cookie_note") {
            renderer.assign("cookieNote", true);
            renderer.assign("cookieDomain", config.domain());
            renderer.assign("cookiePrefix", config.general.cookie_prefix.as_str());
            let cookie_path = if config.general.cookie_domain_wide {
                String::from("/")
            } else {
                format!("{}/", config.url_path())
            };
            renderer.assign("cookiePath", cookie_path);
            let data_protection = match url_data_protection {
                Some(url) => format!("\"href\": \"{}\", ", url),
                None => String::new(),
            };
            renderer.assign("cookieDataProtectionUrl", data_protection);
        }

        debug!("showing page {:?} with template {}", self.title, template.id());
        renderer.render_template(template.id())
    }
}
