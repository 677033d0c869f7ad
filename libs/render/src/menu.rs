use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MenuError {
    #[error("menu item {item} refers to unknown parent {parent}")]
    UnknownParent { item: String, parent: String },
    #[error("menu item {0} already exists")]
    DuplicateId(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub url: String,
    pub icon: String,
    pub badge_count: u32,
    pub description: String,
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn find_mut(&mut self, id: &str) -> Option<&mut MenuItem> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|child| child.contains(id))
    }

    fn write_html(&self, html: &mut String) {
        html.push_str(&format!(
            "<li class=\"nav-item\"><a id=\"{}\" class=\"nav-link\" href=\"{}\"",
            self.id, self.url
        ));
        if !self.description.is_empty() {
            html.push_str(&format!(" title=\"{}\"", self.description));
        }
        html.push('>');
        if !self.icon.is_empty() {
            html.push_str(&format!("<i class=\"{}\"></i>", self.icon));
        }
        html.push_str(&self.name);
        if self.badge_count > 0 {
            html.push_str(&format!("<span class=\"badge\">{}</span>", self.badge_count));
        }
        html.push_str("</a>");
        if !self.children.is_empty() {
            html.push_str("<ul class=\"nav-dropdown\">");
            for child in &self.children {
                child.write_html(html);
            }
            html.push_str("</ul>");
        }
        html.push_str("</li>");
    }
}

/// A named group of menu items. Items may be nested one below another by
/// naming an existing item as parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub id: String,
    pub name: String,
    items: Vec<MenuItem>,
}

impl MenuNode {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            items: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_item(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        icon: &str,
        parent_id: &str,
        badge_count: u32,
        description: &str,
    ) -> Result<(), MenuError> {
        if self.items.iter().any(|item| item.contains(id)) {
            return Err(MenuError::DuplicateId(id.to_owned()));
        }
        let item = MenuItem {
            id: id.to_owned(),
            name: name.to_owned(),
            url: url.to_owned(),
            icon: icon.to_owned(),
            badge_count,
            description: description.to_owned(),
            children: Vec::new(),
        };
        if parent_id.is_empty() {
            self.items.push(item);
            return Ok(());
        }
        match self
            .items
            .iter_mut()
            .find_map(|candidate| candidate.find_mut(parent_id))
        {
            Some(parent) => {
                parent.children.push(item);
                Ok(())
            }
            None => Err(MenuError::UnknownParent {
                item: id.to_owned(),
                parent: parent_id.to_owned(),
            }),
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_html(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut html = format!(
            "<div id=\"{}\" class=\"menu-node\"><h3>{}</h3><ul class=\"nav\">",
            self.id, self.name
        );
        for item in &self.items {
            item.write_html(&mut html);
        }
        html.push_str("</ul></div>");
        html
    }
}

/// The site-wide sidebar menu. Pages contribute their own functions node for
/// the duration of one request.
#[derive(Debug, Clone, Default)]
pub struct MainMenu {
    nodes: Vec<MenuNode>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Menu every page starts with.
    pub fn with_overview(url: &str) -> Self {
        let mut overview = MenuNode::new("menu-overview", "Overview");
        overview.items.push(MenuItem {
            id: "menu-item-overview".into(),
            name: "Overview".into(),
            url: format!("{}/", url.trim_end_matches('/')),
            icon: "fas fa-home".into(),
            badge_count: 0,
            description: String::new(),
            children: Vec::new(),
        });
        let mut menu = Self::new();
        menu.add_node(overview);
        menu
    }

    pub fn add_node(&mut self, node: MenuNode) {
        self.nodes.push(node);
    }

    /// Puts the page functions in front of all other nodes, replacing the
    /// functions of an earlier page.
    pub fn add_functions_node(&mut self, node: MenuNode) {
        self.nodes.retain(|existing| existing.id != node.id);
        self.nodes.insert(0, node);
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn to_html(&self) -> String {
        self.nodes.iter().map(MenuNode::to_html).collect()
    }
}
