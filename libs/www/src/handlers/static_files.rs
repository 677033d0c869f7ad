use std::path::PathBuf;

use warp::{filters::BoxedFilter, Filter, Reply};

/// Serves the `static` and `themes` folders below the site root.
pub struct StaticFileRouter {
    pub root: PathBuf,
}

impl StaticFileRouter {
    pub fn routes(&self) -> BoxedFilter<(impl Reply,)> {
        self.assets().or(self.themes()).boxed()
    }

    fn assets(&self) -> BoxedFilter<(impl Reply,)> {
        warp::path("static")
            .and(warp::fs::dir(self.root.join("static")))
            .boxed()
    }

    fn themes(&self) -> BoxedFilter<(impl Reply,)> {
        warp::path("themes")
            .and(warp::fs::dir(self.root.join("themes")))
            .boxed()
    }
}
