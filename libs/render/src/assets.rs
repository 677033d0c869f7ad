use std::path::Path;

use log::warn;

pub fn is_absolute_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://") || reference.starts_with("//")
}

/// Picks the minified or the readable variant of an asset below `root` and
/// returns its url. Both variants are expected next to each other, e.g.
/// `static/css/site.css` and `static/css/site.min.css`.
///
/// The minified file wins unless `debug` is set, but only if it exists. The
/// readable file is used when it exists and the minified one is not
/// preferred. If neither exists the minified url is returned anyway.
pub fn resolve_asset_path(root: &Path, url: &str, path: &str, debug: bool) -> String {
    let url = url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    let (dir, filename) = match path.rsplit_once('/') {
        Some((dir, filename)) => (Some(dir), filename),
        None => (None, path),
    };
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, extension),
        _ => return format!("{}/{}", url, path),
    };
    let base = stem.strip_suffix(".min").unwrap_or(stem);
    let join = |name: String| match dir {
        Some(dir) => format!("{}/{}", dir, name),
        None => name,
    };
    let path_debug = join(format!("{}.{}", base, extension));
    let path_min = join(format!("{}.min.{}", base, extension));

    let min_exists = root.join(&path_min).is_file();
    let debug_exists = root.join(&path_debug).is_file();
    if (!debug && min_exists) || !debug_exists {
        if !min_exists {
            warn!("asset {} not found below {:?}", path_min, root);
        }
        return format!("{}/{}", url, path_min);
    }
    format!("{}/{}", url, path_debug)
}
