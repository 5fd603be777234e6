use serde::Deserialize;
use warp::Filter;

use crate::statics;

#[derive(Debug, Deserialize)]
pub struct HostQuery {
    pub name: Option<String>,
}

/// `GET /?name=` serves a page with a profile button for the drawer to attach to,
/// `/dist/*` serves the trunk build.
pub fn host_endpoints(
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let host = warp::path::end()
        .and(warp::get())
        .and(warp::query::query::<HostQuery>())
        .then(|q: HostQuery| async move {
            let name = q
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| statics::DEMO_NAME.clone());
            let shell = match tokio::fs::read_to_string(format!("{}/index.html", *statics::DIST))
                .await
            {
                Ok(shell) => Some(shell),
                Err(e) => {
                    log::warn!("no frontend build in {}: {e}", *statics::DIST);
                    None
                }
            };
            warp::reply::html(host_page(shell.as_deref(), &name))
        });

    let dist = warp::path("dist").and(warp::fs::dir(statics::DIST.clone()));

    host.or(dist)
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Host markup for `name`, spliced into the trunk shell when there is one.
pub fn host_page(shell: Option<&str>, name: &str) -> String {
    let avatar = html_escape(&name.trim().chars().take(1).collect::<String>());
    let name = html_escape(name);
    let markup = format!(
        r#"
    <nav class="topbar">
      <a href="/profile" id="profileBtn" data-initial="{name}">
        <span class="profile-avatar">{avatar}</span> {name}
      </a>
      <div id="profileDropdown" class="dropdown">
        <a href="/profile">Profile</a>
        <a href="/signout">Sign Out</a>
      </div>
    </nav>
  "#
    );
    match shell {
        Some(shell) if shell.contains("</body>") => {
            shell.replacen("</body>", &format!("{markup}</body>"), 1)
        }
        _ => format!(
            "<!DOCTYPE html>\n<html>\n  <head><meta charset=\"utf-8\" /><title>profile drawer</title></head>\n  <body>{markup}<p>frontend not built, run <code>trunk build</code> in frontend/</p></body>\n</html>\n"
        ),
    }
}
