use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Id;

static SUBJECT_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/subject/([^/?#]+)/?$").expect("subject route pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Portal,
    Subject(Id),
    GradesEditor { id: Option<String> },
    ClassesEditor { id: Option<String> },
    Assessment,
    Settings,
    AccessDenied,
}

impl Screen {
    /// Screens that only make sense with a signed-in user.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Screen::Login | Screen::Settings | Screen::AccessDenied)
    }

    pub fn path(&self) -> String {
        match self {
            Screen::Login => "/".to_string(),
            Screen::Portal => "/portal".to_string(),
            Screen::Subject(id) => format!("/subject/{}", id),
            Screen::GradesEditor { id } => with_id("/grades", id.as_deref()),
            Screen::ClassesEditor { id } => with_id("/classes", id.as_deref()),
            Screen::Assessment => "/assessment".to_string(),
            Screen::Settings => "/settings".to_string(),
            Screen::AccessDenied => "/denied".to_string(),
        }
    }
}

fn with_id(base: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}?id={}", base, id),
        None => base.to_string(),
    }
}

/// Parses `?a=1&b=2` (leading `?` optional) into a map. Later keys win.
pub fn get_queries(search: &str) -> HashMap<String, String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Maps a location such as `/grades?id=123` to a screen.
pub fn parse_route(location: &str) -> Option<Screen> {
    let (path, search) = match location.split_once('?') {
        Some((path, search)) => (path, search),
        None => (location, ""),
    };
    let query_id = || get_queries(search).remove("id").filter(|id| !id.is_empty());

    if let Some(caps) = SUBJECT_ROUTE.captures(path) {
        return Some(Screen::Subject(Id::new(&caps[1])));
    }

    match path.trim_end_matches('/') {
        "" | "/login" => Some(Screen::Login),
        "/portal" => Some(Screen::Portal),
        "/grades" => Some(Screen::GradesEditor { id: query_id() }),
        "/classes" => Some(Screen::ClassesEditor { id: query_id() }),
        "/assessment" => Some(Screen::Assessment),
        "/settings" => Some(Screen::Settings),
        "/denied" => Some(Screen::AccessDenied),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_are_split_into_pairs() {
        let queries = get_queries("?id=123&mode=edit&flag");
        assert_eq!(queries.get("id").map(String::as_str), Some("123"));
        assert_eq!(queries.get("mode").map(String::as_str), Some("edit"));
        assert_eq!(queries.get("flag").map(String::as_str), Some(""));
        assert!(get_queries("").is_empty());
    }

    #[test]
    fn editor_routes_carry_the_query_id() {
        assert_eq!(
            parse_route("/grades?id=123"),
            Some(Screen::GradesEditor { id: Some("123".to_string()) })
        );
        assert_eq!(parse_route("/classes"), Some(Screen::ClassesEditor { id: None }));
        assert_eq!(parse_route("/classes?id="), Some(Screen::ClassesEditor { id: None }));
    }

    #[test]
    fn subject_route_captures_the_id() {
        assert_eq!(parse_route("/subject/5f2a"), Some(Screen::Subject(Id::new("5f2a"))));
        assert_eq!(parse_route("/subject/"), None);
        assert_eq!(parse_route("/nowhere"), None);
    }

    #[test]
    fn paths_parse_back_to_the_same_screen() {
        let screens = [
            Screen::Portal,
            Screen::Subject(Id::new("1")),
            Screen::GradesEditor { id: Some("123".to_string()) },
            Screen::ClassesEditor { id: None },
            Screen::Assessment,
            Screen::Settings,
            Screen::AccessDenied,
        ];
        for screen in screens {
            assert_eq!(parse_route(&screen.path()), Some(screen));
        }
    }
}
