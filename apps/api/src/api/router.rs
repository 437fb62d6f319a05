/// Where a request goes. Resolved in precedence order by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Root,
    Preflight,
    Question,
    NotFound,
}

/// Maps a method and path to a route.
///
/// `/health` is JSON health, `/` is the plain-text banner. `OPTIONS` on any
/// path is a CORS preflight. Questions are accepted on `/question` and `/`.
pub fn resolve(method: &str, path: &str) -> Route {
    let method = method.to_ascii_uppercase();
    let path = normalize_path(path);

    match (method.as_str(), path) {
        ("GET", "/health") => Route::Health,
        ("GET", "/") => Route::Root,
        ("OPTIONS", _) => Route::Preflight,
        ("POST", "/question" | "/") => Route::Question,
        _ => Route::NotFound,
    }
}

/// Drops the query string and any trailing slash; an empty path is `/`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_and_root_are_distinct() {
        assert_eq!(resolve("GET", "/health"), Route::Health);
        assert_eq!(resolve("GET", "/"), Route::Root);
    }

    #[test]
    fn test_options_on_any_path_is_preflight() {
        for path in ["/", "/question", "/health", "/anything/else"] {
            assert_eq!(resolve("OPTIONS", path), Route::Preflight);
        }
    }

    #[test]
    fn test_question_paths() {
        assert_eq!(resolve("POST", "/question"), Route::Question);
        assert_eq!(resolve("POST", "/"), Route::Question);
        assert_eq!(resolve("post", "/question/"), Route::Question);
    }

    #[test]
    fn test_unknown_combinations_are_not_found() {
        assert_eq!(resolve("GET", "/question"), Route::NotFound);
        assert_eq!(resolve("POST", "/health"), Route::NotFound);
        assert_eq!(resolve("DELETE", "/"), Route::NotFound);
        assert_eq!(resolve("GET", "/nonexistent"), Route::NotFound);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/health/"), "/health");
        assert_eq!(normalize_path("/question?debug=1"), "/question");
    }
}
