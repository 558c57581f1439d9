use actix_web::http::Method;
use once_cell::sync::Lazy;
use regex::Regex;

/// Routes reachable without a token, as (method, template) pairs. `{...}`
/// placeholders match a numeric id.
const PUBLIC_ROUTE_TEMPLATES: &[(&str, &str)] = &[
    ("GET", "/api/recipes"),
    ("GET", "/api/recipes/{recipe_id}"),
    ("GET", "/api/tags"),
    ("GET", "/api/tags/{tag_id}"),
    ("GET", "/api/ingredients"),
    ("GET", "/api/ingredients/{ingredient_id}"),
    ("GET", "/api/users"),
    ("GET", "/api/users/{user_id}"),
    ("POST", "/api/users"),
];

pub static PUBLIC_ROUTES: Lazy<Vec<(Method, Regex)>> = Lazy::new(|| {
    let placeholder = Regex::new(r"\\\{[a-z_]+\\\}").expect("placeholder pattern is valid");

    PUBLIC_ROUTE_TEMPLATES
        .iter()
        .map(|(method, template)| {
            let escaped = regex::escape(template);
            let pattern = format!("^{}/?$", placeholder.replace_all(&escaped, r"\d+"));
            let method = Method::from_bytes(method.as_bytes()).expect("route method is valid");
            (method, Regex::new(&pattern).expect("route pattern is valid"))
        })
        .collect()
});

pub fn is_public_route(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES
        .iter()
        .any(|(route_method, pattern)| route_method == method && pattern.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_reads_are_public() {
        assert!(is_public_route(&Method::GET, "/api/recipes"));
        assert!(is_public_route(&Method::GET, "/api/recipes/12"));
        assert!(is_public_route(&Method::GET, "/api/recipes/"));
        assert!(is_public_route(&Method::GET, "/api/ingredients"));
        assert!(is_public_route(&Method::GET, "/api/tags/3"));
        assert!(is_public_route(&Method::GET, "/api/users/5"));
        assert!(is_public_route(&Method::POST, "/api/users"));
    }

    #[test]
    fn personal_and_mutating_routes_are_not() {
        assert!(!is_public_route(&Method::POST, "/api/recipes"));
        assert!(!is_public_route(&Method::DELETE, "/api/recipes/12"));
        assert!(!is_public_route(&Method::GET, "/api/recipes/download_shopping_cart"));
        assert!(!is_public_route(&Method::GET, "/api/users/me"));
        assert!(!is_public_route(&Method::GET, "/api/users/subscriptions"));
        assert!(!is_public_route(&Method::POST, "/api/recipes/12/favorite"));
        assert!(!is_public_route(&Method::GET, "/api/recipes/12/extra"));
    }
}
