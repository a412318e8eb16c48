//! Identifier normalization shared by the OpenAPI and FSM pipelines.

/// Convert `CamelCase` / `camelCase` / `kebab-case` to `snake_case`.
///
/// Acronyms are kept together: `HTTPServer` becomes `http_server`.
///
/// ```
/// use adev::naming::camel_to_snake;
/// assert_eq!(camel_to_snake("UserProfile"), "user_profile");
/// assert_eq!(camel_to_snake("walletAddress"), "wallet_address");
/// ```
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Convert a snake_case string to CamelCase.
///
/// ```
/// use adev::naming::to_camel_case;
/// assert_eq!(to_camel_case("user_profile"), "UserProfile");
/// ```
pub fn to_camel_case(s: &str) -> String {
    s.split(['_', '-'])
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Turn an arbitrary spec name into a snake_case identifier that is valid in
/// the generated sources: invalid characters become `_` and a leading digit
/// gets an underscore prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let snake = camel_to_snake(name);
    let mut s: String = snake
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if s.is_empty() {
        s.push('_');
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s.to_ascii_lowercase()
}

/// Names of the `{param}` segments of a path template, in order.
pub fn path_template_params(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| {
            segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .map(str::to_string)
        })
        .collect()
}

/// Identifier derived from a method and a path template:
/// `GET /users/{id}` becomes `get_users_by_id`, `GET /` becomes `get_root`.
pub fn operation_name(method: &str, path: &str) -> String {
    let parts: Vec<String> = path
        .split('/')
        .filter(|p| !p.is_empty())
        .map(|part| match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(param) => format!("by_{}", sanitize_identifier(param)),
            None => sanitize_identifier(part),
        })
        .collect();
    let suffix = if parts.is_empty() {
        "root".to_string()
    } else {
        parts.join("_")
    };
    format!("{}_{}", method.to_ascii_lowercase(), suffix)
}
