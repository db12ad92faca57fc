//! Identifier case conversions used to derive relation keys, pivot names and
//! column names.

/// `UserProfile` -> `user_profile`, `createdAt` -> `created_at`,
/// `HTTPServer` -> `http_server`.
pub fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let starts_word = match prev {
                None => false,
                Some(p) if p == '_' => false,
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                Some(_) => false,
            };
            if starts_word {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `UserProfile` -> `userProfile`.
pub fn lc_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `userProfile` -> `UserProfile`.
pub fn uc_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `user_profile` -> `userProfile`. Text without underscores is returned
/// with its first letter lowered.
pub fn camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, part) in s.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(&lc_first(part));
        } else {
            out.push_str(&uc_first(part));
        }
    }
    out
}

/// `blog_post` or `blogPost` -> `BlogPost`: the type name a runtime type
/// discriminator or pivot name refers to.
pub fn type_name_of(s: &str) -> String {
    uc_first(&camel_case(s))
}

/// The adjective form of a type name used for polymorphic relations:
/// `Comment` -> `Commentable`.
pub fn able(s: &str) -> String {
    format!("{s}able")
}
