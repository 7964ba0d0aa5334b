//! Identifier normalisation for generated Go names.
//!
//! Every function here is pure and deterministic: generated names must be
//! stable across runs on an unchanged schema.

use crate::PUBLIC_SCHEMA;

/// Prefix applied to identifiers that would otherwise start with a digit or `_`.
const IDENT_PREFIX: char = 'T';

/// Words that are the same in singular and plural.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "jeans",
    "media",
    "metadata",
    "money",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "species",
];

/// Irregular (plural, singular) pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("oxen", "ox"),
    ("people", "person"),
    ("quizzes", "quiz"),
    ("teeth", "tooth"),
    ("vertices", "vertex"),
    ("women", "woman"),
];

/// Suffix rules tried in order; `None` leaves the word unchanged.
const SINGULAR_RULES: &[(&str, Option<&str>)] = &[
    ("sses", Some("ss")),
    ("uses", Some("us")),
    ("ies", Some("y")),
    ("xes", Some("x")),
    ("ches", Some("ch")),
    ("shes", Some("sh")),
    ("ss", None),
    ("us", None),
    ("is", None),
    ("s", Some("")),
];

/// Strip everything outside `[A-Za-z0-9_-]`, turn `-` into `_` and make sure
/// the result is non-empty and starts with a letter.
pub fn sanitize(s: &str) -> String {
    let mut out: String = s
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .map(|ch| if ch == '-' { '_' } else { ch })
        .collect();

    if out.is_empty() || out.starts_with(|ch: char| ch.is_ascii_digit() || ch == '_') {
        out.insert(0, IDENT_PREFIX);
    }

    out
}

/// `user_orders` -> `UserOrders`. Only underscores delimit words.
pub fn camel_case(s: &str) -> String {
    s.split('_').map(title_first).collect()
}

/// Upper-case the first character, leave the rest untouched.
pub fn title_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a camel-cased identifier into word tokens.
///
/// Acronym runs stay together (`UserID` -> `User`, `ID`), a trailing plural
/// `s` stays attached to its acronym (`IDs`), digits stick to the preceding
/// word.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (idx, &ch) in chars.iter().enumerate() {
        if ch == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[idx - 1];
            let next = chars.get(idx + 1).copied();
            let plural_tail = next == Some('s')
                && chars.get(idx + 2).is_none_or(|after| !after.is_lowercase());
            let starts_word = next.is_some_and(char::is_lowercase) && !plural_tail;

            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && starts_word)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Reduce an English plural to its singular form.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if !word.is_ascii() || lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return match_case(word, singular);
    }
    if IRREGULAR.iter().any(|(_, singular)| *singular == lower) {
        return word.to_string();
    }

    for (suffix, replacement) in SINGULAR_RULES {
        if lower.len() > suffix.len() && lower.ends_with(suffix) {
            return match replacement {
                Some(replacement) => {
                    let stem = &word[..word.len() - suffix.len()];
                    format!("{stem}{}", match_suffix_case(word, replacement))
                }
                None => word.to_string(),
            };
        }
    }

    word.to_string()
}

/// Produce the English plural of a singular word.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if !word.is_ascii() || lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    if let Some((plural, _)) = IRREGULAR.iter().find(|(_, singular)| *singular == lower) {
        return match_case(word, plural);
    }
    if IRREGULAR.iter().any(|(plural, _)| *plural == lower) {
        return word.to_string();
    }

    let suffix = if lower.ends_with('y')
        && lower.len() > 1
        && !lower[..lower.len() - 1].ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        let stem = &word[..word.len() - 1];
        return format!("{stem}{}", match_suffix_case(word, "ies"));
    } else if lower.ends_with(['s', 'x', 'z']) || lower.ends_with("ch") || lower.ends_with("sh") {
        "es"
    } else {
        "s"
    };

    format!("{word}{}", match_suffix_case(word, suffix))
}

/// Struct name for a table: `user_orders` -> `UserOrder`.
///
/// Only the last word that actually changes under singularisation is
/// singularised (`users_data` -> `UserData`).
pub fn entity_name(source: &str) -> String {
    let camel = camel_case(&sanitize(source));
    let mut words = split_words(&camel);

    for word in words.iter_mut().rev() {
        let singular = singularize(word);
        if singular != *word {
            *word = singular;
            break;
        }
    }

    words.concat()
}

/// Struct name for a table in a schema; non-public schemas prefix the name.
pub fn qualified_entity_name(schema: &str, table: &str) -> String {
    let name = entity_name(table);
    if schema == PUBLIC_SCHEMA {
        name
    } else {
        format!("{}{name}", camel_case(&sanitize(schema)))
    }
}

/// Field name for a column: `user_id` -> `UserID`, `tag_ids` -> `TagIDs`.
pub fn column_identifier(source: &str) -> String {
    let camel = camel_case(&sanitize(source));
    let mut words = split_words(&camel);

    if let Some(last) = words.last_mut() {
        match last.as_str() {
            "Id" => *last = "ID".to_string(),
            "Ids" => *last = "IDs".to_string(),
            _ => {}
        }
    }

    title_first(&words.concat())
}

/// Field name for a foreign-key relation.
///
/// Single-column keys drop the `ID` suffix of the column identifier
/// (`user_id` -> `User`); multi-column keys, or a bare `id` column, use the
/// target entity name.
pub fn relation_name(source_columns: &[String], target_entity: &str) -> String {
    if let [column] = source_columns {
        let name = replace_suffix(&column_identifier(column), "ID", "");
        if !name.is_empty() {
            return name;
        }
    }

    target_entity.to_string()
}

/// `UserOrder` -> `user_order`.
pub fn snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Replace `suffix` with `replacement` when `s` ends with it exactly.
pub fn replace_suffix(s: &str, suffix: &str, replacement: &str) -> String {
    match s.strip_suffix(suffix) {
        Some(stem) => format!("{stem}{replacement}"),
        None => s.to_string(),
    }
}

fn is_all_upper(word: &str) -> bool {
    word.chars().any(|ch| ch.is_ascii_alphabetic())
        && !word.chars().any(|ch| ch.is_ascii_lowercase())
}

fn match_case(word: &str, replacement: &str) -> String {
    if is_all_upper(word) && word.len() > 1 {
        replacement.to_ascii_uppercase()
    } else if word.starts_with(|ch: char| ch.is_ascii_uppercase()) {
        title_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn match_suffix_case(word: &str, suffix: &str) -> String {
    if is_all_upper(word) && word.len() > 1 {
        suffix.to_ascii_uppercase()
    } else {
        suffix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_identifiers() {
        assert_eq!(sanitize("user-name"), "user_name");
        assert_eq!(sanitize("weird$col!"), "weirdcol");
        assert_eq!(sanitize("1st_place"), "T1st_place");
        assert_eq!(sanitize("_hidden"), "T_hidden");
        assert_eq!(sanitize("名前"), "T");
        assert_eq!(sanitize(""), "T");
    }

    #[test]
    fn non_ascii_names_still_yield_identifiers() {
        assert_eq!(column_identifier("名前"), "T");
        assert_eq!(entity_name("テーブル"), "T");
    }

    #[test]
    fn camel_cases_on_underscores_only() {
        assert_eq!(camel_case("user_orders"), "UserOrders");
        assert_eq!(camel_case("userId"), "UserId");
        assert_eq!(camel_case("a__b"), "AB");
    }

    #[test]
    fn splits_words_on_case_boundaries() {
        assert_eq!(split_words("UserOrders"), vec!["User", "Orders"]);
        assert_eq!(split_words("UserID"), vec!["User", "ID"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("TagIDs"), vec!["Tag", "IDs"]);
        assert_eq!(split_words("Address2Line"), vec!["Address2", "Line"]);
    }

    #[test]
    fn singularizes_words() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("Orders"), "Order");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("statuses"), "status");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("USERS"), "USER");
    }

    #[test]
    fn keeps_uncountable_and_singular_words() {
        assert_eq!(singularize("data"), "data");
        assert_eq!(singularize("Species"), "Species");
        assert_eq!(singularize("fish"), "fish");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("class"), "class");
        assert_eq!(singularize("person"), "person");
    }

    #[test]
    fn pluralizes_words() {
        assert_eq!(pluralize("User"), "Users");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("Data"), "Data");
    }

    #[test]
    fn builds_entity_names() {
        assert_eq!(entity_name("user_orders"), "UserOrder");
        assert_eq!(entity_name("users"), "User");
        assert_eq!(entity_name("users_data"), "UserData");
        assert_eq!(entity_name("news"), "News");
        assert_eq!(entity_name("order-items"), "OrderItem");
    }

    #[test]
    fn prefixes_non_public_schemas() {
        assert_eq!(qualified_entity_name("public", "users"), "User");
        assert_eq!(qualified_entity_name("users", "users"), "UsersUser");
        assert_eq!(qualified_entity_name("geo", "locations"), "GeoLocation");
    }

    #[test]
    fn builds_column_identifiers() {
        assert_eq!(column_identifier("id"), "ID");
        assert_eq!(column_identifier("user_id"), "UserID");
        assert_eq!(column_identifier("tag_ids"), "TagIDs");
        assert_eq!(column_identifier("paid"), "Paid");
        assert_eq!(column_identifier("created_at"), "CreatedAt");
        assert_eq!(column_identifier("userId"), "UserID");
    }

    #[test]
    fn builds_relation_names() {
        let single = vec!["user_id".to_string()];
        assert_eq!(relation_name(&single, "User"), "User");

        let bare = vec!["id".to_string()];
        assert_eq!(relation_name(&bare, "Account"), "Account");

        let multi = vec!["a_id".to_string(), "b_id".to_string()];
        assert_eq!(relation_name(&multi, "Pair"), "Pair");
    }

    #[test]
    fn snake_cases_entity_names() {
        assert_eq!(snake_case("UserOrder"), "user_order");
        assert_eq!(snake_case("GeoLocation"), "geo_location");
        assert_eq!(snake_case("UserID"), "user_id");
    }

    #[test]
    fn replaces_exact_suffix_only() {
        assert_eq!(replace_suffix("UserID", "ID", ""), "User");
        assert_eq!(replace_suffix("UserIDs", "ID", ""), "UserIDs");
        assert_eq!(replace_suffix("User", "ID", "X"), "User");
    }
}
