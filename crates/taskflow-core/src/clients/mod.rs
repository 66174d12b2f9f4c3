//! Typed feature clients, one module per resource family.
//!
//! Every function builds a path, hands it to the gateway with an optional
//! JSON body, and returns the normalized payload. Status codes and error
//! shaping live in the gateway alone.

pub mod auth;
pub mod projects;
pub mod tasks;

/// Encodes query pairs for a request path.
pub(crate) fn query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::query;

    #[test]
    fn test_query_percent_encodes_reserved_characters() {
        let q = query(&[("query", "fix login & logout")]);
        assert_eq!(q, "query=fix+login+%26+logout");
    }
}
