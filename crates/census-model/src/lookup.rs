use std::collections::HashMap;

/// Column-name set with ASCII case-insensitive membership.
///
/// `get` returns the spelling the name had when it was inserted, so callers
/// can address the real column after a case-insensitive match.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_original_spelling() {
        let set = CaseInsensitiveSet::new(["Geog_ID", "state"]);
        assert_eq!(set.get("geog_id"), Some("Geog_ID"));
        assert_eq!(set.get("STATE"), Some("state"));
        assert!(set.get("sex").is_none());
    }

    #[test]
    fn first_spelling_wins() {
        let set = CaseInsensitiveSet::new(["sex", "SEX"]);
        assert_eq!(set.get("Sex"), Some("sex"));
        assert!(set.contains("sEx"));
    }
}
