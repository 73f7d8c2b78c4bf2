//! Search filter expressions built from overrides.

/// Filter excluding one category: `category ne '<value>'`, quotes doubled.
pub fn category_filter(exclude_category: Option<&str>) -> Option<String> {
    exclude_category.map(|category| format!("category ne '{}'", category.replace('\'', "''")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_category() {
        assert_eq!(category_filter(None), None);
    }

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(
            category_filter(Some("A's")),
            Some("category ne 'A''s'".to_string())
        );
    }

    #[test]
    fn test_no_other_escaping() {
        assert_eq!(
            category_filter(Some("a or b")),
            Some("category ne 'a or b'".to_string())
        );
    }
}
