/// Flatten `--authors` arguments into individual filters.
///
/// Every argument may hold several comma-separated names; pieces are trimmed
/// and empty pieces dropped.
pub fn parse_author_filters<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.as_ref().split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comma_separated() {
        let parsed = parse_author_filters(&["Alice, Bob", "carol"]);
        assert_eq!(parsed, vec!["Alice", "Bob", "carol"]);
    }

    #[test]
    fn test_empty_pieces_dropped() {
        let parsed = parse_author_filters(&[" , alice,, ", ""]);
        assert_eq!(parsed, vec!["alice"]);
    }

    #[test]
    fn test_no_arguments() {
        let parsed = parse_author_filters::<&str>(&[]);
        assert!(parsed.is_empty());
    }
}
