//! CLI parsing helpers for clap value parsers.

use camino::Utf8PathBuf;

/// Parse an include directory, rejecting blank values.
pub(super) fn parse_include_dir(s: &str) -> Result<Utf8PathBuf, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("include directory must not be empty".to_owned());
    }
    Ok(Utf8PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" inc ", "inc")]
    #[case("../shared", "../shared")]
    fn trims_surrounding_whitespace(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_include_dir(raw), Ok(Utf8PathBuf::from(expected)));
    }

    #[rstest]
    fn rejects_blank() {
        assert!(parse_include_dir("   ").is_err());
    }
}
