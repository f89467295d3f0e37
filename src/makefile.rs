//! Wrapper makefile emitter.
//!
//! The wrapper lets users keep typing `make` while Ninja does the work. It is
//! regenerated in full on every invocation.

use crate::paths::{DOCS_DIR, ENTITIES_FILE, SCRATCH_DIR, WRAPPER_FILE};
use itertools::Itertools;

/// Render the wrapper makefile for the executables named in `targets`.
///
/// # Examples
///
/// ```
/// use irpninja::makefile::generate;
///
/// let text = generate(&["prog".to_owned()]);
/// assert!(text.contains(".PHONY: all prog clean veryclean\n"));
/// ```
#[must_use]
pub fn generate(targets: &[String]) -> String {
    let names = targets.iter().join(" ");
    let phony = ["all"]
        .into_iter()
        .chain(targets.iter().map(String::as_str))
        .chain(["clean", "veryclean"])
        .join(" ");

    let mut out = String::new();
    out.push_str(&format!("NINJA += -C {SCRATCH_DIR}\n\n"));
    out.push_str(&format!("TARGETS={names}\n\n"));
    out.push_str(&format!(".PHONY: {phony}\n\n"));
    out.push_str("all:\n\t$(NINJA)\n\n");
    if !targets.is_empty() {
        out.push_str("$(TARGETS):\n\t$(NINJA) $(PWD)/$@\n\n");
    }
    out.push_str("clean:\n\t$(NINJA) -t clean\n\n");
    out.push_str(&format!(
        "veryclean: clean\n\trm -rf {SCRATCH_DIR}/ {DOCS_DIR}/ {WRAPPER_FILE} {ENTITIES_FILE} dist tags\n"
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn full_wrapper_for_two_targets() {
        let text = generate(&["prog".to_owned(), "tool".to_owned()]);
        let expected = concat!(
            "NINJA += -C IRPF90_temp\n\n",
            "TARGETS=prog tool\n\n",
            ".PHONY: all prog tool clean veryclean\n\n",
            "all:\n\t$(NINJA)\n\n",
            "$(TARGETS):\n\t$(NINJA) $(PWD)/$@\n\n",
            "clean:\n\t$(NINJA) -t clean\n\n",
            "veryclean: clean\n",
            "\trm -rf IRPF90_temp/ IRPF90_man/ irpf90.make irpf90_entities dist tags\n",
        );
        assert_eq!(text, expected);
    }

    #[rstest]
    fn no_targets_omits_target_rule() {
        let text = generate(&[]);
        assert!(text.contains("TARGETS=\n"));
        assert!(text.contains(".PHONY: all clean veryclean\n"));
        assert!(!text.contains("$(TARGETS):"));
    }
}
