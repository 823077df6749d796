//! Increment command handler.

use crate::config::PlannerConfig;
use crate::pipeline::{write_output, OutputTarget};
use crate::quantity::IncrementResolver;
use anyhow::Result;
use std::fmt::Write;

/// Print the case-pack increment resolved for each packaging text.
pub fn run_increment(texts: &[String], config: &PlannerConfig) -> Result<()> {
    let resolver = IncrementResolver::with_overrides(&config.increments)?;
    let report = render_increments(texts, &resolver);
    write_output(&report, &OutputTarget::Stdout, config.behavior.quiet)
}

/// One tab-separated line per text: text, increment, matching rule.
pub fn render_increments(texts: &[String], resolver: &IncrementResolver) -> String {
    let mut out = String::new();
    for text in texts {
        let (increment, rule) = resolver
            .matching_rule(text)
            .map_or((1, "-"), |r| (r.increment, r.label.as_str()));
        let _ = writeln!(out, "{text}\t{increment}\t{rule}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IncrementOverride;

    #[test]
    fn test_render_builtin() {
        let texts = vec!["8 oz".to_string(), "Gallon".to_string(), "mystery".to_string()];
        let out = render_increments(&texts, &IncrementResolver::builtin());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "8 oz\t60\t8oz");
        assert_eq!(lines[1], "Gallon\t4\tgallon");
        assert_eq!(lines[2], "mystery\t1\t-");
    }

    #[test]
    fn test_render_with_override() {
        let resolver = IncrementResolver::with_overrides(&[IncrementOverride {
            pattern: "sample".into(),
            increment: 10,
            label: Some("sample pack".into()),
        }])
        .unwrap();
        let out = render_increments(&["Sample 8oz".to_string()], &resolver);
        assert_eq!(out, "Sample 8oz\t10\tsample pack\n");
    }
}
