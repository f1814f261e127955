use regex::Regex;

use crate::error::Result;

use super::rules::{RuleSet, PHONE_CATEGORY};
use super::{ScrubStage, REDACTION_TEXT};

/// Stage 1: ordered regex substitution.
///
/// Each rule runs against the already partially redacted output of the
/// previous rule, so later rules never see spans an earlier rule claimed.
pub struct PatternScrubber {
    rules: RuleSet,
    paren_area_code: Regex,
}

impl PatternScrubber {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            paren_area_code: Regex::new(r"^\((\d{3})\)$")
                .expect("area code normalization pattern should compile"),
        }
    }

    /// Phone rules replace every literal occurrence of each matched
    /// number anywhere in the text, not just the matched span. A number
    /// quoted twice is scrubbed twice; two matches sharing a common
    /// substring can cause extra replacement. Matches are collected from
    /// the text as it stands when the rule starts, then applied in
    /// sequence.
    fn apply_phone_rule(&self, matcher: &Regex, text: &str) -> String {
        let matched: Vec<String> = matcher
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut out = text.to_string();
        for raw in matched {
            // A bare parenthesised area code normalizes to its digits
            // before the literal replacement.
            let normalized = self.paren_area_code.replace(&raw, "$1").into_owned();
            out = out.replace(&normalized, REDACTION_TEXT);
        }
        out
    }
}

impl ScrubStage for PatternScrubber {
    fn scrub(&self, input: &str) -> Result<String> {
        let mut text = input.to_string();
        for rule in self.rules.rules() {
            if rule.category == PHONE_CATEGORY {
                text = self.apply_phone_rule(&rule.matcher, &text);
            } else {
                text = rule.matcher.replace_all(&text, REDACTION_TEXT).into_owned();
            }
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "patterns"
    }
}
