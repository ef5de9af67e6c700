// Line transducer

use crate::rule::{RuleSet, TransformResult};

/// Maps input dump lines to output lines through a fixed rule set.
///
/// Holds no state between lines or between calls, so one transducer can
/// translate any number of independent dumps, including from several threads.
#[derive(Debug, Clone)]
pub struct Transducer {
    rules: RuleSet,
}

impl Transducer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn translate_line(&self, line: &str) -> TransformResult {
        self.rules.apply(line)
    }

    /// Translate one raw line without decoding it
    pub fn translate_raw_line(&self, line: &[u8]) -> TransformResult<Vec<u8>> {
        self.rules.apply_bytes(line)
    }

    /// Lazily translate a sequence of lines.
    ///
    /// Output lines carry no terminator. Input is pulled one line at a time,
    /// so dropping the iterator stops reading.
    pub fn translate<'a, I>(&'a self, lines: I) -> impl Iterator<Item = String> + 'a
    where
        I: IntoIterator + 'a,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .flat_map(move |line| self.translate_line(line.as_ref()))
    }
}
