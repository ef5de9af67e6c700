// Line rules and ordered rule sets
//
// Rules work on raw line bytes. Dumps are assumed to be UTF-8 but are never
// validated, so bytes outside any match reach the output untouched.

use std::fmt;

use once_cell::sync::Lazy;
use regex::bytes::{NoExpand, Regex};
use tracing::trace;

use crate::error::RuleError;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Outcome of running a rule set over one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformResult<T = String> {
    Emit(T),
    EmitMany(Vec<T>),
    Drop,
}

impl<T> TransformResult<T> {
    pub fn is_drop(&self) -> bool {
        matches!(self, TransformResult::Drop)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> TransformResult<U> {
        match self {
            TransformResult::Emit(line) => TransformResult::Emit(f(line)),
            TransformResult::EmitMany(lines) => {
                TransformResult::EmitMany(lines.into_iter().map(f).collect())
            }
            TransformResult::Drop => TransformResult::Drop,
        }
    }
}

impl<T> IntoIterator for TransformResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            TransformResult::Emit(line) => vec![line].into_iter(),
            TransformResult::EmitMany(lines) => lines.into_iter(),
            TransformResult::Drop => Vec::new().into_iter(),
        }
    }
}

/// Pipeline stage a rule belongs to. Stages always run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Drop,
    Rewrite,
    Normalize,
    Finalize,
}

/// A single line-scoped rule
#[derive(Debug, Clone)]
pub enum Rule {
    /// Drop lines whose trimmed text starts with any prefix
    LinePrefixDrop(Vec<String>),
    /// Drop lines containing any marker anywhere
    SubstringContainsDrop(Vec<String>),
    /// Delete every match of the pattern
    RegexStrip(Regex),
    /// Replace every literal occurrence of `from` with `to`
    LiteralReplace { from: String, to: String },
    /// Collapse whitespace runs to one space and trim
    WhitespaceNormalize,
    /// Drop lines left empty by earlier rules
    EmptyLineDrop,
}

impl Rule {
    pub fn stage(&self) -> Stage {
        match self {
            Rule::LinePrefixDrop(_) | Rule::SubstringContainsDrop(_) => Stage::Drop,
            Rule::RegexStrip(_) | Rule::LiteralReplace { .. } => Stage::Rewrite,
            Rule::WhitespaceNormalize => Stage::Normalize,
            Rule::EmptyLineDrop => Stage::Finalize,
        }
    }

    /// Whether this rule removes `line` from the output.
    ///
    /// Rewrite rules never drop. `EmptyLineDrop` only drops the empty line.
    pub fn drops(&self, line: &[u8]) -> bool {
        match self {
            Rule::LinePrefixDrop(prefixes) => {
                let trimmed = trim_start(line);
                prefixes.iter().any(|p| trimmed.starts_with(p.as_bytes()))
            }
            Rule::SubstringContainsDrop(markers) => markers
                .iter()
                .any(|m| find_bytes(line, m.as_bytes()).is_some()),
            Rule::EmptyLineDrop => line.is_empty(),
            _ => false,
        }
    }

    /// Rewrite `line`. Drop rules return it unchanged.
    pub fn rewrite(&self, line: Vec<u8>) -> Vec<u8> {
        match self {
            Rule::RegexStrip(re) => {
                if re.is_match(&line) {
                    re.replace_all(&line, NoExpand(&b""[..])).into_owned()
                } else {
                    line
                }
            }
            Rule::LiteralReplace { from, to } => {
                replace_bytes(line, from.as_bytes(), to.as_bytes())
            }
            Rule::WhitespaceNormalize => RE_WHITESPACE
                .split(&line)
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(&b' '),
            _ => line,
        }
    }
}

fn trim_start(line: &[u8]) -> &[u8] {
    match RE_WHITESPACE.find(line) {
        Some(m) if m.start() == 0 => &line[m.end()..],
        _ => line,
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn replace_bytes(line: Vec<u8>, from: &[u8], to: &[u8]) -> Vec<u8> {
    let Some(first) = find_bytes(&line, from) else {
        return line;
    };

    let mut out = Vec::with_capacity(line.len());
    let mut rest = &line[..];
    let mut next = Some(first);
    while let Some(at) = next {
        out.extend_from_slice(&rest[..at]);
        out.extend_from_slice(to);
        rest = &rest[at + from.len()..];
        next = find_bytes(rest, from);
    }
    out.extend_from_slice(rest);
    out
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::LinePrefixDrop(prefixes) => {
                write!(f, "drop lines starting with {}", quote_list(prefixes))
            }
            Rule::SubstringContainsDrop(markers) => {
                write!(f, "drop lines containing {}", quote_list(markers))
            }
            Rule::RegexStrip(re) => write!(f, "strip /{}/", re.as_str()),
            Rule::LiteralReplace { from, to } if to.is_empty() => write!(f, "remove {:?}", from),
            Rule::LiteralReplace { from, to } => write!(f, "replace {:?} with {:?}", from, to),
            Rule::WhitespaceNormalize => write!(f, "normalize whitespace"),
            Rule::EmptyLineDrop => write!(f, "drop empty lines"),
        }
    }
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("{:?}", s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ordered set of rules applied to each line.
///
/// Rules run stage by stage (drops, rewrites, normalization, empty-line
/// drop). Within a stage they run in insertion order, each rewrite consuming
/// the previous one's output. Drop rules always see the raw input line.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn drop_prefixes<I, S>(self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Rule::LinePrefixDrop(
            prefixes.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn drop_containing<I, S>(self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Rule::SubstringContainsDrop(
            markers.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn strip(self, pattern: Regex) -> Self {
        self.push(Rule::RegexStrip(pattern))
    }

    pub fn replace(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.push(Rule::LiteralReplace {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn normalize_whitespace(self) -> Self {
        self.push(Rule::WhitespaceNormalize)
    }

    pub fn drop_empty(self) -> Self {
        self.push(Rule::EmptyLineDrop)
    }

    /// Append every rule of `other` after this set's rules
    pub fn extend(mut self, other: RuleSet) -> Self {
        self.rules.extend(other.rules);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run the pipeline over one line of text.
    ///
    /// Built-in rules keep valid UTF-8 valid. A user pattern that splits a
    /// character leaves U+FFFD in its place.
    pub fn apply(&self, line: &str) -> TransformResult {
        self.apply_bytes(line.as_bytes())
            .map(|bytes| match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            })
    }

    /// Run the pipeline over one raw line
    pub fn apply_bytes(&self, line: &[u8]) -> TransformResult<Vec<u8>> {
        if let Some(rule) = self
            .in_stage(Stage::Drop)
            .find(|rule| rule.drops(line))
        {
            trace!(rule = %rule, line = %String::from_utf8_lossy(line), "dropping line");
            return TransformResult::Drop;
        }

        let mut text = line.to_vec();
        for stage in [Stage::Rewrite, Stage::Normalize] {
            for rule in self.in_stage(stage) {
                text = rule.rewrite(text);
            }
        }

        if self.in_stage(Stage::Finalize).any(|rule| rule.drops(&text)) {
            trace!(line = %String::from_utf8_lossy(line), "line reduced to nothing");
            return TransformResult::Drop;
        }

        TransformResult::Emit(text)
    }

    fn in_stage(&self, stage: Stage) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.stage() == stage)
    }
}

// Checked builders for rules supplied at runtime
impl RuleSet {
    /// Prefixes are matched against the trimmed line, so they are trimmed too
    pub fn try_drop_prefix(self, prefix: &str) -> Result<Self, RuleError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(RuleError::EmptyMarker);
        }
        Ok(self.drop_prefixes([prefix]))
    }

    pub fn try_drop_containing(self, marker: &str) -> Result<Self, RuleError> {
        if marker.is_empty() {
            return Err(RuleError::EmptyMarker);
        }
        Ok(self.drop_containing([marker]))
    }

    pub fn strip_pattern(self, pattern: &str) -> Result<Self, RuleError> {
        let re = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self.strip(re))
    }

    /// Add a replacement written as `FROM=TO`. `TO` may be empty.
    pub fn replace_spec(self, spec: &str) -> Result<Self, RuleError> {
        let (from, to) = spec
            .split_once('=')
            .ok_or_else(|| RuleError::InvalidReplacement(spec.to_string()))?;
        if from.is_empty() || to.contains(['\n', '\r']) {
            return Err(RuleError::InvalidReplacement(spec.to_string()));
        }
        Ok(self.replace(from, to))
    }
}
