// PostgreSQL dump -> MySQL rule table

use once_cell::sync::Lazy;
use regex::bytes::Regex;

use super::RuleTable;
use crate::dialect::Dialect;
use crate::rule::RuleSet;

/// Session settings and sequence bookkeeping emitted by pg_dump
const DROP_PREFIXES: &[&str] = &[
    "SET",
    "SELECT pg_catalog.set_config",
    "SELECT pg_catalog.setval(",
];

const DROP_MARKERS: &[&str] = &["CREATE SEQUENCE", "ALTER SEQUENCE", "DROP SEQUENCE"];

const TYPE_REPLACEMENTS: &[(&str, &str)] = &[
    ("SERIAL", "INT AUTO_INCREMENT"),
    ("NOW()", "CURRENT_TIMESTAMP"),
    ("BOOLEAN", "TINYINT(1)"),
    ("RETURNING", ""),
    ("IF NOT EXISTS", ""),
    ("ALTER TABLE ONLY", "ALTER TABLE"),
    ("WITH TIME ZONE", ""),
    ("WITHOUT TIME ZONE", ""),
    ("COMMENT ON EXTENSION", "-- COMMENT ON EXTENSION"),
];

const SCHEMA_REPLACEMENTS: &[(&str, &str)] = &[
    ("CREATE SCHEMA public;", ""),
    ("ALTER SCHEMA public OWNER TO postgres;", ""),
];

static RE_TYPE_CAST: Lazy<Regex> = Lazy::new(|| Regex::new(r"::(\w+)").unwrap());

static RE_PUBLIC_SCHEMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"public\.").unwrap());

// Sequence residue left on lines the whole-line drop did not catch
static RE_SEQUENCE_RESIDUE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)CREATE SEQUENCE\s+\w+\s*(START\s*WITH\s*\d+\s*INCREMENT\s*BY\s*\d+\s*)?",
        r"(?i)ALTER TABLE\s+\w+\s+ALTER COLUMN\s+\w+\s+SET DEFAULT\s+nextval\(\s*'\w+'\s*\)",
        r"(?i)WITH\s+\d+\s*INCREMENT\s*BY\s*\d+",
        r"(?i)NO\s*MINVALUE",
        r"(?i)NO\s*MAXVALUE",
        r"(?i)CACHE\s*\d+",
        r"(?i)AS\s*integer",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Rules converting `pg_dump` output to MySQL-compatible SQL
pub struct PostgresToMySql;

impl PostgresToMySql {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PostgresToMySql {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTable for PostgresToMySql {
    fn source(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn target(&self) -> Dialect {
        Dialect::MySQL
    }

    fn rule_set(&self) -> RuleSet {
        let mut rules = RuleSet::new()
            .drop_prefixes(DROP_PREFIXES.iter().copied())
            .drop_containing(DROP_MARKERS.iter().copied())
            .strip(RE_TYPE_CAST.clone());

        for (from, to) in TYPE_REPLACEMENTS {
            rules = rules.replace(*from, *to);
        }

        // Schema qualifiers go before the residue patterns, which expect bare names
        rules = rules.strip(RE_PUBLIC_SCHEMA.clone());
        for (from, to) in SCHEMA_REPLACEMENTS {
            rules = rules.replace(*from, *to);
        }

        for re in RE_SEQUENCE_RESIDUE.iter() {
            rules = rules.strip(re.clone());
        }

        rules.normalize_whitespace().drop_empty()
    }
}
