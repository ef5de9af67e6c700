// Main DumpTranspiler

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::error::TranspileError;
use crate::rule::RuleSet;
use crate::stream::{translate_stream, TranslateStats};
use crate::tables::postgres_mysql::PostgresToMySql;
use crate::tables::RuleTable;
use crate::transducer::Transducer;

pub struct DumpTranspiler {
    tables: HashMap<(Dialect, Dialect), Box<dyn RuleTable>>,
    extra: RuleSet,
}

impl DumpTranspiler {
    pub fn new() -> Self {
        let mut tables: HashMap<(Dialect, Dialect), Box<dyn RuleTable>> = HashMap::new();

        let pg_to_mysql = PostgresToMySql::new();
        tables.insert(
            (pg_to_mysql.source(), pg_to_mysql.target()),
            Box::new(pg_to_mysql),
        );

        Self {
            tables,
            extra: RuleSet::new(),
        }
    }

    /// Append caller-supplied rules after every built-in table's rules
    pub fn with_extra_rules(mut self, rules: RuleSet) -> Self {
        self.extra = self.extra.extend(rules);
        self
    }

    /// Resolve the full rule set for a dialect pair
    pub fn rule_set(&self, from: Dialect, to: Dialect) -> Result<RuleSet, TranspileError> {
        let table = self
            .tables
            .get(&(from, to))
            .ok_or(TranspileError::UnsupportedConversion { from, to })?;

        let rules = table.rule_set().extend(self.extra.clone());
        debug!(%from, %to, rules = rules.len(), "resolved rule table");
        Ok(rules)
    }

    pub fn transducer(&self, from: Dialect, to: Dialect) -> Result<Transducer, TranspileError> {
        Ok(Transducer::new(self.rule_set(from, to)?))
    }

    /// Convert a whole dump held in memory
    pub fn convert(&self, sql: &str, from: Dialect, to: Dialect) -> Result<String, TranspileError> {
        let transducer = self.transducer(from, to)?;

        let mut output = String::new();
        for line in transducer.translate(sql.lines()) {
            output.push_str(&line);
            output.push('\n');
        }
        Ok(output)
    }

    /// Convert a dump read from `reader`, writing the result to `writer`
    pub fn convert_stream<R, W>(
        &self,
        reader: R,
        writer: W,
        from: Dialect,
        to: Dialect,
    ) -> Result<TranslateStats, TranspileError>
    where
        R: BufRead,
        W: Write,
    {
        let transducer = self.transducer(from, to)?;
        let stats = translate_stream(&transducer, reader, writer)?;

        info!(
            %from,
            %to,
            read = stats.lines_read,
            emitted = stats.lines_emitted,
            dropped = stats.lines_dropped,
            "dump converted"
        );
        Ok(stats)
    }
}

impl Default for DumpTranspiler {
    fn default() -> Self {
        Self::new()
    }
}
