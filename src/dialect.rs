// SQL dialects

use std::str::FromStr;

use crate::error::TranspileError;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySQL,
    Oracle,
    PostgreSQL,
    SQLite,
    SQLServer,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::MySQL => write!(f, "MySQL"),
            Dialect::Oracle => write!(f, "Oracle"),
            Dialect::PostgreSQL => write!(f, "PostgreSQL"),
            Dialect::SQLite => write!(f, "SQLite"),
            Dialect::SQLServer => write!(f, "SQL Server"),
        }
    }
}

impl FromStr for Dialect {
    type Err = TranspileError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "oracle" => Ok(Dialect::Oracle),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" => Ok(Dialect::SQLServer),
            _ => Err(TranspileError::UnknownDialect(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("pg".parse::<Dialect>().unwrap(), Dialect::PostgreSQL);
        assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSQL);
        assert_eq!("MYSQL".parse::<Dialect>().unwrap(), Dialect::MySQL);
        assert_eq!("mssql".parse::<Dialect>().unwrap(), Dialect::SQLServer);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "db2".parse::<Dialect>().unwrap_err();
        assert!(
            err.to_string().contains("db2"),
            "Error should name the dialect, got: {}",
            err
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Dialect::SQLServer.to_string(), "SQL Server");
        assert_eq!(Dialect::PostgreSQL.to_string(), "PostgreSQL");
    }
}
