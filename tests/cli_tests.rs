//! CLI integration tests for dump-conv.
//!
//! These tests run the binary against small dumps on stdin and on disk,
//! and check exit codes for bad arguments.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the dump-conv binary.
fn cmd() -> Command {
    Command::cargo_bin("dump-conv").unwrap()
}

const PG_DUMP: &str = "\
SET statement_timeout = 0;
SELECT pg_catalog.set_config('search_path', '', false);
CREATE TABLE public.accounts (
    id SERIAL NOT NULL,
    verified BOOLEAN DEFAULT false
);
CREATE SEQUENCE public.accounts_id_seq START WITH 1 INCREMENT BY 1;
INSERT INTO public.accounts (id, verified) VALUES (1, true);
SELECT pg_catalog.setval('public.accounts_id_seq', 1, true);
";

const MYSQL_DUMP: &str = "\
CREATE TABLE accounts (
id INT AUTO_INCREMENT NOT NULL,
verified TINYINT(1) DEFAULT false
);
INSERT INTO accounts (id, verified) VALUES (1, true);
";

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--list-rules"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dump-conv"));
}

// =============================================================================
// Conversion Tests
// =============================================================================

#[test]
fn test_convert_stdin_to_stdout() {
    cmd()
        .write_stdin(PG_DUMP)
        .assert()
        .success()
        .stdout(MYSQL_DUMP);
}

#[test]
fn test_convert_file_to_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("app_pg_dump.sql");
    let target = dir.path().join("app_mysql_dump.sql");
    fs::write(&source, PG_DUMP).unwrap();

    cmd()
        .arg(&source)
        .arg("-o")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("PostgreSQL -> MySQL"))
        .stdout(predicate::str::contains("9 lines in, 5 out, 4 dropped"));

    assert_eq!(fs::read_to_string(&target).unwrap(), MYSQL_DUMP);
}

#[test]
fn test_dash_reads_stdin() {
    cmd()
        .arg("-")
        .write_stdin("INSERT INTO public.t VALUES (1);\n")
        .assert()
        .success()
        .stdout("INSERT INTO t VALUES (1);\n");
}

#[test]
fn test_extra_rules() {
    cmd()
        .args(["--replace", "UUID=CHAR(36)", "--drop-prefix", "GRANT"])
        .args(["--strip", r"(?i)\s+OWNER TO \w+"])
        .write_stdin("token UUID,\nGRANT ALL ON t TO app;\nALTER TABLE t OWNER TO app;\n")
        .assert()
        .success()
        .stdout("token CHAR(36),\nALTER TABLE t;\n");
}

#[test]
fn test_list_rules() {
    cmd()
        .arg("--list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("PostgreSQL -> MySQL"))
        .stdout(predicate::str::contains(r#"drop lines starting with "SET""#))
        .stdout(predicate::str::contains(r#"replace "SERIAL" with "INT AUTO_INCREMENT""#))
        .stdout(predicate::str::contains("drop empty lines"));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_unknown_dialect() {
    cmd()
        .args(["--from", "db2"])
        .write_stdin("")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown dialect: 'db2'"));
}

#[test]
fn test_unsupported_pair() {
    cmd()
        .args(["--from", "mysql", "--to", "postgresql"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported conversion"));
}

#[test]
fn test_missing_source_file() {
    cmd()
        .arg("/nonexistent/dump.sql")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/dump.sql"));
}

#[test]
fn test_invalid_strip_pattern() {
    cmd()
        .args(["--strip", "(unclosed"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));
}

#[test]
fn test_unknown_log_level() {
    cmd()
        .args(["--log-level", "loud"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("loud"));
}

#[test]
fn test_log_level_accepted() {
    cmd()
        .args(["--log-level", "debug"])
        .write_stdin("INSERT INTO public.t VALUES (1);\n")
        .assert()
        .success()
        .stdout("INSERT INTO t VALUES (1);\n");
}

#[test]
fn test_latin1_bytes_pass_through() {
    cmd()
        .write_stdin(&b"SET client_encoding = 'LATIN1';\nINSERT INTO t VALUES ('caf\xe9');\n"[..])
        .assert()
        .success()
        .stdout(&b"INSERT INTO t VALUES ('caf\xe9');\n"[..]);
}

#[test]
fn test_invalid_replacement() {
    cmd()
        .args(["--replace", "missing-separator"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected FROM=TO"));
}
