//! NULL-comparison rewriting.
//!
//! Derby compares `= NULL` literally instead of per SQL's null-comparison
//! convention, so equality against NULL must become `IS [NOT] NULL` before
//! dispatch. For INSERT/UPDATE statements only the WHERE clause is touched
//! (an UPDATE's `SET c = NULL` is a legitimate assignment); other
//! statements are rewritten throughout.

use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("{e}"))
}

fn insert_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)^\s*INSERT"))
}

fn select_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)^\s*\(?\s*(SELECT|SHOW)"))
}

fn where_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)\sWHERE\s"))
}

fn not_null_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)!=\s*NULL"))
}

fn eq_null_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)=\s*NULL"))
}

/// Whether the statement is an INSERT.
#[must_use]
pub fn is_insert(sql: &str) -> bool {
    insert_re().is_match(sql)
}

/// Whether the statement is a plain query.
#[must_use]
pub fn is_select(sql: &str) -> bool {
    select_re().is_match(sql)
}

fn rewrite_null_comparisons(fragment: &str) -> String {
    let fragment = not_null_re().replace_all(fragment, "IS NOT NULL");
    eq_null_re().replace_all(&fragment, "IS NULL").into_owned()
}

/// Rewrites NULL equality comparisons into `IS [NOT] NULL`.
#[must_use]
pub fn correct_is_null(sql: &str) -> String {
    let insert = is_insert(sql);
    let update = !insert && !is_select(sql);

    if insert || update {
        match where_re().find(sql) {
            Some(m) => {
                let (head, tail) = sql.split_at(m.start());
                format!("{head}{}", rewrite_null_comparisons(tail))
            }
            None => String::from(sql),
        }
    } else {
        rewrite_null_comparisons(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_insert("INSERT INTO t VALUES (1)"));
        assert!(is_insert("  insert into t values (1)"));
        assert!(!is_insert("UPDATE t SET a = 1"));
        assert!(is_select("SELECT * FROM t"));
        assert!(is_select(" (SELECT 1 FROM t)"));
        assert!(!is_select("DELETE FROM t"));
    }

    #[test]
    fn test_update_where_clause_rewritten() {
        let sql = "UPDATE posts SET title = 'x' WHERE author = NULL";
        assert_eq!(
            correct_is_null(sql),
            "UPDATE posts SET title = 'x' WHERE author IS NULL"
        );
    }

    #[test]
    fn test_update_not_null_rewritten() {
        let sql = "UPDATE posts SET title = 'x' WHERE author != NULL";
        assert_eq!(
            correct_is_null(sql),
            "UPDATE posts SET title = 'x' WHERE author IS NOT NULL"
        );
    }

    #[test]
    fn test_update_set_null_untouched() {
        // The assignment is legitimate; only the WHERE clause is rewritten.
        let sql = "UPDATE posts SET author = NULL WHERE id = 1";
        assert_eq!(correct_is_null(sql), sql);
    }

    #[test]
    fn test_insert_without_where_untouched() {
        let sql = "INSERT INTO posts (author) VALUES (NULL)";
        assert_eq!(correct_is_null(sql), sql);
    }

    #[test]
    fn test_delete_where_clause_rewritten() {
        let sql = "DELETE FROM posts WHERE author = NULL";
        assert_eq!(correct_is_null(sql), "DELETE FROM posts WHERE author IS NULL");
    }

    #[test]
    fn test_select_rewritten_throughout() {
        let sql = "SELECT CASE WHEN author = NULL THEN 1 ELSE 0 END FROM posts WHERE author = NULL";
        assert_eq!(
            correct_is_null(sql),
            "SELECT CASE WHEN author IS NULL THEN 1 ELSE 0 END FROM posts WHERE author IS NULL"
        );
    }

    #[test]
    fn test_case_insensitive() {
        let sql = "delete from posts where author = null";
        assert_eq!(correct_is_null(sql), "delete from posts where author IS NULL");
    }

    #[test]
    fn test_no_null_comparison_untouched() {
        let sql = "SELECT * FROM posts WHERE id = 1";
        assert_eq!(correct_is_null(sql), sql);
    }
}
