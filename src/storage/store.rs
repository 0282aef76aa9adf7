//! CRUD, search, and statistics operations over the quote tables.

use std::{
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rand::seq::SliceRandom;
use rusqlite::{
    Connection, OptionalExtension, Row, params, params_from_iter, types::Value as SqlValue,
};

use super::{
    StorageError,
    models::{
        NewQuote, Quote, QuoteUpdate, SearchFilter, Statistics, TagCount, TopEntry,
        normalize_tags, normalize_timestamp,
    },
    schema::{configure_connection, init_schema, schema_version},
};

const QUOTE_COLUMNS: &str = "q.id, q.text, q.author, q.source, q.year, q.created_at";

/// Owns the SQLite connection and exposes every quote operation.
///
/// Each call locks the connection for its full duration; mutating calls run inside a single
/// transaction that rolls back if any statement fails. Share the store through an `Arc`.
pub struct QuoteStore {
    conn: Mutex<Connection>,
}

impl QuoteStore {
    /// Open (creating if needed) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %path.display(), "Opening quote database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database, mostly useful for tests.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, StorageError> {
        configure_connection(&conn)?;
        init_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Highest applied schema version.
    pub fn schema_version(&self) -> Result<Option<i64>, StorageError> {
        let conn = self.lock()?;
        schema_version(&conn)
    }

    /// Insert a quote with its tags and return the stored record.
    pub fn add_quote(&self, quote: NewQuote) -> Result<Quote, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let id = insert_quote(&tx, &quote)?;
        tx.commit()?;
        tracing::debug!(id, author = %quote.author.trim(), "Quote added");
        fetch_quote(&conn, id)?.ok_or(StorageError::Database(
            rusqlite::Error::QueryReturnedNoRows,
        ))
    }

    /// Insert several quotes atomically; either all land or none do.
    pub fn add_quotes(&self, quotes: &[NewQuote]) -> Result<Vec<i64>, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let ids = quotes
            .iter()
            .map(|quote| insert_quote(&tx, quote))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        Ok(ids)
    }

    /// Look up a single quote.
    pub fn get_quote(&self, id: i64) -> Result<Option<Quote>, StorageError> {
        let conn = self.lock()?;
        fetch_quote(&conn, id)
    }

    /// Every quote in insertion order.
    pub fn list_quotes(&self) -> Result<Vec<Quote>, StorageError> {
        self.search(&SearchFilter::default())
    }

    /// Quotes whose author matches case-insensitively.
    pub fn quotes_by_author(&self, author: &str) -> Result<Vec<Quote>, StorageError> {
        self.search(&SearchFilter {
            author: Some(author.to_string()),
            ..SearchFilter::default()
        })
    }

    /// Quotes carrying `tag`.
    pub fn quotes_by_tag(&self, tag: &str) -> Result<Vec<Quote>, StorageError> {
        self.search(&SearchFilter {
            tags: vec![tag.to_string()],
            ..SearchFilter::default()
        })
    }

    /// Filter quotes by substring, author, and an all-of tag set.
    ///
    /// Blank query or author and an empty tag list do not restrict the result.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Quote>, StorageError> {
        let mut sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes q");
        let mut clauses = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(query) = non_blank(filter.query.as_deref()) {
            clauses.push("(q.text LIKE ? ESCAPE '\\' OR q.author LIKE ? ESCAPE '\\')".to_string());
            let pattern = format!("%{}%", escape_like(query));
            values.push(SqlValue::Text(pattern.clone()));
            values.push(SqlValue::Text(pattern));
        }

        if let Some(author) = non_blank(filter.author.as_deref()) {
            clauses.push("LOWER(q.author) = LOWER(?)".to_string());
            values.push(SqlValue::Text(author.to_string()));
        }

        let tags = normalize_tags(&filter.tags);
        if !tags.is_empty() {
            let placeholders = vec!["?"; tags.len()].join(", ");
            clauses.push(format!(
                "q.id IN (SELECT qt.quote_id FROM quote_tags qt JOIN tags t ON t.id = qt.tag_id \
                 WHERE t.name IN ({placeholders}) GROUP BY qt.quote_id \
                 HAVING COUNT(DISTINCT t.id) = ?)"
            ));
            values.extend(tags.iter().cloned().map(SqlValue::Text));
            values.push(SqlValue::Integer(tags.len() as i64));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY q.id");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), QuoteRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|row| row.into_quote(&conn))
            .collect()
    }

    /// Pick a quote uniformly at random, optionally among those carrying `tag`.
    pub fn random_quote(&self, tag: Option<&str>) -> Result<Option<Quote>, StorageError> {
        let conn = self.lock()?;
        let ids: Vec<i64> = match non_blank(tag) {
            Some(tag) => {
                let mut stmt = conn.prepare(
                    "SELECT qt.quote_id FROM quote_tags qt JOIN tags t ON t.id = qt.tag_id \
                     WHERE t.name = ?1",
                )?;
                let ids = stmt
                    .query_map(params![tag], |row| row.get(0))?
                    .collect::<Result<_, _>>()?;
                ids
            }
            None => {
                let mut stmt = conn.prepare("SELECT id FROM quotes")?;
                let ids = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<_, _>>()?;
                ids
            }
        };

        match ids.choose(&mut rand::thread_rng()) {
            Some(&id) => fetch_quote(&conn, id),
            None => Ok(None),
        }
    }

    /// Apply a partial update. Returns `false` when the quote does not exist.
    pub fn update_quote(&self, id: i64, update: QuoteUpdate) -> Result<bool, StorageError> {
        let text = update
            .text
            .as_deref()
            .map(|text| require_non_empty(text, "Quote text cannot be empty"))
            .transpose()?;
        let author = update
            .author
            .as_deref()
            .map(|author| require_non_empty(author, "Author name cannot be empty"))
            .transpose()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if !quote_exists(&tx, id)? {
            return Ok(false);
        }

        let mut assignments = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(text) = text {
            assignments.push("text = ?");
            values.push(SqlValue::Text(text));
        }
        if let Some(author) = author {
            assignments.push("author = ?");
            values.push(SqlValue::Text(author));
        }
        if let Some(source) = update.source {
            assignments.push("source = ?");
            values.push(source.map_or(SqlValue::Null, SqlValue::Text));
        }
        if let Some(year) = update.year {
            assignments.push("year = ?");
            values.push(year.map_or(SqlValue::Null, |year| SqlValue::Integer(year.into())));
        }
        if !assignments.is_empty() {
            values.push(SqlValue::Integer(id));
            let sql = format!("UPDATE quotes SET {} WHERE id = ?", assignments.join(", "));
            tx.execute(&sql, params_from_iter(values))?;
        }

        if let Some(tags) = update.tags {
            tx.execute("DELETE FROM quote_tags WHERE quote_id = ?1", params![id])?;
            attach_tags(&tx, id, &normalize_tags(&tags))?;
        }

        tx.commit()?;
        tracing::debug!(id, "Quote updated");
        Ok(true)
    }

    /// Delete a quote and its tag associations. Tag rows are kept.
    pub fn delete_quote(&self, id: i64) -> Result<bool, StorageError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM quotes WHERE id = ?1", params![id])?;
        tx.commit()?;
        tracing::debug!(id, removed, "Quote delete");
        Ok(removed > 0)
    }

    /// Attach `tag` to a quote, creating the tag when needed. Re-adding is a no-op.
    ///
    /// Returns `false` when the quote does not exist.
    pub fn add_tag_to_quote(&self, quote_id: i64, tag: &str) -> Result<bool, StorageError> {
        let tag = require_non_empty(tag, "Tag name cannot be empty")?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        if !quote_exists(&tx, quote_id)? {
            return Ok(false);
        }
        attach_tags(&tx, quote_id, &[tag])?;
        tx.commit()?;
        Ok(true)
    }

    /// Every tag with its usage count, most used first, ties by name.
    pub fn list_tags(&self) -> Result<Vec<TagCount>, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT t.name, COUNT(qt.quote_id) AS uses FROM tags t \
             LEFT JOIN quote_tags qt ON qt.tag_id = t.id \
             GROUP BY t.id, t.name ORDER BY uses DESC, t.name ASC",
        )?;
        let tags = stmt
            .query_map([], |row| {
                Ok(TagCount {
                    name: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(tags)
    }

    /// Aggregate counts and the leading author and tag.
    pub fn statistics(&self) -> Result<Statistics, StorageError> {
        let conn = self.lock()?;
        let count = |sql: &str| -> Result<u64, StorageError> {
            Ok(conn.query_row(sql, [], |row| row.get::<_, i64>(0))? as u64)
        };
        let top = |sql: &str| -> Result<Option<TopEntry>, StorageError> {
            Ok(conn
                .query_row(sql, [], |row| {
                    Ok(TopEntry {
                        name: row.get(0)?,
                        count: row.get::<_, i64>(1)? as u64,
                    })
                })
                .optional()?)
        };

        Ok(Statistics {
            total_quotes: count("SELECT COUNT(*) FROM quotes")?,
            total_authors: count("SELECT COUNT(DISTINCT author) FROM quotes")?,
            total_tags: count("SELECT COUNT(*) FROM tags")?,
            most_quoted_author: top(
                "SELECT author, COUNT(*) AS uses FROM quotes \
                 GROUP BY author ORDER BY uses DESC, author ASC LIMIT 1",
            )?,
            most_common_tag: top(
                "SELECT t.name, COUNT(qt.quote_id) AS uses FROM tags t \
                 JOIN quote_tags qt ON qt.tag_id = t.id \
                 GROUP BY t.id, t.name ORDER BY uses DESC, t.name ASC LIMIT 1",
            )?,
        })
    }

    /// Number of stored quotes.
    pub fn quote_count(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get::<_, i64>(0))? as u64)
    }

    /// Whether any quote is present; used as the seeding marker.
    pub fn is_seeded(&self) -> Result<bool, StorageError> {
        Ok(self.quote_count()? > 0)
    }
}

struct QuoteRow {
    id: i64,
    text: String,
    author: String,
    source: Option<String>,
    year: Option<i32>,
    created_at: Option<String>,
}

impl QuoteRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            author: row.get(2)?,
            source: row.get(3)?,
            year: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_quote(self, conn: &Connection) -> Result<Quote, StorageError> {
        let tags = tags_for_quote(conn, self.id)?;
        Ok(Quote {
            id: self.id,
            text: self.text,
            author: self.author,
            source: self.source,
            year: self.year,
            created_at: normalize_timestamp(self.created_at),
            tags,
        })
    }
}

fn fetch_quote(conn: &Connection, id: i64) -> Result<Option<Quote>, StorageError> {
    let row = conn
        .query_row(
            &format!("SELECT {QUOTE_COLUMNS} FROM quotes q WHERE q.id = ?1"),
            params![id],
            QuoteRow::from_row,
        )
        .optional()?;
    row.map(|row| row.into_quote(conn)).transpose()
}

fn tags_for_quote(conn: &Connection, quote_id: i64) -> Result<Vec<String>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.name FROM tags t JOIN quote_tags qt ON qt.tag_id = t.id \
         WHERE qt.quote_id = ?1 ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map(params![quote_id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(tags)
}

fn quote_exists(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    Ok(conn
        .query_row("SELECT 1 FROM quotes WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?
        .is_some())
}

fn insert_quote(conn: &Connection, quote: &NewQuote) -> Result<i64, StorageError> {
    let text = require_non_empty(&quote.text, "Quote text cannot be empty")?;
    let author = require_non_empty(&quote.author, "Author name cannot be empty")?;
    conn.execute(
        "INSERT INTO quotes (text, author, source, year) VALUES (?1, ?2, ?3, ?4)",
        params![text, author, quote.source, quote.year],
    )?;
    let id = conn.last_insert_rowid();
    attach_tags(conn, id, &normalize_tags(&quote.tags))?;
    Ok(id)
}

fn attach_tags(conn: &Connection, quote_id: i64, tags: &[String]) -> Result<(), StorageError> {
    for tag in tags {
        let tag_id = get_or_create_tag(conn, tag)?;
        conn.execute(
            "INSERT OR IGNORE INTO quote_tags (quote_id, tag_id) VALUES (?1, ?2)",
            params![quote_id, tag_id],
        )?;
    }
    Ok(())
}

fn get_or_create_tag(conn: &Connection, name: &str) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (name) VALUES (?1)",
        params![name],
    )?;
    Ok(conn.query_row(
        "SELECT id FROM tags WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?)
}

fn require_non_empty(value: &str, message: &str) -> Result<String, StorageError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(StorageError::validation(message))
    } else {
        Ok(trimmed.to_string())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn store() -> QuoteStore {
        QuoteStore::open_in_memory().expect("in-memory store")
    }

    fn quote(text: &str, author: &str, tags: &[&str]) -> NewQuote {
        NewQuote::new(text, author).with_tags(tags.iter().copied())
    }

    fn ids(quotes: &[Quote]) -> Vec<i64> {
        quotes.iter().map(|quote| quote.id).collect()
    }

    #[test]
    fn add_then_get_round_trips() {
        let store = store();
        let added = store
            .add_quote(NewQuote::new("The Answer is 42", "Deep Thought"))
            .unwrap();

        let fetched = store.get_quote(added.id).unwrap().expect("quote exists");
        assert_eq!(fetched.text, "The Answer is 42");
        assert_eq!(fetched.author, "Deep Thought");
        assert!(fetched.tags.is_empty());
        assert!(!fetched.created_at.is_empty());
        assert_eq!(fetched, added);
    }

    #[test]
    fn add_keeps_all_fields_and_trims() {
        let store = store();
        let added = store
            .add_quote(NewQuote {
                text: "  Don't Panic.  ".into(),
                author: " Douglas Adams ".into(),
                source: Some("The Hitchhiker's Guide to the Galaxy".into()),
                year: Some(1979),
                tags: vec!["humor".into(), " famous ".into(), "".into(), "humor".into()],
            })
            .unwrap();

        assert_eq!(added.text, "Don't Panic.");
        assert_eq!(added.author, "Douglas Adams");
        assert_eq!(added.year, Some(1979));
        assert_eq!(added.tags, vec!["famous".to_string(), "humor".to_string()]);
    }

    #[test]
    fn add_rejects_blank_text_or_author() {
        let store = store();
        let error = store.add_quote(NewQuote::new("   ", "Someone")).unwrap_err();
        assert!(error.is_validation());
        let error = store.add_quote(NewQuote::new("Words", "")).unwrap_err();
        assert!(error.is_validation());
        assert_eq!(store.quote_count().unwrap(), 0);
    }

    #[test]
    fn missing_quote_is_none() {
        assert!(store().get_quote(999).unwrap().is_none());
    }

    #[test]
    fn list_returns_insertion_order() {
        let store = store();
        let first = store.add_quote(quote("one", "A", &[])).unwrap();
        let second = store.add_quote(quote("two", "B", &[])).unwrap();
        let third = store.add_quote(quote("three", "C", &[])).unwrap();

        assert_eq!(
            ids(&store.list_quotes().unwrap()),
            vec![first.id, second.id, third.id]
        );
    }

    #[test]
    fn search_matches_text_or_author_case_insensitively() {
        let store = store();
        let towel = store.add_quote(quote("Always know where your towel is", "Ford", &[])).unwrap();
        let marvin = store.add_quote(quote("Life, don't talk to me about life", "Marvin", &[])).unwrap();

        let by_text = store
            .search(&SearchFilter {
                query: Some("TOWEL".into()),
                ..SearchFilter::default()
            })
            .unwrap();
        assert_eq!(ids(&by_text), vec![towel.id]);

        let by_author = store
            .search(&SearchFilter {
                query: Some("marv".into()),
                ..SearchFilter::default()
            })
            .unwrap();
        assert_eq!(ids(&by_author), vec![marvin.id]);
    }

    #[test]
    fn search_treats_like_wildcards_literally() {
        let store = store();
        store.add_quote(quote("100% sure", "A", &[])).unwrap();
        store.add_quote(quote("100 percent", "B", &[])).unwrap();

        let hits = store
            .search(&SearchFilter {
                query: Some("100%".into()),
                ..SearchFilter::default()
            })
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "100% sure");
    }

    #[test]
    fn search_author_filter_is_exact_but_case_insensitive() {
        let store = store();
        let adams = store.add_quote(quote("q1", "Douglas Adams", &[])).unwrap();
        store.add_quote(quote("q2", "Douglas Adamsson", &[])).unwrap();

        let hits = store.quotes_by_author("douglas adams").unwrap();
        assert_eq!(ids(&hits), vec![adams.id]);
    }

    #[test]
    fn search_tags_use_and_semantics() {
        let store = store();
        let both = store.add_quote(quote("both", "A", &["x", "y"])).unwrap();
        store.add_quote(quote("only x", "B", &["x"])).unwrap();
        store.add_quote(quote("only y", "C", &["y"])).unwrap();

        let hits = store
            .search(&SearchFilter {
                tags: vec!["x".into(), "y".into()],
                ..SearchFilter::default()
            })
            .unwrap();
        assert_eq!(ids(&hits), vec![both.id]);

        let duplicated = store
            .search(&SearchFilter {
                tags: vec!["x".into(), "y".into(), "x".into()],
                ..SearchFilter::default()
            })
            .unwrap();
        assert_eq!(ids(&duplicated), vec![both.id]);
    }

    #[test]
    fn empty_filters_match_everything() {
        let store = store();
        store.add_quote(quote("a", "A", &["t"])).unwrap();
        store.add_quote(quote("b", "B", &[])).unwrap();

        let hits = store
            .search(&SearchFilter {
                query: Some("  ".into()),
                author: Some(String::new()),
                tags: vec![],
            })
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn search_combines_filters() {
        let store = store();
        let target = store.add_quote(quote("Time is an illusion", "Adams", &["time", "humor"])).unwrap();
        store.add_quote(quote("Time flies", "Adams", &["humor"])).unwrap();
        store.add_quote(quote("Time is money", "Franklin", &["time"])).unwrap();

        let hits = store
            .search(&SearchFilter {
                query: Some("time".into()),
                author: Some("adams".into()),
                tags: vec!["time".into()],
            })
            .unwrap();
        assert_eq!(ids(&hits), vec![target.id]);
    }

    #[test]
    fn partial_update_leaves_other_fields() {
        let store = store();
        let added = store
            .add_quote(NewQuote {
                text: "Original".into(),
                author: "Author".into(),
                source: Some("Book".into()),
                year: Some(1999),
                tags: vec!["keep".into()],
            })
            .unwrap();

        let updated = store
            .update_quote(
                added.id,
                QuoteUpdate {
                    text: Some("Revised".into()),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap();
        assert!(updated);

        let fetched = store.get_quote(added.id).unwrap().unwrap();
        assert_eq!(fetched.text, "Revised");
        assert_eq!(fetched.author, "Author");
        assert_eq!(fetched.source.as_deref(), Some("Book"));
        assert_eq!(fetched.year, Some(1999));
        assert_eq!(fetched.tags, vec!["keep".to_string()]);
    }

    #[test]
    fn update_can_clear_optional_fields() {
        let store = store();
        let added = store
            .add_quote(NewQuote {
                source: Some("Book".into()),
                year: Some(2002),
                ..NewQuote::new("text", "author")
            })
            .unwrap();

        store
            .update_quote(
                added.id,
                QuoteUpdate {
                    source: Some(None),
                    year: Some(None),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap();
        let fetched = store.get_quote(added.id).unwrap().unwrap();
        assert_eq!(fetched.source, None);
        assert_eq!(fetched.year, None);
    }

    #[test]
    fn update_tags_replace_instead_of_merge() {
        let store = store();
        let added = store.add_quote(quote("q", "A", &["a", "b"])).unwrap();

        store
            .update_quote(
                added.id,
                QuoteUpdate {
                    tags: Some(vec!["c".into()]),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap();
        let fetched = store.get_quote(added.id).unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["c".to_string()]);

        store
            .update_quote(
                added.id,
                QuoteUpdate {
                    tags: Some(vec![]),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap();
        assert!(store.get_quote(added.id).unwrap().unwrap().tags.is_empty());
    }

    #[test]
    fn update_unknown_id_is_false() {
        let store = store();
        let result = store
            .update_quote(
                42,
                QuoteUpdate {
                    text: Some("x".into()),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap();
        assert!(!result);
    }

    #[test]
    fn update_rejects_blank_text() {
        let store = store();
        let added = store.add_quote(quote("q", "A", &[])).unwrap();
        let error = store
            .update_quote(
                added.id,
                QuoteUpdate {
                    author: Some("  ".into()),
                    ..QuoteUpdate::default()
                },
            )
            .unwrap_err();
        assert!(error.is_validation());
        assert_eq!(store.get_quote(added.id).unwrap().unwrap().author, "A");
    }

    #[test]
    fn delete_cascades_associations_but_keeps_tags() {
        let store = store();
        let doomed = store.add_quote(quote("doomed", "A", &["shared", "solo"])).unwrap();
        let survivor = store.add_quote(quote("survivor", "B", &["shared"])).unwrap();

        assert!(store.delete_quote(doomed.id).unwrap());
        assert!(store.get_quote(doomed.id).unwrap().is_none());
        assert!(!store.delete_quote(doomed.id).unwrap());

        let tags = store.list_tags().unwrap();
        let shared = tags.iter().find(|tag| tag.name == "shared").unwrap();
        let solo = tags.iter().find(|tag| tag.name == "solo").unwrap();
        assert_eq!(shared.count, 1);
        assert_eq!(solo.count, 0);

        let links: i64 = store
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM quote_tags WHERE quote_id = ?1",
                params![doomed.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(links, 0);
        assert_eq!(ids(&store.quotes_by_tag("shared").unwrap()), vec![survivor.id]);
    }

    #[test]
    fn add_tag_is_idempotent() {
        let store = store();
        let added = store.add_quote(NewQuote::new("The Answer is 42", "Deep Thought")).unwrap();

        assert!(store.add_tag_to_quote(added.id, "philosophy").unwrap());
        assert!(store.add_tag_to_quote(added.id, " philosophy ").unwrap());

        let tags = store.list_tags().unwrap();
        assert_eq!(
            tags,
            vec![TagCount {
                name: "philosophy".into(),
                count: 1
            }]
        );
        assert_eq!(
            store.get_quote(added.id).unwrap().unwrap().tags,
            vec!["philosophy".to_string()]
        );
    }

    #[test]
    fn add_tag_to_missing_quote_is_false() {
        let store = store();
        assert!(!store.add_tag_to_quote(7, "ghost").unwrap());
        assert!(store.list_tags().unwrap().is_empty());
    }

    #[test]
    fn add_tag_rejects_blank_name() {
        let store = store();
        let added = store.add_quote(quote("q", "A", &[])).unwrap();
        assert!(store.add_tag_to_quote(added.id, " ").unwrap_err().is_validation());
    }

    #[test]
    fn list_tags_orders_by_count_then_name() {
        let store = store();
        store.add_quote(quote("1", "A", &["zeta", "beta"])).unwrap();
        store.add_quote(quote("2", "A", &["zeta", "alpha"])).unwrap();
        store.add_quote(quote("3", "A", &["zeta", "beta"])).unwrap();

        let names: Vec<_> = store
            .list_tags()
            .unwrap()
            .into_iter()
            .map(|tag| (tag.name, tag.count))
            .collect();
        assert_eq!(
            names,
            vec![
                ("zeta".to_string(), 3),
                ("beta".to_string(), 2),
                ("alpha".to_string(), 1)
            ]
        );
    }

    #[test]
    fn random_quote_respects_tag_filter() {
        let store = store();
        let tagged = store.add_quote(quote("tagged", "A", &["pick"])).unwrap();
        store.add_quote(quote("untagged", "B", &[])).unwrap();

        for _ in 0..10 {
            let picked = store.random_quote(Some("pick")).unwrap().unwrap();
            assert_eq!(picked.id, tagged.id);
        }
    }

    #[test]
    fn random_quote_covers_collection() {
        let store = store();
        for index in 0..3 {
            store.add_quote(quote(&format!("q{index}"), "A", &[])).unwrap();
        }
        let seen: HashSet<i64> = (0..200)
            .filter_map(|_| store.random_quote(None).unwrap())
            .map(|quote| quote.id)
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn random_quote_on_empty_or_unknown_tag_is_none() {
        let store = store();
        assert!(store.random_quote(None).unwrap().is_none());
        store.add_quote(quote("q", "A", &["real"])).unwrap();
        assert!(store.random_quote(Some("nonexistent-tag")).unwrap().is_none());
    }

    #[test]
    fn statistics_for_populated_store() {
        let store = store();
        store.add_quote(quote("1", "Adams", &["humor", "life"])).unwrap();
        store.add_quote(quote("2", "Adams", &["humor"])).unwrap();
        store.add_quote(quote("3", "Pratchett", &["life"])).unwrap();
        store.add_quote(quote("4", "Pratchett", &["humor"])).unwrap();
        store.add_quote(quote("5", "Vonnegut", &[])).unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_quotes, 5);
        assert_eq!(stats.total_authors, 3);
        assert_eq!(stats.total_tags, 2);
        assert_eq!(
            stats.most_quoted_author,
            Some(TopEntry {
                name: "Adams".into(),
                count: 2
            })
        );
        assert_eq!(
            stats.most_common_tag,
            Some(TopEntry {
                name: "humor".into(),
                count: 3
            })
        );
    }

    #[test]
    fn statistics_for_empty_store() {
        let stats = store().statistics().unwrap();
        assert_eq!(stats.total_quotes, 0);
        assert_eq!(stats.total_authors, 0);
        assert_eq!(stats.total_tags, 0);
        assert!(stats.most_quoted_author.is_none());
        assert!(stats.most_common_tag.is_none());
    }

    #[test]
    fn batch_insert_is_all_or_nothing() {
        let store = store();
        let batch = vec![quote("fine", "A", &["t"]), quote("", "B", &[])];
        assert!(store.add_quotes(&batch).unwrap_err().is_validation());
        assert_eq!(store.quote_count().unwrap(), 0);
        assert!(store.list_tags().unwrap().is_empty());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quotes.db");
        let store = QuoteStore::open(&path).unwrap();
        store.add_quote(quote("persisted", "A", &[])).unwrap();
        drop(store);

        let reopened = QuoteStore::open(&path).unwrap();
        assert_eq!(reopened.quote_count().unwrap(), 1);
        assert_eq!(reopened.schema_version().unwrap(), Some(1));
    }
}
