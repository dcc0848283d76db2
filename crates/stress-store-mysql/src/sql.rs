//! SQL generation for the posts / postmeta schema.
//!
//! Statements follow the shapes the content platform itself emits: meta
//! filters join the metadata table once per filter, every SELECT carries
//! `SQL_CALC_FOUND_ROWS`, and paging uses `LIMIT 0, n`.

use crate::error::MySQLStoreError;
use mysql_async::Value;
use stress_core::{Filter, Ordering, PageSize, Projection, RecordQuery, RecordStatus};

/// Default table prefix, as on a stock install.
pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

/// Page size used for [`PageSize::StoreDefault`].
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Fully-qualified table names for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub posts: String,
    pub postmeta: String,
}

impl TableNames {
    /// Build table names from a prefix. Only ASCII letters, digits and `_`
    /// are accepted because the names are interpolated into SQL.
    pub fn with_prefix(prefix: &str) -> Result<Self, MySQLStoreError> {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(MySQLStoreError::Config(format!(
                "table prefix '{prefix}' may only contain ASCII letters, digits and '_'"
            )));
        }
        Ok(Self {
            posts: format!("{prefix}posts"),
            postmeta: format!("{prefix}postmeta"),
        })
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            posts: format!("{DEFAULT_TABLE_PREFIX}posts"),
            postmeta: format!("{DEFAULT_TABLE_PREFIX}postmeta"),
        }
    }
}

/// A statement and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

pub(crate) fn text(s: &str) -> Value {
    Value::Bytes(s.as_bytes().to_vec())
}

/// Hash values are written inline as quoted literals so large exclusion sets
/// stay clear of the 65,535 placeholder limit. Anything outside
/// `[0-9A-Za-z]` is bound as a parameter instead.
fn inline_literal(value: &str) -> Option<String> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(format!("'{value}'"))
    } else {
        None
    }
}

/// CREATE TABLE statements for both tables.
pub fn create_tables(tables: &TableNames) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS `{}` (\
             `ID` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
             `post_title` TEXT NOT NULL, \
             `post_status` VARCHAR(20) NOT NULL DEFAULT 'publish', \
             `post_date` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP, \
             PRIMARY KEY (`ID`), \
             KEY `post_status_date` (`post_status`, `post_date`, `ID`)\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            tables.posts
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{}` (\
             `meta_id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
             `post_id` BIGINT UNSIGNED NOT NULL DEFAULT 0, \
             `meta_key` VARCHAR(255) DEFAULT NULL, \
             `meta_value` LONGTEXT, \
             PRIMARY KEY (`meta_id`), \
             KEY `post_id` (`post_id`), \
             KEY `meta_key` (`meta_key`(191))\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
            tables.postmeta
        ),
    ]
}

/// DROP TABLE statements for both tables.
pub fn drop_tables(tables: &TableNames) -> Vec<String> {
    vec![
        format!("DROP TABLE IF EXISTS `{}`", tables.postmeta),
        format!("DROP TABLE IF EXISTS `{}`", tables.posts),
    ]
}

pub fn insert_post(tables: &TableNames, title: &str, status: RecordStatus) -> Statement {
    Statement {
        sql: format!(
            "INSERT INTO `{}` (`post_title`, `post_status`) VALUES (?, ?)",
            tables.posts
        ),
        params: vec![text(title), text(status.as_str())],
    }
}

pub fn insert_meta(tables: &TableNames, id: u64, key: &str, value: &str) -> Statement {
    Statement {
        sql: format!(
            "INSERT INTO `{}` (`post_id`, `meta_key`, `meta_value`) VALUES (?, ?, ?)",
            tables.postmeta
        ),
        params: vec![Value::UInt(id), text(key), text(value)],
    }
}

pub fn delete_meta(tables: &TableNames, id: u64) -> Statement {
    Statement {
        sql: format!("DELETE FROM `{}` WHERE `post_id` = ?", tables.postmeta),
        params: vec![Value::UInt(id)],
    }
}

pub fn delete_post(tables: &TableNames, id: u64) -> Statement {
    Statement {
        sql: format!("DELETE FROM `{}` WHERE `ID` = ?", tables.posts),
        params: vec![Value::UInt(id)],
    }
}

pub fn trash_post(tables: &TableNames, id: u64) -> Statement {
    Statement {
        sql: format!("UPDATE `{}` SET `post_status` = ? WHERE `ID` = ?", tables.posts),
        params: vec![text(RecordStatus::Trash.as_str()), Value::UInt(id)],
    }
}

/// Translate a [`RecordQuery`] into a SELECT.
///
/// The caller reads `SELECT FOUND_ROWS()` on the same connection afterwards
/// to obtain the total match count.
pub fn select(tables: &TableNames, query: &RecordQuery, default_page_size: u64) -> Statement {
    let columns = match query.projection {
        Projection::Ids => "p.`ID`",
        Projection::Full => "p.`ID`, p.`post_title`, p.`post_status`",
    };

    let mut joins: Vec<String> = Vec::new();
    let mut conditions: Vec<String> = vec!["p.`post_status` <> ?".to_string()];
    let mut params: Vec<Value> = vec![text(RecordStatus::Trash.as_str())];

    for filter in &query.filters {
        match filter {
            Filter::MetaKeyExists { key } => {
                let alias = format!("mt{}", joins.len());
                joins.push(format!(
                    "INNER JOIN `{}` {alias} ON (p.`ID` = {alias}.`post_id`)",
                    tables.postmeta
                ));
                conditions.push(format!("{alias}.`meta_key` = ?"));
                params.push(text(key));
            }
            Filter::MetaValueNotIn { key, values } => {
                let alias = format!("mt{}", joins.len());
                joins.push(format!(
                    "INNER JOIN `{}` {alias} ON (p.`ID` = {alias}.`post_id`)",
                    tables.postmeta
                ));
                params.push(text(key));
                // NOT IN () is a syntax error; an empty exclusion set excludes nothing.
                if values.is_empty() {
                    conditions.push(format!("{alias}.`meta_key` = ?"));
                } else {
                    let items: Vec<String> = values
                        .iter()
                        .map(|v| {
                            inline_literal(v).unwrap_or_else(|| {
                                params.push(text(v));
                                "?".to_string()
                            })
                        })
                        .collect();
                    conditions.push(format!(
                        "({alias}.`meta_key` = ? AND {alias}.`meta_value` NOT IN ({}))",
                        items.join(", ")
                    ));
                }
            }
            Filter::IdIn { ids } => {
                // The platform ignores an empty `post__in`; here it matches nothing.
                if ids.is_empty() {
                    conditions.push("0 = 1".to_string());
                } else {
                    let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
                    conditions.push(format!("p.`ID` IN ({})", ids.join(", ")));
                }
            }
        }
    }

    let mut sql = format!(
        "SELECT SQL_CALC_FOUND_ROWS {columns} FROM `{}` p",
        tables.posts
    );
    for join in &joins {
        sql.push(' ');
        sql.push_str(join);
    }
    sql.push_str(" WHERE ");
    sql.push_str(&conditions.join(" AND "));
    if !joins.is_empty() {
        sql.push_str(" GROUP BY p.`ID`");
    }
    match query.ordering {
        Ordering::Newest => sql.push_str(" ORDER BY p.`post_date` DESC, p.`ID` DESC"),
        Ordering::Random => sql.push_str(" ORDER BY RAND()"),
    }
    match query.page_size {
        PageSize::Unbounded => {}
        PageSize::Limit(n) => sql.push_str(&format!(" LIMIT 0, {n}")),
        PageSize::StoreDefault => sql.push_str(&format!(" LIMIT 0, {default_page_size}")),
    }

    Statement { sql, params }
}
