//! Paginated feed query
//!
//! Builds `SELECT .. FROM .. [JOIN ..] WHERE .. ORDER BY .. LIMIT .. OFFSET ..`
//! plus a matching `COUNT(*)`, returning both as a [`Page`]. Column and table
//! names are `&'static str` supplied by repositories; only values are bound.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use vidshare_core::{AppError, Page, PageRequest, SortDirection};

/// A predicate over named columns.
#[derive(Debug, Clone)]
pub enum FeedFilter {
    Eq { column: &'static str, value: Uuid },
    NotNull { column: &'static str },
    /// Case-insensitive substring match against any of the columns
    ContainsAny {
        columns: &'static [&'static str],
        needle: String,
    },
}

/// Escape LIKE wildcards so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone)]
pub struct FeedQuery {
    source: &'static str,
    select: &'static str,
    joins: Vec<&'static str>,
    filters: Vec<FeedFilter>,
    order_by: &'static str,
    tiebreak: &'static str,
    direction: SortDirection,
    page: PageRequest,
}

impl FeedQuery {
    /// `source` is the aliased base table (`"videos v"`), `select` the column list.
    pub fn new(source: &'static str, select: &'static str) -> Self {
        Self {
            source,
            select,
            joins: Vec::new(),
            filters: Vec::new(),
            order_by: "created_at",
            tiebreak: "id",
            direction: SortDirection::Desc,
            page: PageRequest::default(),
        }
    }

    pub fn join(mut self, join: &'static str) -> Self {
        self.joins.push(join);
        self
    }

    pub fn filter(mut self, filter: FeedFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order by `column`, breaking ties on `tiebreak` in the same direction.
    pub fn order_by(
        mut self,
        column: &'static str,
        tiebreak: &'static str,
        direction: SortDirection,
    ) -> Self {
        self.order_by = column;
        self.tiebreak = tiebreak;
        self.direction = direction;
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    fn push_from(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" FROM ").push(self.source);
        for join in &self.joins {
            qb.push(" ").push(*join);
        }

        for (i, filter) in self.filters.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match filter {
                FeedFilter::Eq { column, value } => {
                    qb.push(*column).push(" = ").push_bind(*value);
                }
                FeedFilter::NotNull { column } => {
                    qb.push(*column).push(" IS NOT NULL");
                }
                FeedFilter::ContainsAny { columns, needle } => {
                    let pattern = format!("%{}%", escape_like(needle));
                    qb.push("(");
                    for (j, column) in columns.iter().enumerate() {
                        if j > 0 {
                            qb.push(" OR ");
                        }
                        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
                    }
                    qb.push(")");
                }
            }
        }
    }

    pub(crate) fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*)");
        self.push_from(&mut qb);
        qb
    }

    pub(crate) fn select_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(self.select);
        self.push_from(&mut qb);

        let direction = self.direction.as_sql();
        qb.push(" ORDER BY ")
            .push(self.order_by)
            .push(" ")
            .push(direction)
            .push(", ")
            .push(self.tiebreak)
            .push(" ")
            .push(direction);

        qb.push(" LIMIT ")
            .push_bind(self.page.limit)
            .push(" OFFSET ")
            .push_bind(self.page.offset());
        qb
    }

    /// Run the count and the page query.
    pub async fn fetch<T>(&self, pool: &PgPool) -> Result<Page<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let total: i64 = self
            .count_query()
            .build_query_scalar()
            .fetch_one(pool)
            .await?;

        let docs = if total > self.page.offset() {
            self.select_query()
                .build_query_as::<T>()
                .fetch_all(pool)
                .await?
        } else {
            Vec::new()
        };

        Ok(Page::new(docs, total, &self.page))
    }
}
