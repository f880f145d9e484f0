use sqlx::PgPool;

/// Runs single-statement queries against the pool.
///
/// Each query is a plain struct with an `impl Processor<Query> for
/// DatabaseProcessor` next to the entity it reads or writes.
#[derive(Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
