use crate::VectorIndex;

/// Generate SQL migrations for the agent vector table
///
/// Every statement is idempotent, so the full list is applied on each
/// startup. The vector length is fixed when the table is created; a later
/// startup with a different dimension is caught by the schema check in
/// [`crate::PgVectorStore::verify_schema`], not by these migrations.
pub fn generate_migrations(table: &str, dimension: usize, index: &VectorIndex) -> Vec<(&'static str, String)> {
    let mut migrations = vec![
        (
            "20240501000000_vector_extension",
            "CREATE EXTENSION IF NOT EXISTS vector;".to_string(),
        ),
        (
            "20240501000001_agents_table",
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    metadata JSONB NOT NULL,
                    embedding vector({dimension}) NOT NULL,
                    seq BIGSERIAL NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Tie-break order for equal distances
                CREATE INDEX IF NOT EXISTS idx_{table}_seq ON {table}(seq);
                "#,
                table = table,
                dimension = dimension,
            ),
        ),
    ];

    if let VectorIndex::Hnsw { m, ef_construction, .. } = index {
        migrations.push((
            "20240501000002_agents_hnsw_index",
            format!(
                r#"
                CREATE INDEX IF NOT EXISTS idx_{table}_embedding_hnsw
                    ON {table} USING hnsw (embedding vector_cosine_ops)
                    WITH (m = {m}, ef_construction = {ef_construction});
                "#,
                table = table,
                m = m,
                ef_construction = ef_construction,
            ),
        ));
    }

    migrations
}
