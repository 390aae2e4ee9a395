use chatvec_core::{DistanceMetric, SearchFilter, SimilarMessage};
use chatvec_embeddings::vector_literal;
use sqlx::Row;

use super::{MESSAGE_COLUMNS, PgStorage, row_to_message, usize_to_i64};
use crate::error::StorageError;

/// Similarity expression over the `embedding` column and the query bound as `$1`.
/// Higher is always more similar.
pub(crate) const fn score_expr(metric: DistanceMetric) -> &'static str {
    match metric {
        DistanceMetric::Cosine => "1 - (embedding <=> $1::vector)",
        DistanceMetric::L2 => "-(embedding <-> $1::vector)",
        DistanceMetric::InnerProduct => "(embedding <#> $1::vector) * -1",
    }
}

fn search_sql(table: &str, metric: DistanceMetric) -> String {
    let score = score_expr(metric);
    format!(
        "SELECT {MESSAGE_COLUMNS}, similarity
           FROM (
                SELECT {MESSAGE_COLUMNS}, {score} AS similarity
                  FROM {table}
                 WHERE embedding IS NOT NULL
                   AND ($2::text IS NULL OR role = $2)
                   AND ($3::text IS NULL OR conversation_id = $3)
           ) AS scored
          WHERE similarity <> 'NaN'::double precision
            AND ($4::double precision IS NULL OR similarity >= $4)
          ORDER BY similarity DESC
          LIMIT $5"
    )
}

pub(crate) async fn similarity_search(
    storage: &PgStorage,
    query: &[f32],
    filter: &SearchFilter,
) -> Result<Vec<SimilarMessage>, StorageError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    if query.len() != storage.dimension {
        return Err(StorageError::DimensionMismatch {
            expected: storage.dimension,
            actual: query.len(),
        });
    }

    let rows = sqlx::query(&search_sql(&storage.table, filter.metric))
        .bind(vector_literal(query))
        .bind(filter.role.as_deref())
        .bind(filter.conversation_id.as_deref())
        .bind(filter.threshold)
        .bind(usize_to_i64(filter.limit))
        .fetch_all(&storage.pool)
        .await?;

    tracing::debug!(metric = %filter.metric, hits = rows.len(), "similarity search");
    rows.iter()
        .map(|row| -> Result<SimilarMessage, StorageError> {
            Ok(SimilarMessage { message: row_to_message(row)?, similarity: row.try_get("similarity")? })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_expressions() {
        assert_eq!(score_expr(DistanceMetric::Cosine), "1 - (embedding <=> $1::vector)");
        assert_eq!(score_expr(DistanceMetric::L2), "-(embedding <-> $1::vector)");
        assert_eq!(score_expr(DistanceMetric::InnerProduct), "(embedding <#> $1::vector) * -1");
    }

    #[test]
    fn test_search_sql_shape() {
        let sql = search_sql("\"chatvec\".\"conversations\"", DistanceMetric::L2);
        assert!(sql.contains("FROM \"chatvec\".\"conversations\""));
        assert!(sql.contains("-(embedding <-> $1::vector) AS similarity"));
        assert!(sql.contains("ORDER BY similarity DESC"));
        assert!(sql.contains("LIMIT $5"));
    }
}
