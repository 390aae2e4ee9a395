//! pgvector text literals: `[0.12,-0.55,0.91]`.

use crate::error::EmbeddingError;

/// Render a vector as a pgvector literal. Components use the shortest form that
/// parses back to the same `f32`; no whitespace.
#[must_use]
pub fn vector_literal(vector: &[f32]) -> String {
    let mut out = String::with_capacity(vector.len().saturating_mul(10).saturating_add(2));
    out.push('[');
    for (i, value) in vector.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&value.to_string());
    }
    out.push(']');
    out
}

/// Parse a pgvector literal back into components.
pub fn parse_vector_literal(literal: &str) -> Result<Vec<f32>, EmbeddingError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| EmbeddingError::InvalidLiteral(literal.to_owned()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| EmbeddingError::InvalidLiteral(format!("{part:?}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_format() {
        assert_eq!(vector_literal(&[0.12, -0.55, 0.91]), "[0.12,-0.55,0.91]");
        assert_eq!(vector_literal(&[1.0, 0.0]), "[1,0]");
        assert_eq!(vector_literal(&[]), "[]");
    }

    #[test]
    fn test_literal_is_lossless() {
        let vector = vec![0.1_f32, 1.0 / 3.0, -2.5e-8, 123_456.79, f32::MIN_POSITIVE];
        let parsed = parse_vector_literal(&vector_literal(&vector)).unwrap();
        assert_eq!(parsed, vector);
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        assert_eq!(parse_vector_literal(" [1, 2.5 ,-3] ").unwrap(), vec![1.0, 2.5, -3.0]);
        assert!(parse_vector_literal("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_vector_literal("1,2"), Err(EmbeddingError::InvalidLiteral(_))));
        assert!(matches!(parse_vector_literal("[1,x]"), Err(EmbeddingError::InvalidLiteral(_))));
        assert!(matches!(parse_vector_literal("[1,,2]"), Err(EmbeddingError::InvalidLiteral(_))));
    }
}
