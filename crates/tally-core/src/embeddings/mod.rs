//! Nearest-choice search in embedding space.

use crate::errors::{EvalError, EvalResult};
use crate::providers::embedder::Embedder;

pub fn dot(a: &[f32], b: &[f32]) -> anyhow::Result<f32> {
    if a.len() != b.len() {
        anyhow::bail!("embedding dims mismatch: {} vs {}", a.len(), b.len());
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Index of the largest score; the first one wins ties.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the candidate whose embedding has the highest dot product with the
/// query's embedding.
pub fn choice_search(
    embedder: &dyn Embedder,
    query: &str,
    candidates: &[String],
) -> EvalResult<usize> {
    if candidates.is_empty() {
        return Err(EvalError::config("semantic search over an empty choice set"));
    }

    let query_vecs = embedder.encode(&[query]).map_err(EvalError::Embedding)?;
    let query_vec = match query_vecs.as_slice() {
        [v] => v,
        other => {
            return Err(EvalError::Embedding(anyhow::anyhow!(
                "embedder '{}' returned {} vectors for 1 query",
                embedder.model_id(),
                other.len()
            )))
        }
    };

    let texts: Vec<&str> = candidates.iter().map(String::as_str).collect();
    let candidate_vecs = embedder.encode(&texts).map_err(EvalError::Embedding)?;
    if candidate_vecs.len() != candidates.len() {
        return Err(EvalError::Embedding(anyhow::anyhow!(
            "embedder '{}' returned {} vectors for {} candidates",
            embedder.model_id(),
            candidate_vecs.len(),
            candidates.len()
        )));
    }

    let scores = candidate_vecs
        .iter()
        .map(|v| dot(v, query_vec))
        .collect::<anyhow::Result<Vec<f32>>>()
        .map_err(EvalError::Embedding)?;

    argmax(&scores).ok_or_else(|| EvalError::config("semantic search produced no scores"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::embedder::FakeEmbedder;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn argmax_prefers_first_on_tie() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), Some(1));
        assert_eq!(argmax(&[-3.0, -1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn dot_rejects_mismatch() {
        assert_eq!(dot(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 11.0);
        assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn picks_closest_choice() {
        let embedder = FakeEmbedder::new("fake", vec![0.0, 0.0, 0.0])
            .with_vector("a kitten", vec![0.9, 0.1, 0.0])
            .with_vector("cat", vec![1.0, 0.0, 0.0])
            .with_vector("dog", vec![0.0, 1.0, 0.0])
            .with_vector("bird", vec![0.0, 0.0, 1.0]);
        let idx = choice_search(&embedder, "a kitten", &strings(&["dog", "cat", "bird"])).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(embedder.calls(), 2);
    }

    #[test]
    fn dimension_mismatch_is_embedding_error() {
        let embedder = FakeEmbedder::new("fake", vec![1.0, 0.0]).with_vector("q", vec![1.0]);
        let err = choice_search(&embedder, "q", &strings(&["x"])).unwrap_err();
        assert!(matches!(err, EvalError::Embedding(_)));
    }
}
