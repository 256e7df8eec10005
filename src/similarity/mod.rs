//! Chapter-level similarity ranking (TF-IDF cosine plus overlap boost).

pub mod ranker;
pub mod tokenize;
pub mod types;
pub mod vectorizer;


#[cfg(any(test, feature = "mock"))]
pub use ranker::CountingRanker;
pub use ranker::{CandidateRanker, SimilarityRanker, overlap_boost};
pub use types::{CandidateChapter, ChapterCandidate, RankOutcome, RankQuery, RankerConfig};
pub use vectorizer::{SparseVector, TfidfSpace, TfidfVectorizer, cosine_similarity};
