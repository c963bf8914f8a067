use std::fmt;

use super::matcher::FuzzyScorer;
use super::models::Project;
use super::ranking::{RankKey, RankedCollector};

pub const DEFAULT_MIN_SCORE: u32 = 60;
pub const DEFAULT_LIMIT: usize = 8;

type RankFn = fn(&Project) -> RankKey;

/// Result list for one query: projects stay sorted best first and capped at
/// `limit`.
///
/// With a query, each project is scored against both its name and its path,
/// projects under `min_score` are dropped and the rest rank by score. Without
/// a query, projects rank by most recent open.
pub struct ProjectsList<'a> {
    query: String,
    min_score: u32,
    scorer: &'a FuzzyScorer,
    items: RankedCollector<Project, RankKey, RankFn>,
}

impl<'a> ProjectsList<'a> {
    pub fn new(query: &str, min_score: u32, limit: usize, scorer: &'a FuzzyScorer) -> Self {
        let query = query.trim().to_lowercase();
        let key_fn: RankFn = if query.is_empty() {
            recency_key
        } else {
            score_key
        };

        Self {
            query,
            min_score,
            scorer,
            items: RankedCollector::new(limit, key_fn),
        }
    }

    /// Uses the usual thresholds: `min_score` only applies when a query is present.
    pub fn with_defaults(query: &str, min_score: u32, limit: usize, scorer: &'a FuzzyScorer) -> Self {
        let min_score = if query.trim().is_empty() { 0 } else { min_score };
        Self::new(query, min_score, limit, scorer)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    pub fn limit(&self) -> usize {
        self.items.capacity()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Project> + '_ {
        self.items.iter()
    }

    pub fn append(&mut self, mut project: Project) {
        if self.query.is_empty() {
            project.score = recency_key(&project).0;
            self.items.insert(project);
            return;
        }

        let path = project.path.strip_prefix('~').unwrap_or(&project.path);
        let score = self
            .scorer
            .score(&self.query, &project.name)
            .max(self.scorer.score(&self.query, path));

        if score >= f64::from(self.min_score) {
            project.score = -score;
            self.items.insert(project);
        }
    }

    pub fn extend<I>(&mut self, projects: I)
    where
        I: IntoIterator<Item = Project>,
    {
        for project in projects {
            self.append(project);
        }
    }

    pub fn into_vec(self) -> Vec<Project> {
        self.items.into_vec()
    }
}

impl fmt::Debug for ProjectsList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectsList")
            .field("query", &self.query)
            .field("items", &self.items.iter().collect::<Vec<_>>())
            .field("min_score", &self.min_score)
            .field("limit", &self.limit())
            .finish()
    }
}

fn score_key(project: &Project) -> RankKey {
    RankKey(project.score)
}

fn recency_key(project: &Project) -> RankKey {
    RankKey(project.timestamp.map(|ts| -(ts as f64)).unwrap_or(0.0))
}
