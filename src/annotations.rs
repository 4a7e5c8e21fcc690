//! Publications, pages, and annotations
//!
//! In-memory model for scholarly publications composed of scanned pages,
//! with user-submitted annotations and OCR-derived word boxes attached to
//! each page. Persistence and the HTTP surface are the caller's concern;
//! this module owns the filtering and annotation lifecycle semantics.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::words::WordRecord;

// ============================================================
// Error Types
// ============================================================

/// Annotation store error types
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Unknown publication: {0}")]
    UnknownPublication(u64),

    #[error("Unknown page: {0}")]
    UnknownPage(u64),

    #[error("Unknown annotation: {0}")]
    UnknownAnnotation(u64),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;

// ============================================================
// Core Data Structures
// ============================================================

/// A scholarly publication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    pub id: u64,
    pub title: String,
}

/// One scanned page of a publication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub publication_id: u64,
    /// Rendered page image width in pixels
    pub width: u32,
    /// Rendered page image height in pixels
    pub height: u32,
    /// OCR words, boxes normalized to the page dimensions
    pub words: Vec<WordRecord>,
}

impl Page {
    /// Create a page with no words attached yet
    pub fn new(id: u64, publication_id: u64, width: u32, height: u32) -> Self {
        Self {
            id,
            publication_id,
            width,
            height,
            words: Vec::new(),
        }
    }
}

/// A user-submitted annotation on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub page_id: u64,
    pub user_id: u64,
    /// Free-form annotation payload
    pub data: Value,
    pub tags: Vec<String>,
    pub visible: bool,
    /// Set once the annotation has been consumed by a downstream export
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================
// Store
// ============================================================

/// Owned in-memory store for publications, pages, and annotations.
///
/// No interior mutability; callers wanting shared access wrap it in their
/// own lock.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    publications: BTreeMap<u64, Publication>,
    pages: BTreeMap<u64, Page>,
    annotations: BTreeMap<u64, Annotation>,
    next_id: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add a publication, returning its id
    pub fn add_publication(&mut self, title: impl Into<String>) -> u64 {
        let id = self.alloc_id();
        self.publications.insert(
            id,
            Publication {
                id,
                title: title.into(),
            },
        );
        id
    }

    /// Add a page to a publication, returning the page id
    pub fn add_page(&mut self, publication_id: u64, width: u32, height: u32) -> Result<u64> {
        if !self.publications.contains_key(&publication_id) {
            return Err(AnnotationError::UnknownPublication(publication_id));
        }
        let id = self.alloc_id();
        self.pages
            .insert(id, Page::new(id, publication_id, width, height));
        Ok(id)
    }

    pub fn publication(&self, id: u64) -> Option<&Publication> {
        self.publications.get(&id)
    }

    pub fn page(&self, id: u64) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn page_mut(&mut self, id: u64) -> Option<&mut Page> {
        self.pages.get_mut(&id)
    }

    pub fn annotation(&self, id: u64) -> Option<&Annotation> {
        self.annotations.get(&id)
    }

    // ============================================================
    // Annotation Lifecycle
    // ============================================================

    /// Submit an annotation for a page.
    ///
    /// `data = None` deletes all annotations on the page and returns
    /// `Ok(None)`. An unknown page id is an error and leaves existing
    /// annotations untouched.
    pub fn submit(
        &mut self,
        page_id: u64,
        user_id: u64,
        data: Option<Value>,
        tags: Vec<String>,
    ) -> Result<Option<u64>> {
        if !self.pages.contains_key(&page_id) {
            return Err(AnnotationError::UnknownPage(page_id));
        }

        let Some(data) = data else {
            let before = self.annotations.len();
            self.annotations.retain(|_, a| a.page_id != page_id);
            debug!(
                page = page_id,
                removed = before - self.annotations.len(),
                "deleted page annotations"
            );
            return Ok(None);
        };

        let id = self.alloc_id();
        self.annotations.insert(
            id,
            Annotation {
                id,
                page_id,
                user_id,
                data,
                tags,
                visible: true,
                is_used: false,
                created_at: Utc::now(),
            },
        );
        Ok(Some(id))
    }

    /// Mark annotations as consumed by a downstream export
    pub fn mark_used(&mut self, ids: &[u64]) -> Result<()> {
        for id in ids {
            if !self.annotations.contains_key(id) {
                return Err(AnnotationError::UnknownAnnotation(*id));
            }
        }
        for id in ids {
            if let Some(a) = self.annotations.get_mut(id) {
                a.is_used = true;
            }
        }
        Ok(())
    }

    /// Show or hide an annotation
    pub fn set_visible(&mut self, id: u64, visible: bool) -> Result<()> {
        match self.annotations.get_mut(&id) {
            Some(a) => {
                a.visible = visible;
                Ok(())
            }
            None => Err(AnnotationError::UnknownAnnotation(id)),
        }
    }

    /// All annotations on a page, in creation order
    pub fn annotations_for_page(&self, page_id: u64) -> Vec<&Annotation> {
        self.annotations
            .values()
            .filter(|a| a.page_id == page_id)
            .collect()
    }

    // ============================================================
    // Filters
    // ============================================================

    /// Distinct users that annotated a page
    fn page_annotators(&self, page_id: u64) -> HashSet<u64> {
        self.annotations
            .values()
            .filter(|a| a.page_id == page_id)
            .map(|a| a.user_id)
            .collect()
    }

    fn publication_page_ids(&self, publication_id: u64) -> Vec<u64> {
        self.pages
            .values()
            .filter(|p| p.publication_id == publication_id)
            .map(|p| p.id)
            .collect()
    }

    /// Publications the given user has (or has not) annotated
    pub fn publications_annotated_by(&self, user_id: u64, annotated: bool) -> Vec<u64> {
        self.publications
            .keys()
            .filter(|&&pub_id| {
                let hit = self.publication_page_ids(pub_id).iter().any(|&page_id| {
                    self.annotations
                        .values()
                        .any(|a| a.page_id == page_id && a.user_id == user_id)
                });
                hit == annotated
            })
            .copied()
            .collect()
    }

    /// Publications where every page has at least `n` distinct annotators.
    ///
    /// Publications with no pages never match.
    pub fn publications_with_min_annotators(&self, n: usize) -> Vec<u64> {
        self.publications
            .keys()
            .filter(|&&pub_id| {
                let pages = self.publication_page_ids(pub_id);
                !pages.is_empty()
                    && pages
                        .iter()
                        .all(|&page_id| self.page_annotators(page_id).len() >= n)
            })
            .copied()
            .collect()
    }

    /// Publications where no page has more than `n` distinct annotators
    pub fn publications_with_max_annotators(&self, n: usize) -> Vec<u64> {
        self.publications
            .keys()
            .filter(|&&pub_id| {
                self.publication_page_ids(pub_id)
                    .iter()
                    .all(|&page_id| self.page_annotators(page_id).len() <= n)
            })
            .copied()
            .collect()
    }

    fn page_has_tags(&self, page_id: u64, tags: &[&str]) -> bool {
        self.annotations
            .values()
            .filter(|a| a.page_id == page_id && a.visible)
            .any(|a| tags.iter().all(|t| a.tags.iter().any(|have| have == t)))
    }

    /// Publications with a visible annotation carrying all the given tags
    pub fn publications_with_tags(&self, tags: &[&str]) -> Vec<u64> {
        self.publications
            .keys()
            .filter(|&&pub_id| {
                self.publication_page_ids(pub_id)
                    .iter()
                    .any(|&page_id| self.page_has_tags(page_id, tags))
            })
            .copied()
            .collect()
    }

    /// Pages with a visible annotation carrying all the given tags
    pub fn pages_with_tags(&self, tags: &[&str]) -> Vec<u64> {
        self.pages
            .keys()
            .filter(|&&page_id| self.page_has_tags(page_id, tags))
            .copied()
            .collect()
    }

    /// Visible annotations carrying all the given tags
    pub fn annotations_with_tags(&self, tags: &[&str]) -> Vec<&Annotation> {
        self.annotations
            .values()
            .filter(|a| a.visible && tags.iter().all(|t| a.tags.iter().any(|have| have == t)))
            .collect()
    }
}
