//! FAQ content, read-only to all callers.

use serde::{Deserialize, Serialize};

use dentalis_core::{FaqCategoryId, FaqItemId};

/// A group of FAQ items under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqCategory {
    pub id: FaqCategoryId,
    pub title: String,
}

/// One question/answer pair within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: FaqItemId,
    pub category: FaqCategoryId,
    pub question: String,
    pub answer: String,
}
