//! `dentalis-content` — public-facing site content.
//!
//! Reviews (with the ownership-snapshot rule), FAQ categories/items, and
//! blog posts keyed by slug.

pub mod blog;
pub mod faq;
pub mod review;

pub use blog::{BlogPost, Slug};
pub use faq::{FaqCategory, FaqItem};
pub use review::{NewReview, RATING_MAX, RATING_MIN, Review};
