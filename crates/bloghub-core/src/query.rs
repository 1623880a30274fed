//! Post listing: filter validation, predicate description and reshaping of
//! flat post/category join rows into nested posts.

use std::collections::HashMap;

use uuid::Uuid;
use validator::Validate;

use crate::domain::{CategorySummary, Post, PostWithCategories};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Filter request for `posts.getAll`.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PostFilter {
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
    pub search: Option<String>,
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u64,
    pub offset: u64,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            published: None,
            search: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PostFilter {
    /// Predicates for the page query. `ids` comes from resolving
    /// `category_id` beforehand.
    pub fn predicate(&self, ids: Option<Vec<Uuid>>) -> PostPredicate {
        PostPredicate {
            published: self.published,
            search: self
                .search
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            ids,
        }
    }
}

/// AND-combined predicates over the `posts` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPredicate {
    /// Exact match on `published`.
    pub published: Option<bool>,
    /// Substring of any of title, content or excerpt.
    pub search: Option<String>,
    /// `id IN (..)`.
    pub ids: Option<Vec<Uuid>>,
}

impl PostPredicate {
    /// In-process evaluation, matching the SQL the Postgres repository emits.
    pub fn matches(&self, post: &Post) -> bool {
        if self.published.is_some_and(|p| p != post.published) {
            return false;
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&post.id) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let hit = post.title.contains(term.as_str())
                || post.content.contains(term.as_str())
                || post
                    .excerpt
                    .as_deref()
                    .is_some_and(|e| e.contains(term.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }

    /// `%term%` with LIKE metacharacters escaped by `\`.
    pub fn like_pattern(term: &str) -> String {
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

/// One row of `posts LEFT JOIN post_categories LEFT JOIN categories`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCategoryRow {
    pub post: Post,
    pub category: Option<CategorySummary>,
}

/// Group join rows by post.
///
/// Posts come out in the order they are first seen. Each row with a category
/// appends it to its post's list; repeated categories are kept.
pub fn reshape(rows: impl IntoIterator<Item = PostCategoryRow>) -> Vec<PostWithCategories> {
    let mut posts: Vec<PostWithCategories> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.post.id).or_insert_with(|| {
            posts.push(PostWithCategories {
                post: row.post.clone(),
                categories: Vec::new(),
            });
            posts.len() - 1
        });

        if let Some(category) = row.category {
            posts[slot].categories.push(category);
        }
    }

    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;

    fn post(title: &str, content: &str, excerpt: Option<&str>, published: bool) -> Post {
        let input = NewPost {
            title: title.into(),
            content: content.into(),
            excerpt: excerpt.map(Into::into),
            published,
            ..Default::default()
        };
        Post::new("default-author".into(), crate::slug::slugify(title), &input)
    }

    fn summary(name: &str) -> CategorySummary {
        CategorySummary {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: crate::slug::slugify(name),
        }
    }

    #[test]
    fn test_reshape_groups_rows_in_first_seen_order() {
        let a = post("A", "a", None, true);
        let b = post("B", "b", None, true);
        let tech = summary("Tech");
        let rust = summary("Rust");

        let rows = vec![
            PostCategoryRow {
                post: a.clone(),
                category: Some(tech.clone()),
            },
            PostCategoryRow {
                post: b.clone(),
                category: None,
            },
            PostCategoryRow {
                post: a.clone(),
                category: Some(rust.clone()),
            },
        ];

        let nested = reshape(rows);
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].post.id, a.id);
        assert_eq!(nested[0].categories, vec![tech, rust]);
        assert_eq!(nested[1].post.id, b.id);
        assert!(nested[1].categories.is_empty());
    }

    #[test]
    fn test_reshape_keeps_repeated_categories() {
        let a = post("A", "a", None, true);
        let tech = summary("Tech");
        let rows = (0..2).map(|_| PostCategoryRow {
            post: a.clone(),
            category: Some(tech.clone()),
        });

        let nested = reshape(rows);
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].categories.len(), 2);
    }

    #[test]
    fn test_predicate_combines_with_and() {
        let draft = post("Rust tips", "body", None, false);
        let live = post("Rust news", "body", None, true);
        let other = post("Go news", "body", Some("no match here"), true);

        let pred = PostFilter {
            published: Some(true),
            search: Some("Rust".into()),
            ..Default::default()
        }
        .predicate(None);

        assert!(!pred.matches(&draft));
        assert!(pred.matches(&live));
        assert!(!pred.matches(&other));
    }

    #[test]
    fn test_search_checks_title_content_and_excerpt() {
        let p = post("Title", "Body text", Some("Short summary"), true);
        for term in ["Title", "Body", "summary"] {
            let pred = PostPredicate {
                search: Some(term.into()),
                ..Default::default()
            };
            assert!(pred.matches(&p), "{term}");
        }
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let pred = PostFilter {
            search: Some("   ".into()),
            ..Default::default()
        }
        .predicate(None);
        assert_eq!(pred.search, None);
    }

    #[test]
    fn test_search_term_is_matched_as_given() {
        let p = post("Rustacean", "body", None, true);
        let pred = PostFilter {
            search: Some(" Rust ".into()),
            ..Default::default()
        }
        .predicate(None);

        assert_eq!(pred.search.as_deref(), Some(" Rust "));
        assert!(!pred.matches(&p));
    }

    #[test]
    fn test_id_set_restricts_matches() {
        let p = post("A", "a", None, true);
        let pred = PostPredicate {
            ids: Some(vec![Uuid::new_v4()]),
            ..Default::default()
        };
        assert!(!pred.matches(&p));

        let pred = PostPredicate {
            ids: Some(vec![p.id]),
            ..Default::default()
        };
        assert!(pred.matches(&p));
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(PostPredicate::like_pattern("rust"), "%rust%");
        assert_eq!(PostPredicate::like_pattern("100%"), "%100\\%%");
        assert_eq!(PostPredicate::like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_limit_bounds() {
        let mut filter = PostFilter::default();
        assert!(filter.validate().is_ok());
        filter.limit = 0;
        assert!(filter.validate().is_err());
        filter.limit = 101;
        assert!(filter.validate().is_err());
        filter.limit = 100;
        assert!(filter.validate().is_ok());
    }
}
