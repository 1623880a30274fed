//! Sample content for a fresh installation.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{NewCategory, NewPost};
use crate::error::DomainError;

use super::{CategoryService, PostService};

struct SampleCategory {
    name: &'static str,
    description: &'static str,
}

struct SamplePost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    author_id: &'static str,
    published: bool,
    /// Category slugs, in link order.
    categories: &'static [&'static str],
}

const CATEGORIES: &[SampleCategory] = &[
    SampleCategory {
        name: "Technology",
        description: "Latest trends and innovations in technology",
    },
    SampleCategory {
        name: "Travel",
        description: "Travel tips, destinations and adventure stories",
    },
    SampleCategory {
        name: "Food & Cooking",
        description: "Recipes, cooking tips and culinary adventures",
    },
    SampleCategory {
        name: "Health & Fitness",
        description: "Healthy living and fitness routines",
    },
    SampleCategory {
        name: "Personal Development",
        description: "Self-improvement and personal growth",
    },
    SampleCategory {
        name: "Web Development",
        description: "Frontend and backend development tutorials",
    },
    SampleCategory {
        name: "Lifestyle",
        description: "Productivity and work-life balance",
    },
];

const POSTS: &[SamplePost] = &[
    SamplePost {
        title: "Getting Started with Next.js 15",
        slug: "getting-started-nextjs-15",
        excerpt: "A tour of what changed in Next.js 15 and how to adopt it.",
        content: "# Getting Started with Next.js 15\n\n\
            Next.js 15 brings faster builds, clearer error overlays and better \
            server rendering defaults. This guide walks through a new project \
            from the first page to a production build.",
        author_id: "admin",
        published: true,
        categories: &["technology", "web-development"],
    },
    SamplePost {
        title: "10 Essential Cooking Tips for Beginners",
        slug: "essential-cooking-tips-beginners",
        excerpt: "Habits that make a new cook confident in the kitchen.",
        content: "# 10 Essential Cooking Tips for Beginners\n\n\
            Read the whole recipe first, prepare every ingredient before the \
            heat goes on, season as you go and taste constantly. Keep the pan \
            uncrowded and let meat rest before cutting it.",
        author_id: "chef-admin",
        published: true,
        categories: &["food-cooking"],
    },
    SamplePost {
        title: "My Journey Through Southeast Asia",
        slug: "journey-southeast-asia",
        excerpt: "Three months and five countries of street food and temples.",
        content: "# My Journey Through Southeast Asia\n\n\
            Bangkok markets, the bays of northern Vietnam, sunrise at Angkor \
            Wat and the street art of Penang. Notes from a slow trip across \
            the region.",
        author_id: "travel-blogger",
        published: true,
        categories: &["travel", "lifestyle"],
    },
    SamplePost {
        title: "Building Mental Resilience: A Guide",
        slug: "building-mental-resilience-guide",
        excerpt: "Daily practices that help you recover from setbacks.",
        content: "# Building Mental Resilience: A Guide\n\n\
            Resilience is learned. Mindfulness, steady relationships and a \
            habit of reframing problems make hard weeks easier to absorb.",
        author_id: "wellness-coach",
        published: true,
        categories: &["health-fitness", "personal-development"],
    },
    SamplePost {
        title: "Mastering TypeScript: Advanced Patterns",
        slug: "mastering-typescript-advanced-patterns",
        excerpt: "Conditional, mapped and template literal types in practice.",
        content: "# Mastering TypeScript: Advanced Patterns\n\n\
            Mapped types transform existing types into new ones. Conditional \
            types pick between them and template literal types build string \
            shapes the compiler can check.",
        author_id: "admin",
        published: true,
        categories: &["web-development"],
    },
    SamplePost {
        title: "The Complete Guide to Remote Work Productivity",
        slug: "complete-guide-remote-work-productivity",
        excerpt: "Routines and tools for getting deep work done from home.",
        content: "# The Complete Guide to Remote Work Productivity\n\n\
            A dedicated workspace, fixed start and end times and written \
            communication by default keep remote teams focused.",
        author_id: "admin",
        published: true,
        categories: &["lifestyle"],
    },
    SamplePost {
        title: "Draft: Sustainable Living, Small Changes",
        slug: "sustainable-living-small-changes-big-impact",
        excerpt: "Everyday swaps that add up.",
        content: "Outline: energy at home, food waste, getting around.",
        author_id: "admin",
        published: false,
        categories: &[],
    },
];

/// Counts of what [`seed_sample_data`] created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub posts: usize,
    pub links: usize,
}

/// Populate an empty store with sample categories and posts.
///
/// Goes through the services, so slugs and validation apply as for any
/// client. Returns `None` without writing anything when categories already
/// exist.
pub async fn seed_sample_data(
    categories: &CategoryService,
    posts: &PostService,
) -> Result<Option<SeedReport>, DomainError> {
    if !categories.list_all().await?.is_empty() {
        tracing::info!("Store already contains categories, skipping seed");
        return Ok(None);
    }

    let mut ids: HashMap<String, Uuid> = HashMap::new();
    for sample in CATEGORIES {
        let category = categories
            .create(NewCategory {
                name: sample.name.to_string(),
                description: Some(sample.description.to_string()),
            })
            .await?;
        ids.insert(category.slug, category.id);
    }

    let mut links = 0;
    for sample in POSTS {
        let category_ids = sample
            .categories
            .iter()
            .map(|slug| {
                ids.get(*slug)
                    .copied()
                    .ok_or_else(|| DomainError::not_found("Category", slug))
            })
            .collect::<Result<Vec<_>, _>>()?;
        links += category_ids.len();

        posts
            .create(
                sample.author_id,
                NewPost {
                    title: sample.title.to_string(),
                    slug: Some(sample.slug.to_string()),
                    content: sample.content.to_string(),
                    excerpt: Some(sample.excerpt.to_string()),
                    published: sample.published,
                    category_ids,
                    image_url: None,
                },
            )
            .await?;
    }

    let report = SeedReport {
        categories: CATEGORIES.len(),
        posts: POSTS.len(),
        links,
    };
    tracing::info!(
        categories = report.categories,
        posts = report.posts,
        links = report.links,
        "Sample data seeded"
    );
    Ok(Some(report))
}
