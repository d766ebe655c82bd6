//! Record types for the cached game catalog.
//!
//! Each entity kind mirrors the shape the remote API serves. All records
//! carry a numeric `id` assigned by the server, which doubles as the key in
//! the local store.

use serde::{Deserialize, Serialize};

// ── Game ────────────────────────────────────────────────────────────────────

/// A game as served by the remote catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub metacritic: Option<i32>,
    #[serde(default)]
    pub playtime: Option<u32>,
}

// ── Genre ───────────────────────────────────────────────────────────────────

/// A genre a game can belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

// ── Platform ────────────────────────────────────────────────────────────────

/// A platform games are released on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

// ── Publisher ───────────────────────────────────────────────────────────────

/// A publishing company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

// ── Tag ─────────────────────────────────────────────────────────────────────

/// A free-form tag attached to games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

// ── CatalogRecord ───────────────────────────────────────────────────────────

/// A record moving across the store boundary, one case per entity kind.
///
/// Internally tagged so a stored payload identifies its own kind; the store
/// never needs out-of-band type information to decode what it reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogRecord {
    Game(Game),
    Genre(Genre),
    Platform(Platform),
    Publisher(Publisher),
    Tag(Tag),
}

impl CatalogRecord {
    /// The numeric identifier used as the store key.
    pub fn key(&self) -> i64 {
        match self {
            Self::Game(g) => g.id,
            Self::Genre(g) => g.id,
            Self::Platform(p) => p.id,
            Self::Publisher(p) => p.id,
            Self::Tag(t) => t.id,
        }
    }

    /// Lowercase kind name, matching the serialized `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Game(_) => "game",
            Self::Genre(_) => "genre",
            Self::Platform(_) => "platform",
            Self::Publisher(_) => "publisher",
            Self::Tag(_) => "tag",
        }
    }

    /// Name of the canonical object store for this kind.
    pub fn store_name(&self) -> &'static str {
        match self {
            Self::Game(_) => "games",
            Self::Genre(_) => "genres",
            Self::Platform(_) => "platforms",
            Self::Publisher(_) => "publishers",
            Self::Tag(_) => "tags",
        }
    }
}
