//! Deterministic placeholder results.
//!
//! When no credential is configured or the live search fails, callers
//! still get a full result set drawn from these built-in tables. Ids use
//! a process-wide monotonic counter so repeated identical calls never
//! collide.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use vitrina_core::cache::key::normalize_query;
use vitrina_core::models::{CachedImage, QualityTier};

/// External-id sentinel marking a synthesized record.
pub const PLACEHOLDER_EXTERNAL_ID: i64 = 0;

static PLACEHOLDER_SEQ: AtomicU64 = AtomicU64::new(0);

struct PlaceholderImage {
    url: &'static str,
    width: u32,
    height: u32,
}

struct PlaceholderSet {
    /// Normalized queries this set answers.
    keys: &'static [&'static str],
    images: &'static [PlaceholderImage],
}

const CAFE_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/302899/pexels-photo-302899.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/1855214/pexels-photo-1855214.jpeg", width: 1600, height: 1067 },
    PlaceholderImage { url: "https://images.pexels.com/photos/1233528/pexels-photo-1233528.jpeg", width: 1280, height: 853 },
];

const RESTAURANT_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/67468/pexels-photo-67468.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/262978/pexels-photo-262978.jpeg", width: 1600, height: 1067 },
    PlaceholderImage { url: "https://images.pexels.com/photos/941861/pexels-photo-941861.jpeg", width: 1280, height: 853 },
];

const BAKERY_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/1070946/pexels-photo-1070946.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/205961/pexels-photo-205961.jpeg", width: 1280, height: 853 },
];

const HEALTH_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/356040/pexels-photo-356040.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/139398/pexels-photo-139398.jpeg", width: 1280, height: 853 },
];

const CLOTHING_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/996329/pexels-photo-996329.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/1488463/pexels-photo-1488463.jpeg", width: 1600, height: 1067 },
    PlaceholderImage { url: "https://images.pexels.com/photos/994523/pexels-photo-994523.jpeg", width: 1280, height: 853 },
];

const RETAIL_SET: &[PlaceholderImage] = &[
    PlaceholderImage { url: "https://images.pexels.com/photos/264636/pexels-photo-264636.jpeg", width: 1920, height: 1280 },
    PlaceholderImage { url: "https://images.pexels.com/photos/1005638/pexels-photo-1005638.jpeg", width: 1600, height: 1067 },
    PlaceholderImage { url: "https://images.pexels.com/photos/375897/pexels-photo-375897.jpeg", width: 1280, height: 853 },
];

const SETS: &[PlaceholderSet] = &[
    PlaceholderSet { keys: &["café", "cafe", "coffee", "cafetería", "cafeteria"], images: CAFE_SET },
    PlaceholderSet { keys: &["restaurante", "restaurant", "comida", "pizzeria", "pizza"], images: RESTAURANT_SET },
    PlaceholderSet { keys: &["panadería", "panaderia", "bakery", "pan"], images: BAKERY_SET },
    PlaceholderSet { keys: &["farmacia", "pharmacy", "salud"], images: HEALTH_SET },
    PlaceholderSet { keys: &["ropa", "moda", "clothing", "boutique"], images: CLOTHING_SET },
];

/// Table lookup: exact key on the normalized query, then substring,
/// then the generic retail set.
fn table_for(normalized: &str) -> &'static [PlaceholderImage] {
    for set in SETS {
        if set.keys.iter().any(|k| *k == normalized) {
            return set.images;
        }
    }
    for set in SETS {
        if set.keys.iter().any(|k| normalized.contains(k)) {
            return set.images;
        }
    }
    RETAIL_SET
}

/// Synthesize `count` placeholder images for a query.
///
/// Entries cycle through the matched table; ids combine tenant, query,
/// index, and a monotonic sequence number so repeated calls stay distinct.
pub fn placeholder_set(query: &str, tenant_id: &str, count: usize) -> Vec<CachedImage> {
    let normalized = normalize_query(query);
    let activity = if normalized.is_empty() { "retail".to_string() } else { normalized.clone() };
    let table = table_for(&normalized);
    let slug = activity.replace(' ', "-");
    let now = Utc::now();

    (0..count)
        .map(|idx| {
            let entry = &table[idx % table.len()];
            let seq = PLACEHOLDER_SEQ.fetch_add(1, Ordering::Relaxed);
            CachedImage {
                id: format!("ph-{tenant_id}-{slug}-{idx}-{seq}"),
                url: entry.url.to_string(),
                activity: activity.clone(),
                attribution: "Imagen de referencia".to_string(),
                external_id: PLACEHOLDER_EXTERNAL_ID,
                width: entry.width,
                height: entry.height,
                cached_at: now,
                tenant_id: tenant_id.to_string(),
                is_placeholder: true,
                quality: QualityTier::from_dimensions(entry.width, entry.height),
            }
        })
        .collect()
}
