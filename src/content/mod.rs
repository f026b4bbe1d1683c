/*
 * Everything that turns a raw article record into something
 * displayable: the markup formatter, the excerpt/read-time
 * derivation and the related/popular selection heuristics.
 * All pure, the store glue lives in db and app.
 */

pub mod derive;
pub mod formatter;
pub mod selection;

// Fallback category set, used when the categories table is empty.
// Same nine names the site launched with.
pub const FALLBACK_CATEGORIES: [&'static str; 9] = [
  "Pemerintahan", "Pertanian", "Kesehatan", "Pendidikan", "Ekonomi",
  "Keamanan", "Pembangunan", "Lingkungan", "Sosial"
];

// Articles without an uploaded image get a category-keyed stock
// photo so the cards never render empty.
pub fn default_image_for_category(category: &str) -> &'static str {
  match category {
    "Pertanian" =>
      "https://images.unsplash.com/photo-1559028012-481c04fa702d?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Kesehatan" =>
      "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Pendidikan" =>
      "https://images.unsplash.com/photo-1523050854058-8df90110c9f1?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Ekonomi" =>
      "https://images.unsplash.com/photo-1660513502582-4a4c7b0c8bab?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Keamanan" =>
      "https://images.unsplash.com/photo-1600463246951-8b9dfb8b6c72?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Pembangunan" =>
      "https://images.unsplash.com/photo-1541976590-713941681591?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Lingkungan" =>
      "https://images.unsplash.com/photo-1542601906990-b4d3fb778b09?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    "Sosial" =>
      "https://images.unsplash.com/photo-1559028012-481c04fa702d?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80",
    // Pemerintahan and anything unknown:
    _ =>
      "https://images.unsplash.com/photo-1582213782179-e0d53f98f2ca?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80"
  }
}
