//! Popularity Normalizer (C9) — clamp-and-scale a source's raw score onto a
//! shared 0-100 range (§4.9).

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy)]
pub struct PopularityRange {
    pub min: f64,
    pub max: f64,
}

impl PopularityRange {
    /// Clamp `raw` into `[min, max]` and rescale onto `[0, 100]`.
    #[must_use]
    pub fn normalize(&self, raw: f64) -> f64 {
        if self.max <= self.min {
            return raw.clamp(0.0, 100.0);
        }
        let fraction = ((raw - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        100.0 * fraction
    }
}

/// Source-tag-keyed range table (§4.9 examples, extended by analogy for the
/// remaining sources as documented in `DESIGN.md`).
static RANGES: Lazy<HashMap<&'static str, PopularityRange>> = Lazy::new(|| {
    HashMap::from([
        ("movie", PopularityRange { min: 0.0, max: 1000.0 }),
        ("tv", PopularityRange { min: 0.0, max: 1000.0 }),
        ("person", PopularityRange { min: 0.0, max: 1000.0 }),
        ("podcast", PopularityRange { min: 0.0, max: 29.0 }),
        ("book", PopularityRange { min: 0.0, max: 100.0 }),
        ("author", PopularityRange { min: 0.0, max: 100.0 }),
        ("news", PopularityRange { min: 0.0, max: 100.0 }),
        ("video", PopularityRange { min: 0.0, max: 100.0 }),
        ("ratings", PopularityRange { min: 0.0, max: 100.0 }),
        ("artist", PopularityRange { min: 0.0, max: 100.0 }),
        ("album", PopularityRange { min: 0.0, max: 100.0 }),
    ])
});

/// Normalize `raw` for `source`. An unrecognized source tag falls back to a
/// straight `[0, 100]` clamp rather than panicking.
#[must_use]
pub fn normalize(source: &str, raw: f64) -> f64 {
    RANGES
        .get(source)
        .copied()
        .unwrap_or(PopularityRange { min: 0.0, max: 100.0 })
        .normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_popularity_scales_against_a_thousand() {
        assert_eq!(normalize("movie", 500.0), 50.0);
        assert_eq!(normalize("movie", 2000.0), 100.0);
        assert_eq!(normalize("movie", -10.0), 0.0);
    }

    #[test]
    fn book_popularity_is_a_passthrough() {
        assert_eq!(normalize("book", 42.0), 42.0);
    }

    #[test]
    fn unknown_source_falls_back_to_plain_clamp() {
        assert_eq!(normalize("mystery_source", 150.0), 100.0);
    }

    #[test]
    fn mapping_is_monotonic() {
        let a = normalize("podcast", 5.0);
        let b = normalize("podcast", 10.0);
        assert!(b > a);
    }
}
