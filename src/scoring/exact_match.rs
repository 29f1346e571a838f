//! Exact-Match Arbiter (C8) — walk the fixed source-priority ladder and pick
//! at most one exact match per request (§4.8).

use serde_json::Value;

use crate::models::{CastCredit, Item, ResponseEnvelope, TypeFields, SOURCE_PRIORITY};

/// Walk `envelope`'s arrays in [`SOURCE_PRIORITY`] order and return the
/// restructured exact-match payload for the first item whose `canonical_name`
/// equals `query_canonical`. Returns `None` if `query_canonical` is empty or
/// no source has a match.
#[must_use]
pub fn arbitrate(envelope: &ResponseEnvelope, query_canonical: &str) -> Option<Value> {
    if query_canonical.is_empty() {
        return None;
    }
    for &source in SOURCE_PRIORITY {
        let items = envelope.array(source)?;
        if let Some(item) = pick_exact(items, query_canonical) {
            return Some(to_exact_match_json(item));
        }
    }
    None
}

/// First exact match by list position; ties broken by higher `popularity`
/// (§4.8 Open Question (b) — a defensive fallback for a case that cannot
/// currently occur, since each source's array is already totally ordered).
fn pick_exact<'a>(items: &'a [Item], query_canonical: &str) -> Option<&'a Item> {
    let mut matches = items.iter().filter(|item| item.canonical_name == query_canonical);
    let mut best = matches.next()?;
    for candidate in matches {
        if candidate.popularity > best.popularity {
            best = candidate;
        }
    }
    Some(best)
}

/// Restructure `cast` (plain names) into `[{name, id}]` pairs for media
/// exact-match payloads, zipping `cast` with `cast_ids` positionally.
fn to_exact_match_json(item: &Item) -> Value {
    let mut value = serde_json::to_value(item).unwrap_or(Value::Null);

    if let TypeFields::Media(media) = &item.fields {
        let credits: Vec<CastCredit> = media
            .cast
            .iter()
            .enumerate()
            .map(|(i, name)| CastCredit {
                name: name.clone(),
                id: media.cast_ids.get(i).cloned().flatten(),
            })
            .collect();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "cast".to_string(),
                serde_json::to_value(credits).unwrap_or(Value::Array(Vec::new())),
            );
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DirectorRef, MediaFields, PersonFields, ResponseEnvelope};

    fn media_item(search_title: &str, canonical: &str, popularity: f64) -> Item {
        Item {
            mc_id: "movie_tmdb_1".to_string(),
            mc_type: "movie".to_string(),
            mc_subtype: None,
            source: "tmdb".to_string(),
            source_id: "1".to_string(),
            search_title: search_title.to_string(),
            popularity,
            rating: None,
            image: None,
            overview: None,
            canonical_name: canonical.to_string(),
            fields: TypeFields::Media(MediaFields {
                cast: vec!["Timothee Chalamet".to_string(), "Zendaya".to_string()],
                cast_ids: vec![Some("person_1".to_string()), None],
                director: Some(DirectorRef {
                    name: "Denis Villeneuve".to_string(),
                    id: None,
                }),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn picks_highest_priority_source_first() {
        let mut envelope = ResponseEnvelope::default();
        envelope.movie.push(media_item("Dune", "dune", 85.0));
        envelope.tv.push(Item {
            canonical_name: "dune".to_string(),
            mc_type: "tv".to_string(),
            fields: TypeFields::Person(PersonFields::default()),
            ..Default::default()
        });

        let result = arbitrate(&envelope, "dune").expect("a match exists");
        assert_eq!(result["mc_type"], "movie");
    }

    #[test]
    fn restructures_cast_into_name_id_pairs() {
        let mut envelope = ResponseEnvelope::default();
        envelope.movie.push(media_item("Dune", "dune", 85.0));

        let result = arbitrate(&envelope, "dune").expect("a match exists");
        let cast = result["cast"].as_array().expect("cast is an array");
        assert_eq!(cast[0]["name"], "Timothee Chalamet");
        assert_eq!(cast[0]["id"], "person_1");
        assert_eq!(cast[1]["id"], Value::Null);
    }

    #[test]
    fn no_match_returns_none() {
        let mut envelope = ResponseEnvelope::default();
        envelope.movie.push(media_item("Dune", "dune", 85.0));
        assert!(arbitrate(&envelope, "nonexistent").is_none());
    }

    #[test]
    fn empty_query_returns_none() {
        let envelope = ResponseEnvelope::default();
        assert!(arbitrate(&envelope, "").is_none());
    }
}
