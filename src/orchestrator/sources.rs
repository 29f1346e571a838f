//! Source descriptor table and per-source state machine (C7 §9 design note).

/// Whether a source is served from a local `tantivy` collection or fetched
/// from an external brokered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Indexed,
    Brokered,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceDescriptor {
    pub tag: &'static str,
    pub priority: usize,
    pub excluded_in_autocomplete: bool,
    pub kind: SourceKind,
}

/// Every source this service fans a request out to, in exact-match priority
/// order followed by the brokered sources (§3, §4.7).
pub static SOURCE_TABLE: &[SourceDescriptor] = &[
    SourceDescriptor { tag: "movie", priority: 0, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "tv", priority: 1, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "person", priority: 2, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "podcast", priority: 3, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "book", priority: 4, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "author", priority: 5, excluded_in_autocomplete: false, kind: SourceKind::Indexed },
    SourceDescriptor { tag: "news", priority: 6, excluded_in_autocomplete: true, kind: SourceKind::Brokered },
    SourceDescriptor { tag: "video", priority: 7, excluded_in_autocomplete: true, kind: SourceKind::Brokered },
    SourceDescriptor { tag: "ratings", priority: 8, excluded_in_autocomplete: true, kind: SourceKind::Brokered },
    SourceDescriptor { tag: "artist", priority: 9, excluded_in_autocomplete: true, kind: SourceKind::Brokered },
    SourceDescriptor { tag: "album", priority: 10, excluded_in_autocomplete: true, kind: SourceKind::Brokered },
];

/// Per-source lifecycle state (§4.7): `pending -> running -> {done, timed_out,
/// cancelled, failed}`. Transitions are monotonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    Pending,
    Running,
    Done,
    TimedOut,
    Cancelled,
    Failed,
}

impl SourceState {
    const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::TimedOut | Self::Cancelled | Self::Failed)
    }

    /// Attempt the transition `self -> to`. A non-monotonic transition (out
    /// of a terminal state, or skipping `Running`) panics in debug builds
    /// and is a no-op (state unchanged) in release, mirroring the teacher's
    /// status-transition guards.
    #[must_use]
    pub fn transition(self, to: Self) -> Self {
        let valid = match (self, to) {
            (Self::Pending, Self::Running) => true,
            (Self::Running, Self::Done | Self::TimedOut | Self::Cancelled | Self::Failed) => true,
            _ => false,
        };
        if valid {
            return to;
        }
        debug_assert!(
            valid,
            "non-monotonic source state transition: {self:?} -> {to:?}"
        );
        self
    }

    #[must_use]
    pub const fn is_done_state(self) -> bool {
        self.is_terminal()
    }
}

/// Compute the enabled source set (§4.7 policy): intersect every source with
/// the optional `sources` request filter, the optional query-text source
/// hint, and the hard per-mode exclusion mask.
#[must_use]
pub fn enabled_sources(
    mode: crate::models::Mode,
    sources_filter: Option<&[String]>,
    source_hint: Option<&[String]>,
) -> Vec<&'static SourceDescriptor> {
    SOURCE_TABLE
        .iter()
        .filter(|d| {
            if mode == crate::models::Mode::Autocomplete && d.excluded_in_autocomplete {
                return false;
            }
            if let Some(filter) = sources_filter {
                if !filter.iter().any(|s| s.eq_ignore_ascii_case(d.tag)) {
                    return false;
                }
            }
            if let Some(hint) = source_hint {
                if !hint.iter().any(|s| s.eq_ignore_ascii_case(d.tag)) {
                    return false;
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mode;

    #[test]
    fn autocomplete_excludes_brokered_sources() {
        let enabled = enabled_sources(Mode::Autocomplete, None, None);
        assert!(enabled.iter().all(|d| d.kind == SourceKind::Indexed));
    }

    #[test]
    fn search_includes_every_source_by_default() {
        let enabled = enabled_sources(Mode::Search, None, None);
        assert_eq!(enabled.len(), SOURCE_TABLE.len());
    }

    #[test]
    fn sources_filter_restricts_to_named_tags() {
        let filter = vec!["movie".to_string(), "tv".to_string()];
        let enabled = enabled_sources(Mode::Search, Some(&filter), None);
        assert_eq!(enabled.len(), 2);
    }

    #[test]
    fn source_hint_intersects_with_sources_filter() {
        let hint = vec!["person".to_string()];
        let enabled = enabled_sources(Mode::Search, None, Some(&hint));
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].tag, "person");
    }

    #[test]
    fn valid_transitions_are_applied() {
        let s = SourceState::Pending.transition(SourceState::Running);
        assert_eq!(s, SourceState::Running);
        let s = s.transition(SourceState::Done);
        assert_eq!(s, SourceState::Done);
    }

    #[test]
    fn terminal_state_is_final() {
        assert!(SourceState::Done.is_done_state());
        assert!(!SourceState::Pending.is_done_state());
    }
}
