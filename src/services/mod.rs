//! Ambient HTTP-client infrastructure shared by the brokered provider
//! adapters (C6). Everything else the teacher carried under `services` (the
//! scanner, filesystem watcher, torrent/cast/artwork services) belonged to
//! write-path ingestion, which is out of scope here (§1 Non-goals).

pub mod rate_limiter;
