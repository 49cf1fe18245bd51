// ── Blocklist storage ──

pub mod blocklist;

pub use blocklist::BlocklistStore;
