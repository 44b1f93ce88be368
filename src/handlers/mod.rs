// handlers/mod.rs - Two-tier handler layout
//
// Public (reachable without a session, or bypassing the gate entirely)
// → Protected (the session gate has injected a CurrentSession)
pub mod protected;
pub mod public;
