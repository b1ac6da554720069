//! Shopping assistant runtime - keyword intent routing and reply assembly
//!
//! This crate turns a free-text chat message into a reply payload:
//! - Classifies the message against an ordered rule table (`conversation`)
//! - Extracts category, price ceiling, brand and sort direction from the same text
//! - Dispatches to the matching handler, which queries the local catalog and
//!   the remote product source (`runtime`)
//! - Owns the session cart shared by all requests
//!
//! # Key Types
//!
//! - `IntentExtractor` - rule table plus parameter extraction
//! - `AgentRuntime` - service object injected into HTTP handlers
//!
//! Rule order is part of the contract: the first matching rule wins.

pub mod conversation;
pub mod runtime;

pub use conversation::{ExtractedIntent, Intent, IntentExtractor};
pub use runtime::{AddToCartOutcome, AgentRuntime, ChatReply};
