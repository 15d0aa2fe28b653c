//! # vitrine_page - Page Orchestration
//!
//! Ties the scenes of a portfolio page together:
//! - [`Page`]: owns the document, the asset server and every scene; dispatches
//!   [`PageEvent`]s, delayed [`PageTask`]s, finished loads and frame loops
//! - [`PageChrome`]: navbar scroll state, mobile menu and anchor scrolling
//! - [`TimerQueue`]: delayed tasks in deadline order
//!
//! ## Timeline
//!
//! ```text
//! DomReady ─┬─ loader scene, background, hero viewers
//!           ├─ +500 ms   robot viewer
//!           └─ +1000 ms  formación container ── +100 ms wally viewer
//! Load ──────── +1500 ms loader fades ── +500 ms loader hidden
//! ```

pub mod chrome;
pub mod layout;
pub mod page;
pub mod timers;

pub use chrome::{AnchorOutcome, NavbarState, PageChrome};
pub use layout::portfolio_document;
pub use page::{Page, PageConfig, PageEvent, PageState, PageTask};
pub use timers::{TimerId, TimerQueue};
