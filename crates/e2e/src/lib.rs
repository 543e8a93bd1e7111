//! StudioMate API E2E Harness
//!
//! Black-box, sequential test runner for the StudioMate recording studio
//! backend. It drives one ordered pass over a fixed scenario against a live
//! deployment:
//! - issues JSON requests for every resource family (projects, sessions,
//!   audio files, comments, chat, invoices, payments, email, dashboard)
//! - checks the `{ success, data }` envelope of each response
//! - threads created identifiers from one group to the next
//! - collects structured step records and renders them separately
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TestRunner                               │
//! │    ├── validate_plan(groups)  (reads come after writes)     │
//! │    ├── run_all() -> SuiteResult                             │
//! │    └── write_results(dir)                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestGroup (one per resource family)                        │
//! │    ├── access(): requires / reads / writes                  │
//! │    └── run(ctx): steps in order, stop on first failure      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  GroupContext                                               │
//! │    ├── ApiClient  (reqwest, 10 s timeout, JSON headers)     │
//! │    ├── SharedState (project/session/audio/.. ids)           │
//! │    └── StepRecord log                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod group;
pub mod groups;
pub mod output;
pub mod report;
pub mod response;
pub mod runner;
pub mod state;

pub use config::HarnessConfig;
pub use error::{E2eError, E2eResult};
pub use report::{Outcome, SuiteResult};
pub use runner::TestRunner;
pub use state::{EntityKey, SharedState};
