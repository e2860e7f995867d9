//! Core library for the roster-audit command line application.
//!
//! The library reconciles membership exports from an organizing platform, a
//! mailing list and a chat workspace. Source readers live under
//! [`roster::audit::io`], the member record in [`roster::audit::model`], the
//! matching rules in [`roster::audit::matching`] and
//! [`roster::audit::normalize`], list operations in [`roster::audit::ops`],
//! report rendering in [`roster::audit::report`], and the audit
//! orchestration under [`roster::audit::reconcile`].

pub mod roster;

pub use roster::audit::{
    AuditError, Result, config, error, io, matching, model, normalize, ops, reconcile, report,
};
