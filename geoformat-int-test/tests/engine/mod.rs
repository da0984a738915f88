//! Acceleration engine tests.
//!
//! Results must not depend on whether the engine path or the fallback ran.

mod engine_test;
