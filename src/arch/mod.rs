//! # Architecture Abstraction Layer
//!
//! Hardware implementations of the [`TickSource`](crate::tick::TickSource)
//! and [`Idle`](crate::tick::Idle) seams. Only built for ARM targets; host
//! builds drive the scheduler through simulated implementations instead.

pub mod cortex_m4;
