//! Collision detection and resolution against the floor.
//!
//! This module handles:
//! - **Detection**: whether the ball's bottom has reached the floor while
//!   moving toward it
//! - **Resolution**: an instantaneous reversal of vertical velocity scaled by
//!   restitution
//!
//! ## Discrete Contact Model
//!
//! Contact is checked once per fixed step, after integration. There is no
//! position correction, so the ball may sink below the floor for a step
//! before its velocity carries it back out.
//!
//! ```text
//!        ●   velocity.y < 0
//!       ( )
//! ══════╳═══ floor.y          dy = ball.y - floor.y < radius → rebound
//! ```

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
