//! Group destination finder server.
//!
//! A web service that answers: "we are flying from different cities on the
//! same day; where can we all meet, and which place is cheapest and fairest
//! for the group?"

pub mod amadeus;
pub mod cache;
pub mod domain;
pub mod planner;
pub mod web;
