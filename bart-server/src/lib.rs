//! BART departure board server.
//!
//! A web application that answers: "when does the next train leave this
//! station, and when will it get me to my destination?" Live countdowns
//! come from the real-time feed; arrival times add the fastest scheduled
//! trip duration.

pub mod bart;
pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod poll;
pub mod web;
