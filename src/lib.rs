//! Tournament dashboard: loads match and ball-by-ball delivery records from
//! fixed remote files and ranks teams, batsmen, stadiums and bowlers.

pub mod color;
pub mod config;
pub mod data;
pub mod session;
pub mod state;
