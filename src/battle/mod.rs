pub mod animation;
pub mod catch;
pub mod controller;
pub mod damage;
pub mod escape;
pub mod input;
pub mod menu;
pub mod phase;
pub mod presentation;
pub mod runner;
pub mod state;
pub mod stats;

#[cfg(test)]
pub mod tests;
