pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod globe;
pub mod render;
pub mod ui;
