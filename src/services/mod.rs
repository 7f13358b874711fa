pub mod api;
pub mod clipboard;
pub mod controller;
pub mod download;
pub mod render;
