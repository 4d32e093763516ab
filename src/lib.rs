pub mod alpha_bleed;
pub mod chat;
pub mod cli;
pub mod codec;
pub mod color;
pub mod command;
pub mod commands;
pub mod config;
pub mod decorate;
pub mod discord;
pub mod handler;
pub mod imaging;
pub mod source;
