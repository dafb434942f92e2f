pub mod config;
pub mod dto;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod slug;
