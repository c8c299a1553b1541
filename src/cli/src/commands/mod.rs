pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod event;
pub mod health;
pub mod seed;
pub mod unit;
