pub mod api;
pub mod cart;
pub mod config;
pub mod doctor;
pub mod flow;
pub mod image;
pub mod rates;
pub mod returns;
pub mod selection;
pub mod time;
pub mod toggles;
