/// UI module exports
pub mod components;
pub mod manager;
pub mod popup;
