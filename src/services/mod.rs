pub mod app_view;
pub mod content_provider;
pub mod quiz;
pub mod quiz_session;
pub mod word_store;
