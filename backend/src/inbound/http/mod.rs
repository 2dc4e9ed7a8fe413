//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod notes;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Mount every API handler and the extractor error handlers on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use notes_backend::inbound::http::configure;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::create_user)
        .service(users::issue_token)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::change_password)
        .service(users::remove_user)
        .service(notes::list_notes)
        .service(notes::save_note)
        .service(notes::get_note_by_slug)
        .service(notes::get_note)
        .service(notes::remove_note)
        .service(tags::list_tags)
        .service(tags::save_tag)
        .service(tags::get_tag)
        .service(tags::remove_tag);
}
