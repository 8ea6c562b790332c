//! HTTP API handlers for npulse-lp

pub mod admin;
pub mod error;
pub mod health;
pub mod json;
pub mod learning_path;
pub mod newsletter;
pub mod posts;

pub use admin::{
    create_course, create_lesson, create_module, create_track, delete_course, delete_lesson,
    delete_module, delete_track, get_summary, update_course, update_lesson, update_module,
    update_track,
};
pub use error::ApiError;
pub use health::health_routes;
pub use json::ApiJson;
pub use learning_path::{get_learning_path, get_lesson};
pub use newsletter::subscribe_newsletter;
pub use posts::{create_post, delete_post, get_post, list_posts, search_posts, update_post};

use npulse_common::reading_time::{calculate_reading_time, format_reading_time};
use serde_json::{json, Value};

/// `{"minutes": n, "label": "n min read"}` for a lesson or post body
pub(crate) fn reading_time_value(content: &str) -> Value {
    let minutes = calculate_reading_time(content);
    json!({
        "minutes": minutes,
        "label": format_reading_time(minutes),
    })
}
