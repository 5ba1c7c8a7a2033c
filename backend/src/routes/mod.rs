pub mod quote;

pub use quote::*;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(post_quote).service(get_quotes);
}
