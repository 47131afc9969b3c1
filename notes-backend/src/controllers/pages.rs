use actix_web::{Responder, web};

use super::html;
use crate::views;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
}

async fn index() -> impl Responder {
    html(views::index_page())
}
