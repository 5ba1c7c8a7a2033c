use actix_web::{HttpResponse, Result, http::header, web};
use serde::Deserialize;
use store::Store;
use store::filter::MaxAge;
use store::quote::{CreateQuoteRequest, now};

#[derive(Deserialize)]
pub struct QuoteForm {
    pub name: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct QuotesQuery {
    #[serde(default)]
    pub max_age: MaxAge,
}

#[actix_web::post("/quote")]
pub async fn post_quote(
    store: web::Data<Store>,
    form: web::Form<QuoteForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();
    let request = CreateQuoteRequest {
        name: form.name,
        message: form.message,
    };

    match store.create_quote(request).await {
        Ok(_) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/"))
            .finish()),
        Err(e) => {
            log::error!("Failed to store quote: {}", e);
            Ok(HttpResponse::InternalServerError().finish())
        }
    }
}

#[actix_web::get("/quotes")]
pub async fn get_quotes(
    store: web::Data<Store>,
    query: web::Query<QuotesQuery>,
) -> Result<HttpResponse> {
    match store.get_quotes_by_age(query.max_age, now()).await {
        Ok(quotes) => Ok(HttpResponse::Ok().json(quotes)),
        Err(e) => {
            log::error!("Failed to load quotes: {}", e);
            Ok(HttpResponse::InternalServerError().finish())
        }
    }
}
