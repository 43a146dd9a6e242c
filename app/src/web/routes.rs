// app/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{
  admin_handlers, auth_handlers, cart_handlers, contact_handlers, dashboard_handlers, product_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/auth")
          .route("/signup", web::post().to(auth_handlers::signup_handler))
          .route("/signin", web::post().to(auth_handlers::signin_handler))
          .route("/signout", web::post().to(auth_handlers::signout_handler))
          .route("/me", web::get().to(auth_handlers::me_handler)),
      )
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      .route("/categories", web::get().to(product_handlers::list_categories_handler))
      .service(web::scope("/cart").route("/add", web::post().to(cart_handlers::add_to_cart_handler)))
      .service(
        web::scope("/dashboard")
          .route("", web::get().to(dashboard_handlers::dashboard_handler))
          .route("/profile", web::put().to(dashboard_handlers::update_profile_handler)),
      )
      .service(
        web::scope("/admin")
          .route("", web::get().to(admin_handlers::overview_handler))
          .route(
            "/users/{user_id}/toggle-admin",
            web::post().to(admin_handlers::toggle_admin_handler),
          )
          .route("/products", web::post().to(admin_handlers::create_product_handler))
          .route(
            "/products/{product_id}/toggle-status",
            web::post().to(admin_handlers::toggle_product_status_handler),
          )
          .route(
            "/orders/{order_id}/status",
            web::post().to(admin_handlers::set_order_status_handler),
          ),
      )
      .route("/contact", web::post().to(contact_handlers::contact_handler)),
  );
}
