#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use shopfront_service::domain::cart::StockCheck;
use shopfront_service::domain::product::{NewProduct, Product};
use shopfront_service::infrastructure::memory::PlaintextPasswordHasher;
use shopfront_service::validation::RegisterInput;
use shopfront_service::AppState;

/// Build the app around `$state` and return the initialised test service.
macro_rules! app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new().configure(shopfront_service::configure($state.clone())),
        )
        .await
    };
}

pub fn state(stock_check: StockCheck) -> AppState {
    AppState::in_memory("test-secret", Arc::new(PlaintextPasswordHasher), stock_check)
}

/// Register `name` directly through the service and return its bearer header.
pub fn bearer(state: &AppState, name: &str) -> (&'static str, String) {
    let session = state
        .auth
        .register(RegisterInput {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "password1".to_string(),
        })
        .expect("register");
    ("Authorization", format!("Bearer {}", session.token))
}

pub fn seed_product(state: &AppState, name: &str, price: &str, stock: i32) -> Product {
    state
        .catalog
        .create(NewProduct {
            name: name.to_string(),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            description: format!("{name} description"),
            stock_quantity: stock,
            image_url: None,
        })
        .expect("seed product")
}
